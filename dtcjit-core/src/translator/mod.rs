//! Dalvik-to-C-IR translation pipeline: decode instructions, carve basic blocks,
//! resolve liveness and types, then lower and render C-like intermediate code.

pub mod basic_block;
pub mod collaborators;
pub mod dexcode;
pub mod error;
pub mod ir;
pub mod liveweb;
pub mod method;
pub mod type_inference;

pub use basic_block::BasicBlock;
pub use collaborators::{DebugInfoSource, DexCode, LocalVarCollector, LocalVarRecord, MethodHandle, TryRegion};
pub use dexcode::{DecodedInstruction, InstructionRecord, Opcode};
pub use error::TranslatorError;
pub use ir::CMethod;
pub use liveweb::{JType, LiveWeb};
pub use method::Method;

/// Translates one resolved method handle all the way from dex code to rendered C-IR
/// (§5's end-to-end pipeline): `Method::build_ir` then `CMethod::translate`.
pub fn translate_method(handle: &dyn MethodHandle) -> Result<CMethod, TranslatorError> {
    let method = Method::build_ir(handle)?;
    CMethod::translate(&method)
}
