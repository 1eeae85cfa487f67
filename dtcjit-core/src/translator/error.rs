//! Translator error types.
//!
//! This module mirrors the flat `DtcError_t` enumeration of the original Dex-to-C
//! translator with a `thiserror`-derived error type. All stages return this error
//! directly; there is no local recovery (see `pipeline` for the propagation policy).

use thiserror::Error;

/// Translator error kinds, one per stage/validation failure the pipeline can hit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslatorError {
    /// The backing instruction buffer ended before the decoder could read a full
    /// instruction.
    #[error("instruction buffer too short at word offset {0}")]
    TooShortBuffer(u32),

    /// An allocation the translator needed could not be satisfied.
    #[error("memory allocation failed")]
    MemoryAlloc,

    /// An opcode was encountered that the active stage has no classification for.
    #[error("unknown opcode 0x{0:02X} at address 0x{1:08X}")]
    UnknownOpcode(u8, u32),

    /// A required input (e.g. the method handle) was null or otherwise invalid.
    #[error("invalid parameter")]
    InvalidParameter,

    /// The dex code stream failed a structural check (e.g. insns_size mismatch).
    #[error("invalid dex code")]
    InvalidDexCode,

    /// The resolved method handle did not refer to a valid dex method.
    #[error("invalid dex method")]
    InvalidDexMethod,

    /// The resolved method's descriptor/prototype did not parse.
    #[error("invalid dex method type")]
    InvalidDexMethodType,

    /// The class data accompanying the method could not be parsed.
    #[error("invalid class data")]
    InvalidClassData,

    /// The debug-info stream for local variables was malformed.
    #[error("invalid debug info stream")]
    InvalidDebugInfoStream,

    /// A lowering or liveness step produced a def-web reference that did not resolve.
    #[error("invalid def web for register v{0}")]
    InvalidDefWeb(u16),

    /// A lowering or liveness step produced a use-web reference that did not resolve.
    #[error("invalid use web for register v{0}")]
    InvalidUseWeb(u16),

    /// Instruction decoding failed for a basic block.
    #[error("failed to resolve dexcodes for block at 0x{0:08X}")]
    ResolveDexcodes(u32),

    /// Local-variable resolution from debug info failed.
    #[error("failed to resolve local variables")]
    ResolveLocalVars,

    /// Leader scan / block carving failed.
    #[error("failed to resolve basic blocks")]
    ResolveBasicBlocks,

    /// The (deprecated, unused by the core pipeline) control-flow graph builder failed.
    #[error("failed to build control flow graph")]
    BuildControlFlowGraph,

    /// Block-local liveness analysis failed.
    #[error("failed to analyse liveness for block at 0x{0:08X}")]
    AnalyseLiveness(u32),

    /// Dex-to-C-IR lowering failed.
    #[error("dex2c translation failed")]
    Dex2cTranslation,

    /// Unclassified failure with no more specific variant.
    #[error("failure")]
    Failure,
}

impl From<std::fmt::Error> for TranslatorError {
    #[cold]
    fn from(_err: std::fmt::Error) -> Self {
        TranslatorError::Failure
    }
}
