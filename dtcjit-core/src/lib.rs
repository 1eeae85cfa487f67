//! Just-in-time translator from Dalvik bytecode to a C-like intermediate
//! representation: instruction decoding, basic-block recovery, live-web liveness and
//! type inference, and C-IR lowering with deterministic textual rendering.

pub mod translator;

pub use translator::{translate_method, CMethod, JType, LiveWeb, Method, Opcode, TranslatorError};
