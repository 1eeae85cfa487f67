//! C-like intermediate representation: expressions, statements, per-opcode
//! lowering, and deterministic textual rendering (§4.6-§4.7, §6).

pub mod cmethod;
pub mod expression;
pub mod lowering;
pub mod render;
pub mod statement;

pub use cmethod::CMethod;
pub use expression::{BinaryOp, Expression, Symbol, SymbolKind, SymbolTable, UnaryOp};
pub use statement::Statement;
