//! C-IR statement tree and deterministic textual rendering (§4.6-§4.7).

use crate::translator::ir::expression::Expression;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::expression::Symbol;

/// One emitted C-IR statement. Every opcode lowers to at most one of these (§4.6:
/// "per-opcode dispatch to exactly one emitted statement").
#[derive(Debug, Clone)]
pub enum Statement {
    /// `lhs = rhs;`
    Assign(Expression, Expression),
    /// `if(cond)\tgoto label;` when `cond` is `Some`, else an unconditional `goto label;`
    Branch(Option<Expression>, Rc<RefCell<Symbol>>),
    /// `return expr;` or, for void methods, a bare `return;`
    Return(Option<Expression>),
    /// A bare expression statement, for invocations whose result is discarded.
    Expr(Expression),
}

const INDENT: &str = "    ";

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", INDENT)?;
        match self {
            Statement::Assign(lhs, rhs) => write!(f, "{} = {};", lhs, rhs),
            Statement::Branch(Some(cond), label) => write!(f, "if({})\tgoto {};", cond, label.borrow()),
            Statement::Branch(None, label) => write!(f, "goto {};", label.borrow()),
            Statement::Return(Some(expr)) => write!(f, "return {};", expr),
            Statement::Return(None) => write!(f, "return;"),
            Statement::Expr(expr) => write!(f, "{};", expr),
        }
    }
}
