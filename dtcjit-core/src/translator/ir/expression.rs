//! C-IR expression tree and symbol table (§4.6-§4.7).
//!
//! Every leaf of an expression is a reference to a [`Symbol`] rather than a bare
//! string, and `SymbolTable` interns symbols by their rendered name *value*. The
//! original keyed its symbol table on the `DtcCSymbol*` pointer, so two references
//! to a register named `vi3` built at different points in lowering never compared
//! equal; keying on the text itself makes repeated references to the same name
//! collapse to one symbol, which is what the emitted C actually needs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// What a [`Symbol`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Var,
    Func,
    Const,
    Label,
}

/// A named entity an expression can reference: a variable (a rendered live-web
/// name), a callee function, a numeric/string constant's literal text, or a basic
/// block's label.
#[derive(Debug, Clone)]
pub struct Symbol {
    kind: SymbolKind,
    name: String,
}

impl Symbol {
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SymbolKind::Label => write!(f, ".L{}", self.name),
            _ => write!(f, "{}", self.name),
        }
    }
}

/// Interns [`Symbol`]s by `(kind, name)`, so every reference to the same rendered
/// name within a method shares one `Rc<RefCell<Symbol>>`.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<(SymbolKind, String), Rc<RefCell<Symbol>>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn intern(&mut self, kind: SymbolKind, name: impl Into<String>) -> Rc<RefCell<Symbol>> {
        let name = name.into();
        self.symbols
            .entry((kind, name.clone()))
            .or_insert_with(|| Rc::new(RefCell::new(Symbol { kind, name })))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Unary operator tokens (§4.7's fixed operator/cast token table), in the original
/// `DtcCExprType_t` unary ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitOr,
    BitAnd,
    IntToLong,
    IntToFloat,
    IntToDouble,
    LongToInt,
    LongToFloat,
    LongToDouble,
    FloatToInt,
    FloatToLong,
    FloatToDouble,
    DoubleToInt,
    DoubleToLong,
    DoubleToFloat,
}

impl UnaryOp {
    pub fn token(self) -> &'static str {
        use UnaryOp::*;
        match self {
            Neg => "-",
            Not => "!",
            BitOr => "|",
            BitAnd => "&",
            IntToLong => "(j_long)",
            IntToFloat => "(j_float)",
            IntToDouble => "(j_double)",
            LongToInt => "(j_int)",
            LongToFloat => "(j_float)",
            LongToDouble => "(j_double)",
            FloatToInt => "(j_int)",
            FloatToLong => "(j_long)",
            FloatToDouble => "(j_double)",
            DoubleToInt => "(j_int)",
            DoubleToLong => "(j_long)",
            DoubleToFloat => "(j_float)",
        }
    }
}

/// Binary operator tokens. `Shr` and `Ushr` both render as `>>`, matching the
/// original table's token collision (the emitted C cannot distinguish them; this is
/// carried over rather than "fixed", since changing it would diverge from the
/// original's actual output).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Ushr,
    Eq,
    Ne,
    Le,
    Lt,
    Ge,
    Gt,
}

impl BinaryOp {
    pub fn token(self) -> &'static str {
        use BinaryOp::*;
        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Rem => "%",
            And => "&",
            Or => "|",
            Xor => "^",
            Shl => "<<",
            Shr => ">>",
            Ushr => ">>",
            Eq => "==",
            Ne => "!=",
            Le => "<=",
            Lt => "<",
            Ge => ">=",
            Gt => ">",
        }
    }
}

/// A C-IR expression (§4.6): a symbol reference, a unary or binary operation, or a
/// call.
#[derive(Debug, Clone)]
pub enum Expression {
    Id(Rc<RefCell<Symbol>>),
    Unary(UnaryOp, Box<Expression>),
    Binary(BinaryOp, Box<Expression>, Box<Expression>),
    Call(Rc<RefCell<Symbol>>, Vec<Expression>),
}

impl Expression {
    fn is_id(&self) -> bool {
        matches!(self, Expression::Id(_))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Id(sym) => write!(f, "{}", sym.borrow()),
            Expression::Unary(op, expr) => {
                if expr.is_id() {
                    write!(f, "{}{}", op.token(), expr)
                } else {
                    write!(f, "{}({})", op.token(), expr)
                }
            }
            Expression::Binary(op, lhs, rhs) => write!(f, "{} {} {}", lhs, op.token(), rhs),
            Expression::Call(callee, args) => {
                write!(f, "{}(", callee.borrow())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
