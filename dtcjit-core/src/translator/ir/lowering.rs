//! Per-instruction C-IR lowering (§4.6): maps one decoded, def/use-annotated
//! instruction to at most one [`Statement`].
//!
//! Opcodes with no arm in [`lower_record`]'s match contribute nothing and the call
//! still returns `Ok(None)` — lowering never fails just because an opcode isn't
//! covered. This mirrors the original `BuildIR` switch, whose `default` case falls
//! through without emitting a statement and still returns success; a handful of
//! opcodes (e.g. `nop`, `move-result*`, whose assignment is folded into the
//! producing instruction during liveness) are *meant* to emit nothing, and that's
//! indistinguishable here from an opcode nobody got around to handling yet.

use crate::translator::dexcode::{InstructionRecord, Opcode};
use crate::translator::error::TranslatorError;
use crate::translator::ir::expression::{BinaryOp, Expression, SymbolKind, SymbolTable, UnaryOp};
use crate::translator::ir::statement::Statement;
use crate::translator::liveweb::JType;
use std::rc::Rc;

fn id_of(record: &InstructionRecord, symbols: &mut SymbolTable, index: usize, is_def: bool) -> Option<Expression> {
    let web = if is_def { record.def_web(index) } else { record.use_web(index) };
    web.map(|w| Expression::Id(symbols.intern(SymbolKind::Var, w.borrow().to_string())))
}

fn def_id(record: &InstructionRecord, symbols: &mut SymbolTable, index: usize) -> Result<Expression, TranslatorError> {
    id_of(record, symbols, index, true).ok_or_else(|| TranslatorError::InvalidDefWeb(index as u16))
}

fn use_id(record: &InstructionRecord, symbols: &mut SymbolTable, index: usize) -> Result<Expression, TranslatorError> {
    id_of(record, symbols, index, false).ok_or_else(|| TranslatorError::InvalidUseWeb(index as u16))
}

/// Renders a constant per §6's output contract: `(jT)literal`, with object constants
/// printed as an unsigned 32-bit hex pointer value instead of a decimal literal.
fn const_expr(symbols: &mut SymbolTable, jtype: JType, literal: i64) -> Expression {
    let text = if jtype == JType::Object {
        format!("({})0x{:08X}", jtype.c_cast_token(), literal as u32)
    } else {
        format!("({}){}", jtype.c_cast_token(), literal)
    };
    Expression::Id(symbols.intern(SymbolKind::Const, text))
}

/// The type a def-web carries, for constants whose rendered cast must match the
/// register they're assigned into (`const*` family); falls back to `int` when the
/// record has no def web at this index (shouldn't happen for the opcodes that call
/// this, but avoids a panic over an index mismatch).
fn def_literal_type(record: &InstructionRecord, index: usize) -> JType {
    record.def_web(index).map(|w| w.borrow().data_type()).unwrap_or(JType::Int)
}

fn call(symbols: &mut SymbolTable, name: &str, args: Vec<Expression>) -> Expression {
    Expression::Call(symbols.intern(SymbolKind::Func, name), args)
}

fn label_for(symbols: &mut SymbolTable, address: u32) -> Rc<std::cell::RefCell<crate::translator::ir::expression::Symbol>> {
    symbols.intern(SymbolKind::Label, format!("{:08X}", address))
}

/// Lowers one instruction to a statement, given the absolute addresses of any branch
/// target (already resolved by the caller from the instruction's signed offset).
pub fn lower_record(
    record: &InstructionRecord,
    symbols: &mut SymbolTable,
    branch_target: Option<u32>,
) -> Result<Option<Statement>, TranslatorError> {
    use Opcode::*;

    let stmt = match record.opcode() {
        Move | MoveFrom16 | Move16 | MoveWide | MoveWideFrom16 | MoveWide16 | MoveObject | MoveObjectFrom16
        | MoveObject16 => Statement::Assign(def_id(record, symbols, 0)?, use_id(record, symbols, 0)?),

        Const4 | Const16 | Const | ConstHigh16 | ConstWide16 | ConstWide32 | ConstWide | ConstWideHigh16 => {
            let ty = def_literal_type(record, 0);
            Statement::Assign(def_id(record, symbols, 0)?, const_expr(symbols, ty, record.decoded().literal))
        }
        ConstString | ConstStringJumbo => Statement::Assign(
            def_id(record, symbols, 0)?,
            call(symbols, "dtc_resolve_string", vec![const_expr(symbols, JType::Int, record.decoded().vb as i64)]),
        ),
        ConstClass => Statement::Assign(
            def_id(record, symbols, 0)?,
            call(symbols, "dtc_resolve_class", vec![const_expr(symbols, JType::Int, record.decoded().vb as i64)]),
        ),

        NegInt | NegLong | NegFloat | NegDouble => {
            Statement::Assign(def_id(record, symbols, 0)?, Expression::Unary(UnaryOp::Neg, Box::new(use_id(record, symbols, 0)?)))
        }
        NotInt | NotLong => {
            Statement::Assign(def_id(record, symbols, 0)?, Expression::Unary(UnaryOp::Not, Box::new(use_id(record, symbols, 0)?)))
        }
        IntToLong => cast_stmt(record, symbols, UnaryOp::IntToLong)?,
        IntToFloat => cast_stmt(record, symbols, UnaryOp::IntToFloat)?,
        IntToDouble => cast_stmt(record, symbols, UnaryOp::IntToDouble)?,
        LongToInt => cast_stmt(record, symbols, UnaryOp::LongToInt)?,
        LongToFloat => cast_stmt(record, symbols, UnaryOp::LongToFloat)?,
        LongToDouble => cast_stmt(record, symbols, UnaryOp::LongToDouble)?,
        FloatToInt => cast_stmt(record, symbols, UnaryOp::FloatToInt)?,
        FloatToLong => cast_stmt(record, symbols, UnaryOp::FloatToLong)?,
        FloatToDouble => cast_stmt(record, symbols, UnaryOp::FloatToDouble)?,
        DoubleToInt => cast_stmt(record, symbols, UnaryOp::DoubleToInt)?,
        DoubleToLong => cast_stmt(record, symbols, UnaryOp::DoubleToLong)?,
        DoubleToFloat => cast_stmt(record, symbols, UnaryOp::DoubleToFloat)?,
        IntToByte | IntToChar | IntToShort => {
            Statement::Assign(def_id(record, symbols, 0)?, use_id(record, symbols, 0)?)
        }

        CmplFloat => cmp_stmt(record, symbols, "cmpl_float")?,
        CmpgFloat => cmp_stmt(record, symbols, "cmpg_float")?,
        CmplDouble => cmp_stmt(record, symbols, "cmpl_double")?,
        CmpgDouble => cmp_stmt(record, symbols, "cmpg_double")?,
        CmpLong => cmp_stmt(record, symbols, "cmp_long")?,

        AddInt | AddInt2addr | AddIntLit16 | AddIntLit8 => binary_stmt(record, symbols, BinaryOp::Add)?,
        SubInt | SubInt2addr => binary_stmt(record, symbols, BinaryOp::Sub)?,
        RsubInt | RsubIntLit8 => reverse_sub_stmt(record, symbols)?,
        MulInt | MulInt2addr | MulIntLit16 | MulIntLit8 => binary_stmt(record, symbols, BinaryOp::Mul)?,
        DivInt | DivInt2addr | DivIntLit16 | DivIntLit8 => binary_stmt(record, symbols, BinaryOp::Div)?,
        RemInt | RemInt2addr | RemIntLit16 | RemIntLit8 => binary_stmt(record, symbols, BinaryOp::Rem)?,
        AndInt | AndInt2addr | AndIntLit16 | AndIntLit8 => binary_stmt(record, symbols, BinaryOp::And)?,
        OrInt | OrInt2addr | OrIntLit16 | OrIntLit8 => binary_stmt(record, symbols, BinaryOp::Or)?,
        XorInt | XorInt2addr | XorIntLit16 | XorIntLit8 => binary_stmt(record, symbols, BinaryOp::Xor)?,
        ShlInt | ShlInt2addr | ShlIntLit8 => binary_stmt(record, symbols, BinaryOp::Shl)?,
        UshrInt | UshrInt2addr | UshrIntLit8 => binary_stmt(record, symbols, BinaryOp::Ushr)?,
        ShrInt2addr | ShrIntLit8 => binary_stmt(record, symbols, BinaryOp::Shr)?,

        AddLong | AddLong2addr | AddFloat | AddFloat2addr | AddDouble | AddDouble2addr => {
            binary_stmt(record, symbols, BinaryOp::Add)?
        }
        SubLong | SubLong2addr | SubFloat | SubFloat2addr | SubDouble | SubDouble2addr => {
            binary_stmt(record, symbols, BinaryOp::Sub)?
        }
        MulLong | MulLong2addr | MulFloat | MulFloat2addr | MulDouble | MulDouble2addr => {
            binary_stmt(record, symbols, BinaryOp::Mul)?
        }
        DivLong | DivLong2addr | DivFloat | DivFloat2addr | DivDouble | DivDouble2addr => {
            binary_stmt(record, symbols, BinaryOp::Div)?
        }
        RemLong | RemLong2addr | RemFloat | RemFloat2addr | RemDouble | RemDouble2addr => {
            binary_stmt(record, symbols, BinaryOp::Rem)?
        }
        AndLong | AndLong2addr => binary_stmt(record, symbols, BinaryOp::And)?,
        OrLong | OrLong2addr => binary_stmt(record, symbols, BinaryOp::Or)?,
        XorLong | XorLong2addr => binary_stmt(record, symbols, BinaryOp::Xor)?,
        ShlLong | ShlLong2addr => binary_stmt(record, symbols, BinaryOp::Shl)?,
        ShrLong | ShrLong2addr => binary_stmt(record, symbols, BinaryOp::Shr)?,
        UshrLong | UshrLong2addr => binary_stmt(record, symbols, BinaryOp::Ushr)?,

        Aget => array_get(record, symbols, "int")?,
        AgetWide => array_get(record, symbols, "wide")?,
        AgetObject => array_get(record, symbols, "object")?,
        AgetBoolean => array_get(record, symbols, "boolean")?,
        AgetByte => array_get(record, symbols, "byte")?,
        AgetChar => array_get(record, symbols, "char")?,
        AgetShort => array_get(record, symbols, "short")?,

        Aput => array_put(record, symbols, "int")?,
        AputWide => array_put(record, symbols, "wide")?,
        AputObject => array_put(record, symbols, "object")?,
        AputBoolean => array_put(record, symbols, "boolean")?,
        AputByte => array_put(record, symbols, "byte")?,
        AputChar => array_put(record, symbols, "char")?,
        AputShort => array_put(record, symbols, "short")?,

        Iget => instance_get(record, symbols, "int")?,
        IgetWide => instance_get(record, symbols, "wide")?,
        IgetObject => instance_get(record, symbols, "object")?,
        IgetBoolean => instance_get(record, symbols, "boolean")?,
        IgetByte => instance_get(record, symbols, "byte")?,
        IgetChar => instance_get(record, symbols, "char")?,
        IgetShort => instance_get(record, symbols, "short")?,

        Iput => instance_put(record, symbols, "int")?,
        IputWide => instance_put(record, symbols, "wide")?,
        IputObject => instance_put(record, symbols, "object")?,
        IputBoolean => instance_put(record, symbols, "boolean")?,
        IputByte => instance_put(record, symbols, "byte")?,
        IputChar => instance_put(record, symbols, "char")?,
        IputShort => instance_put(record, symbols, "short")?,

        Sget => static_get(record, symbols, "int")?,
        SgetWide => static_get(record, symbols, "wide")?,
        SgetObject => static_get(record, symbols, "object")?,
        SgetBoolean => static_get(record, symbols, "boolean")?,
        SgetByte => static_get(record, symbols, "byte")?,
        SgetChar => static_get(record, symbols, "char")?,
        SgetShort => static_get(record, symbols, "short")?,

        Sput => static_put(record, symbols, "int")?,
        SputWide => static_put(record, symbols, "wide")?,
        SputObject => static_put(record, symbols, "object")?,
        SputBoolean => static_put(record, symbols, "boolean")?,
        SputByte => static_put(record, symbols, "byte")?,
        SputChar => static_put(record, symbols, "char")?,
        SputShort => static_put(record, symbols, "short")?,

        ArrayLength => Statement::Assign(def_id(record, symbols, 0)?, call(symbols, "dtc_array_length", vec![use_id(record, symbols, 0)?])),
        InstanceOf => Statement::Assign(
            def_id(record, symbols, 0)?,
            call(
                symbols,
                "dtc_instance_of",
                vec![use_id(record, symbols, 0)?, const_expr(symbols, JType::Int, record.decoded().vc as i64)],
            ),
        ),
        NewInstance => Statement::Assign(
            def_id(record, symbols, 0)?,
            call(symbols, "new_instance", vec![const_expr(symbols, JType::Int, record.decoded().vb as i64)]),
        ),
        NewArray => Statement::Assign(
            def_id(record, symbols, 0)?,
            call(
                symbols,
                "dtc_new_array",
                vec![use_id(record, symbols, 0)?, const_expr(symbols, JType::Int, record.decoded().vc as i64)],
            ),
        ),
        CheckCast => Statement::Expr(call(
            symbols,
            "dtc_check_cast",
            vec![use_id(record, symbols, 0)?, const_expr(symbols, JType::Int, record.decoded().vb as i64)],
        )),
        MonitorEnter => Statement::Expr(call(symbols, "dtc_monitor_enter", vec![use_id(record, symbols, 0)?])),
        MonitorExit => Statement::Expr(call(symbols, "dtc_monitor_exit", vec![use_id(record, symbols, 0)?])),
        Throw => Statement::Expr(call(symbols, "dtc_throw", vec![use_id(record, symbols, 0)?])),
        FillArrayData => Statement::Expr(call(
            symbols,
            "dtc_fill_array_data",
            vec![use_id(record, symbols, 0)?, const_expr(symbols, JType::Int, record.decoded().literal)],
        )),
        PackedSwitch | SparseSwitch => Statement::Expr(call(
            symbols,
            "dtc_switch",
            vec![use_id(record, symbols, 0)?, const_expr(symbols, JType::Int, record.decoded().literal)],
        )),

        // `reg_at` indexes positionally into `use_webs`, which `apply_family`'s
        // `InvokeArgs` case already populated one web per `arg[k]` register in order —
        // so `k` is the right index here, not `arg[k]` (that would double-index).
        InvokeVirtual => invoke_stmt(record, symbols, "invoke_virtual", record.decoded().arg_count as usize, |k| k)?,
        InvokeSuper => invoke_stmt(record, symbols, "invoke_super", record.decoded().arg_count as usize, |k| k)?,
        InvokeDirect => invoke_stmt(record, symbols, "invoke_direct", record.decoded().arg_count as usize, |k| k)?,
        InvokeStatic => invoke_stmt(record, symbols, "invoke_static", record.decoded().arg_count as usize, |k| k)?,
        InvokeInterface => invoke_stmt(record, symbols, "invoke_interface", record.decoded().arg_count as usize, |k| k)?,
        InvokeVirtualRange => invoke_stmt(record, symbols, "invoke_virtual", record.decoded().va as usize, |k| k)?,
        InvokeSuperRange => invoke_stmt(record, symbols, "invoke_super", record.decoded().va as usize, |k| k)?,
        InvokeDirectRange => invoke_stmt(record, symbols, "invoke_direct", record.decoded().va as usize, |k| k)?,
        InvokeStaticRange => invoke_stmt(record, symbols, "invoke_static", record.decoded().va as usize, |k| k)?,
        InvokeInterfaceRange => invoke_stmt(record, symbols, "invoke_interface", record.decoded().va as usize, |k| k)?,
        FilledNewArray => invoke_stmt(record, symbols, "filled_new_array", record.decoded().arg_count as usize, |k| k)?,
        FilledNewArrayRange => invoke_stmt(record, symbols, "filled_new_array", record.decoded().va as usize, |k| k)?,

        IfEq => if_stmt(record, symbols, BinaryOp::Eq, true, branch_target)?,
        IfNe => if_stmt(record, symbols, BinaryOp::Ne, true, branch_target)?,
        IfLt => if_stmt(record, symbols, BinaryOp::Lt, true, branch_target)?,
        IfGe => if_stmt(record, symbols, BinaryOp::Ge, true, branch_target)?,
        IfGt => if_stmt(record, symbols, BinaryOp::Gt, true, branch_target)?,
        IfLe => if_stmt(record, symbols, BinaryOp::Le, true, branch_target)?,
        IfEqz => if_stmt(record, symbols, BinaryOp::Eq, false, branch_target)?,
        IfNez => if_stmt(record, symbols, BinaryOp::Ne, false, branch_target)?,
        IfLtz => if_stmt(record, symbols, BinaryOp::Lt, false, branch_target)?,
        IfGez => if_stmt(record, symbols, BinaryOp::Ge, false, branch_target)?,
        IfGtz => if_stmt(record, symbols, BinaryOp::Gt, false, branch_target)?,
        IfLez => if_stmt(record, symbols, BinaryOp::Le, false, branch_target)?,

        Goto | Goto16 | Goto32 => {
            let target = branch_target.ok_or(TranslatorError::Dex2cTranslation)?;
            Statement::Branch(None, label_for(symbols, target))
        }

        ReturnVoid => Statement::Return(None),
        Return | ReturnWide | ReturnObject => Statement::Return(Some(use_id(record, symbols, 0)?)),

        _ => return Ok(None),
    };

    Ok(Some(stmt))
}

fn cast_stmt(record: &InstructionRecord, symbols: &mut SymbolTable, op: UnaryOp) -> Result<Statement, TranslatorError> {
    Ok(Statement::Assign(def_id(record, symbols, 0)?, Expression::Unary(op, Box::new(use_id(record, symbols, 0)?))))
}

fn binary_stmt(record: &InstructionRecord, symbols: &mut SymbolTable, op: BinaryOp) -> Result<Statement, TranslatorError> {
    let lhs = use_id(record, symbols, 0)?;
    let rhs = if record.decoded().arg_count == 0 && record.use_webs().len() < 2 {
        const_expr(symbols, JType::Int, record.decoded().literal)
    } else {
        use_id(record, symbols, 1)?
    };
    Ok(Statement::Assign(def_id(record, symbols, 0)?, Expression::Binary(op, Box::new(lhs), Box::new(rhs))))
}

/// `rsub-int`/`rsub-int/lit8` compute `literal - v`, the one reversed-operand binary
/// opcode in the set.
fn reverse_sub_stmt(record: &InstructionRecord, symbols: &mut SymbolTable) -> Result<Statement, TranslatorError> {
    let lhs = const_expr(symbols, JType::Int, record.decoded().literal);
    let rhs = use_id(record, symbols, 0)?;
    Ok(Statement::Assign(def_id(record, symbols, 0)?, Expression::Binary(BinaryOp::Sub, Box::new(lhs), Box::new(rhs))))
}

fn cmp_stmt(record: &InstructionRecord, symbols: &mut SymbolTable, func: &str) -> Result<Statement, TranslatorError> {
    let args = vec![use_id(record, symbols, 0)?, use_id(record, symbols, 1)?];
    Ok(Statement::Assign(def_id(record, symbols, 0)?, call(symbols, func, args)))
}

fn array_get(record: &InstructionRecord, symbols: &mut SymbolTable, ty: &str) -> Result<Statement, TranslatorError> {
    let args = vec![use_id(record, symbols, 0)?, use_id(record, symbols, 1)?];
    Ok(Statement::Assign(def_id(record, symbols, 0)?, call(symbols, &format!("dtc_aget_{}", ty), args)))
}

fn array_put(record: &InstructionRecord, symbols: &mut SymbolTable, ty: &str) -> Result<Statement, TranslatorError> {
    let args = vec![use_id(record, symbols, 1)?, use_id(record, symbols, 2)?, use_id(record, symbols, 0)?];
    Ok(Statement::Expr(call(symbols, &format!("dtc_aput_{}", ty), args)))
}

fn instance_get(record: &InstructionRecord, symbols: &mut SymbolTable, ty: &str) -> Result<Statement, TranslatorError> {
    let args = vec![use_id(record, symbols, 0)?, const_expr(symbols, JType::Int, record.decoded().vc as i64)];
    Ok(Statement::Assign(def_id(record, symbols, 0)?, call(symbols, &format!("dtc_iget_{}", ty), args)))
}

fn instance_put(record: &InstructionRecord, symbols: &mut SymbolTable, ty: &str) -> Result<Statement, TranslatorError> {
    let args = vec![use_id(record, symbols, 1)?, const_expr(symbols, JType::Int, record.decoded().vc as i64), use_id(record, symbols, 0)?];
    Ok(Statement::Expr(call(symbols, &format!("dtc_iput_{}", ty), args)))
}

fn static_get(record: &InstructionRecord, symbols: &mut SymbolTable, ty: &str) -> Result<Statement, TranslatorError> {
    let args = vec![const_expr(symbols, JType::Int, record.decoded().vb as i64)];
    Ok(Statement::Assign(def_id(record, symbols, 0)?, call(symbols, &format!("dtc_sget_{}", ty), args)))
}

fn static_put(record: &InstructionRecord, symbols: &mut SymbolTable, ty: &str) -> Result<Statement, TranslatorError> {
    let args = vec![const_expr(symbols, JType::Int, record.decoded().vb as i64), use_id(record, symbols, 0)?];
    Ok(Statement::Expr(call(symbols, &format!("dtc_sput_{}", ty), args)))
}

/// Lowers an `invoke*`/`filled-new-array*` family instruction to §4.6's contract:
/// `Call(Func(name), [Const(int, methodOrTypeIndex), Var(use[0]), …])` — the resolved
/// method/type index is the call's first argument, not baked into the callee name.
fn invoke_stmt(
    record: &InstructionRecord,
    symbols: &mut SymbolTable,
    name: &str,
    count: usize,
    reg_at: impl Fn(usize) -> usize,
) -> Result<Statement, TranslatorError> {
    let mut args = Vec::with_capacity(count + 1);
    args.push(const_expr(symbols, JType::Int, record.decoded().vb as i64));
    for k in 0..count {
        args.push(use_id(record, symbols, reg_at(k))?);
    }
    let call_expr = call(symbols, name, args);
    if record.def_webs().is_empty() {
        Ok(Statement::Expr(call_expr))
    } else {
        Ok(Statement::Assign(def_id(record, symbols, 0)?, call_expr))
    }
}

fn if_stmt(
    record: &InstructionRecord,
    symbols: &mut SymbolTable,
    op: BinaryOp,
    two_register: bool,
    branch_target: Option<u32>,
) -> Result<Statement, TranslatorError> {
    let lhs = use_id(record, symbols, 0)?;
    let rhs = if two_register { use_id(record, symbols, 1)? } else { const_expr(symbols, JType::Int, 0) };
    let target = branch_target.ok_or(TranslatorError::Dex2cTranslation)?;
    let cond = Expression::Binary(op, Box::new(lhs), Box::new(rhs));
    Ok(Statement::Branch(Some(cond), label_for(symbols, target)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::dexcode::decode_instruction;
    use crate::translator::liveweb::{JType, LiveWeb, WebFlags};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn with_webs(opcode_word0: u16, opcode_word1: u16, uses: &[(u16, JType)], defs: &[(u16, JType)]) -> InstructionRecord {
        let decoded = decode_instruction(&[opcode_word0, opcode_word1]).unwrap();
        let mut record = InstructionRecord::new(decoded, 0);
        for &(reg, ty) in uses {
            let web = Rc::new(RefCell::new(LiveWeb::new(reg, WebFlags::empty())));
            web.borrow_mut().set_type(ty);
            record.append_use_web(web);
        }
        for &(reg, ty) in defs {
            let web = Rc::new(RefCell::new(LiveWeb::new(reg, WebFlags::empty())));
            web.borrow_mut().set_type(ty);
            record.append_def_web(web);
        }
        record
    }

    #[test]
    fn add_int_lowers_to_assign_with_binary_rhs() {
        let w0 = (Opcode::AddInt as u16) | (2u16 << 8);
        let w1 = 0u16 | (1u16 << 8);
        let record = with_webs(w0, w1, &[(0, JType::Int), (1, JType::Int)], &[(2, JType::Int)]);
        let mut symbols = SymbolTable::new();
        let stmt = lower_record(&record, &mut symbols, None).unwrap().unwrap();
        assert_eq!(stmt.to_string(), "    vi2 = vi0 + vi1;");
    }

    #[test]
    fn if_eqz_lowers_to_conditional_goto() {
        let w0 = (Opcode::IfEqz as u16) | (0u16 << 8);
        let w1 = 4u16;
        let record = with_webs(w0, w1, &[(0, JType::Int)], &[]);
        let mut symbols = SymbolTable::new();
        let stmt = lower_record(&record, &mut symbols, Some(4)).unwrap().unwrap();
        assert_eq!(stmt.to_string(), "    if(vi0 == (j_int)0)\tgoto .L00000004;");
    }

    #[test]
    fn return_void_lowers_to_bare_return() {
        let w0 = Opcode::ReturnVoid as u16;
        let record = InstructionRecord::new(decode_instruction(&[w0]).unwrap(), 0);
        let mut symbols = SymbolTable::new();
        let stmt = lower_record(&record, &mut symbols, None).unwrap().unwrap();
        assert_eq!(stmt.to_string(), "    return;");
    }

    #[test]
    fn unmapped_opcode_emits_nothing() {
        let w0 = Opcode::Nop as u16;
        let record = InstructionRecord::new(decode_instruction(&[w0]).unwrap(), 0);
        let mut symbols = SymbolTable::new();
        assert!(lower_record(&record, &mut symbols, None).unwrap().is_none());
    }
}
