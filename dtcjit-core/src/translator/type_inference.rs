//! Per-instruction type inference (§4.4): propagates JVM primitive/reference types
//! onto the def/use webs a record already carries after liveness analysis.
//!
//! Kept as a standalone data-driven table rather than folded into liveness
//! classification — the two tables overlap in which opcodes they mention but serve
//! different purposes, mirroring the original's two independent switches
//! (`AnalyseLiveness` vs `ResolveDataTypes`).

use crate::translator::dexcode::{InstructionRecord, Opcode};
use crate::translator::error::TranslatorError;
use crate::translator::liveweb::JType;

fn set_use(record: &InstructionRecord, index: usize, ty: JType) {
    if let Some(web) = record.use_web(index) {
        web.borrow_mut().set_type(ty);
    }
}

fn set_def(record: &InstructionRecord, index: usize, ty: JType) {
    if let Some(web) = record.def_web(index) {
        web.borrow_mut().set_type(ty);
    }
}

fn copy_use_to_def(record: &InstructionRecord) {
    if let (Some(use_web), Some(def_web)) = (record.use_web(0), record.def_web(0)) {
        let ty = use_web.borrow().data_type();
        def_web.borrow_mut().set_type(ty);
    }
}

/// Applies §4.4's propagation rule for `record`'s opcode. Opcodes outside the table
/// are tolerated without type updates, per spec.
pub fn resolve_data_types(record: &mut InstructionRecord) -> Result<(), TranslatorError> {
    use Opcode::*;
    match record.opcode() {
        Move | Move16 | MoveFrom16 | MoveWide | MoveWide16 | MoveWideFrom16 => {
            copy_use_to_def(record);
        }

        MoveObject | MoveObjectFrom16 | MoveObject16 | MoveResultObject | MoveException | ReturnObject
        | ConstString | ConstStringJumbo | ConstClass | MonitorEnter | MonitorExit | CheckCast | Throw => {
            set_use(record, 0, JType::Object);
        }

        InstanceOf => {
            set_use(record, 0, JType::Object);
            set_def(record, 0, JType::Int);
        }
        ArrayLength => {
            set_use(record, 0, JType::Object);
            set_def(record, 0, JType::Int);
        }

        // Dalvik's const* family doesn't distinguish long-vs-double or the sub-int
        // kinds at the bytecode level; a declared local's debug-info type still wins
        // (set_def is a no-op for local-variable webs), but absent that, the wide forms
        // default to `long` and the narrow forms to `int` (§8 scenario 6).
        Const4 | Const16 | Const | ConstHigh16 => set_def(record, 0, JType::Int),
        ConstWide16 | ConstWide32 | ConstWide | ConstWideHigh16 => set_def(record, 0, JType::Long),

        NewInstance => set_def(record, 0, JType::Object),

        NewArray => {
            set_use(record, 0, JType::Int);
            set_def(record, 0, JType::Object);
        }

        CmplFloat | CmpgFloat => {
            set_use(record, 0, JType::Float);
            set_use(record, 1, JType::Float);
            set_def(record, 0, JType::Int);
        }
        CmplDouble | CmpgDouble => {
            set_use(record, 0, JType::Double);
            set_use(record, 1, JType::Double);
            set_def(record, 0, JType::Int);
        }
        CmpLong => {
            set_use(record, 0, JType::Long);
            set_use(record, 1, JType::Long);
            set_def(record, 0, JType::Int);
        }

        AgetObject | IgetObject => {
            set_use(record, 0, JType::Object);
            set_use(record, 1, JType::Int);
            set_def(record, 0, JType::Object);
        }
        AgetBoolean | IgetBoolean => {
            set_use(record, 0, JType::Object);
            set_use(record, 1, JType::Int);
            set_def(record, 0, JType::Boolean);
        }
        AgetByte | IgetByte => {
            set_use(record, 0, JType::Object);
            set_use(record, 1, JType::Int);
            set_def(record, 0, JType::Byte);
        }
        AgetChar | IgetChar => {
            set_use(record, 0, JType::Object);
            set_use(record, 1, JType::Int);
            set_def(record, 0, JType::Char);
        }
        AgetShort | IgetShort => {
            set_use(record, 0, JType::Object);
            set_use(record, 1, JType::Int);
            set_def(record, 0, JType::Short);
        }

        AputObject => {
            set_use(record, 0, JType::Object);
            set_use(record, 1, JType::Object);
            set_use(record, 2, JType::Int);
        }
        AputBoolean => {
            set_use(record, 0, JType::Boolean);
            set_use(record, 1, JType::Object);
            set_use(record, 2, JType::Int);
        }
        AputByte => {
            set_use(record, 0, JType::Byte);
            set_use(record, 1, JType::Object);
            set_use(record, 2, JType::Int);
        }
        AputChar => {
            set_use(record, 0, JType::Char);
            set_use(record, 1, JType::Object);
            set_use(record, 2, JType::Int);
        }
        AputShort => {
            set_use(record, 0, JType::Short);
            set_use(record, 1, JType::Object);
            set_use(record, 2, JType::Int);
        }
        IputObject => {
            set_use(record, 0, JType::Object);
            set_use(record, 1, JType::Object);
        }
        IputBoolean => {
            set_use(record, 0, JType::Boolean);
            set_use(record, 1, JType::Object);
        }
        IputByte => {
            set_use(record, 0, JType::Byte);
            set_use(record, 1, JType::Object);
        }
        IputChar => {
            set_use(record, 0, JType::Char);
            set_use(record, 1, JType::Object);
        }
        IputShort => {
            set_use(record, 0, JType::Short);
            set_use(record, 1, JType::Object);
        }

        SgetObject | SputObject => set_def_and_use0(record, JType::Object),
        SgetBoolean | SputBoolean => set_def_and_use0(record, JType::Boolean),
        SgetByte | SputByte => set_def_and_use0(record, JType::Byte),
        SgetChar | SputChar => set_def_and_use0(record, JType::Char),
        SgetShort | SputShort => set_def_and_use0(record, JType::Short),
        Sget | Sput => set_def_and_use0(record, JType::Int),
        SgetWide | SputWide => set_def_and_use0(record, JType::Long),

        // Untyped aget/iget (wide variant included): uses object,int; def left untouched.
        Aget | AgetWide | Iget | IgetWide => {
            set_use(record, 0, JType::Object);
            set_use(record, 1, JType::Int);
        }
        // Untyped aput/iput (wide variant included): src left untouched; object,int set.
        Aput | AputWide => {
            set_use(record, 1, JType::Object);
            set_use(record, 2, JType::Int);
        }
        Iput | IputWide => {
            set_use(record, 1, JType::Object);
        }

        AddInt | SubInt | MulInt | DivInt | RemInt | AndInt | OrInt | XorInt | ShlInt | UshrInt | AddInt2addr
        | SubInt2addr | MulInt2addr | DivInt2addr | RemInt2addr | AndInt2addr | OrInt2addr | XorInt2addr
        | ShlInt2addr | ShrInt2addr | UshrInt2addr | AddIntLit16 | RsubInt | MulIntLit16 | DivIntLit16
        | RemIntLit16 | AndIntLit16 | OrIntLit16 | XorIntLit16 | AddIntLit8 | RsubIntLit8 | MulIntLit8
        | DivIntLit8 | RemIntLit8 | AndIntLit8 | OrIntLit8 | XorIntLit8 | ShlIntLit8 | ShrIntLit8 | UshrIntLit8
        | NegInt | NotInt => {
            set_all(record, JType::Int);
        }

        AddLong | SubLong | MulLong | DivLong | RemLong | AndLong | OrLong | XorLong | ShlLong | ShrLong
        | UshrLong | AddLong2addr | SubLong2addr | MulLong2addr | DivLong2addr | RemLong2addr | AndLong2addr
        | OrLong2addr | XorLong2addr | ShlLong2addr | ShrLong2addr | UshrLong2addr | NegLong | NotLong => {
            set_all(record, JType::Long);
        }

        AddFloat | SubFloat | MulFloat | DivFloat | RemFloat | AddFloat2addr | SubFloat2addr | MulFloat2addr
        | DivFloat2addr | RemFloat2addr | NegFloat => {
            set_all(record, JType::Float);
        }

        AddDouble | SubDouble | MulDouble | DivDouble | RemDouble | AddDouble2addr | SubDouble2addr
        | MulDouble2addr | DivDouble2addr | RemDouble2addr | NegDouble => {
            set_all(record, JType::Double);
        }

        IntToLong => cast(record, JType::Int, JType::Long),
        IntToFloat => cast(record, JType::Int, JType::Float),
        IntToDouble => cast(record, JType::Int, JType::Double),
        LongToInt => cast(record, JType::Long, JType::Int),
        LongToFloat => cast(record, JType::Long, JType::Float),
        LongToDouble => cast(record, JType::Long, JType::Double),
        FloatToInt => cast(record, JType::Float, JType::Int),
        FloatToLong => cast(record, JType::Float, JType::Long),
        FloatToDouble => cast(record, JType::Float, JType::Double),
        DoubleToInt => cast(record, JType::Double, JType::Int),
        DoubleToLong => cast(record, JType::Double, JType::Long),
        DoubleToFloat => cast(record, JType::Double, JType::Float),
        IntToByte => cast(record, JType::Int, JType::Byte),
        IntToChar => cast(record, JType::Int, JType::Char),
        IntToShort => cast(record, JType::Int, JType::Short),

        _ => {}
    }
    Ok(())
}

fn set_def_and_use0(record: &InstructionRecord, ty: JType) {
    set_def(record, 0, ty);
    set_use(record, 0, ty);
}

fn set_all(record: &InstructionRecord, ty: JType) {
    for i in 0..record.use_webs().len() {
        set_use(record, i, ty);
    }
    for i in 0..record.def_webs().len() {
        set_def(record, i, ty);
    }
}

fn cast(record: &InstructionRecord, from: JType, to: JType) {
    set_use(record, 0, from);
    set_def(record, 0, to);
}
