//! Basic blocks: decoding the instruction words in a block's address range and
//! attaching def/use live webs to each decoded instruction (§4.2, §4.3).

use crate::translator::dexcode::{decode_instruction, instruction_width, InstructionRecord, Opcode};
use crate::translator::error::TranslatorError;
use crate::translator::liveweb::{JType, LiveWeb, WebFlags};
use crate::translator::type_inference::resolve_data_types;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

type WebRef = Rc<RefCell<LiveWeb>>;
type LocalVarTable = HashMap<u16, WebRef>;
type BlockWebTable = HashMap<u16, WebRef>;

/// Opcode family as classified by block-local liveness (§4.3's table). This is a pure
/// data-driven dispatch table, kept separate from the type-inference table in
/// `type_inference` — the two tables serve different purposes even where their opcode
/// sets overlap, matching the original's two independent switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    /// Unary / move / iget / new-array / lit-binary: use vB, def vA.
    UnaryLikeDefA,
    /// const*, new-instance, sget*: no use, def vA.
    DefAOnly,
    /// move-result*, move-exception: use vA (self, for typing) + back-patched def on prev.
    MoveResultLike,
    /// return*, monitor, check-cast, throw, if*z, sput*, fill-array-data, switch: use vA.
    UseAOnly,
    /// invoke* (non-range) / filled-new-array (non-range): use arg[0..vA).
    InvokeArgs,
    /// invoke*/range, filled-new-array/range: use vC..vC+vA-1.
    InvokeRange,
    /// cmp*, aget, three-operand binary: use vB, vC; def vA.
    ThreeOperandBinary,
    /// two-address binary: use vA, vB; def vA (fresh web).
    TwoAddrBinary,
    /// two-address if-test, iput*: use vA, vB.
    UseAB,
    /// aput*: use vA, vB, vC.
    UseABC,
    /// nop, return-void*, goto*: no use, no def.
    NoUseNoDef,
}

fn classify(op: Opcode) -> Option<Family> {
    use Family::*;
    use Opcode::*;
    let family = match op {
        Move | MoveFrom16 | Move16 | MoveWide | MoveWideFrom16 | MoveWide16 | MoveObject | MoveObjectFrom16
        | MoveObject16 | NegInt | NotInt | NegLong | NotLong | NegFloat | NegDouble | IntToLong | IntToFloat
        | IntToDouble | LongToInt | LongToFloat | LongToDouble | FloatToInt | FloatToLong | FloatToDouble
        | DoubleToInt | DoubleToLong | DoubleToFloat | IntToByte | IntToChar | IntToShort | ArrayLength
        | InstanceOf | NewArray | Iget | IgetWide | IgetObject | IgetBoolean | IgetByte | IgetChar | IgetShort
        | AddIntLit16 | RsubInt | MulIntLit16 | DivIntLit16 | RemIntLit16 | AndIntLit16 | OrIntLit16
        | XorIntLit16 | AddIntLit8 | RsubIntLit8 | MulIntLit8 | DivIntLit8 | RemIntLit8 | AndIntLit8 | OrIntLit8
        | XorIntLit8 | ShlIntLit8 | ShrIntLit8 | UshrIntLit8 => UnaryLikeDefA,

        Const4 | Const16 | Const | ConstHigh16 | ConstWide16 | ConstWide32 | ConstWide | ConstWideHigh16
        | ConstString | ConstStringJumbo | ConstClass | NewInstance | Sget | SgetWide | SgetObject | SgetBoolean
        | SgetByte | SgetChar | SgetShort => DefAOnly,

        MoveResult | MoveResultWide | MoveResultObject | MoveException => MoveResultLike,

        Return | ReturnWide | ReturnObject | MonitorEnter | MonitorExit | CheckCast | Throw | IfEqz | IfNez
        | IfLtz | IfGez | IfGtz | IfLez | Sput | SputWide | SputObject | SputBoolean | SputByte | SputChar
        | SputShort | FillArrayData | PackedSwitch | SparseSwitch => UseAOnly,

        InvokeVirtual | InvokeSuper | InvokeDirect | InvokeStatic | InvokeInterface | FilledNewArray => InvokeArgs,

        InvokeVirtualRange | InvokeSuperRange | InvokeDirectRange | InvokeStaticRange | InvokeInterfaceRange
        | FilledNewArrayRange => InvokeRange,

        CmplFloat | CmpgFloat | CmplDouble | CmpgDouble | CmpLong | Aget | AgetWide | AgetObject | AgetBoolean
        | AgetByte | AgetChar | AgetShort | AddInt | SubInt | MulInt | DivInt | RemInt | AndInt | OrInt | XorInt
        | ShlInt | UshrInt | AddLong | SubLong | MulLong | DivLong | RemLong | AndLong | OrLong | XorLong
        | ShlLong | ShrLong | UshrLong | AddFloat | SubFloat | MulFloat | DivFloat | RemFloat | AddDouble
        | SubDouble | MulDouble | DivDouble | RemDouble => ThreeOperandBinary,

        AddInt2addr | SubInt2addr | MulInt2addr | DivInt2addr | RemInt2addr | AndInt2addr | OrInt2addr
        | XorInt2addr | ShlInt2addr | ShrInt2addr | UshrInt2addr | AddLong2addr | SubLong2addr | MulLong2addr
        | DivLong2addr | RemLong2addr | AndLong2addr | OrLong2addr | XorLong2addr | ShlLong2addr | ShrLong2addr
        | UshrLong2addr | AddFloat2addr | SubFloat2addr | MulFloat2addr | DivFloat2addr | RemFloat2addr
        | AddDouble2addr | SubDouble2addr | MulDouble2addr | DivDouble2addr | RemDouble2addr => TwoAddrBinary,

        IfEq | IfNe | IfLt | IfGe | IfGt | IfLe | Iput | IputWide | IputObject | IputBoolean | IputByte
        | IputChar | IputShort => UseAB,

        Aput | AputWide | AputObject | AputBoolean | AputByte | AputChar | AputShort => UseABC,

        Nop | ReturnVoid | Goto | Goto16 | Goto32 => NoUseNoDef,

        // SHR-INT (signed, 3-address form) is deliberately absent: see DESIGN.md's
        // note on the preserved `UNKNOWN_OPCODE` quirk (spec §9(c)).
        ShrInt => return None,
    };
    Some(family)
}

/// A contiguous, non-overlapping slice of a method's instruction stream, decoded and
/// analysed independently of its neighbours (liveness never crosses block boundaries).
pub struct BasicBlock {
    start_address: u32,
    end_address: u32,
    records: Vec<InstructionRecord>,
}

impl BasicBlock {
    /// Constructs an (as yet un-decoded) block spanning `[start_address, end_address]`
    /// inclusive, in 16-bit words from the method's first instruction.
    pub fn new(start_address: u32, end_address: u32) -> Self {
        BasicBlock {
            start_address,
            end_address,
            records: Vec::new(),
        }
    }

    pub fn start_address(&self) -> u32 {
        self.start_address
    }

    pub fn end_address(&self) -> u32 {
        self.end_address
    }

    pub fn records(&self) -> &[InstructionRecord] {
        &self.records
    }

    /// Decodes every instruction word in this block's range into an
    /// [`InstructionRecord`] (§4.2). Returns the number of instructions decoded.
    pub fn resolve_dexcodes(&mut self, insns: &[u16]) -> Result<u32, TranslatorError> {
        log::debug!("resolve_dexcodes: block 0x{:08x}", self.start_address);
        self.records.clear();
        let mut addr = self.start_address;
        let mut count = 0u32;
        while addr <= self.end_address {
            let slice = &insns[addr as usize..];
            let decoded = decode_instruction(slice).map_err(|_| TranslatorError::ResolveDexcodes(self.start_address))?;
            self.records.push(InstructionRecord::new(decoded, addr));
            addr += instruction_width(&decoded);
            count += 1;
        }
        Ok(count)
    }

    /// Assigns def/use webs to every record in this block, per §4.3's per-family
    /// ordering table, then runs per-instruction type inference (§4.4) immediately
    /// after each record's webs are attached.
    pub fn analyse_liveness(&mut self, local_var_table: &LocalVarTable) -> Result<(), TranslatorError> {
        log::debug!("analyse_liveness: block 0x{:08x}", self.start_address);
        let mut block_table: BlockWebTable = HashMap::new();

        for i in 0..self.records.len() {
            let opcode = self.records[i].opcode();
            let family = classify(opcode)
                .ok_or_else(|| TranslatorError::UnknownOpcode(byte_of(opcode), self.records[i].address()))?;
            self.apply_family(i, family, local_var_table, &mut block_table)?;
            resolve_data_types(&mut self.records[i])?;
        }
        Ok(())
    }

    fn apply_family(
        &mut self,
        i: usize,
        family: Family,
        local_var_table: &LocalVarTable,
        block_table: &mut BlockWebTable,
    ) -> Result<(), TranslatorError> {
        let decoded = *self.records[i].decoded();
        match family {
            Family::UnaryLikeDefA => {
                let use_w = use_web(decoded.vb as u16, local_var_table, block_table);
                let def_w = def_web(decoded.va as u16, local_var_table, block_table);
                self.records[i].append_use_web(use_w);
                self.records[i].append_def_web(def_w);
            }
            Family::DefAOnly => {
                let def_w = def_web(decoded.va as u16, local_var_table, block_table);
                self.records[i].append_def_web(def_w);
            }
            Family::MoveResultLike => {
                let web = def_web(decoded.va as u16, local_var_table, block_table);
                if i > 0 {
                    self.records[i - 1].append_def_web(web.clone());
                }
                self.records[i].append_use_web(web);
            }
            Family::UseAOnly => {
                let use_w = use_web(decoded.va as u16, local_var_table, block_table);
                self.records[i].append_use_web(use_w);
            }
            Family::InvokeArgs => {
                for k in 0..decoded.arg_count as usize {
                    let w = use_web(decoded.arg[k] as u16, local_var_table, block_table);
                    self.records[i].append_use_web(w);
                }
            }
            Family::InvokeRange => {
                let first = decoded.vc;
                for k in 0..decoded.va {
                    let w = use_web((first + k) as u16, local_var_table, block_table);
                    self.records[i].append_use_web(w);
                }
            }
            Family::ThreeOperandBinary => {
                let use0 = use_web(decoded.vb as u16, local_var_table, block_table);
                let use1 = use_web(decoded.vc as u16, local_var_table, block_table);
                let def_w = def_web(decoded.va as u16, local_var_table, block_table);
                self.records[i].append_use_web(use0);
                self.records[i].append_use_web(use1);
                self.records[i].append_def_web(def_w);
            }
            Family::TwoAddrBinary => {
                let use0 = use_web(decoded.va as u16, local_var_table, block_table);
                let use1 = use_web(decoded.vb as u16, local_var_table, block_table);
                let def_w = def_web(decoded.va as u16, local_var_table, block_table);
                self.records[i].append_use_web(use0);
                self.records[i].append_use_web(use1);
                self.records[i].append_def_web(def_w);
            }
            Family::UseAB => {
                let use0 = use_web(decoded.va as u16, local_var_table, block_table);
                let use1 = use_web(decoded.vb as u16, local_var_table, block_table);
                self.records[i].append_use_web(use0);
                self.records[i].append_use_web(use1);
            }
            Family::UseABC => {
                let use0 = use_web(decoded.va as u16, local_var_table, block_table);
                let use1 = use_web(decoded.vb as u16, local_var_table, block_table);
                let use2 = use_web(decoded.vc as u16, local_var_table, block_table);
                self.records[i].append_use_web(use0);
                self.records[i].append_use_web(use1);
                self.records[i].append_use_web(use2);
            }
            Family::NoUseNoDef => {}
        }
        Ok(())
    }

    /// `.L%08X:` header followed by each record's `def := opcode(uses...)` debug form,
    /// matching `DtcDexBasicBlock::Write` in the original (supplemental, not the
    /// canonical C-IR renderer — see SPEC_FULL.md §2).
    pub fn render_debug(&self) -> String {
        let mut out = format!(".L{:08X}:\n", self.start_address);
        for record in &self.records {
            out.push_str("    ");
            out.push_str(&record.render_debug());
            out.push('\n');
        }
        out
    }
}

fn byte_of(op: Opcode) -> u8 {
    op as u8
}

fn def_web(reg: u16, local_var_table: &LocalVarTable, block_table: &mut BlockWebTable) -> WebRef {
    if let Some(w) = local_var_table.get(&reg) {
        return w.clone();
    }
    let fresh = Rc::new(RefCell::new(LiveWeb::new(reg, WebFlags::empty())));
    block_table.insert(reg, fresh.clone());
    fresh
}

fn use_web(reg: u16, local_var_table: &LocalVarTable, block_table: &mut BlockWebTable) -> WebRef {
    if let Some(w) = local_var_table.get(&reg) {
        return w.clone();
    }
    if let Some(w) = block_table.get(&reg) {
        return w.clone();
    }
    let fresh = Rc::new(RefCell::new(LiveWeb::new(reg, WebFlags::empty())));
    block_table.insert(reg, fresh.clone());
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::dexcode::Opcode;

    fn add_int(va: u32, vb: u32, vc: u32) -> [u16; 2] {
        let w0 = (Opcode::AddInt as u16) | ((va as u16) << 8);
        let w1 = (vb as u16) | ((vc as u16) << 8);
        [w0, w1]
    }

    fn return_insn(va: u32) -> [u16; 1] {
        [(Opcode::Return as u16) | ((va as u16) << 8)]
    }

    #[test]
    fn pure_int_add_assigns_three_webs_all_int() {
        let mut insns = Vec::new();
        insns.extend_from_slice(&add_int(2, 0, 1));
        insns.extend_from_slice(&return_insn(2));

        let mut block = BasicBlock::new(0, 2);
        block.resolve_dexcodes(&insns).unwrap();
        let local_vars = LocalVarTable::new();
        block.analyse_liveness(&local_vars).unwrap();

        assert_eq!(block.records().len(), 2);
        let add_record = &block.records()[0];
        assert_eq!(add_record.use_webs().len(), 2);
        assert_eq!(add_record.def_webs().len(), 1);
        assert_eq!(add_record.def_webs()[0].borrow().data_type(), JType::Int);
        assert_eq!(add_record.use_webs()[0].borrow().data_type(), JType::Int);
    }

    #[test]
    fn shr_int_three_address_is_unknown_opcode() {
        let w0 = (Opcode::ShrInt as u16) | (2u16 << 8);
        let w1 = 0u16 | (1u16 << 8);
        let mut block = BasicBlock::new(0, 1);
        block.resolve_dexcodes(&[w0, w1]).unwrap();
        let local_vars = LocalVarTable::new();
        let err = block.analyse_liveness(&local_vars).unwrap_err();
        assert!(matches!(err, TranslatorError::UnknownOpcode(0x99, 0)));
    }

    #[test]
    fn move_result_back_patches_previous_def() {
        // invoke-direct {v0, v1}, method@7 ; move-result v2 ; return v2
        let invoke_w0 = (Opcode::InvokeDirect as u16) | (2u16 << 12);
        let invoke_w1 = 7u16;
        let invoke_w2 = 0u16 | (1u16 << 4);
        let move_result = (Opcode::MoveResult as u16) | (2u16 << 8);
        let ret = (Opcode::Return as u16) | (2u16 << 8);

        let insns = [invoke_w0, invoke_w1, invoke_w2, move_result, ret];
        let mut block = BasicBlock::new(0, 4);
        block.resolve_dexcodes(&insns).unwrap();
        let local_vars = LocalVarTable::new();
        block.analyse_liveness(&local_vars).unwrap();

        let invoke_record = &block.records()[0];
        assert_eq!(invoke_record.def_webs().len(), 1);
        assert_eq!(invoke_record.def_webs()[0].borrow().register(), 2);

        let move_result_record = &block.records()[1];
        assert_eq!(move_result_record.use_webs().len(), 1);
        assert_eq!(move_result_record.def_webs().len(), 0);
    }
}
