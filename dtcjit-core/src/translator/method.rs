//! Method-level orchestration: local-variable resolution, leader scan / basic-block
//! carving (§4.1), and driving each block through decoding + liveness + type inference
//! (§4.2-§4.4).

use crate::translator::basic_block::BasicBlock;
use crate::translator::collaborators::{LocalVarCollector, MethodHandle};
use crate::translator::dexcode::{dex_width, DecodedInstruction, Opcode};
use crate::translator::error::TranslatorError;
use crate::translator::liveweb::{JType, LiveWeb, WebFlags};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

const PACKED_SWITCH_IDENT: u16 = 0x0100;
const SPARSE_SWITCH_IDENT: u16 = 0x0200;

type WebRef = Rc<RefCell<LiveWeb>>;

/// A leader byte's role, recorded as a small bitset per word offset. Several reasons
/// can mark the same offset a leader at once (e.g. a branch target that also starts a
/// try region), so this is additive rather than an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct LeaderFlags(u8);

impl LeaderFlags {
    const START: u8 = 0b0000_0001;
    const BRANCH_TARGET: u8 = 0b0000_0010;
    const BRANCH_NOT_TAKEN: u8 = 0b0000_0100;
    const EXCEPTION_TRY: u8 = 0b0000_1000;
    const SWITCH: u8 = 0b0001_0000;
    const OPCODE: u8 = 0b0010_0000;
    const RETURN: u8 = 0b0100_0000;

    fn set(&mut self, bit: u8) {
        self.0 |= bit;
    }

    /// §4.1: "is a leader" = any of the low five flags set (START, BRANCH_TARGET,
    /// BRANCH_NOT_TAKEN, EXCEPTION_CATCH, EXCEPTION_TRY). SWITCH, OPCODE, and RETURN
    /// are bookkeeping bits and must not contribute here: a switch instruction that
    /// isn't otherwise a leader doesn't split the block before it.
    fn is_leader(self) -> bool {
        self.0 & (Self::START | Self::BRANCH_TARGET | Self::BRANCH_NOT_TAKEN | Self::EXCEPTION_TRY) != 0
    }
}

/// A fully resolved method: its local-variable webs (shared across every block) and
/// the basic blocks carved from its instruction stream.
pub struct Method {
    local_var_table: HashMap<u16, WebRef>,
    blocks: Vec<BasicBlock>,
}

impl Method {
    /// Runs the whole build-IR pipeline over `handle`'s dex code (§5's stage order):
    /// local-variable resolution, leader scan, per-block decoding, then per-block
    /// liveness + type inference.
    pub fn build_ir(handle: &dyn MethodHandle) -> Result<Method, TranslatorError> {
        log::info!("build_ir: {}", handle.name());

        let insns = handle.dex_code().insns();
        let insns_size = handle.dex_code().insns_size();
        if insns_size == 0 || (insns.len() as u32) < insns_size {
            return Err(TranslatorError::InvalidDexCode);
        }

        let local_var_table = resolve_local_variables(handle)?;

        let mut method = Method {
            local_var_table,
            blocks: Vec::new(),
        };
        method.resolve_basic_blocks(handle)?;

        for block in &mut method.blocks {
            block
                .resolve_dexcodes(insns)
                .map_err(|_| TranslatorError::ResolveDexcodes(block.start_address()))?;
            block
                .analyse_liveness(&method.local_var_table)
                .map_err(|_| TranslatorError::AnalyseLiveness(block.start_address()))?;
        }

        Ok(method)
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn local_var_table(&self) -> &HashMap<u16, WebRef> {
        &self.local_var_table
    }

    /// Leader scan (§4.1): marks every address that starts a basic block, then carves
    /// the instruction stream into non-overlapping, fully-covering address ranges.
    fn resolve_basic_blocks(&mut self, handle: &dyn MethodHandle) -> Result<(), TranslatorError> {
        log::debug!("resolve_basic_blocks: {}", handle.name());
        let insns = handle.dex_code().insns();
        let insns_size = handle.dex_code().insns_size();

        let mut flags: HashMap<u32, LeaderFlags> = HashMap::new();
        flags.entry(0).or_default().set(LeaderFlags::START);

        // Pass 1: walk the instruction stream once, recording each instruction's start
        // address and flagging branch targets / fall-through points / block-enders.
        let mut addr = 0u32;
        while addr < insns_size {
            flags.entry(addr).or_default().set(LeaderFlags::OPCODE);

            let slice = &insns[addr as usize..];
            let width = dex_width(slice).map_err(|_| TranslatorError::ResolveBasicBlocks)?;
            let byte = (slice[0] & 0xff) as u8;
            let opcode = Opcode::from_byte(byte).ok_or(TranslatorError::ResolveBasicBlocks)?;
            let decoded =
                crate::translator::dexcode::decode_instruction(slice).map_err(|_| TranslatorError::ResolveBasicBlocks)?;
            let next = addr + width;

            match branch_kind(opcode) {
                BranchKind::Unconditional => {
                    let target = (addr as i64 + decoded.literal) as u32;
                    flags.entry(target).or_default().set(LeaderFlags::BRANCH_TARGET);
                    if next < insns_size {
                        flags.entry(next).or_default().set(LeaderFlags::BRANCH_NOT_TAKEN);
                    }
                }
                BranchKind::Conditional => {
                    let target = (addr as i64 + decoded.literal) as u32;
                    flags.entry(target).or_default().set(LeaderFlags::BRANCH_TARGET);
                    if next < insns_size {
                        flags.entry(next).or_default().set(LeaderFlags::BRANCH_NOT_TAKEN);
                    }
                }
                BranchKind::Return => {
                    flags.entry(addr).or_default().set(LeaderFlags::RETURN);
                    if next < insns_size {
                        flags.entry(next).or_default().set(LeaderFlags::BRANCH_NOT_TAKEN);
                    }
                }
                BranchKind::Switch => {
                    flags.entry(addr).or_default().set(LeaderFlags::SWITCH);
                    mark_switch_targets(insns, addr, &decoded, &mut flags)?;
                    if next < insns_size {
                        flags.entry(next).or_default().set(LeaderFlags::BRANCH_NOT_TAKEN);
                    }
                }
                BranchKind::None => {}
            }

            addr = next;
        }

        // Try regions contribute leaders at their protected range's start and at the
        // instruction following its end (§4.1's EXCEPTION_TRY flag). Handler entry
        // addresses aren't modeled by the host collaborator shape this core consumes
        // (see DESIGN.md), so only the protected-range boundary is marked here.
        for region in handle.dex_code().tries() {
            flags.entry(region.start_addr).or_default().set(LeaderFlags::EXCEPTION_TRY);
            let end = region.start_addr + region.insn_count;
            if end < insns_size {
                flags.entry(end).or_default().set(LeaderFlags::EXCEPTION_TRY);
            }
        }

        // Pass 2: every address flagged as a leader opens a new block. A switch-table
        // case target can land inside the payload table itself (never visited by pass
        // 1's instruction-width walk, since the table isn't real code), so this doesn't
        // gate on OPCODE — only on the flag bits §4.1 defines "leader" as. A leader at
        // or past `insns_size` is dropped; the final block already covers through
        // `insns_size - 1`.
        let mut leaders: BTreeSet<u32> = BTreeSet::new();
        for (&addr, flag) in flags.iter() {
            if addr < insns_size && flag.is_leader() {
                leaders.insert(addr);
            }
        }
        leaders.insert(0);

        let ordered: Vec<u32> = leaders.into_iter().collect();
        self.blocks.clear();
        for (i, &start) in ordered.iter().enumerate() {
            let end = if i + 1 < ordered.len() {
                ordered[i + 1] - 1
            } else {
                insns_size - 1
            };
            self.blocks.push(BasicBlock::new(start, end));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchKind {
    None,
    Unconditional,
    Conditional,
    Return,
    Switch,
}

fn branch_kind(op: Opcode) -> BranchKind {
    use Opcode::*;
    match op {
        Goto | Goto16 | Goto32 => BranchKind::Unconditional,
        IfEq | IfNe | IfLt | IfGe | IfGt | IfLe | IfEqz | IfNez | IfLtz | IfGez | IfGtz | IfLez => {
            BranchKind::Conditional
        }
        Return | ReturnVoid | ReturnWide | ReturnObject | Throw => BranchKind::Return,
        PackedSwitch | SparseSwitch => BranchKind::Switch,
        _ => BranchKind::None,
    }
}

/// Reads the `packed-switch`/`sparse-switch` inline payload at `addr + decoded.literal`
/// (§4.1 step 3) and marks `BRANCH_TARGET` at `addr + signed32(entry)` for each of the
/// table's `size` entries. The payload isn't a regular instruction — it lives inline in
/// the same word array `DexCode::insns()` exposes, just past the method's reachable
/// code — so reading it only requires indexing that slice, not a separate collaborator.
fn mark_switch_targets(
    insns: &[u16],
    addr: u32,
    decoded: &DecodedInstruction,
    flags: &mut HashMap<u32, LeaderFlags>,
) -> Result<(), TranslatorError> {
    let table_addr = (addr as i64 + decoded.literal) as u32;
    let word = |offset: u32| -> Result<u16, TranslatorError> {
        insns.get((table_addr + offset) as usize).copied().ok_or(TranslatorError::ResolveBasicBlocks)
    };
    let read_target = |offset: u32| -> Result<u32, TranslatorError> {
        let lo = word(offset)? as u32;
        let hi = word(offset + 1)? as u32;
        let rel = ((hi << 16) | lo) as i32 as i64;
        Ok((addr as i64 + rel) as u32)
    };

    let ident = word(0)?;
    let size = word(1)? as u32;

    // A malformed ident word (neither packed nor sparse) yields RESOLVE_BASIC_BLOCKS
    // via a zero-count return (§7) — the table reader reports zero entries found,
    // which this scan surfaces as the same error every other malformed-input path in
    // this function does.
    let first_target_word = match ident {
        PACKED_SWITCH_IDENT => 4, // ident, size, first_key (2 words)
        SPARSE_SWITCH_IDENT => 2 + 2 * size, // ident, size, then `size` 32-bit keys
        _ => return Err(TranslatorError::ResolveBasicBlocks),
    };

    for k in 0..size {
        let target = read_target(first_target_word + 2 * k)?;
        flags.entry(target).or_default().set(LeaderFlags::BRANCH_TARGET);
    }
    Ok(())
}

/// Builds the method-level local-variable web table from the host's debug-info
/// decoder (§4.5). Each record becomes one authoritative, method-wide [`LiveWeb`]
/// flagged `LOCAL_VARIABLE`, seeded with the type its descriptor implies.
fn resolve_local_variables(handle: &dyn MethodHandle) -> Result<HashMap<u16, WebRef>, TranslatorError> {
    log::debug!("resolve_local_variables: {}", handle.name());
    let mut collector = LocalVarCollector::new();
    handle.debug_info().decode_debug_info(&mut collector);

    let mut table = HashMap::new();
    for record in collector.records() {
        let descriptor_char = record.descriptor.chars().next().unwrap_or('?');
        let data_type = JType::from_descriptor_char(descriptor_char);
        // A local whose debug-info range starts at address 0 is live on method entry,
        // i.e. a parameter (§3/§4.5).
        let mut flags = WebFlags::LOCAL_VARIABLE;
        if record.start_addr == 0 {
            flags = flags | WebFlags::FUNCTION_ARGUMENT;
        }
        let web = Rc::new(RefCell::new(LiveWeb::new(record.register, flags)));
        web.borrow_mut().set_declared_type(data_type);
        table.insert(record.register, web);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::collaborators::{DebugInfoSource, DexCode, TryRegion};

    struct FixtureCode {
        insns: Vec<u16>,
        tries: Vec<TryRegion>,
    }

    impl DexCode for FixtureCode {
        fn insns(&self) -> &[u16] {
            &self.insns
        }
        fn insns_size(&self) -> u32 {
            self.insns.len() as u32
        }
        fn tries(&self) -> &[TryRegion] {
            &self.tries
        }
    }

    struct NoDebugInfo;
    impl DebugInfoSource for NoDebugInfo {
        fn decode_debug_info(&self, _collector: &mut LocalVarCollector) {}
    }

    struct FixtureMethod {
        code: FixtureCode,
        debug: NoDebugInfo,
    }

    impl MethodHandle for FixtureMethod {
        fn name(&self) -> &str {
            "fixture"
        }
        fn method_index(&self) -> u32 {
            0
        }
        fn dex_method_index(&self) -> u32 {
            0
        }
        fn dex_code(&self) -> &dyn DexCode {
            &self.code
        }
        fn debug_info(&self) -> &dyn DebugInfoSource {
            &self.debug
        }
    }

    #[test]
    fn if_statement_carves_three_blocks() {
        // if-eqz v0, +4 ; const/4 v1, #1 ; goto +1 ; const/4 v1, #0 ; return v1
        let if_eqz = (Opcode::IfEqz as u16) | (0u16 << 8);
        let if_target = 4u16;
        let const1 = (Opcode::Const4 as u16) | (1u16 << 8) | (1u16 << 12);
        let goto = (Opcode::Goto as u16) | (1u16 << 8);
        let const0 = (Opcode::Const4 as u16) | (1u16 << 8) | (0u16 << 12);
        let ret = (Opcode::Return as u16) | (1u16 << 8);

        let method_handle = FixtureMethod {
            code: FixtureCode {
                insns: vec![if_eqz, if_target, const1, goto, const0, ret],
                tries: Vec::new(),
            },
            debug: NoDebugInfo,
        };

        let method = Method::build_ir(&method_handle).unwrap();
        assert_eq!(method.blocks().len(), 3);
        assert_eq!(method.blocks()[0].start_address(), 0);
        assert_eq!(method.blocks()[1].start_address(), 2);
        assert_eq!(method.blocks()[2].start_address(), 4);
    }

    #[test]
    fn straight_line_method_is_a_single_block() {
        let const1 = (Opcode::Const4 as u16) | (0u16 << 8) | (1u16 << 12);
        let ret = (Opcode::Return as u16) | (0u16 << 8);

        let method_handle = FixtureMethod {
            code: FixtureCode {
                insns: vec![const1, ret],
                tries: Vec::new(),
            },
            debug: NoDebugInfo,
        };

        let method = Method::build_ir(&method_handle).unwrap();
        assert_eq!(method.blocks().len(), 1);
        assert_eq!(method.blocks()[0].start_address(), 0);
        assert_eq!(method.blocks()[0].end_address(), 1);
    }

    #[test]
    fn local_variable_web_is_shared_and_typed() {
        struct OneLocal;
        impl DebugInfoSource for OneLocal {
            fn decode_debug_info(&self, collector: &mut LocalVarCollector) {
                collector.push(crate::translator::collaborators::LocalVarRecord {
                    register: 3,
                    start_addr: 0,
                    end_addr: 2,
                    name: "count".to_string(),
                    descriptor: "I".to_string(),
                    signature: None,
                });
            }
        }

        struct WithLocal {
            code: FixtureCode,
            debug: OneLocal,
        }
        impl MethodHandle for WithLocal {
            fn name(&self) -> &str {
                "with_local"
            }
            fn method_index(&self) -> u32 {
                0
            }
            fn dex_method_index(&self) -> u32 {
                0
            }
            fn dex_code(&self) -> &dyn DexCode {
                &self.code
            }
            fn debug_info(&self) -> &dyn DebugInfoSource {
                &self.debug
            }
        }

        let ret = (Opcode::Return as u16) | (3u16 << 8);
        let handle = WithLocal {
            code: FixtureCode {
                insns: vec![ret],
                tries: Vec::new(),
            },
            debug: OneLocal,
        };

        let method = Method::build_ir(&handle).unwrap();
        let web = method.local_var_table().get(&3).unwrap();
        assert_eq!(web.borrow().data_type(), JType::Int);
        assert!(web.borrow().is_local_variable());
    }
}
