//! End-to-end pipeline tests driving `translate_method` over small synthetic methods,
//! one per scenario worked through in the core design docs.

use dtcjit_core::translator::collaborators::{DebugInfoSource, DexCode, LocalVarCollector, LocalVarRecord, MethodHandle, TryRegion};
use dtcjit_core::translator::dexcode::Opcode;
use dtcjit_core::{translate_method, Method};

struct FixtureCode {
    insns: Vec<u16>,
}

impl DexCode for FixtureCode {
    fn insns(&self) -> &[u16] {
        &self.insns
    }
    fn insns_size(&self) -> u32 {
        self.insns.len() as u32
    }
    fn tries(&self) -> &[TryRegion] {
        &[]
    }
}

struct FixtureDebugInfo {
    locals: Vec<LocalVarRecord>,
}

impl DebugInfoSource for FixtureDebugInfo {
    fn decode_debug_info(&self, collector: &mut LocalVarCollector) {
        for local in &self.locals {
            collector.push(local.clone());
        }
    }
}

fn local(register: u16, descriptor: &str) -> LocalVarRecord {
    LocalVarRecord {
        register,
        start_addr: 0,
        end_addr: 0,
        name: format!("v{}", register),
        descriptor: descriptor.to_string(),
        signature: None,
    }
}

struct FixtureMethod {
    code: FixtureCode,
    debug: FixtureDebugInfo,
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

fn fixture(insns: Vec<u16>, locals: Vec<LocalVarRecord>) -> FixtureMethod {
    FixtureMethod {
        code: FixtureCode { insns },
        debug: FixtureDebugInfo { locals },
    }
}

#[test]
fn pure_int_add() {
    // add-int v2, v0, v1 ; return v2
    let add = (Opcode::AddInt as u16) | (2u16 << 8);
    let regs = 0u16 | (1u16 << 8);
    let ret = (Opcode::Return as u16) | (2u16 << 8);
    let handle = fixture(vec![add, regs, ret], vec![]);

    let cmethod = translate_method(&handle).unwrap();
    let rendered = cmethod.render();
    assert!(rendered.contains("    vi2 = vi0 + vi1;\n"));
}

#[test]
fn conditional_branch_splits_into_two_blocks() {
    // if-gez v0, +4 ; nop ; nop ; nop ; return-void
    let if_gez = (Opcode::IfGez as u16) | (0u16 << 8);
    let offset = 4u16;
    let nop = Opcode::Nop as u16;
    let ret_void = Opcode::ReturnVoid as u16;
    let handle = fixture(vec![if_gez, offset, nop, nop, nop, ret_void], vec![local(0, "I")]);

    let method = Method::build_ir(&handle).unwrap();
    let starts: Vec<u32> = method.blocks().iter().map(|b| b.start_address()).collect();
    assert_eq!(starts, vec![0, 2, 4]);

    let cmethod = dtcjit_core::CMethod::translate(&method).unwrap();
    let rendered = cmethod.render();
    assert!(rendered.contains("    if(vi0 >= (j_int)0)\tgoto .L00000004;\n"));
}

#[test]
fn invoke_with_result() {
    // invoke-direct {v0,v1}, @7 ; move-result v2 ; return v2
    let invoke = (Opcode::InvokeDirect as u16) | (2u16 << 12);
    let method_idx = 7u16;
    let invoke_regs = 0u16 | (1u16 << 4);
    let move_result = (Opcode::MoveResult as u16) | (2u16 << 8);
    let ret = (Opcode::Return as u16) | (2u16 << 8);
    let handle = fixture(
        vec![invoke, method_idx, invoke_regs, move_result, ret],
        vec![local(0, "Ljava/lang/Object;"), local(1, "Ljava/lang/Object;"), local(2, "Ljava/lang/Object;")],
    );

    let cmethod = translate_method(&handle).unwrap();
    let rendered = cmethod.render();
    assert!(rendered.contains("    vo2 = invoke_direct((j_int)7, vo0, vo1);\n"));
}

#[test]
fn packed_switch_table_targets_are_leaders() {
    // packed-switch v0, +6 at address 0 (Fmt31t, 3 words); inline table at 6 with
    // ident=0x0100, size=2, a first_key, then two 32-bit targets +4 and +8. Everything
    // past address 2 other than the forced table words is `nop`, so the fixture decodes
    // cleanly start-to-end regardless of which address a block happens to open on.
    let switch = (Opcode::PackedSwitch as u16) | (0u16 << 8);
    let table_off_lo = 6u16;
    let table_off_hi = 0u16;
    let nop = Opcode::Nop as u16;
    let ident = 0x0100u16;
    let size = 2u16;
    let first_key_lo = 0u16;
    let first_key_hi = 0u16;
    let target0_lo = 4u16;
    let target0_hi = 0u16;
    let target1_lo = 8u16;
    let target1_hi = 0u16;
    let handle = fixture(
        vec![
            switch,
            table_off_lo,
            table_off_hi, // 0..2: packed-switch
            nop,          // 3: fall-through
            nop,          // 4: target0
            nop,          // 5
            ident,        // 6: table start
            size,         // 7
            first_key_lo, // 8: target1
            first_key_hi, // 9
            target0_lo,   // 10
            target0_hi,   // 11
            target1_lo,   // 12
            target1_hi,   // 13
        ],
        vec![local(0, "I")],
    );

    let method = Method::build_ir(&handle).unwrap();
    let starts: Vec<u32> = method.blocks().iter().map(|b| b.start_address()).collect();
    assert_eq!(starts, vec![0, 3, 4, 8]);
}

#[test]
fn double_cmpg_types_def_as_int() {
    // cmpg-double v4, v0, v2
    let cmpg = (Opcode::CmpgDouble as u16) | (4u16 << 8);
    let regs = 0u16 | (2u16 << 8);
    let ret_void = Opcode::ReturnVoid as u16;
    let handle = fixture(vec![cmpg, regs, ret_void], vec![]);

    let cmethod = translate_method(&handle).unwrap();
    let rendered = cmethod.render();
    assert!(rendered.contains("    vi4 = cmpg_double(vd0, vd2);\n"));
}

#[test]
fn wide_const_types_as_long() {
    // const-wide/16 v0, #42 ; return-wide v0
    let const_wide = (Opcode::ConstWide16 as u16) | (0u16 << 8);
    let literal = 42u16;
    let ret_wide = (Opcode::ReturnWide as u16) | (0u16 << 8);
    let handle = fixture(vec![const_wide, literal, ret_wide], vec![]);

    let cmethod = translate_method(&handle).unwrap();
    let rendered = cmethod.render();
    assert!(rendered.contains("    vl0 = (j_long)42;\n"));
}

#[test]
fn rerendering_is_byte_identical() {
    let add = (Opcode::AddInt as u16) | (2u16 << 8);
    let regs = 0u16 | (1u16 << 8);
    let ret = (Opcode::Return as u16) | (2u16 << 8);

    let first = translate_method(&fixture(vec![add, regs, ret], vec![])).unwrap().render();
    let second = translate_method(&fixture(vec![add, regs, ret], vec![])).unwrap().render();
    assert_eq!(first, second);
}
