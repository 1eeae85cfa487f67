//! Instruction decoding tests exercised from outside the crate, independent of
//! liveness/type inference/lowering.

use dtcjit_core::translator::dexcode::{decode_instruction, instruction_width, Opcode};

#[test]
fn decodes_three_operand_binary() {
    // add-int v2, v0, v1
    let w0 = (Opcode::AddInt as u16) | (2u16 << 8);
    let w1 = 0u16 | (1u16 << 8);
    let insn = decode_instruction(&[w0, w1]).unwrap();
    assert_eq!(insn.opcode, Opcode::AddInt);
    assert_eq!(insn.va, 2);
    assert_eq!(insn.vb, 0);
    assert_eq!(insn.vc, 1);
    assert_eq!(instruction_width(&insn), 2);
}

#[test]
fn decodes_const_high16_with_sign_extension() {
    // const/high16 v0, #0xffff0000 (negative)
    let w0 = (Opcode::ConstHigh16 as u16) | (0u16 << 8);
    let w1 = 0xffffu16;
    let insn = decode_instruction(&[w0, w1]).unwrap();
    assert_eq!(insn.literal, -65536);
}

#[test]
fn decodes_const_wide_high16_without_narrowing() {
    // const-wide/high16 v0, #0x4010000000000000 (a positive double bit pattern)
    let w0 = (Opcode::ConstWideHigh16 as u16) | (0u16 << 8);
    let w1 = 0x4010u16;
    let insn = decode_instruction(&[w0, w1]).unwrap();
    assert_eq!(insn.literal, 0x4010_0000_0000_0000u64 as i64);
}

#[test]
fn decodes_fmt51l_wide_literal() {
    // const-wide v0, #0x0102030405060708
    let w0 = (Opcode::ConstWide as u16) | (0u16 << 8);
    let insn = decode_instruction(&[w0, 0x0708, 0x0506, 0x0304, 0x0102]).unwrap();
    assert_eq!(insn.literal, 0x0102_0304_0506_0708u64 as i64);
    assert_eq!(instruction_width(&insn), 5);
}

#[test]
fn decodes_negative_fmt22b_literal() {
    // add-int/lit8 v1, v0, #-1
    let w0 = (Opcode::AddIntLit8 as u16) | (1u16 << 8);
    let w1 = 0u16 | (0xffu16 << 8);
    let insn = decode_instruction(&[w0, w1]).unwrap();
    assert_eq!(insn.va, 1);
    assert_eq!(insn.vb, 0);
    assert_eq!(insn.literal, -1);
}

#[test]
fn decodes_fmt3rc_range_invoke() {
    // invoke-direct/range {v3..v5}, method@9
    let w0 = (Opcode::InvokeDirectRange as u16) | (3u16 << 8);
    let insn = decode_instruction(&[w0, 9, 3]).unwrap();
    assert_eq!(insn.va, 3);
    assert_eq!(insn.vb, 9);
    assert_eq!(insn.vc, 3);
}

#[test]
fn rejects_unknown_opcode_byte() {
    // 0x73 is unused in the Dalvik opcode table.
    let w0 = 0x0073u16;
    assert!(decode_instruction(&[w0]).is_err());
}

#[test]
fn rejects_truncated_buffer() {
    // add-int needs a second word; only one is supplied.
    let w0 = Opcode::AddInt as u16;
    assert!(decode_instruction(&[w0]).is_err());
}
