//! Deterministic textual rendering of a lowered method (§4.7, §6).

use crate::translator::ir::statement::Statement;

/// One block's worth of lowered statements, keyed by the block's start address (used
/// both as the block's own label and as any branch target that lands on it).
pub struct RenderedBlock {
    pub address: u32,
    pub statements: Vec<Statement>,
}

/// Renders blocks in address order as `.L%08X:` headers followed by one indented
/// statement per line. Blocks are separated by a blank line — distinct output per
/// block keeps a diff between two translations of the same method limited to the
/// blocks that actually changed.
pub fn render_blocks(blocks: &[RenderedBlock]) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!(".L{:08X}:\n", block.address));
        for stmt in &block.statements {
            out.push_str(&stmt.to_string());
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::ir::expression::{Expression, SymbolKind, SymbolTable};

    #[test]
    fn separates_blocks_with_blank_line() {
        let mut symbols = SymbolTable::new();
        let v = symbols.intern(SymbolKind::Var, "vi0");
        let blocks = vec![
            RenderedBlock {
                address: 0,
                statements: vec![Statement::Return(Some(Expression::Id(v.clone())))],
            },
            RenderedBlock {
                address: 4,
                statements: vec![Statement::Return(None)],
            },
        ];
        let text = render_blocks(&blocks);
        assert_eq!(text, ".L00000000:\n    return vi0;\n\n.L00000004:\n    return;\n");
    }
}
