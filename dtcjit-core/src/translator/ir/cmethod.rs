//! `CMethod`: a method's lowered C-IR, ready to render and dump to disk.
//!
//! In the original, `DtcCMethod::Translate` builds this structure but `DumpFile`
//! never receives a populated instance — `m_pCMethod` is assigned nowhere in
//! `DtcJitCompiler`, so the dump entry point is dead code in practice. Here
//! `Method::build_ir` and `CMethod::translate` are wired straight through to
//! [`CMethod::dump`], so the dump path actually produces output.

use crate::translator::error::TranslatorError;
use crate::translator::ir::expression::SymbolTable;
use crate::translator::ir::lowering::lower_record;
use crate::translator::ir::render::{render_blocks, RenderedBlock};
use crate::translator::method::Method;

const DEFAULT_DUMP_PATH: &str = "./dtcjit.out.tmp";

/// A method's translated C-IR: one [`RenderedBlock`] per basic block, plus the
/// symbol table every block's statements reference into.
pub struct CMethod {
    blocks: Vec<RenderedBlock>,
    symbols: SymbolTable,
}

impl CMethod {
    /// Lowers every instruction in every block of `method` (§4.6), in block address
    /// order. Branch targets are resolved from each instruction's own address plus
    /// its decoded offset, since leader scan already guarantees every such target
    /// lines up with some block's start address.
    pub fn translate(method: &Method) -> Result<CMethod, TranslatorError> {
        log::info!("translate: {} block(s)", method.blocks().len());
        let mut symbols = SymbolTable::new();
        let mut blocks = Vec::with_capacity(method.blocks().len());

        for block in method.blocks() {
            let mut statements = Vec::new();
            for record in block.records() {
                let branch_target = branch_target_of(record);
                if let Some(stmt) = lower_record(record, &mut symbols, branch_target)
                    .map_err(|_| TranslatorError::Dex2cTranslation)?
                {
                    statements.push(stmt);
                }
            }
            blocks.push(RenderedBlock {
                address: block.start_address(),
                statements,
            });
        }

        Ok(CMethod { blocks, symbols })
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn render(&self) -> String {
        render_blocks(&self.blocks)
    }

    /// Writes the rendered C-IR to `path`, defaulting to `./dtcjit.out.tmp` when
    /// `path` is `None` (§6).
    pub fn dump(&self, path: Option<&str>) -> Result<(), TranslatorError> {
        let path = path.unwrap_or(DEFAULT_DUMP_PATH);
        log::debug!("dump: writing {} byte(s) to {}", self.render().len(), path);
        std::fs::write(path, self.render()).map_err(|_| TranslatorError::Failure)
    }
}

fn branch_target_of(record: &crate::translator::dexcode::InstructionRecord) -> Option<u32> {
    use crate::translator::dexcode::Opcode::*;
    match record.opcode() {
        Goto | Goto16 | Goto32 | IfEq | IfNe | IfLt | IfGe | IfGt | IfLe | IfEqz | IfNez | IfLtz | IfGez | IfGtz
        | IfLez => Some((record.address() as i64 + record.decoded().literal) as u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::collaborators::{DebugInfoSource, DexCode, LocalVarCollector, MethodHandle, TryRegion};
    use crate::translator::dexcode::Opcode;

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
    fn translates_straight_line_method() {
        let const1 = (Opcode::Const4 as u16) | (0u16 << 8) | (1u16 << 12);
        let ret = (Opcode::Return as u16) | (0u16 << 8);
        let handle = FixtureMethod {
            code: FixtureCode { insns: vec![const1, ret] },
            debug: NoDebugInfo,
        };

        let method = Method::build_ir(&handle).unwrap();
        let cmethod = CMethod::translate(&method).unwrap();
        let rendered = cmethod.render();
        assert!(rendered.contains(".L00000000:"));
        assert!(rendered.contains("= (j_int)1;"));
        assert!(rendered.contains("return vi0;"));
    }
}
