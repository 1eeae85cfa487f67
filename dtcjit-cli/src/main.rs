//! Command-line front end for the dtcjit translator.
//!
//! No real Dalvik runtime is wired in here — the core only consumes the small
//! collaborator traits in `dtcjit_core::translator::collaborators`, so this binary
//! exercises the pipeline against a synthetic fixture method built in-process. A
//! host embedding the core for real would implement those traits against its own
//! dex-file reader instead of reaching for this binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dtcjit_core::translator::collaborators::{
    DebugInfoSource, DexCode, LocalVarCollector, LocalVarRecord, MethodHandle, TryRegion,
};
use dtcjit_core::translator::dexcode::Opcode;
use dtcjit_core::translator::ir::CMethod;
use dtcjit_core::translator::method::Method;

#[derive(Parser)]
#[command(name = "dtcjit", about = "Dalvik bytecode to C-IR translator", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translates the built-in demo method and prints its rendered C-IR.
    Demo {
        /// Write the rendered C-IR to this path instead of stdout.
        #[arg(long)]
        output: Option<String>,
    },
}

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

struct DemoLocals;
impl DebugInfoSource for DemoLocals {
    fn decode_debug_info(&self, collector: &mut LocalVarCollector) {
        collector.push(LocalVarRecord {
            register: 2,
            start_addr: 0,
            end_addr: 6,
            name: "sum".to_string(),
            descriptor: "I".to_string(),
            signature: None,
        });
    }
}

struct DemoMethod {
    code: FixtureCode,
    debug: DemoLocals,
}

impl MethodHandle for DemoMethod {
    fn name(&self) -> &str {
        "demo.sumOrZero(II)I"
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

/// `if-lez v0, +4 ; add-int v2, v0, v1 ; return v2 ; const/4 v2, #0 ; return v2`
fn demo_method() -> DemoMethod {
    let if_lez = (Opcode::IfLez as u16) | (0u16 << 8);
    let if_target = 4u16;
    let add_int_w0 = (Opcode::AddInt as u16) | (2u16 << 8);
    let add_int_w1 = 0u16 | (1u16 << 8);
    let ret_sum = (Opcode::Return as u16) | (2u16 << 8);
    let const_zero = (Opcode::Const4 as u16) | (2u16 << 8) | (0u16 << 12);
    let ret_zero = (Opcode::Return as u16) | (2u16 << 8);

    DemoMethod {
        code: FixtureCode {
            insns: vec![if_lez, if_target, add_int_w0, add_int_w1, ret_sum, const_zero, ret_zero],
        },
        debug: DemoLocals,
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Demo { output } => {
            let handle = demo_method();
            let method = Method::build_ir(&handle).context("failed to build IR for demo method")?;
            let cmethod = CMethod::translate(&method).context("failed to translate demo method to C-IR")?;

            match output {
                Some(path) => {
                    cmethod
                        .dump(Some(&path))
                        .map_err(|err| anyhow::anyhow!("{err}"))
                        .context("failed to write rendered C-IR")?;
                    log::info!("wrote {} symbol(s) to {}", cmethod.symbol_count(), path);
                }
                None => {
                    print!("{}", cmethod.render());
                }
            }
        }
    }

    Ok(())
}
