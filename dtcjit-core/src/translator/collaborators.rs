//! Host-VM collaborator interfaces (§6): the shapes the translator consumes but does
//! not implement. A real host wires its own dex-file reader, debug-info decoder, and
//! method resolver behind these traits; `dtcjit-cli` supplies a synthetic
//! implementation for exercising the core without a real Dalvik runtime.

/// One exception handler's protected instruction range, in words from the method's
/// first instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryRegion {
    pub start_addr: u32,
    pub insn_count: u32,
}

/// The method's dex code: its instruction words and try-block table (§4.1 inputs).
pub trait DexCode {
    fn insns(&self) -> &[u16];
    fn insns_size(&self) -> u32;
    fn tries(&self) -> &[TryRegion];
}

/// One local-variable record as the host's debug-info decoder would report it
/// (§4.5: register number, start address, descriptor string; `name`/`signature` are
/// carried through for diagnostics but not consumed by type inference).
#[derive(Debug, Clone)]
pub struct LocalVarRecord {
    pub register: u16,
    pub start_addr: u32,
    pub end_addr: u32,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
}

/// Adapter the core hands to the host's callback-shaped `decode_debug_info` (§9's
/// "callback-shaped debug decoder" note): the host calls [`LocalVarCollector::push`]
/// once per local-variable record it decodes, in place of a raw function-pointer +
/// opaque-context pair.
#[derive(Debug, Default)]
pub struct LocalVarCollector {
    records: Vec<LocalVarRecord>,
}

impl LocalVarCollector {
    pub fn new() -> Self {
        LocalVarCollector::default()
    }

    pub fn push(&mut self, record: LocalVarRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[LocalVarRecord] {
        &self.records
    }
}

/// The host's debug-info decoder, consumed through the collector adapter above rather
/// than a raw callback + context pointer.
pub trait DebugInfoSource {
    fn decode_debug_info(&self, collector: &mut LocalVarCollector);
}

/// A resolved method handle (§6: `class_handle, dex_file_handle, dex_code_handle,
/// method_index, dex_method_index, name_str, access_flags`), reduced to the fields
/// the translator actually reads from it.
pub trait MethodHandle {
    fn name(&self) -> &str;
    fn method_index(&self) -> u32;
    fn dex_method_index(&self) -> u32;
    fn dex_code(&self) -> &dyn DexCode;
    fn debug_info(&self) -> &dyn DebugInfoSource;
}
