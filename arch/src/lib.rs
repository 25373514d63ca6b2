pub mod mode;
pub mod op;
pub mod reg;
pub mod word;

/// Base load address of the instruction section. The data section follows
/// immediately after the last instruction word.
pub const START_ADDR: u32 = 100;
