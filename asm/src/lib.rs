mod assemble;
mod error;
mod first_pass;
mod line;
mod msg;
mod output;
mod preprocess;
mod second_pass;
mod symbol;

pub use assemble::{assemble, Assembly};
pub use error::Error;
pub use msg::{Diag, Diags};
pub use output::{dump_text, entries_text, externs_text, object_text};
pub use second_pass::Image;
pub use symbol::{SymKind, SymbolTable};
