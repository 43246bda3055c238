pub(crate) mod parser;
mod reader;
mod time;
mod types;

pub use parser::{HarParser, UNKNOWN_PAGE_ID};
pub use reader::HarReader;
pub use time::parse_timestamp;
pub use types::*;
