pub mod analysis;
pub mod error;
pub mod filter;
pub mod har;
pub mod page;
pub mod timing;

pub use error::{Error, Result};
pub use filter::{EntryFilter, filter_entries};
pub use page::{AssetCategory, HarPage, HarPageBuilder};
pub use timing::{LoadPhase, LoadTimeAnalyzer, TimingModel, get_load_time};
