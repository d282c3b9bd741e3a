pub mod filter;
pub mod scoring;
pub mod shuffle;

pub use filter::{TagFilter, filter_bank};
pub use shuffle::shuffle;
