mod summary;

pub use summary::{write_summary, FinalStatus, SummaryReport};
