mod orchestrator;

pub use orchestrator::{AttemptRecord, Orchestrator, Outcome};
