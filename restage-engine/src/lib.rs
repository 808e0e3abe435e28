pub mod engine;
pub mod error;
pub mod filter;
pub mod normalizer;
pub mod selection;
pub mod store;

pub use engine::{ActionOutcome, ReviewEngine};
pub use error::EngineError;
pub use store::RecordStore;
