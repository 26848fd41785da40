pub mod engine;
pub mod normalize;
pub mod payload;
pub mod submit;

pub use crate::domain::model::{CleanRecord, Outcome, RawRecord, RunSummary, UserPayload};
pub use crate::domain::ports::{RecordSource, Storage};
pub use crate::utils::error::Result;
