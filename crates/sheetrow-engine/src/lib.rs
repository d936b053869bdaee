//! sheetrow_engine - Grid <-> record transcoding.
//!
//! Everything in here is pure: it takes cells that some store returned and
//! produces headers, records and write plans. Talking to the store is the job
//! of `sheetrow-core`.

pub mod engine;
pub mod error;

pub use error::{Result, TranscodeError};
