//! Types and traits for recording training results.
//!
//! A [`Record`] is a set of named values written by the
//! [`Trainer`](crate::Trainer) after a training run and by
//! [`eval_with_recorder`](crate::util::eval_with_recorder) at every step of a
//! replayed episode.
//!
//! ```rust
//! use tabula_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("episode_return", 1.0);
//! record.insert("algorithm", RecordValue::String("q_learning".into()));
//! assert_eq!(record.get_scalar("episode_return").unwrap(), 1.0);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
