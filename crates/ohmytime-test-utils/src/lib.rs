//! Test helpers shared across ohmytime crates.

pub mod index;
pub mod sender;

pub use index::{StubIndex, record};
pub use sender::{FailingSender, RecordingSender, SentMessage};
