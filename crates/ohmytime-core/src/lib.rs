//! Update dispatching and location disambiguation for the ohmytime bot.
//!
//! The dispatcher pulls updates from one shared stream into a fixed pool of
//! workers. Free-text queries are resolved against a [`LocationIndex`]: a single
//! hit is answered with the local time straight away, several hits produce a
//! list of selectable options whose tokens are the record ids.
//!
//! [`LocationIndex`]: ohmytime_protocol::LocationIndex

pub mod clock;
pub mod dispatcher;
pub mod error;
pub mod reply;
pub mod resolver;

pub use clock::{LocalTime, local_time};
pub use dispatcher::Dispatcher;
pub use error::CoreError;
pub use resolver::{OPTIONS_PER_ROW, Outcome, Resolver, into_rows};
