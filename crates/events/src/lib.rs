//! In-process change event fan-out.
//!
//! The sync pipeline persists every change event durably before
//! publishing it here; the bus exists so in-process consumers
//! (logging today, alerting later) can observe the change stream
//! without touching the ledger path.
//!
//! - [`EventBus`] — publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ChangeNotice`] — the broadcast envelope for one change event.
//! - [`ChangeLogger`] — background consumer that logs every change.

pub mod bus;
pub mod logger;

pub use bus::{ChangeNotice, EventBus};
pub use logger::ChangeLogger;
