//! Pure domain logic for the advertising sync service.
//!
//! This crate has no I/O. It provides:
//!
//! - [`detector`] — the snapshot diff algorithm that turns two
//!   consecutive campaign configurations into change events.
//! - [`attribution`] — the halo-attribution classifier.
//! - [`history`] — the builder for append-only advert history rows.
//! - [`bid`] — bid value parsing and validation (debounce-by-validation).
//!
//! Everything here is deterministic and synchronous; the `db`,
//! `marketplace` and `sync` crates wire it to the outside world.

pub mod attribution;
pub mod bid;
pub mod campaign;
pub mod detector;
pub mod history;
pub mod types;

pub use campaign::{CampaignSnapshot, CampaignState, CampaignType};
pub use detector::{detect_changes, seed_state, ChangeKind, DetectedChange, Detection};
pub use history::{build_history_rows, ItemMetrics, NewHistoryRow};
