//! The sync orchestrator.
//!
//! Drives one cycle per shop: list campaigns, then per campaign fetch
//! configuration, run change detection, fetch statistics under the
//! shared rate limiter, and append the history batch. Shops run fully
//! in parallel; campaigns within a shop run concurrently under
//! per-(shop, campaign) mutual exclusion.

pub mod config;
pub mod locks;
pub mod orchestrator;
pub mod scheduler;
pub mod vendor_cache;

pub use config::SyncConfig;
pub use locks::CampaignLocks;
pub use orchestrator::{CampaignOutcome, Orchestrator, SyncError};
pub use scheduler::SyncScheduler;
pub use vendor_cache::VendorCodeCache;
