//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod campaign_state_repo;
pub mod change_event_repo;
pub mod history_repo;
pub mod shop_repo;
pub mod vendor_code_repo;

pub use campaign_state_repo::{CampaignItemViewRepo, CampaignStateRepo};
pub use change_event_repo::ChangeEventRepo;
pub use history_repo::HistoryRepo;
pub use shop_repo::ShopRepo;
pub use vendor_code_repo::VendorCodeRepo;
