/// Marketplace shop identifier. Database primary keys are BIGINT.
pub type ShopId = i64;

/// Marketplace advert campaign identifier.
pub type CampaignId = i64;

/// Marketplace item (SKU/nomenclature) identifier.
pub type ItemId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
