//! Halo-attribution classifier.
//!
//! The upstream statistics endpoint credits a campaign with
//! conversions on items the shopper merely viewed after clicking an ad
//! for a different item. Flagging those "halo" items lets downstream
//! reporting separate true ad-driven performance from incidental
//! credit.
//!
//! Naming follows the upstream convention, which reads inverted:
//! `is_associated = true` means the item was NOT an official campaign
//! target yet received statistical credit.

use std::collections::BTreeSet;

use crate::types::ItemId;

/// Classify one statistics item against the campaign's official item set.
///
/// Returns `true` (halo) when the item is absent from the official set.
pub fn is_halo(official_items: &BTreeSet<ItemId>, item_id: ItemId) -> bool {
    !official_items.contains(&item_id)
}
