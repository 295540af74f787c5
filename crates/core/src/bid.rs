//! Bid value parsing and validation.
//!
//! The upstream API intermittently returns empty strings or
//! non-numeric junk in the bid field. Treating those as real changes
//! would flood the event stream, so the detector only compares bids
//! that survive [`parse_bid`]. An invalid fetched value is a no-op for
//! that field, never an error for the whole diff.

use rust_decimal::Decimal;

/// Parse a raw bid value into a clean [`Decimal`].
///
/// Returns `Some` only when the value is present, non-empty, parses as
/// a number, and is strictly greater than zero.
pub fn parse_bid(raw: Option<&str>) -> Option<Decimal> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let value: Decimal = raw.parse().ok()?;
    if value > Decimal::ZERO {
        Some(value)
    } else {
        None
    }
}
