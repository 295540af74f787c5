//! Shop entity and sync status codes.

use serde::Serialize;
use sqlx::FromRow;

use advsync_core::types::{ShopId, Timestamp};

/// Shop sync status, stored as SMALLINT.
///
/// Written by the orchestrator on lifecycle transitions and hard
/// failures; read by the dashboard.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopStatus {
    Active = 1,
    AuthError = 2,
    Syncing = 3,
    Paused = 4,
}

impl ShopStatus {
    /// The database status code.
    pub fn id(self) -> i16 {
        self as i16
    }
}

/// A row from the `shops` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    /// Bearer token for the marketplace advert API.
    #[serde(skip_serializing)]
    pub api_token: String,
    pub status: i16,
    pub updated_at: Timestamp,
}
