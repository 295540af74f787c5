//! Entity structs and insert DTOs.
//!
//! Each submodule contains a `FromRow` struct matching the database
//! row, plus the create DTO used by the corresponding repository.

pub mod campaign_state;
pub mod change_event;
pub mod history;
pub mod shop;
