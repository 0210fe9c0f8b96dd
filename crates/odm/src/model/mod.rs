//! Model System - Capability contract and reusable base fields
//!
//! - `core_trait`: the [`Model`] trait every persisted type implements
//! - `base`: [`BaseModel`] identity/audit fields and the delegation macro

pub mod base;
pub mod core_trait;

pub use base::{now_millis, optional_bson_datetime, BaseModel};
pub use core_trait::{Model, ID_FIELD};
