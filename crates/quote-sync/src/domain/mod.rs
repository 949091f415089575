//! # Domain Module
//!
//! Core domain types for quote synchronization.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod overlay;
pub mod store;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use overlay::*;
pub use store::*;
pub use value_objects::*;
