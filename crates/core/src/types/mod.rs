//! Core types for the parts store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod product;
pub mod quantity;

pub use id::ProductId;
pub use money::{Money, MoneyError};
pub use product::{CartItem, Product};
pub use quantity::{Quantity, QuantityError};
