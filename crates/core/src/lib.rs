//! Parts Store Core - Shared domain library.
//!
//! This crate provides the types and arithmetic used across all parts store
//! components:
//! - `storefront` - Server-rendered storefront
//! - `cli` - Command-line access to the catalog and cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Every network call lives in the storefront crate; this crate only
//! decides *what* to send and *what* to show.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, money, quantities, products, cart items
//! - [`cart`] - Subtotal computation and the add-to-cart merge decision
//! - [`checkout`] - Province tax table, customer form gate, order totals
//! - [`catalog`] - Listing filters and category discovery

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use types::*;
