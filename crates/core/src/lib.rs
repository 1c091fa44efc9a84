//! Domain types for the flash-sale affiliate link manager.
//!
//! Pure data and logic only: time-slot mapping records, product
//! snapshots, the day-scoped affiliate link cache, and product link
//! parsing. All I/O lives in the `db`, `gateways`, and `pipeline`
//! crates.

pub mod cache;
pub mod error;
pub mod link;
pub mod product;
pub mod record;
pub mod spreadsheet;
pub mod types;
