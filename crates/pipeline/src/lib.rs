//! Core orchestration for the flash-sale link manager.
//!
//! Everything here works against injected collaborator traits
//! ([`traits`]) so each piece is testable without a database or
//! network: time-slot reconciliation, the link resolution chain, the
//! batch affiliate conversion engine with its periodic rescan task,
//! the admin editor session, the storefront session, and the
//! system-status gate.

mod error;

pub mod adapters;
pub mod cache_store;
pub mod convert;
pub mod editor;
pub mod reconcile;
pub mod rescan;
pub mod resolve;
pub mod status;
pub mod storefront;
pub mod traits;

pub use error::PipelineError;
