//! Data models for the HR directory.
//!
//! These are the canonical internal shapes; the remote record store's wire
//! names never leave `store::schema`.

mod department;
mod employee;
mod envelope;

pub use department::*;
pub use employee::*;
pub use envelope::*;
