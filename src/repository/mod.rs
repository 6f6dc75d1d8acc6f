//! Repositories over the record store.
//!
//! Built once at startup and shared through the application state.

mod department;
mod employee;

pub use department::*;
pub use employee::*;
