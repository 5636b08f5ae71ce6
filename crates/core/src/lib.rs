//! Core of the minorm mapping layer.
//!
//! - [`storage`]: the backend-agnostic executor contract, rows and errors.
//! - [`entity`]: entity mappers, relation descriptors and the relation loader.
//!
//! Nothing in this crate talks to a database directly. Every statement goes
//! through a [`storage::QueryExecutor`] supplied by the caller.

pub mod entity;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
