//! Healthmesh domain logic.
//!
//! Everything in this crate is pure (no database or network access) so the
//! monitoring rules can be tested in isolation. The `db`, `monitor` and `api`
//! crates fetch data, call into these functions and persist the results.

pub mod alerting;
pub mod catalog;
pub mod channels;
pub mod collection;
pub mod error;
pub mod matrix;
pub mod modules;
pub mod status;
pub mod types;
pub mod validation;
