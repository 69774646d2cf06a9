//! External delivery for alert notifications.
//!
//! [`email`] defines the provider seam and its configuration,
//! [`providers`] the concrete backends, [`registry`] the per-kind cache and
//! [`templates`] the rendered-email contract.

pub mod email;
pub mod providers;
pub mod registry;
pub mod templates;
