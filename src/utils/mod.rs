//! Rendering helpers shared across services and handlers.

pub mod emails;
pub mod invoice;
