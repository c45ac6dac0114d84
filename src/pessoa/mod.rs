//! The one entity this service knows about, its rules, and its store.
pub mod model;
pub mod store;
pub mod validation;
