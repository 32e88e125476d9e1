//! # Providers
//!
//! Clients for the models that back each pipeline stage, and the factory that
//! instantiates them from configuration.

pub mod ai;
pub mod factory;
