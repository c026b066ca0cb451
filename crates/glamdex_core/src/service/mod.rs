//! Use-case services over the store traits.
//!
//! # Responsibility
//! - Orchestrate store calls into identity, inventory, session and sync flows.
//! - Keep presentation code decoupled from the backend in use.

pub mod identity_service;
pub mod inventory_service;
pub mod session;
pub mod sync_service;
