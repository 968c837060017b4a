//! Accounts Core - Shared types library.
//!
//! This crate provides common types used across all Accounts components:
//! - `api` - The REST service for customers and users
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for entity IDs and emails, plus [`EntityKind`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
