//! Accounts API library.
//!
//! Customer and user records served over REST, one use case per action.
//! The binary in `main.rs` wires configuration, storage and collaborators;
//! tests build the same router over in-memory storage.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod effects;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
pub use state::AppState;
