//! Domain models for the accounts API.

pub mod entity;

pub use entity::{CreateEntityRequest, Entity, EntityPatch, NewEntity};
