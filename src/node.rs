//! Entities, and the rules for the names they carry.
mod name;
pub use name::*;

mod entity;
pub use entity::*;
