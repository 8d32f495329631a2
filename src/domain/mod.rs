//! Domain layer types.

pub mod identity;
pub mod media;
