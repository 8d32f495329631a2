//! Application services: templates, rendering, pagination and the catalog.

pub mod catalog;
pub mod error;
pub mod pagination;
pub mod render;
pub mod repos;
pub mod templates;
