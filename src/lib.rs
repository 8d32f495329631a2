//! Mediashelf: cached, template-driven page rendering for a media catalog site.
//!
//! The interesting part lives in [`cache`] (versioned cache-aside response
//! cache over a blob store) and [`application`] (template cache, variable
//! substitution, page renderers and pagination). Everything under [`infra`]
//! adapts those to concrete storage, template sources and an axum router.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
