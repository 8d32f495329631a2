//! HTML fragments shared by the page renderers.

pub mod html;
pub mod pagination;
