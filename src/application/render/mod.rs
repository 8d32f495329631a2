//! Page rendering.
//!
//! Rendering is plain placeholder substitution ([`apply_vars`]) over raw
//! template text from the [`TemplateCache`](crate::application::templates::TemplateCache).
//! Page renderers compose it: a content template is rendered first and then
//! embedded as `body` into the `layout` template.
//!
//! Substitution never escapes. Callers escape untrusted values with
//! [`escape_html`](crate::presentation::html::escape_html) before handing
//! them over.

mod pages;
mod vars;

pub use pages::{LayoutPage, ListLayout, ListPage, SiteRenderer, StaticPage};
pub use vars::{TemplateVars, apply_vars};
