//! Template lookup: fragment cloning and insertion-point resolution
//!
//! Fragments are authored in place: the element tagged with a template name
//! is both the clone source (cached on first use by the [`TemplateStore`])
//! and the insertion marker (its parent is where sibling instances go, found
//! by [`resolve_parent`]).

mod resolver;
mod store;

pub use resolver::resolve_parent;
pub use store::TemplateStore;
