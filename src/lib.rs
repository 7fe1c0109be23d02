//! domweave - a keyed template reconciliation engine for live element trees
//!
//! Given a markup document containing named template fragments and a
//! hierarchical JSON payload, the engine produces and keeps in sync a
//! matching tree of live nodes: entering items get fresh template clones,
//! items matched by key update in place, and vanished items are hidden and
//! detached. Instances keep their node identity (and any mounted plugins)
//! for as long as their key keeps appearing.
//!
//! # Example
//!
//! ```rust
//! use domweave::mount;
//! use serde_json::json;
//!
//! let mut engine = mount(r#"
//!     ul {
//!         li [template: "row"] {
//!             span [bind-text: title]
//!         }
//!     }
//! "#).unwrap();
//!
//! let rows = engine.build(&json!([
//!     {"name": "row", "key": 1, "title": "First"},
//!     {"name": "row", "key": 2, "title": "Second"}
//! ])).unwrap();
//!
//! assert_eq!(rows.len(), 2);
//! let label = engine.document().children(rows[0])[0];
//! assert_eq!(engine.document().text(label), Some("First"));
//! ```

pub mod bindings;
pub mod data;
pub mod dom;
pub mod engine;
pub mod error;
pub mod parser;
pub mod project;
pub mod reconcile;
pub mod template;

pub use bindings::{BindingConfig, BindingsError};
pub use data::{DataError, DataNode, FieldValue};
pub use dom::{Document, Lifecycle, NodeId};
pub use engine::{Engine, FetchError, Fetcher};
pub use error::ParseError;
pub use parser::parse_document;
pub use project::{Plugin, PluginRegistry};
pub use template::{resolve_parent, TemplateStore};

use thiserror::Error;

/// Errors that can surface from the build pipeline
#[derive(Debug, Error)]
pub enum BuildError {
    /// Error parsing the markup document
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Malformed data payload
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// Click-fetch collaborator failure
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
}

impl From<Vec<ParseError>> for BuildError {
    fn from(errors: Vec<ParseError>) -> Self {
        BuildError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse a markup document and wrap it in a fresh [`Engine`]
///
/// This is the usual way to get started; use [`Engine::new`] directly when
/// the document is constructed programmatically.
pub fn mount(markup: &str) -> Result<Engine, BuildError> {
    let doc = parse_document(markup)?;
    Ok(Engine::new(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mount_and_build() {
        let mut engine = mount(
            r#"
            ul {
                li [template: "row"] {
                    span [bind-text: title]
                }
            }
            "#,
        )
        .expect("Should mount");

        let rows = engine
            .build(&json!([{"name": "row", "key": 1, "title": "one"}]))
            .expect("Should build");
        assert_eq!(rows.len(), 1);
        assert_eq!(engine.document().state(rows[0]), Lifecycle::Added);
    }

    #[test]
    fn test_mount_rejects_bad_markup() {
        let result = mount("ul { li [template ] }");
        assert!(matches!(result, Err(BuildError::Parse(_))));
    }

    #[test]
    fn test_build_rejects_scalar_payload() {
        let mut engine = mount("ul").expect("Should mount");
        let result = engine.build(&json!("not a node"));
        assert!(matches!(result, Err(BuildError::Data(_))));
    }
}
