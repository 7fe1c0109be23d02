//! Parser for the template markup language

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::Element;
pub use grammar::parse;

use crate::dom::{Document, NodeId};

/// Parse markup source straight into a [`Document`]
pub fn parse_document(input: &str) -> Result<Document, Vec<crate::ParseError>> {
    let elements = parse(input)?;
    let mut doc = Document::new();
    let root = doc.root();
    for element in &elements {
        let node = build_node(&mut doc, element);
        doc.append_child(root, node);
    }
    Ok(doc)
}

fn build_node(doc: &mut Document, element: &Element) -> NodeId {
    let node = doc.create_element(&element.tag);
    if let Some(text) = &element.text {
        doc.set_text(node, text);
    }
    for (key, value) in &element.attrs {
        doc.set_attr(node, key, value);
    }
    for child in &element.children {
        let child_node = build_node(doc, child);
        doc.append_child(node, child_node);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_builds_tree() {
        let doc = parse_document(
            r#"
            ul {
                li [template: "row"] {
                    span [bind-text: title]
                }
            }
            "#,
        )
        .expect("Should parse");

        let list = doc.children(doc.root())[0];
        assert_eq!(doc.tag(list), "ul");
        let row = doc.children(list)[0];
        assert_eq!(doc.attr(row, "template"), Some("row"));
        let label = doc.children(row)[0];
        assert_eq!(doc.attr(label, "bind-text"), Some("title"));
    }
}
