//! Integration tests for markup parsing into live documents

use domweave::parse_document;
use pretty_assertions::assert_eq;

#[test]
fn test_parse_full_document() {
    let source = r#"
        // contact list
        div [class: "panel"] {
            h1 "Contacts"
            ul {
                li [template: "row", hidden: "true"] {
                    span [bind-text: title]
                    a "open" [bind-link: url, bind-fetch: more]
                }
            }
        }
    "#;

    let doc = parse_document(source).expect("Should parse");

    let panel = doc.children(doc.root())[0];
    assert_eq!(doc.tag(panel), "div");
    assert_eq!(doc.attr(panel, "class"), Some("panel"));

    let heading = doc.children(panel)[0];
    assert_eq!(doc.tag(heading), "h1");
    assert_eq!(doc.text(heading), Some("Contacts"));

    let list = doc.children(panel)[1];
    let row = doc.children(list)[0];
    assert_eq!(doc.attr(row, "template"), Some("row"));
    assert_eq!(doc.attr(row, "hidden"), Some("true"));

    let link = doc.children(row)[1];
    assert_eq!(doc.text(link), Some("open"));
    assert_eq!(doc.attr(link, "bind-fetch"), Some("more"));
}

#[test]
fn test_parse_multiple_roots() {
    let doc = parse_document("header\nmain\nfooter").expect("Should parse");
    let tags: Vec<&str> = doc
        .children(doc.root())
        .iter()
        .map(|&n| doc.tag(n))
        .collect();
    assert_eq!(tags, vec!["header", "main", "footer"]);
}

#[test]
fn test_parse_numeric_and_bare_attr_values() {
    let doc = parse_document("div [tabindex: 0, role: listbox]").expect("Should parse");
    let node = doc.children(doc.root())[0];
    assert_eq!(doc.attr(node, "tabindex"), Some("0"));
    assert_eq!(doc.attr(node, "role"), Some("listbox"));
}

#[test]
fn test_parse_comments_are_skipped() {
    let source = r#"
        /* layout shell */
        div {
            // filled at build time
            span [bind-text: title]
        }
    "#;
    let doc = parse_document(source).expect("Should parse");
    let shell = doc.children(doc.root())[0];
    assert_eq!(doc.children(shell).len(), 1);
}

#[test]
fn test_parse_error_mentions_location() {
    let source = "div [template \"row\"]";
    let errors = parse_document(source).expect_err("Should fail");
    assert!(!errors.is_empty());

    let report = errors[0].format(source, "test.dw");
    assert!(report.contains("test.dw"));
}

#[test]
fn test_unbalanced_braces_fail() {
    assert!(parse_document("ul { li").is_err());
    assert!(parse_document("ul } li").is_err());
}

#[test]
fn test_round_trip_source() {
    let doc = parse_document(r#"ul { li [template: "row"] { span [bind-text: title] } }"#)
        .expect("Should parse");
    let out = doc.to_source();
    assert!(out.contains("template: \"row\""));
    assert!(out.contains("bind-text: \"title\""));
}
