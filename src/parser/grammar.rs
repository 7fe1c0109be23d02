//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::Element;
use crate::parser::lexer::Token;

/// Parse markup source into a list of top-level elements
pub fn parse(input: &str) -> Result<Vec<Element>, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

fn document_parser<'a, I>() -> impl Parser<'a, I, Vec<Element>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // Basic token parsers
    let identifier = select! {
        Token::Ident(s) => s,
    };

    let string_literal = select! {
        Token::String(s) => s,
    };

    // Attribute values: strings, bare identifiers, and numbers are all
    // stored as strings on the node
    let attr_value = select! {
        Token::String(s) => s,
        Token::Ident(s) => s,
        Token::Number(n) => n,
    };

    // One `key: value` attribute
    let attribute = identifier
        .then_ignore(just(Token::Colon))
        .then(attr_value)
        .map(|(key, value)| (key, value));

    // `[key: value, key: value]`
    let attr_block = attribute
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    let element = recursive(|element| {
        identifier
            .then(string_literal.or_not())
            .then(attr_block.or_not())
            .then(
                element
                    .repeated()
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::BraceOpen), just(Token::BraceClose))
                    .or_not(),
            )
            .map(|(((tag, text), attrs), children)| Element {
                tag,
                text,
                attrs: attrs.unwrap_or_default(),
                children: children.unwrap_or_default(),
            })
    });

    element.repeated().collect::<Vec<_>>().then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_element() {
        let elements = parse("div").expect("Should parse");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].tag, "div");
        assert!(elements[0].attrs.is_empty());
        assert!(elements[0].children.is_empty());
    }

    #[test]
    fn test_parse_attributes_and_text() {
        let elements = parse(r#"span "static" [bind-text: title, class: "wide"]"#).expect("Should parse");
        assert_eq!(elements[0].text.as_deref(), Some("static"));
        assert_eq!(elements[0].attr("bind-text"), Some("title"));
        assert_eq!(elements[0].attr("class"), Some("wide"));
    }

    #[test]
    fn test_parse_nested_children() {
        let source = r#"
            ul {
                li [template: "row"] {
                    span [bind-text: title]
                    a [bind-link: url]
                }
            }
        "#;
        let elements = parse(source).expect("Should parse");
        assert_eq!(elements.len(), 1);
        let row = &elements[0].children[0];
        assert_eq!(row.attr("template"), Some("row"));
        assert_eq!(row.children.len(), 2);
    }

    #[test]
    fn test_parse_error_reports() {
        let result = parse("div [text title]");
        assert!(result.is_err());
    }
}
