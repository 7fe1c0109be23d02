//! AST for parsed markup, consumed when building a [`Document`](crate::dom::Document)

/// One authored element: `tag "text"? [key: value, ...]? { children }?`
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    /// Static text content, if the element carries a string literal
    pub text: Option<String>,
    /// Attributes in authored order
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
