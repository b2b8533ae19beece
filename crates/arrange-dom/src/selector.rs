//! A small CSS selector engine.
//!
//! Supports type, universal, class, id and attribute (`[a]`, `[a=v]`)
//! selectors combined with descendant and child combinators, comma
//! separated lists, and a leading `>` that anchors the subject to a scope
//! element (its parent must be the scope).

use crate::document::{Document, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Type(String),
    Class(String),
    Id(String),
    Attribute { name: String, value: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

/// Simple selectors that all apply to one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

/// Compounds joined by combinators, left to right.
///
/// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplexSelector {
    /// Written with a leading `>`: the subject's parent must be the scope.
    pub anchored: bool,
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

/// A comma separated selector list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    pub input: String,
    pub position: usize,
    pub reason: &'static str,
}

impl std::fmt::Display for SelectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid selector {:?} at {}: {}",
            self.input, self.position, self.reason
        )
    }
}

impl std::error::Error for SelectorError {}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, reason: &'static str) -> SelectorError {
        SelectorError {
            input: self.input.to_string(),
            position: self.pos,
            reason,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected identifier"));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn attribute(&mut self) -> Result<SimpleSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let value = match self.peek() {
            Some(b']') => None,
            Some(b'=') => {
                self.pos += 1;
                self.skip_whitespace();
                let value = match self.peek() {
                    Some(quote @ (b'"' | b'\'')) => {
                        self.pos += 1;
                        let start = self.pos;
                        while matches!(self.peek(), Some(b) if b != quote) {
                            self.pos += 1;
                        }
                        if self.peek().is_none() {
                            return Err(self.error("unterminated string"));
                        }
                        let value = self.input[start..self.pos].to_string();
                        self.pos += 1;
                        value
                    }
                    _ => self.ident()?,
                };
                self.skip_whitespace();
                Some(value)
            }
            _ => return Err(self.error("unsupported attribute operator")),
        };
        if self.peek() != Some(b']') {
            return Err(self.error("expected ']'"));
        }
        self.pos += 1;
        Ok(SimpleSelector::Attribute { name, value })
    }

    fn compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut compound = CompoundSelector::default();
        loop {
            match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    compound.simples.push(SimpleSelector::Universal);
                }
                Some(b'.') => {
                    self.pos += 1;
                    compound.simples.push(SimpleSelector::Class(self.ident()?));
                }
                Some(b'#') => {
                    self.pos += 1;
                    compound.simples.push(SimpleSelector::Id(self.ident()?));
                }
                Some(b'[') => {
                    self.pos += 1;
                    compound.simples.push(self.attribute()?);
                }
                Some(b) if b.is_ascii_alphabetic() && compound.simples.is_empty() => {
                    let tag = self.ident()?.to_ascii_lowercase();
                    compound.simples.push(SimpleSelector::Type(tag));
                }
                Some(b':') => return Err(self.error("pseudo-classes are not supported")),
                _ => break,
            }
        }
        if compound.simples.is_empty() {
            return Err(self.error("expected selector"));
        }
        Ok(compound)
    }

    fn complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut selector = ComplexSelector::default();
        self.skip_whitespace();
        if self.peek() == Some(b'>') {
            self.pos += 1;
            self.skip_whitespace();
            selector.anchored = true;
        }
        selector.compounds.push(self.compound()?);
        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(b',') => break,
                Some(b'>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.error("unexpected character")),
            };
            selector.combinators.push(combinator);
            selector.compounds.push(self.compound()?);
        }
        Ok(selector)
    }

    fn list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut list = SelectorList::default();
        self.skip_whitespace();
        if self.peek().is_none() {
            return Ok(list);
        }
        loop {
            list.selectors.push(self.complex()?);
            match self.peek() {
                Some(b',') => self.pos += 1,
                None => break,
                Some(_) => return Err(self.error("unexpected character")),
            }
        }
        Ok(list)
    }
}

impl SelectorList {
    /// Parse a selector list. The empty string parses to a list that
    /// matches nothing.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).list()
    }

    /// Parse, or log a warning and match nothing.
    pub fn compile_lossy(input: &str) -> Self {
        Self::parse(input).unwrap_or_else(|err| {
            tracing::warn!("{}", err);
            Self::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// True if any selector in the list matches `node`.
    ///
    /// Anchored selectors only match when `scope` is given and is the
    /// parent of `node`.
    pub fn matches(&self, doc: &Document, node: NodeId, scope: Option<NodeId>) -> bool {
        self.selectors.iter().any(|s| s.matches(doc, node, scope))
    }
}

impl ComplexSelector {
    pub fn matches(&self, doc: &Document, node: NodeId, scope: Option<NodeId>) -> bool {
        if self.compounds.is_empty() {
            return false;
        }
        if self.anchored && (scope.is_none() || doc.parent(node) != scope) {
            return false;
        }
        self.match_at(doc, node, self.compounds.len() - 1)
    }

    /// Match `compounds[..=index]` with `compounds[index]` on `node`,
    /// backtracking over ancestors for descendant combinators.
    fn match_at(&self, doc: &Document, node: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(doc, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|parent| self.match_at(doc, parent, index - 1)),
            Combinator::Descendant => {
                let mut ancestor = doc.parent(node);
                while let Some(id) = ancestor {
                    if self.match_at(doc, id, index - 1) {
                        return true;
                    }
                    ancestor = doc.parent(id);
                }
                false
            }
        }
    }
}

impl CompoundSelector {
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(element) = doc.element(node) else {
            return false;
        };
        self.simples.iter().all(|simple| match simple {
            SimpleSelector::Universal => true,
            SimpleSelector::Type(tag) => element.tag == *tag,
            SimpleSelector::Class(class) => element.has_class(class),
            SimpleSelector::Id(id) => element.id() == Some(id.as_str()),
            SimpleSelector::Attribute { name, value: None } => element.attribute(name).is_some(),
            SimpleSelector::Attribute {
                name,
                value: Some(value),
            } => element.attribute(name) == Some(value.as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let list = doc.create_element("ul").unwrap();
        doc.add_class(list, "list");
        doc.append_child(doc.body(), list).unwrap();
        let item = doc.create_element("li").unwrap();
        doc.add_class(item, "item");
        doc.set_attribute(item, "data-id", "a");
        doc.append_child(list, item).unwrap();
        let handle = doc.create_element("span").unwrap();
        doc.add_class(handle, "handle");
        doc.append_child(item, handle).unwrap();
        (doc, list, item, handle)
    }

    #[test]
    fn test_parse_list() {
        let list = SelectorList::parse(">li.item, .handle").unwrap();
        assert_eq!(list.selectors.len(), 2);
        assert!(list.selectors[0].anchored);
        assert!(!list.selectors[1].anchored);
        assert!(SelectorList::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(SelectorList::parse("li:hover").is_err());
        assert!(SelectorList::parse("[data-id~=a]").is_err());
        assert!(SelectorList::parse("li,").is_err());
        assert!(SelectorList::compile_lossy("li:hover").is_empty());
    }

    #[test]
    fn test_compound_matching() {
        let (doc, _, item, handle) = tree();
        let sel = SelectorList::parse("li.item[data-id='a']").unwrap();
        assert!(sel.matches(&doc, item, None));
        assert!(!sel.matches(&doc, handle, None));
        assert!(SelectorList::parse("[data-id]").unwrap().matches(&doc, item, None));
    }

    #[test]
    fn test_combinators() {
        let (doc, _, _, handle) = tree();
        assert!(SelectorList::parse("ul .handle").unwrap().matches(&doc, handle, None));
        assert!(SelectorList::parse(".list > li > span").unwrap().matches(&doc, handle, None));
        assert!(!SelectorList::parse(".list > span").unwrap().matches(&doc, handle, None));
        assert!(SelectorList::parse("body span").unwrap().matches(&doc, handle, None));
    }

    #[test]
    fn test_anchor_requires_scope_parent() {
        let (doc, list, item, handle) = tree();
        let sel = SelectorList::parse(">*").unwrap();
        assert!(sel.matches(&doc, item, Some(list)));
        assert!(!sel.matches(&doc, handle, Some(list)));
        assert!(!sel.matches(&doc, item, None));
    }
}
