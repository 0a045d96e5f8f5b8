//! CSS selector subset: parsing and matching.
//!
//! # Grammar
//!
//! ```text
//! list       := complex ( "," complex )*
//! complex    := compound ( combinator compound )*
//! combinator := whitespace+            (descendant)
//!             | whitespace* ">" whitespace*   (child)
//! compound   := ( ident | "*" )? ( "#" ident | "." ident | attribute )*
//! attribute  := "[" ident ( op value )? "]"
//! op         := "=" | "~=" | "^=" | "$=" | "*="
//! value      := ident | '"' ... '"' | "'" ... "'"
//! ```
//!
//! A compound must contain at least one part. Identifiers are ASCII
//! letters, digits, `-` and `_`.
//!
//! # Matching
//!
//! Complex selectors match right to left. Ancestor combinators may climb
//! past the query scope, so `div p` inside a scope matches a `p` whose `div`
//! ancestor sits outside it. Tag names compare ASCII case-insensitively;
//! attribute values compare exactly.

use std::fmt;

use crate::document::Document;
use crate::node::{ElementData, NodeId};

// ---------------------------------------------------------------------------
// AST
// ---------------------------------------------------------------------------

/// Comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    /// Leftmost first.
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeTest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeTest {
    name: String,
    op: Option<(AttributeOp, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeOp {
    Equals,
    Includes,
    Prefix,
    Suffix,
    Substring,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Selector syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    /// The selector being parsed.
    pub input: String,
    /// Byte offset of the failure.
    pub position: usize,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid selector {:?} at {}: {}",
            self.input, self.position, self.message
        )
    }
}

impl std::error::Error for SelectorError {}

impl From<SelectorError> for treejoin_core::SelectionError {
    fn from(err: SelectorError) -> Self {
        let reason = format!("at {}: {}", err.position, err.message);
        Self::InvalidSelector {
            selector: err.input,
            reason,
        }
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a selector list.
///
/// # Errors
///
/// Returns a [`SelectorError`] pointing at the first offending byte.
pub fn parse(input: &str) -> Result<SelectorList, SelectorError> {
    let mut parser = Parser { input, pos: 0 };
    let mut selectors = vec![parser.complex()?];
    loop {
        parser.skip_whitespace();
        match parser.peek() {
            None => break,
            Some(',') => {
                parser.bump();
                selectors.push(parser.complex()?);
            }
            Some(c) => return Err(parser.error(format!("unexpected {c:?}"))),
        }
    }
    Ok(SelectorList { selectors })
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    #[inline]
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skip whitespace, returning whether any was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos > start
    }

    fn error(&self, message: impl Into<String>) -> SelectorError {
        SelectorError {
            input: self.input.to_string(),
            position: self.pos,
            message: message.into(),
        }
    }

    fn ident(&mut self, what: &str) -> Result<String, SelectorError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            self.bump();
        }
        if self.pos == start {
            return Err(self.error(format!("expected {what}")));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_whitespace();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let spaced = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if spaced => Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected {c:?}"))),
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }
        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let mut compound = Compound::default();
        if self.eat('*') {
            // Universal: no tag constraint.
        } else if self
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            compound.tag = Some(self.ident("tag name")?);
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.id = Some(self.ident("id after '#'")?);
                }
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.ident("class name after '.'")?);
                }
                Some('[') => {
                    self.bump();
                    compound.attributes.push(self.attribute()?);
                }
                _ => break,
            }
        }
        if self.pos == start {
            return Err(self.error("expected selector"));
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttributeTest, SelectorError> {
        self.skip_whitespace();
        let name = self.ident("attribute name")?;
        self.skip_whitespace();
        let op = match self.peek() {
            Some(']') => None,
            Some('=') => Some(AttributeOp::Equals),
            Some('~') => Some(AttributeOp::Includes),
            Some('^') => Some(AttributeOp::Prefix),
            Some('$') => Some(AttributeOp::Suffix),
            Some('*') => Some(AttributeOp::Substring),
            Some(c) => return Err(self.error(format!("unexpected {c:?} in attribute"))),
            None => return Err(self.error("unterminated attribute selector")),
        };
        let test = match op {
            None => AttributeTest { name, op: None },
            Some(op) => {
                if op != AttributeOp::Equals {
                    self.bump();
                }
                if !self.eat('=') {
                    return Err(self.error("expected '='"));
                }
                self.skip_whitespace();
                let value = self.attribute_value()?;
                self.skip_whitespace();
                AttributeTest {
                    name,
                    op: Some((op, value)),
                }
            }
        };
        if !self.eat(']') {
            return Err(self.error("expected ']'"));
        }
        Ok(test)
    }

    fn attribute_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c == quote {
                        let value = self.input[start..self.pos].to_string();
                        self.bump();
                        return Ok(value);
                    }
                    self.bump();
                }
                Err(self.error("unterminated string"))
            }
            _ => self.ident("attribute value"),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

impl SelectorList {
    /// Whether `node` matches any selector of the list.
    pub fn matches<D>(&self, doc: &Document<D>, node: NodeId) -> bool {
        self.selectors.iter().any(|complex| complex.matches(doc, node))
    }
}

impl Complex {
    fn matches<D>(&self, doc: &Document<D>, node: NodeId) -> bool {
        self.matches_at(doc, node, self.compounds.len() - 1)
    }

    fn matches_at<D>(&self, doc: &Document<D>, node: NodeId, at: usize) -> bool {
        let Some(element) = doc.element_data(node) else {
            return false;
        };
        if !self.compounds[at].matches(element) {
            return false;
        }
        if at == 0 {
            return true;
        }
        match self.combinators[at - 1] {
            Combinator::Child => doc
                .parent_node(node)
                .is_some_and(|parent| self.matches_at(doc, parent, at - 1)),
            Combinator::Descendant => {
                let mut ancestor = doc.parent_node(node);
                while let Some(current) = ancestor {
                    if self.matches_at(doc, current, at - 1) {
                        return true;
                    }
                    ancestor = doc.parent_node(current);
                }
                false
            }
        }
    }
}

impl Compound {
    fn matches(&self, element: &ElementData) -> bool {
        if let Some(tag) = &self.tag
            && !tag.eq_ignore_ascii_case(&element.local)
        {
            return false;
        }
        if let Some(id) = &self.id
            && element.attribute(None, "id") != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|class| element.has_class(class))
            && self.attributes.iter().all(|test| test.matches(element))
    }
}

impl AttributeTest {
    fn matches(&self, element: &ElementData) -> bool {
        let Some(actual) = element.attribute(None, &self.name) else {
            return false;
        };
        let Some((op, expected)) = &self.op else {
            return true;
        };
        match op {
            AttributeOp::Equals => actual == expected,
            AttributeOp::Includes => actual.split_whitespace().any(|t| t == expected),
            AttributeOp::Prefix => !expected.is_empty() && actual.starts_with(expected.as_str()),
            AttributeOp::Suffix => !expected.is_empty() && actual.ends_with(expected.as_str()),
            AttributeOp::Substring => !expected.is_empty() && actual.contains(expected.as_str()),
        }
    }
}
