//! Namespace qualification for element and attribute names.
//!
//! A name of the form `prefix:local` is qualified when `prefix` is one of the
//! well-known prefixes below. A bare name that is itself a known prefix
//! (`"svg"`) qualifies into that namespace, so creating `"svg"` yields an
//! element in the SVG namespace. The `xmlns` prefix is never stripped:
//! `"xmlns:xlink"` stays whole with the XMLNS namespace.

/// SVG namespace URI.
pub const SVG: &str = "http://www.w3.org/2000/svg";
/// XHTML namespace URI.
pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
/// XLink namespace URI.
pub const XLINK: &str = "http://www.w3.org/1999/xlink";
/// XML namespace URI.
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
/// XMLNS namespace URI.
pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";

/// Resolve a well-known prefix to its namespace URI.
#[must_use]
pub fn namespace_for_prefix(prefix: &str) -> Option<&'static str> {
    match prefix {
        "svg" => Some(SVG),
        "xhtml" => Some(XHTML),
        "xlink" => Some(XLINK),
        "xml" => Some(XML),
        "xmlns" => Some(XMLNS),
        _ => None,
    }
}

/// A possibly namespace-qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    /// Name without a namespace.
    Local(String),
    /// Name bound to a namespace URI.
    Qualified {
        /// Namespace URI.
        space: String,
        /// Local part.
        local: String,
    },
}

impl Name {
    /// Local part of the name.
    #[must_use]
    pub fn local(&self) -> &str {
        match self {
            Self::Local(local) | Self::Qualified { local, .. } => local,
        }
    }

    /// Namespace URI, if qualified.
    #[must_use]
    pub fn space(&self) -> Option<&str> {
        match self {
            Self::Local(_) => None,
            Self::Qualified { space, .. } => Some(space),
        }
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(local) => f.write_str(local),
            Self::Qualified { space, local } => write!(f, "{{{space}}}{local}"),
        }
    }
}

/// Qualify `name` against the well-known prefixes.
#[must_use]
pub fn qualify(name: &str) -> Name {
    let (prefix, local) = match name.split_once(':') {
        Some((prefix, rest)) if prefix != "xmlns" => (prefix, rest),
        Some((prefix, _)) => (prefix, name),
        None => (name, name),
    };
    match namespace_for_prefix(prefix) {
        Some(space) => Name::Qualified {
            space: space.to_string(),
            local: local.to_string(),
        },
        None => Name::Local(name.to_string()),
    }
}
