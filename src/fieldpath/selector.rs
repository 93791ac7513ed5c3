//! Parsing of user-supplied path strings and navigation by them.
//!
//! Two notations are accepted:
//! - dotted: `spec.containers[0].image`, `spec.containers.nginx.image`,
//!   `spec.containers[name=nginx]`
//! - go-patch: `/spec/containers/0/image`, `/spec/containers/name=nginx/image`

use crate::error::{Error, Result};
use crate::value::Node;
use std::fmt;

/// Identifier fields tried when a plain name selects a sequence item.
const ITEM_NAME_FIELDS: &[&str] = &["name", "key", "id"];

/// Selector is one step of a parsed path string.
///
/// Unlike [`PathElement`](super::PathElement), a selector does not know the
/// shape of the document yet: `Name` picks a mapping key, or a sequence item
/// whose `name`/`key`/`id` has that value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Name(String),
    Index(usize),
    Match { identifier: String, value: String },
}

/// PathSpec is a parsed path string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSpec {
    source: String,
    selectors: Vec<Selector>,
}

impl PathSpec {
    /// Parses a path in dotted or go-patch notation.
    ///
    /// An empty string, `/` and `(root)` all denote the document root.
    pub fn parse(input: &str) -> Result<PathSpec> {
        let trimmed = input.trim();
        let selectors = if trimmed.is_empty() || trimmed == "(root)" {
            Vec::new()
        } else if let Some(rest) = trimmed.strip_prefix('/') {
            parse_go_patch(rest)
        } else {
            parse_dotted(trimmed)?
        };
        Ok(PathSpec {
            source: input.to_string(),
            selectors,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    pub fn is_root(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Renders the canonical dotted form, matching [`Path::to_dot_style`].
    ///
    /// [`Path::to_dot_style`]: super::Path::to_dot_style
    pub fn to_dot_style(&self) -> String {
        if self.selectors.is_empty() {
            return "(root)".to_string();
        }
        let mut out = String::new();
        for selector in &self.selectors {
            match selector {
                Selector::Name(name) | Selector::Match { value: name, .. } => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                Selector::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    /// Walks `node` along this path.
    pub fn navigate<'a>(&self, node: &'a Node) -> Option<&'a Node> {
        self.selectors
            .iter()
            .try_fold(node, |current, selector| step(current, selector))
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn step<'a>(node: &'a Node, selector: &Selector) -> Option<&'a Node> {
    match (node, selector) {
        (Node::Mapping(map), Selector::Name(name)) => map.get(name.as_str()),
        (Node::Mapping(map), Selector::Index(i)) => map.get(i.to_string().as_str()),
        (Node::Sequence(items), Selector::Index(i)) => items.get(*i),
        (Node::Sequence(items), Selector::Name(name)) => ITEM_NAME_FIELDS
            .iter()
            .find_map(|field| find_item(items, field, name)),
        (Node::Sequence(items), Selector::Match { identifier, value }) => {
            find_item(items, identifier, value)
        }
        _ => None,
    }
}

fn find_item<'a>(items: &'a [Node], identifier: &str, value: &str) -> Option<&'a Node> {
    items
        .iter()
        .find(|item| item.get(identifier).and_then(Node::as_str) == Some(value))
}

fn parse_go_patch(rest: &str) -> Vec<Selector> {
    rest.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if let Ok(i) = segment.parse::<usize>() {
                Selector::Index(i)
            } else if let Some((identifier, value)) = segment.split_once('=') {
                Selector::Match {
                    identifier: identifier.to_string(),
                    value: value.to_string(),
                }
            } else {
                Selector::Name(segment.to_string())
            }
        })
        .collect()
}

fn parse_dotted(input: &str) -> Result<Vec<Selector>> {
    let mut selectors = Vec::new();
    let body = input.strip_prefix('.').unwrap_or(input);

    for part in body.split('.') {
        if part.is_empty() {
            return Err(Error::invalid_path(input, "empty path segment"));
        }
        let (name, mut brackets) = match part.find('[') {
            Some(pos) => part.split_at(pos),
            None => (part, ""),
        };
        if !name.is_empty() {
            selectors.push(Selector::Name(name.to_string()));
        }
        while !brackets.is_empty() {
            let close = brackets
                .find(']')
                .ok_or_else(|| Error::invalid_path(input, "unclosed '['"))?;
            let inner = brackets[1..close].trim();
            selectors.push(parse_bracket(input, inner)?);
            brackets = &brackets[close + 1..];
            if !brackets.is_empty() && !brackets.starts_with('[') {
                return Err(Error::invalid_path(input, "unexpected text after ']'"));
            }
        }
    }
    Ok(selectors)
}

fn parse_bracket(input: &str, inner: &str) -> Result<Selector> {
    if let Ok(i) = inner.parse::<usize>() {
        return Ok(Selector::Index(i));
    }
    match inner.split_once('=') {
        Some((identifier, value)) if !identifier.is_empty() => Ok(Selector::Match {
            identifier: identifier.trim().to_string(),
            value: value.trim().to_string(),
        }),
        _ => Err(Error::invalid_path(
            input,
            format!("expected an index or identifier=value, got [{}]", inner),
        )),
    }
}
