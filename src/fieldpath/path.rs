//! Path element and path types.

use crate::kubernetes::ResourceKey;
use serde::{Serialize, Serializer};
use std::fmt;

/// PathElement represents one level of path navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathElement {
    /// Field name for mapping keys.
    Field(String),
    /// Position in a sequence.
    Index(usize),
    /// Sequence item addressed by the value of an identifier field,
    /// e.g. the container whose `name` is `nginx`.
    Keyed { identifier: String, value: String },
}

impl PathElement {
    pub fn field(name: impl Into<String>) -> Self {
        PathElement::Field(name.into())
    }

    pub fn index(i: usize) -> Self {
        PathElement::Index(i)
    }

    pub fn keyed(identifier: impl Into<String>, value: impl Into<String>) -> Self {
        PathElement::Keyed {
            identifier: identifier.into(),
            value: value.into(),
        }
    }

    pub fn as_field(&self) -> Option<&str> {
        match self {
            PathElement::Field(name) => Some(name),
            _ => None,
        }
    }
}

/// Path addresses a location inside one document of a comparison.
///
/// The `document` index and optional `resource` identity say which
/// document the elements apply to; they take part in equality but are
/// never rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    document: usize,
    resource: Option<ResourceKey>,
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates an empty path into the first document.
    pub fn new() -> Self {
        Path::default()
    }

    /// Creates the root path of the document at `index`.
    pub fn document(index: usize) -> Self {
        Path {
            document: index,
            ..Path::default()
        }
    }

    /// Creates a path from a list of elements.
    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Path {
            elements,
            ..Path::default()
        }
    }

    /// Returns a copy of this path tagged with a Kubernetes identity.
    pub fn with_resource(mut self, resource: ResourceKey) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn document_index(&self) -> usize {
        self.document
    }

    pub fn resource(&self) -> Option<&ResourceKey> {
        self.resource.as_ref()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the path points at the document root.
    pub fn is_root(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter()
    }

    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    pub fn pop(&mut self) -> Option<PathElement> {
        self.elements.pop()
    }

    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    pub fn as_slice(&self) -> &[PathElement] {
        &self.elements
    }

    /// Creates a new path with the given element appended.
    pub fn with(&self, element: PathElement) -> Self {
        let mut new_path = self.clone();
        new_path.push(element);
        new_path
    }

    pub fn with_field(&self, name: impl Into<String>) -> Self {
        self.with(PathElement::field(name))
    }

    pub fn with_index(&self, i: usize) -> Self {
        self.with(PathElement::Index(i))
    }

    pub fn with_keyed(&self, identifier: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(PathElement::keyed(identifier, value))
    }

    /// Renders the dotted form, e.g. `spec.containers[0].image`.
    ///
    /// Keyed elements render as their identifier value
    /// (`spec.containers.nginx.image`). The root renders as `(root)`.
    pub fn to_dot_style(&self) -> String {
        if self.elements.is_empty() {
            return "(root)".to_string();
        }
        let mut out = String::new();
        for element in &self.elements {
            match element {
                PathElement::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathElement::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
                PathElement::Keyed { value, .. } => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(value);
                }
            }
        }
        out
    }

    /// Renders the go-patch form, e.g. `/spec/containers/name=nginx/image`.
    pub fn to_go_patch_style(&self) -> String {
        if self.elements.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for element in &self.elements {
            out.push('/');
            match element {
                PathElement::Field(name) => out.push_str(name),
                PathElement::Index(i) => out.push_str(&i.to_string()),
                PathElement::Keyed { identifier, value } => {
                    out.push_str(identifier);
                    out.push('=');
                    out.push_str(value);
                }
            }
        }
        out
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Path::from_elements(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dot_style())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_dot_style())
    }
}
