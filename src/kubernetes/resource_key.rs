//! Kubernetes resource identity.

use crate::value::Node;
use serde::Serialize;
use std::fmt;

/// ResourceKey identifies a Kubernetes object across two inputs.
///
/// Two objects are the same resource iff their keys are equal. `api_version`
/// is `None` when comparisons ignore API version migrations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// NameField tells which metadata field supplied a resource's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    Name,
    GenerateName,
}

impl NameField {
    pub fn as_str(self) -> &'static str {
        match self {
            NameField::Name => "name",
            NameField::GenerateName => "generateName",
        }
    }
}

/// Returns true if the node is a mapping with scalar `apiVersion` and `kind`.
pub fn is_kubernetes_resource(node: &Node) -> bool {
    scalar_field(node, &["apiVersion"]).is_some() && scalar_field(node, &["kind"]).is_some()
}

/// Returns which metadata field names the resource, if any.
///
/// `generateName` stands in for `name` when the final name is assigned by
/// the API server.
pub fn name_field(node: &Node) -> Option<NameField> {
    if scalar_field(node, &["metadata", "name"]).is_some() {
        Some(NameField::Name)
    } else if scalar_field(node, &["metadata", "generateName"]).is_some() {
        Some(NameField::GenerateName)
    } else {
        None
    }
}

fn scalar_field<'a>(node: &'a Node, keys: &[&str]) -> Option<&'a str> {
    node.get_in(keys).and_then(Node::as_str)
}

impl ResourceKey {
    /// Derives the key of a Kubernetes-like document.
    ///
    /// Returns `None` if the node lacks `apiVersion` or `kind`.
    pub fn from_node(node: &Node, ignore_api_version: bool) -> Option<ResourceKey> {
        let api_version = scalar_field(node, &["apiVersion"])?;
        let kind = scalar_field(node, &["kind"])?;
        let name = name_field(node)
            .and_then(|field| scalar_field(node, &["metadata", field.as_str()]))
            .map(str::to_string);

        Some(ResourceKey {
            api_version: (!ignore_api_version).then(|| api_version.to_string()),
            kind: kind.to_string(),
            namespace: scalar_field(node, &["metadata", "namespace"]).map(str::to_string),
            name,
        })
    }

    /// Returns true if two keys may describe the same object under another
    /// name: same kind, same api version (when tracked) and compatible
    /// namespaces.
    pub fn is_rename_candidate(&self, other: &ResourceKey) -> bool {
        let namespaces_compatible = match (&self.namespace, &other.namespace) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        self.kind == other.kind
            && self.api_version == other.api_version
            && namespaces_compatible
            && self.name != other.name
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(api_version) = &self.api_version {
            write!(f, "{}/", api_version)?;
        }
        f.write_str(&self.kind)?;
        if let Some(namespace) = &self.namespace {
            write!(f, "/{}", namespace)?;
        }
        write!(f, "/{}", self.name.as_deref().unwrap_or("<unnamed>"))
    }
}
