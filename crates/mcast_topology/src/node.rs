//! Node identifiers, node roles and undirected links.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a node in a topology.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a node id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Role of a node in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Forwarding element (switch or router).
    Switch,
    /// End device that may subscribe to multicast data.
    Host,
    /// Data source that publishes to subscribers.
    Server,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Switch => write!(f, "switch"),
            Self::Host => write!(f, "host"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// An undirected link between two nodes.
///
/// Endpoints are stored in sorted order, so `Link::new(a, b) == Link::new(b, a)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Link {
    a: NodeId,
    b: NodeId,
}

impl Link {
    /// Creates a link between two nodes.
    #[must_use]
    pub fn new(x: impl Into<NodeId>, y: impl Into<NodeId>) -> Self {
        let (x, y) = (x.into(), y.into());
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// Returns the lower endpoint.
    #[must_use]
    pub const fn a(&self) -> &NodeId {
        &self.a
    }

    /// Returns the higher endpoint.
    #[must_use]
    pub const fn b(&self) -> &NodeId {
        &self.b
    }

    /// Returns true if `node` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.a == node || &self.b == node
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_is_unordered() {
        assert_eq!(Link::new("b", "a"), Link::new("a", "b"));
        assert_eq!(Link::new("b", "a").a().as_str(), "a");
    }

    #[test]
    fn link_touches_endpoints() {
        let link = Link::new("x", "y");
        assert!(link.touches(&NodeId::from("x")));
        assert!(link.touches(&NodeId::from("y")));
        assert!(!link.touches(&NodeId::from("z")));
    }

    #[test]
    fn node_kind_serializes_lowercase() {
        let json = serde_json::to_string(&NodeKind::Server).unwrap();
        assert_eq!(json, "\"server\"");
    }
}
