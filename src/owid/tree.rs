//! Arena-backed tree of signed events.
//!
//! The tree owns every node. Parent links are indices into the arena, so a
//! node can walk up to the root without holding a reference cycle.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::encoding;
use super::links::OwidLinks;

/// Deepest node a tree may hold. The nested wire form spends two JSON levels
/// per tree level, so deeper trees could not be read back by serde_json.
pub const MAX_DEPTH: usize = 48;

static NEXT_TREE: AtomicU64 = AtomicU64::new(1);

fn default_version() -> u8 {
    1
}

/// A single signed event as received from the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedEvent {
    /// Protocol version of the signed envelope
    #[serde(default = "default_version")]
    pub version: u8,
    /// Site that created and signed the event
    pub domain: String,
    /// When the event was signed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Signature bytes (base64 on the wire)
    #[serde(with = "encoding")]
    pub signature: Vec<u8>,
    /// Undecoded payload; see [`crate::swan::EventPayload`]
    #[serde(default)]
    pub payload: JsonValue,
}

impl SignedEvent {
    /// Create an event with the given domain, signature and payload.
    pub fn new(domain: impl Into<String>, signature: impl Into<Vec<u8>>, payload: JsonValue) -> Self {
        Self {
            version: default_version(),
            domain: domain.into(),
            date: None,
            signature: signature.into(),
            payload,
        }
    }

    /// Set the signing date.
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Self-identifying string for this event, derived from its signature.
    pub fn owid(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.signature)
    }

    /// Links to the verification service for this event.
    pub fn links(&self, scheme: &str) -> OwidLinks {
        OwidLinks::new(scheme, &self.domain, self.owid())
    }
}

/// Nested wire form of a tree: an event plus the events appended under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    pub owid: SignedEvent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeDocument>,
}

/// Errors building a tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("invalid tree document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("node {0} does not exist in this tree")]
    UnknownNode(NodeId),

    #[error("signed event from '{domain}' has an empty signature")]
    MissingSignature { domain: String },

    #[error("tree is deeper than {max} levels")]
    TooDeep { max: usize },
}

/// Index of a node within its [`OfferTree`].
///
/// Ids carry the stamp of the builder that issued them, so an id from one
/// tree never resolves in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    tree: u64,
    index: usize,
}

impl NodeId {
    pub fn index(self) -> usize {
        self.index
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    event: SignedEvent,
    owid: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
}

/// Incrementally builds an [`OfferTree`]. Parents must exist before their
/// children are pushed, which keeps the result acyclic.
#[derive(Debug)]
pub struct TreeBuilder {
    stamp: u64,
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    /// Start a tree with the given root event.
    pub fn new(root: SignedEvent) -> Result<Self, TreeError> {
        let data = Self::node_data(root, None, 0)?;
        Ok(Self {
            stamp: NEXT_TREE.fetch_add(1, Ordering::Relaxed),
            nodes: vec![data],
        })
    }

    /// Id of the root node.
    pub fn root(&self) -> NodeId {
        NodeId {
            tree: self.stamp,
            index: 0,
        }
    }

    /// Append `event` as the last child of `parent`.
    pub fn push(&mut self, parent: NodeId, event: SignedEvent) -> Result<NodeId, TreeError> {
        let depth = self
            .nodes
            .get(parent.index)
            .filter(|_| parent.tree == self.stamp)
            .map(|p| p.depth + 1)
            .ok_or(TreeError::UnknownNode(parent))?;
        if depth > MAX_DEPTH {
            return Err(TreeError::TooDeep { max: MAX_DEPTH });
        }
        let id = NodeId {
            tree: self.stamp,
            index: self.nodes.len(),
        };
        let data = Self::node_data(event, Some(parent), depth)?;
        self.nodes.push(data);
        self.nodes[parent.index].children.push(id);
        Ok(id)
    }

    pub fn build(self) -> OfferTree {
        OfferTree {
            stamp: self.stamp,
            nodes: self.nodes,
        }
    }

    fn node_data(
        event: SignedEvent,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Result<NodeData, TreeError> {
        if event.signature.is_empty() {
            return Err(TreeError::MissingSignature {
                domain: event.domain,
            });
        }
        Ok(NodeData {
            owid: event.owid(),
            event,
            parent,
            children: Vec::new(),
            depth,
        })
    }
}

/// An immutable tree of signed events rooted at an offer.
#[derive(Debug, Clone)]
pub struct OfferTree {
    stamp: u64,
    nodes: Vec<NodeData>,
}

impl OfferTree {
    /// Build a tree from its nested wire form.
    pub fn from_document(document: TreeDocument) -> Result<Self, TreeError> {
        let TreeDocument { owid, children } = document;
        let mut builder = TreeBuilder::new(owid)?;
        let root = builder.root();
        let mut pending: Vec<(NodeId, TreeDocument)> =
            children.into_iter().rev().map(|c| (root, c)).collect();

        // Depth-first with an explicit stack; reversing keeps insertion order.
        while let Some((parent, doc)) = pending.pop() {
            let TreeDocument { owid, children } = doc;
            let id = builder.push(parent, owid)?;
            pending.extend(children.into_iter().rev().map(|c| (id, c)));
        }

        Ok(builder.build())
    }

    /// Parse a tree from JSON text.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let document: TreeDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Nested wire form of the whole tree.
    pub fn to_document(&self) -> TreeDocument {
        self.document_at(self.root().id())
    }

    // Recursion is bounded by MAX_DEPTH.
    fn document_at(&self, id: NodeId) -> TreeDocument {
        let data = &self.nodes[id.index];
        TreeDocument {
            owid: data.event.clone(),
            children: data.children.iter().map(|c| self.document_at(*c)).collect(),
        }
    }

    /// JSON text of the whole tree.
    pub fn as_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: self.id_at(0),
        }
    }

    /// View of node `id`, or `None` when the id was issued for another tree.
    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.tree == self.stamp && id.index < self.nodes.len()).then_some(Node { tree: self, id })
    }

    fn id_at(&self, index: usize) -> NodeId {
        NodeId {
            tree: self.stamp,
            index,
        }
    }

    /// Find the node whose OWID string equals `owid`.
    pub fn find(&self, owid: &str) -> Option<Node<'_>> {
        self.nodes
            .iter()
            .position(|n| n.owid == owid)
            .map(|i| Node {
                tree: self,
                id: self.id_at(i),
            })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first pre-order walk from the root, children in insertion order.
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![self.id_at(0)],
        }
    }
}

/// Borrowed view of one node in an [`OfferTree`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    tree: &'a OfferTree,
    id: NodeId,
}

impl<'a> Node<'a> {
    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.id.index]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn event(&self) -> &'a SignedEvent {
        &self.data().event
    }

    /// OWID string of this node.
    pub fn owid(&self) -> &'a str {
        &self.data().owid
    }

    /// Number of edges between this node and the root.
    pub fn depth(&self) -> usize {
        self.data().depth
    }

    pub fn is_root(&self) -> bool {
        self.data().parent.is_none()
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| Node {
            tree: self.tree,
            id,
        })
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |id| Node { tree, id: *id })
    }

    pub fn root(&self) -> Node<'a> {
        self.tree.root()
    }

    /// OWID of the tree root, or `None` when this node is the root.
    pub fn root_owid(&self) -> Option<&'a str> {
        if self.is_root() {
            None
        } else {
            Some(self.tree.root().owid())
        }
    }

    /// This node followed by each ancestor up to and including the root.
    pub fn ancestry(&self) -> Vec<Node<'a>> {
        let mut chain = Vec::with_capacity(self.depth() + 1);
        let mut current = Some(*self);
        while let Some(node) = current {
            chain.push(node);
            current = node.parent();
        }
        chain
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

/// Iterator returned by [`OfferTree::pre_order`].
pub struct PreOrder<'a> {
    tree: &'a OfferTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let data = &self.tree.nodes[id.index];
        self.stack.extend(data.children.iter().rev().copied());
        Some(Node {
            tree: self.tree,
            id,
        })
    }
}
