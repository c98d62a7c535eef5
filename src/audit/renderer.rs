//! Audit rows for an offer tree.
//!
//! Two walks are supported:
//! - winner path: root down to the winner, `depth(winner) + 1` rows
//! - full tree: every node in pre-order with its depth as indentation
//!
//! Every visited node has its payload decoded. A node that cannot be decoded
//! fails the whole render so that a partial trail is never shown.

use crate::owid::{Node, NodeId, OfferTree, TreeError};
use crate::swan::{EventPayload, PayloadError};

/// Which walk to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditMode {
    WinnerPath,
    FullTree,
}

/// Errors rendering an audit trail.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("winner {0} is not a node of this tree")]
    UnknownWinner(NodeId),

    #[error("no winning node in offer tree")]
    NoWinner,

    #[error("cannot serialize offer tree: {0}")]
    Tree(#[from] TreeError),

    #[error("cannot decode payload of {owid}: {source}")]
    Payload {
        owid: String,
        #[source]
        source: PayloadError,
    },
}

/// Outcome shown in the result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditResult {
    /// This node produced the advert on the page
    Winner,
    /// Supplier responded with a bid that did not win
    Bid,
    Failed { host: String, error: String },
    /// Declined, or the offer itself
    None,
}

/// One row of an audit table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRow {
    /// Indentation level; tree depth in full-tree mode, 0 on the winner path
    pub level: usize,
    /// OWID of the node
    pub owid: String,
    /// OWID of the tree root, absent when this row is the root
    pub root_owid: Option<String>,
    pub result: AuditResult,
}

/// Arguments for a complaint about one node, raised against its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Complaint<'a> {
    pub root_owid: &'a str,
    pub owid: &'a str,
}

impl AuditRow {
    /// Complaints are only possible for nodes audited against a root.
    pub fn complaint(&self) -> Option<Complaint<'_>> {
        self.root_owid.as_deref().map(|root_owid| Complaint {
            root_owid,
            owid: &self.owid,
        })
    }
}

/// Render rows for `tree` in the given mode.
pub fn render(tree: &OfferTree, winner: NodeId, mode: AuditMode) -> Result<Vec<AuditRow>, AuditError> {
    match mode {
        AuditMode::WinnerPath => winner_path(tree, winner),
        AuditMode::FullTree => full_tree(tree, winner),
    }
}

/// Root-to-winner chain. No other branch is visited.
pub fn winner_path(tree: &OfferTree, winner: NodeId) -> Result<Vec<AuditRow>, AuditError> {
    let winner_node = tree.node(winner).ok_or(AuditError::UnknownWinner(winner))?;
    winner_node
        .ancestry()
        .iter()
        .rev()
        .map(|node| row(node, winner, 0))
        .collect()
}

/// Pre-order walk of the entire tree.
pub fn full_tree(tree: &OfferTree, winner: NodeId) -> Result<Vec<AuditRow>, AuditError> {
    if tree.node(winner).is_none() {
        return Err(AuditError::UnknownWinner(winner));
    }
    tree.pre_order()
        .map(|node| row(&node, winner, node.depth()))
        .collect()
}

fn row(node: &Node<'_>, winner: NodeId, level: usize) -> Result<AuditRow, AuditError> {
    let payload = EventPayload::from_value(&node.event().payload).map_err(|source| AuditError::Payload {
        owid: node.owid().to_string(),
        source,
    })?;

    let result = if node.id() == winner {
        AuditResult::Winner
    } else {
        match payload {
            EventPayload::Failed(f) => AuditResult::Failed {
                host: f.host,
                error: f.error,
            },
            EventPayload::Bid(_) => AuditResult::Bid,
            EventPayload::Offer(_) | EventPayload::Empty => AuditResult::None,
        }
    };

    Ok(AuditRow {
        level,
        owid: node.owid().to_string(),
        root_owid: node.root_owid().map(str::to_string),
        result,
    })
}
