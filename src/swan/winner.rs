//! Choosing the node that explains the advert on the page.

use crate::audit::AuditError;
use crate::owid::{NodeId, OfferTree};

use super::payload::EventPayload;

/// Selects the winning node of an offer tree.
pub trait WinnerSelector: Send + Sync {
    /// Returns `Ok(None)` when no node qualifies. A payload that cannot be
    /// decoded is reported against the node that carries it.
    fn select(&self, tree: &OfferTree) -> Result<Option<NodeId>, AuditError>;
}

/// The first `Bid` reached in pre-order, children visited in insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstBidWinner;

impl WinnerSelector for FirstBidWinner {
    fn select(&self, tree: &OfferTree) -> Result<Option<NodeId>, AuditError> {
        for node in tree.pre_order() {
            let payload = EventPayload::from_value(&node.event().payload).map_err(|source| {
                AuditError::Payload {
                    owid: node.owid().to_string(),
                    source,
                }
            })?;
            if let EventPayload::Bid(_) = payload {
                return Ok(Some(node.id()));
            }
        }
        Ok(None)
    }
}

/// A winner already known by its OWID string.
#[derive(Debug, Clone)]
pub struct WinnerByOwid(pub String);

impl WinnerSelector for WinnerByOwid {
    fn select(&self, tree: &OfferTree) -> Result<Option<NodeId>, AuditError> {
        Ok(tree.find(&self.0).map(|n| n.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owid::{SignedEvent, TreeBuilder};
    use serde_json::json;

    fn tree() -> (OfferTree, NodeId, NodeId) {
        let mut b = TreeBuilder::new(SignedEvent::new("pub.example", vec![1], json!({"type": "Offer"})))
            .unwrap();
        let root = b.root();
        let empty = b.push(root, SignedEvent::new("e.example", vec![2], json!({"type": "Empty"}))).unwrap();
        let first = b.push(empty, SignedEvent::new("b1.example", vec![3], json!({"type": "Bid"}))).unwrap();
        let second = b.push(root, SignedEvent::new("b2.example", vec![4], json!({"type": "Bid"}))).unwrap();
        (b.build(), first, second)
    }

    #[test]
    fn test_first_bid_in_pre_order() {
        let (tree, first, _) = tree();
        assert_eq!(FirstBidWinner.select(&tree).unwrap(), Some(first));
    }

    #[test]
    fn test_no_bid() {
        let tree = TreeBuilder::new(SignedEvent::new("pub.example", vec![1], json!({"type": "Offer"})))
            .unwrap()
            .build();
        assert_eq!(FirstBidWinner.select(&tree).unwrap(), None);
    }

    #[test]
    fn test_undecodable_node_named_in_error() {
        let mut b = TreeBuilder::new(SignedEvent::new("pub.example", vec![1], json!({"type": "Offer"})))
            .unwrap();
        let root = b.root();
        let broken = b.push(root, SignedEvent::new("x.example", vec![7, 7], json!({"type": "Mystery"}))).unwrap();
        b.push(root, SignedEvent::new("b.example", vec![8], json!({"type": "Bid"}))).unwrap();
        let tree = b.build();

        let broken_owid = tree.node(broken).unwrap().owid().to_string();
        match FirstBidWinner.select(&tree) {
            Err(AuditError::Payload { owid, .. }) => {
                assert_eq!(owid, broken_owid);
                assert_ne!(owid, tree.root().owid());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_by_owid() {
        let (tree, _, second) = tree();
        let owid = tree.node(second).unwrap().owid().to_string();
        assert_eq!(WinnerByOwid(owid).select(&tree).unwrap(), Some(second));
        assert_eq!(WinnerByOwid("nope".into()).select(&tree).unwrap(), None);
    }
}
