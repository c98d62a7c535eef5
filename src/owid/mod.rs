//! Signed events (OWIDs) and the offer trees built from them.
//!
//! An offer is the root of a tree of signed events. Every supplier that took
//! part in the auction appended a child under the node it was called from, so
//! child order is bidding order.

pub mod encoding;
pub mod links;
pub mod tree;

pub use links::OwidLinks;
pub use tree::{Node, NodeId, OfferTree, PreOrder, SignedEvent, TreeBuilder, TreeDocument, TreeError};
