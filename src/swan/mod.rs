//! SWAN payload model: the roles a signed event can play in an auction and
//! how the winning node is chosen.

pub mod payload;
pub mod winner;

pub use payload::{role_name, Bid, EventPayload, Failed, Offer, PayloadError, Role};
pub use winner::{FirstBidWinner, WinnerByOwid, WinnerSelector};
