//! SWAN demo - site registry, access-node client and offer audit trails
//!
//! A set of demo sites (publishers, marketers, CMPs) each load their settings
//! and HTML templates from a folder. CMPs call their SWAN access node to get
//! preference UI URLs. Marketers receive an offer tree of signed events with
//! every click and show an audit trail of who took part in placing the advert.

pub mod audit;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod owid;
pub mod request;
pub mod swan;
pub mod templates;
pub mod types;

pub use audit::{AuditMode, AuditRow, OfferView};
pub use config::Args;
pub use domain::{Configuration, Domain, SiteRegistry};
pub use gateway::{GatewayError, HttpTransport, Transport};
pub use owid::{NodeId, OfferTree, SignedEvent};
pub use request::PageRequest;
pub use swan::{EventPayload, FirstBidWinner, WinnerSelector};
pub use templates::TemplateSet;
pub use types::{DemoError, Result};
