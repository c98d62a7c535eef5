//! Audit trail for an offer tree: which organisations took part in placing
//! an advert and what each of them returned.

pub mod html;
pub mod offer_view;
pub mod renderer;

pub use html::rows_to_html;
pub use offer_view::OfferView;
pub use renderer::{
    full_tree, render, winner_path, AuditError, AuditMode, AuditResult, AuditRow, Complaint,
};
