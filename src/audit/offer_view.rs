//! Page model for a marketer landing page reached through an advert.

use std::fmt::Write;

use crate::owid::encoding::to_hex;
use crate::owid::{OfferTree, OwidLinks};
use crate::request::PageRequest;
use crate::swan::{EventPayload, WinnerSelector};
use crate::templates::escape_html;

use super::html::{rows_to_html, table_footer};
use super::renderer::{self, AuditError, AuditMode};

const NO_OFFER: &str = "<p>Advert not source of request.</p>";

/// Offer attached to a request, if the visitor arrived via an advert.
pub struct OfferView<'a> {
    request: &'a PageRequest,
    offer: Option<&'a OfferTree>,
    selector: &'a dyn WinnerSelector,
}

impl<'a> OfferView<'a> {
    pub fn new(
        request: &'a PageRequest,
        offer: Option<&'a OfferTree>,
        selector: &'a dyn WinnerSelector,
    ) -> Self {
        Self {
            request,
            offer,
            selector,
        }
    }

    /// True when the visitor asked for this advert to stop being shown.
    pub fn stop(&self) -> bool {
        self.request.has_form_key("stop")
    }

    /// Whole tree as JSON, wrapped for display.
    pub fn tree_as_json(&self) -> Result<String, AuditError> {
        let Some(tree) = self.offer else {
            return Ok(NO_OFFER.to_string());
        };
        let json = tree.as_json()?;
        Ok(format!(
            "<p style=\"word-break:break-all\">{}</p>",
            escape_html(&json)
        ))
    }

    /// OWID of the offer, empty when there is none.
    pub fn offer_id(&self) -> String {
        self.offer
            .map(|t| t.root().owid().to_string())
            .unwrap_or_default()
    }

    /// Verification links for the offer.
    pub fn offer_links(&self, scheme: &str) -> Option<OwidLinks> {
        self.offer.map(|t| t.root().event().links(scheme))
    }

    /// Field/value table of the unpacked offer. Decode problems are shown
    /// inline rather than failing the page.
    pub fn offer_fields_html(&self) -> String {
        let Some(tree) = self.offer else {
            return NO_OFFER.to_string();
        };
        let event = tree.root().event();
        let offer = match EventPayload::from_value(&event.payload) {
            Ok(EventPayload::Offer(offer)) => offer,
            Ok(other) => {
                return format!("<p>Root payload is {}, not Offer</p>", other.role());
            }
            Err(e) => return format!("<p>{}</p>", escape_html(&e.to_string())),
        };

        let mut html = String::new();
        html.push_str("<table class=\"table\">");
        html.push_str("<thead><tr><th>Field</th><th>Value</th></tr></thead><tbody>");
        let mut field = |name: &str, value: &str, wrap: bool| {
            let style = if wrap { " style=\"word-break:break-all\"" } else { "" };
            let _ = write!(
                html,
                "<tr><td>{}</td><td{}>{}</td></tr>",
                name,
                style,
                escape_html(value)
            );
        };
        field("Version", &event.version.to_string(), false);
        field("Domain", &event.domain, false);
        field("Signature", &to_hex(&event.signature), true);
        field("CBID", &offer.cbid, false);
        field("Allow", &offer.preferences, false);
        field("SID", &offer.sid, false);
        field("Pub. domain", &offer.pub_domain, false);
        field("Placement", &offer.placement, false);
        field("Unique", &to_hex(&offer.uuid), true);
        field("Stopped Ads.", &offer.stopped.join(","), true);
        table_footer(&mut html);
        html
    }

    /// Audit table of the winner's ancestry.
    pub fn audit_winner_html(&self) -> Result<String, AuditError> {
        self.audit_html(AuditMode::WinnerPath)
    }

    /// Audit table of every participant.
    pub fn audit_full_html(&self) -> Result<String, AuditError> {
        self.audit_html(AuditMode::FullTree)
    }

    fn audit_html(&self, mode: AuditMode) -> Result<String, AuditError> {
        let Some(tree) = self.offer else {
            return Ok(NO_OFFER.to_string());
        };
        let winner = self.selector.select(tree)?.ok_or(AuditError::NoWinner)?;
        let rows = renderer::render(tree, winner, mode)?;
        Ok(rows_to_html(&rows))
    }
}
