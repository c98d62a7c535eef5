//! HTML table for audit rows.
//!
//! Cells call the browser-side `owid()` helper, which fetches signer details
//! and verifies each OWID against the signed-record service.

use std::fmt::Write;

use crate::templates::escape_html;

use super::renderer::{AuditResult, AuditRow};

const WINNER_ICON: &str = "noun_rosette_470370.svg";
const BID_ICON: &str = "noun_movie ticket_1807397.svg";
const COMPLAINT_ICON: &str = "noun_complaint_376466.svg";

pub(crate) fn table_header(html: &mut String) {
    html.push_str("<table class=\"table\">\r\n");
    html.push_str("<thead>\r\n<tr>\r\n");
    html.push_str("<th>Organization</th>\r\n");
    html.push_str("<th>Audit Result</th>\r\n");
    html.push_str("<th>\r\n</th>\r\n");
    html.push_str("<th>\r\n</th>\r\n");
    html.push_str("</tr>\r\n</thead>\r\n<tbody>\r\n");
}

pub(crate) fn table_footer(html: &mut String) {
    html.push_str("</tbody>\r\n</table>\r\n");
}

/// Render rows as a complete table.
pub fn rows_to_html(rows: &[AuditRow]) -> String {
    let mut html = String::new();
    table_header(&mut html);
    for row in rows {
        append_row(&mut html, row);
    }
    table_footer(&mut html);
    html
}

fn append_row(html: &mut String, row: &AuditRow) {
    let owid = escape_html(&row.owid);
    let root = row.root_owid.as_deref().map(escape_html).unwrap_or_default();

    html.push_str("<tr>\r\n");
    let _ = write!(
        html,
        "<td style=\"padding-left:{}em;\" class=\"text-left\">\r\n\
         <script>new owid().appendName(document.currentScript.parentNode,\"{}\")</script></td>\r\n",
        row.level, owid
    );
    let _ = write!(
        html,
        "<td style=\"text-align:center;\">\r\n\
         <script>new owid().appendAuditMark(document.currentScript.parentNode,\"{}\",\"{}\");</script>\r\n\
         <noscript>JavaScript needed to audit</noscript></td>\r\n",
        root, owid
    );

    match &row.result {
        AuditResult::Winner => {
            let _ = write!(
                html,
                "<td>\r\n<img style=\"width:32px\" src=\"{}\">\r\n</td>\r\n",
                WINNER_ICON
            );
        }
        AuditResult::Failed { host, error } => {
            let _ = write!(
                html,
                "<td style=\"color:lightpink\">\r\n{}&nbsp;{}</td>\r\n",
                escape_html(host),
                escape_html(error)
            );
        }
        AuditResult::Bid => {
            let _ = write!(
                html,
                "<td>\r\n<img style=\"width:32px\" src=\"{}\">\r\n</td>\r\n",
                BID_ICON
            );
        }
        AuditResult::None => html.push_str("<td>\r\n</td>\r\n"),
    }

    match row.complaint() {
        Some(c) => {
            let _ = write!(
                html,
                "<td style=\"text-align:center;\">\r\n\
                 <script>new owid().appendComplaintEmail(document.currentScript.parentNode,\"{}\",\"{}\", \"{}\");</script>\r\n\
                 <noscript>JavaScript needed to audit</noscript></td>\r\n",
                escape_html(c.root_owid),
                escape_html(c.owid),
                COMPLAINT_ICON
            );
        }
        None => html.push_str("<td>\r\n</td>\r\n"),
    }
    html.push_str("</tr>\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(result: AuditResult, root: Option<&str>) -> AuditRow {
        AuditRow {
            level: 2,
            owid: "node-1".into(),
            root_owid: root.map(str::to_string),
            result,
        }
    }

    #[test]
    fn test_failed_cell_shows_host_and_error() {
        let html = rows_to_html(&[row(
            AuditResult::Failed {
                host: "dsp.example".into(),
                error: "bid timed out".into(),
            },
            Some("root-1"),
        )]);
        assert!(html.contains("dsp.example&nbsp;bid timed out"));
        assert!(html.contains("padding-left:2em;"));
    }

    #[test]
    fn test_root_row_has_no_complaint() {
        let html = rows_to_html(&[row(AuditResult::None, None)]);
        assert!(!html.contains("appendComplaintEmail"));
        assert!(html.contains("appendAuditMark(document.currentScript.parentNode,\"\",\"node-1\")"));
    }

    #[test]
    fn test_child_row_has_complaint() {
        let html = rows_to_html(&[row(AuditResult::Winner, Some("root-1"))]);
        assert!(html.contains("appendComplaintEmail(document.currentScript.parentNode,\"root-1\",\"node-1\""));
        assert!(html.contains(WINNER_ICON));
    }

    #[test]
    fn test_table_wrapping() {
        let html = rows_to_html(&[]);
        assert!(html.starts_with("<table class=\"table\">"));
        assert!(html.ends_with("</tbody>\r\n</table>\r\n"));
        assert!(html.contains("<th>Organization</th>"));
    }
}
