//! Per-site HTML templates and how a request path resolves to one.

pub mod normalize;
pub mod set;
pub mod template;

pub use normalize::compact_html;
pub use set::TemplateSet;
pub use template::{Template, TemplateError};

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
