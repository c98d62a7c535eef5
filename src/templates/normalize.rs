//! Whitespace compaction applied to site templates before parsing.

/// Elements whose content is kept byte-for-byte.
const VERBATIM: [&str; 2] = ["pre", "textarea"];

/// Drop `\r`, `\n` and `\t`, and write a space only when the preceding source
/// character was not also a space. Content of `<pre>` and `<textarea>`
/// elements is left untouched.
pub fn compact_html(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while !rest.is_empty() {
        match find_verbatim(rest) {
            Some((start, end)) => {
                compact_into(&mut out, &rest[..start]);
                out.push_str(&rest[start..end]);
                rest = &rest[end..];
            }
            None => {
                compact_into(&mut out, rest);
                break;
            }
        }
    }
    out
}

fn compact_into(out: &mut String, src: &str) {
    let mut prev = None;
    for c in src.chars() {
        let keep = match c {
            '\r' | '\n' | '\t' => false,
            ' ' => prev != Some(' '),
            _ => true,
        };
        if keep {
            out.push(c);
        }
        prev = Some(c);
    }
}

/// Byte range of the first verbatim element in `src`, from its opening tag to
/// the end of its closing tag. An element that is never closed extends to the
/// end of the input.
fn find_verbatim(src: &str) -> Option<(usize, usize)> {
    let lower = src.to_ascii_lowercase();
    VERBATIM
        .iter()
        .filter_map(|name| {
            let start = find_open_tag(&lower, name)?;
            let close = format!("</{}>", name);
            let end = lower[start..]
                .find(&close)
                .map(|i| start + i + close.len())
                .unwrap_or(src.len());
            Some((start, end))
        })
        .min_by_key(|(start, _)| *start)
}

fn find_open_tag(lower: &str, name: &str) -> Option<usize> {
    let open = format!("<{}", name);
    let mut from = 0;
    while let Some(i) = lower[from..].find(&open) {
        let at = from + i;
        match lower.as_bytes().get(at + open.len()) {
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') | Some(b'/') => {
                return Some(at)
            }
            // e.g. `<preview>`
            _ => from = at + open.len(),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_control_whitespace() {
        assert_eq!(compact_html("<p>\r\n\ta</p>\n"), "<p>a</p>");
    }

    #[test]
    fn test_collapses_space_runs() {
        assert_eq!(compact_html("a    b c"), "a b c");
    }

    #[test]
    fn test_space_after_newline_is_kept() {
        // The preceding source character of the space is '\n', not a space.
        assert_eq!(compact_html("a\n b"), "a b");
    }

    #[test]
    fn test_pre_and_textarea_untouched() {
        let src = "<div>  x\n</div><pre>  a\n\tb  </pre>  <TEXTAREA rows=2>\r\n  q</TEXTAREA>\n";
        assert_eq!(
            compact_html(src),
            "<div> x</div><pre>  a\n\tb  </pre> <TEXTAREA rows=2>\r\n  q</TEXTAREA>"
        );
    }

    #[test]
    fn test_similar_tag_names_are_compacted() {
        assert_eq!(compact_html("<preview>\n  x</preview>"), "<preview> x</preview>");
    }

    #[test]
    fn test_unclosed_pre_runs_to_end() {
        assert_eq!(compact_html("a\n<pre>\n  b"), "a<pre>\n  b");
    }
}
