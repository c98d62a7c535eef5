//! A single parsed page template.
//!
//! The language is literal text plus `{{ ... }}` tags:
//!
//! | Tag               | Output                                       |
//! |-------------------|----------------------------------------------|
//! | `{{ path }}`      | HTML-escaped value at a dotted path           |
//! | `{{ raw path }}`  | the same value, unescaped                     |
//! | `{{ role path }}` | role of the payload at the path, or empty     |
//!
//! Paths are dotted field names, optionally with a leading dot. A lone `.`
//! refers to the whole render context. Missing values render as nothing.

use serde_json::Value as JsonValue;

use crate::swan::role_name;

use super::escape_html;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Errors parsing a template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("{template}: unterminated tag at byte {offset}")]
    Unterminated { template: String, offset: usize },

    #[error("{template}: empty tag at byte {offset}")]
    EmptyTag { template: String, offset: usize },

    #[error("{template}: unknown function '{name}'")]
    UnknownFunction { template: String, name: String },

    #[error("{template}: '{tag}' expects {expected} argument(s)")]
    Arity {
        template: String,
        tag: String,
        expected: usize,
    },

    #[error("cannot read template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Escaped,
    Raw,
    Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Value { path: Vec<String>, output: Output },
}

/// A named, parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(name: impl Into<String>, src: &str) -> Result<Self, TemplateError> {
        let name = name.into();
        let mut segments = Vec::new();
        let mut offset = 0;

        while let Some(i) = src[offset..].find(OPEN) {
            let open = offset + i;
            if open > offset {
                segments.push(Segment::Text(src[offset..open].to_string()));
            }
            let body_start = open + OPEN.len();
            let close = src[body_start..]
                .find(CLOSE)
                .map(|j| body_start + j)
                .ok_or_else(|| TemplateError::Unterminated {
                    template: name.clone(),
                    offset: open,
                })?;
            segments.push(parse_tag(&name, &src[body_start..close], open)?);
            offset = close + CLOSE.len();
        }
        if offset < src.len() {
            segments.push(Segment::Text(src[offset..].to_string()));
        }

        Ok(Self { name, segments })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render against `context`.
    pub fn render(&self, context: &JsonValue) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Value { path, output } => {
                    let value = lookup(context, path);
                    match output {
                        Output::Escaped => out.push_str(&escape_html(&display(value))),
                        Output::Raw => out.push_str(&display(value)),
                        Output::Role => out.push_str(value.map(role_name).unwrap_or("")),
                    }
                }
            }
        }
        out
    }
}

fn parse_tag(template: &str, body: &str, offset: usize) -> Result<Segment, TemplateError> {
    let words: Vec<&str> = body.split_whitespace().collect();
    let (output, args) = match words.as_slice() {
        [] => {
            return Err(TemplateError::EmptyTag {
                template: template.to_string(),
                offset,
            })
        }
        [first, rest @ ..] => match function(first) {
            Some(output) => (output, rest),
            None if rest.is_empty() => (Output::Escaped, &words[..]),
            None => {
                return Err(TemplateError::UnknownFunction {
                    template: template.to_string(),
                    name: first.to_string(),
                })
            }
        },
    };

    match args {
        [path] => Ok(Segment::Value {
            path: split_path(path),
            output,
        }),
        _ => Err(TemplateError::Arity {
            template: template.to_string(),
            tag: body.trim().to_string(),
            expected: 1,
        }),
    }
}

fn function(word: &str) -> Option<Output> {
    match word {
        "raw" => Some(Output::Raw),
        "role" => Some(Output::Role),
        _ => None,
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn lookup<'a>(context: &'a JsonValue, path: &[String]) -> Option<&'a JsonValue> {
    path.iter().try_fold(context, |value, key| value.get(key.as_str()))
}

fn display(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
