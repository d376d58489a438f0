/*
 * interpolate.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Scanning of `{expr}` spans in strings.
//!
//! - `{expr}` is an expression span
//! - `{{text}}` is literal and comes out as `{text}`
//! - an unclosed `{`, or `{}`, is literal text
//!
//! Spans do not nest: the first `}` closes a span.

use once_cell::sync::Lazy;
use regex::Regex;

static SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{([^{}]*)\}|\{([^{}]+)\}").unwrap());

/// A piece of a scanned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Expression(&'a str),
}

/// Split `text` into literal and expression segments, in order.
///
/// Adjacent literal pieces are not coalesced.
pub fn scan(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for captures in SPAN.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Literal(&text[last..whole.start()]));
        }
        match (captures.get(1), captures.get(2)) {
            // `{{text}` keeps one brace; the closing `}}` loses its first
            // brace here and keeps its second in the following literal.
            (Some(_), _) => {
                segments.push(Segment::Literal(&text[whole.start() + 1..whole.end() - 1]));
            }
            (None, Some(source)) => segments.push(Segment::Expression(source.as_str())),
            (None, None) => {}
        }
        last = whole.end();
    }
    if last < text.len() {
        segments.push(Segment::Literal(&text[last..]));
    }
    segments
}

/// The source of the single span when `text` is exactly one `{expr}`.
pub fn sole_expression(text: &str) -> Option<&str> {
    match scan(text).as_slice() {
        [Segment::Expression(source)] => Some(*source),
        _ => None,
    }
}

/// Rebuild the string, rendering each expression span with `render`.
pub fn interpolate<E>(
    text: &str,
    mut render: impl FnMut(&str) -> Result<String, E>,
) -> Result<String, E> {
    let mut out = String::with_capacity(text.len());
    for segment in scan(text) {
        match segment {
            Segment::Literal(literal) => out.push_str(literal),
            Segment::Expression(source) => out.push_str(&render(source)?),
        }
    }
    Ok(out)
}
