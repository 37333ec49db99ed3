//! Balanced-tag scanning over raw markup.
//!
//! There is no DOM here. An element is located by finding its opening tag and
//! then tracking the nesting depth of same-named tags until the depth returns
//! to zero. Every locator, anchor and merge strategy builds on [`element_span_at`],
//! which is what keeps extracted sections complete rather than fragments.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Elements enumerated as page sections.
pub const SECTIONING_TAGS: &[&str] = &["section", "article", "aside"];

/// Elements that may carry a section marker such as `class="hero"`.
pub const SECTION_LIKE_TAGS: &[&str] = &["section", "div", "article", "aside", "main"];

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

static OPEN_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<([A-Za-z][A-Za-z0-9-]*)\b([^>]*)>").expect("Failed to compile open tag pattern")
});

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][A-Za-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("Failed to compile attribute pattern")
});

/// Opening tag of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningTag<'a> {
    /// Lower-cased tag name.
    pub name: String,
    /// Raw attribute text between the name and `>`.
    pub attributes: &'a str,
    /// Byte span of the tag itself.
    pub span: Range<usize>,
}

impl OpeningTag<'_> {
    fn is_self_closing(&self) -> bool {
        self.attributes.trim_end().ends_with('/') || VOID_TAGS.contains(&self.name.as_str())
    }
}

/// Parse the opening tag that starts exactly at `start`.
#[must_use]
pub fn opening_tag_at(document: &str, start: usize) -> Option<OpeningTag<'_>> {
    let caps = OPEN_TAG.captures_at(document, start)?;
    let whole = caps.get(0)?;
    if whole.start() != start {
        return None;
    }
    Some(OpeningTag {
        name: caps.get(1)?.as_str().to_ascii_lowercase(),
        attributes: caps.get(2).map_or("", |m| m.as_str()),
        span: whole.range(),
    })
}

/// Parse the root opening tag of a fragment (leading whitespace allowed).
#[must_use]
pub fn root_opening_tag(fragment: &str) -> Option<OpeningTag<'_>> {
    let offset = fragment.len() - fragment.trim_start().len();
    opening_tag_at(fragment, offset)
}

/// Span of the complete element whose opening tag starts at `start`.
///
/// Returns `None` when no opening tag starts there or its closing tag is missing.
#[must_use]
pub fn element_span_at(document: &str, start: usize) -> Option<Range<usize>> {
    let open = opening_tag_at(document, start)?;
    if open.is_self_closing() {
        return Some(open.span);
    }

    let nesting = same_name_tags(&open.name)?;
    let mut depth = 1usize;
    for caps in nesting.captures_iter(&document[open.span.end..]) {
        let whole = caps.get(0)?;
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        if closing {
            depth -= 1;
            if depth == 0 {
                return Some(start..open.span.end + whole.end());
            }
        } else if !whole.as_str().ends_with("/>") {
            depth += 1;
        }
    }
    None
}

fn same_name_tags(name: &str) -> Option<Regex> {
    let pattern = format!(r"<(/?){}\b[^>]*>", regex::escape(name));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()
}

/// First complete element with the given tag name.
#[must_use]
pub fn find_element(document: &str, tag: &str) -> Option<Range<usize>> {
    let tag = tag.to_ascii_lowercase();
    OPEN_TAG
        .captures_iter(document)
        .filter(|caps| caps[1].eq_ignore_ascii_case(&tag))
        .filter_map(|caps| caps.get(0))
        .find_map(|m| element_span_at(document, m.start()))
}

/// First complete element whose opening tag satisfies `predicate`.
///
/// `tags` restricts the candidate tag names; an empty slice accepts any tag.
pub fn find_element_where<F>(document: &str, tags: &[&str], predicate: F) -> Option<Range<usize>>
where
    F: Fn(&OpeningTag<'_>) -> bool,
{
    OPEN_TAG
        .captures_iter(document)
        .filter_map(|caps| caps.get(0))
        .filter_map(|m| opening_tag_at(document, m.start()))
        .filter(|tag| tags.is_empty() || tags.contains(&tag.name.as_str()))
        .filter(|tag| predicate(tag))
        .find_map(|tag| element_span_at(document, tag.span.start))
}

/// First complete element with an attribute value containing `pattern`
/// (case-insensitive).
#[must_use]
pub fn find_by_attribute(document: &str, pattern: &str, tags: &[&str]) -> Option<Range<usize>> {
    let needle = pattern.to_lowercase();
    find_element_where(document, tags, |tag| {
        attributes(tag.attributes).any(|(_, value)| value.to_lowercase().contains(&needle))
    })
}

/// First complete element whose `id` or `class` value contains `pattern`.
#[must_use]
pub fn find_by_id_or_class(document: &str, pattern: &str, tags: &[&str]) -> Option<Range<usize>> {
    let needle = pattern.to_lowercase();
    find_element_where(document, tags, |tag| {
        attributes(tag.attributes).any(|(name, value)| {
            (name.eq_ignore_ascii_case("id") || name.eq_ignore_ascii_case("class"))
                && value.to_lowercase().contains(&needle)
        })
    })
}

/// First complete element matched by a `#id` or `.class` selector.
///
/// `#x` needs an `id` equal to `x`; `.x` needs `x` as a whole `class` token.
/// Void elements and anything inside `<head>` never match.
#[must_use]
pub fn find_by_selector(document: &str, selector: &str) -> Option<Range<usize>> {
    let selector = selector.trim();
    let (attribute, name) = if let Some(id) = selector.strip_prefix('#') {
        ("id", id)
    } else if let Some(class) = selector.strip_prefix('.') {
        ("class", class)
    } else {
        return None;
    };
    if name.is_empty() {
        return None;
    }
    let head = find_element(document, "head");
    find_element_where(document, &[], |tag| {
        if tag.is_self_closing() || head.as_ref().is_some_and(|h| h.contains(&tag.span.start)) {
            return false;
        }
        attribute_value(tag.attributes, attribute).is_some_and(|value| {
            if attribute == "id" {
                value.trim().eq_ignore_ascii_case(name)
            } else {
                value.split_whitespace().any(|token| token.eq_ignore_ascii_case(name))
            }
        })
    })
}

/// Complete elements with the given tag names that are not nested inside an
/// earlier match, in document order.
#[must_use]
pub fn top_level_elements(document: &str, tags: &[&str]) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();
    for m in OPEN_TAG.find_iter(document) {
        if spans.last().is_some_and(|last| m.start() < last.end) {
            continue;
        }
        let Some(tag) = opening_tag_at(document, m.start()) else {
            continue;
        };
        if !tags.contains(&tag.name.as_str()) {
            continue;
        }
        if let Some(span) = element_span_at(document, m.start()) {
            spans.push(span);
        }
    }
    spans
}

/// Iterate `(name, value)` pairs of an attribute string.
pub fn attributes(raw: &str) -> impl Iterator<Item = (&str, &str)> {
    ATTRIBUTE.captures_iter(raw).filter_map(|caps| {
        let name = caps.get(1)?.as_str();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        Some((name, value))
    })
}

/// Value of the named attribute.
#[must_use]
pub fn attribute_value<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    attributes(raw)
        .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

/// Count opening tags with the given name (case-insensitive).
#[must_use]
pub fn count_tags(document: &str, tag: &str) -> usize {
    OPEN_TAG
        .captures_iter(document)
        .filter(|caps| caps[1].eq_ignore_ascii_case(tag))
        .count()
}

/// Whether at least one opening tag with the given name exists.
#[must_use]
pub fn has_tag(document: &str, tag: &str) -> bool {
    OPEN_TAG
        .captures_iter(document)
        .any(|caps| caps[1].eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_span_skips_nested_same_tag() {
        let doc = r#"<div class="outer"><div>inner</div><p>x</p></div><div>next</div>"#;
        let span = element_span_at(doc, 0).expect("outer div");
        assert_eq!(&doc[span], r#"<div class="outer"><div>inner</div><p>x</p></div>"#);
    }

    #[test]
    fn test_unbalanced_returns_none() {
        let doc = "<section><p>open";
        assert!(element_span_at(doc, 0).is_none());
    }

    #[test]
    fn test_void_element_is_its_own_span() {
        let doc = r#"<img src="a.png"><p>x</p>"#;
        let span = element_span_at(doc, 0).expect("img");
        assert_eq!(&doc[span], r#"<img src="a.png">"#);
    }

    #[test]
    fn test_uppercase_tags() {
        let doc = "<SECTION><Section>a</SECTION></section>";
        let span = find_element(doc, "section").expect("section");
        assert_eq!(span, 0..doc.len());
    }

    #[test]
    fn test_find_by_attribute() {
        let doc = r#"<section id="intro">a</section><section class="Hero-Main">b</section>"#;
        let span = find_by_attribute(doc, "hero", SECTION_LIKE_TAGS).expect("hero");
        assert_eq!(&doc[span], r#"<section class="Hero-Main">b</section>"#);
    }

    #[test]
    fn test_selector_requires_exact_id_and_class_token() {
        let doc = r#"<div id="main-nav">a</div><div class="ctas">b</div><div id="main" class="x cta">c</div>"#;
        let by_id = find_by_selector(doc, "#main").expect("id");
        assert_eq!(&doc[by_id.clone()], r#"<div id="main" class="x cta">c</div>"#);
        assert_eq!(find_by_selector(doc, ".cta"), Some(by_id));
        assert!(find_by_selector(doc, "main").is_none());
        assert!(find_by_selector(doc, "#").is_none());
    }

    #[test]
    fn test_top_level_skips_nested() {
        let doc = "<section>a<section>b</section></section><article>c</article>";
        let spans = top_level_elements(doc, SECTIONING_TAGS);
        assert_eq!(spans.len(), 2);
        assert_eq!(&doc[spans[1].clone()], "<article>c</article>");
    }

    #[test]
    fn test_attribute_value() {
        let attrs = r#" id="pricing" class='a b' data-x=1"#;
        assert_eq!(attribute_value(attrs, "id"), Some("pricing"));
        assert_eq!(attribute_value(attrs, "class"), Some("a b"));
        assert_eq!(attribute_value(attrs, "data-x"), Some("1"));
        assert_eq!(attribute_value(attrs, "style"), None);
    }

    #[test]
    fn test_count_tags_ignores_prefix_names() {
        let doc = "<img><img/><image><script></script>";
        assert_eq!(count_tags(doc, "img"), 2);
        assert_eq!(count_tags(doc, "script"), 1);
    }
}
