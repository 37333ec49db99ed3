//! Insertion anchor resolution.
//!
//! Finds where new content should be spliced relative to a named section.
//! An anchor that cannot be found yields `None`; callers reject the insertion
//! instead of guessing a location.

use std::ops::Range;

use crate::markup::{
    SECTION_LIKE_TAGS, SECTIONING_TAGS, find_by_attribute, find_by_id_or_class, find_element,
};
use crate::types::InsertPosition;

enum AnchorMatcher {
    /// Section-like element with an attribute value containing any marker.
    Attribute(&'static [&'static str]),
    /// First element with this tag name.
    Tag(&'static str),
}

const NAMED_ANCHORS: &[(&[&str], AnchorMatcher)] = &[
    (&["hero", "banner"], AnchorMatcher::Attribute(&["hero", "banner"])),
    (&["features", "feature"], AnchorMatcher::Attribute(&["feature"])),
    (&["pricing", "prices"], AnchorMatcher::Attribute(&["pricing", "price"])),
    (&["testimonials", "testimonial"], AnchorMatcher::Attribute(&["testimonial"])),
    (&["footer"], AnchorMatcher::Tag("footer")),
    (&["header"], AnchorMatcher::Tag("header")),
];

/// A document split at an insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint<'a> {
    /// Document text before the split.
    pub before: &'a str,
    /// Document text after the split.
    pub after: &'a str,
}

impl InsertionPoint<'_> {
    /// Splice new markup into the split, each part on its own line.
    #[must_use]
    pub fn splice(&self, markup: &str) -> String {
        let mut out = String::with_capacity(self.before.len() + markup.len() + self.after.len() + 2);
        out.push_str(self.before);
        out.push('\n');
        out.push_str(markup.trim());
        out.push('\n');
        out.push_str(self.after);
        out
    }
}

/// Resolves insertion anchors to split points.
pub struct AnchorResolver;

impl AnchorResolver {
    /// Split the document next to the named anchor.
    ///
    /// `After` splits right after the anchor's closing tag, `Before` right
    /// before its opening tag.
    #[must_use]
    pub fn find_insertion_point<'a>(
        document: &'a str,
        anchor: &str,
        position: InsertPosition,
    ) -> Option<InsertionPoint<'a>> {
        let Some(span) = Self::locate_anchor(document, anchor) else {
            tracing::warn!(anchor, %position, "insertion anchor not found");
            return None;
        };
        let split = match position {
            InsertPosition::Before => span.start,
            InsertPosition::After => span.end,
        };
        let (before, after) = document.split_at(split);
        Some(InsertionPoint { before, after })
    }

    /// Span of the anchor element.
    ///
    /// Named anchors use dedicated matchers; any other name is matched as an
    /// `id`/`class` fragment on sectioning elements.
    #[must_use]
    pub fn locate_anchor(document: &str, anchor: &str) -> Option<Range<usize>> {
        let name = anchor.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        let named = NAMED_ANCHORS
            .iter()
            .find(|(aliases, _)| aliases.contains(&name.as_str()))
            .map(|(_, matcher)| matcher);

        match named {
            Some(AnchorMatcher::Attribute(markers)) => markers
                .iter()
                .find_map(|marker| find_by_attribute(document, marker, SECTION_LIKE_TAGS)),
            Some(AnchorMatcher::Tag(tag)) => find_element(document, tag),
            None => find_by_id_or_class(document, &name, SECTIONING_TAGS)
                .or_else(|| find_by_id_or_class(document, &name, SECTION_LIKE_TAGS)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<header>H</header><section class="hero">Hi</section><section id="faq">Q</section><footer>F</footer>"#;

    #[test]
    fn test_before_footer() {
        let point = AnchorResolver::find_insertion_point(DOC, "footer", InsertPosition::Before)
            .expect("footer anchor");
        assert!(point.after.starts_with("<footer>"));
    }

    #[test]
    fn test_generic_id_anchor() {
        let point = AnchorResolver::find_insertion_point(DOC, "faq", InsertPosition::After)
            .expect("faq anchor");
        assert!(point.before.ends_with(r#"<section id="faq">Q</section>"#));
    }

    #[test]
    fn test_unknown_anchor_is_none() {
        assert!(AnchorResolver::find_insertion_point(DOC, "team", InsertPosition::After).is_none());
    }

    #[test]
    fn test_splice_keeps_both_halves() {
        let point = InsertionPoint {
            before: "<a></a>",
            after: "<b></b>",
        };
        assert_eq!(point.splice("  <c></c>\n"), "<a></a>\n<c></c>\n<b></b>");
    }
}
