//! Section location.
//!
//! Extracts the smallest complete element relevant to a classification, or
//! every matching top-level section for multi-target edits. All spans come
//! from the balanced-tag scanner in [`crate::markup`].

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup::{
    SECTION_LIKE_TAGS, SECTIONING_TAGS, count_tags, find_by_attribute, find_by_selector,
    find_element, has_tag, top_level_elements,
};
use crate::types::{EditClassification, LocatedSections, SectionContext, TargetSection};

const BUTTON_SCAN_TAGS: &[&str] = &["header", "section", "article", "aside"];
const MULTI_SCAN_TAGS: &[&str] = &["header", "footer", "section", "article", "aside"];
const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

static BUTTON_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)class\s*=\s*["'][^"']*\b(?:btn|button|cta)\b"#)
        .expect("Failed to compile button class pattern")
});

static PRICE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$\s?\d|\bpric(?:e|es|ing)\b").expect("Failed to compile price pattern")
});

/// Locates document sections for a classification.
pub struct SectionLocator;

impl SectionLocator {
    /// Locate the section(s) an edit applies to.
    ///
    /// Multi-target classifications yield every matching section; others yield
    /// at most one. `None` means the caller should send the whole document.
    #[must_use]
    pub fn locate(document: &str, classification: &EditClassification) -> Option<LocatedSections> {
        if classification.is_multi_target {
            let target = classification
                .target_type
                .unwrap_or(classification.target_section);
            let sections = Self::locate_all(document, target);
            if !sections.is_empty() {
                return Some(LocatedSections::Multi(sections));
            }
            tracing::debug!(target = %target, "no sections matched multi-target edit");
        }
        Self::locate_single(document, classification).map(LocatedSections::Single)
    }

    /// Smallest complete element for a single-target classification.
    #[must_use]
    pub fn locate_single(
        document: &str,
        classification: &EditClassification,
    ) -> Option<SectionContext> {
        let found = match classification.target_section {
            TargetSection::Header => find_element(document, "header").map(|s| (s, "header-tag")),
            TargetSection::Footer => find_element(document, "footer").map(|s| (s, "footer-tag")),
            TargetSection::Hero => locate_hero(document),
            TargetSection::Style => find_element(document, "style")
                .map(|s| (s, "style-block"))
                .or_else(|| first_section(document).map(|s| (s, "first-section-inline"))),
            TargetSection::Button => locate_button(document),
            TargetSection::Heading => locate_heading(document),
            TargetSection::Pricing => sections(document)
                .into_iter()
                .find(|span| PRICE_TEXT.is_match(&document[span.clone()]))
                .map(|s| (s, "pricing-content")),
            TargetSection::Form => find_element(document, "form")
                .map(|s| (s, "form-tag"))
                .or_else(|| {
                    find_by_attribute(document, "contact", SECTION_LIKE_TAGS)
                        .map(|s| (s, "contact-attribute"))
                }),
            TargetSection::SpecificElement => classification
                .element_selector
                .as_deref()
                .and_then(|selector| find_by_selector(document, selector))
                .map(|s| (s, "selector-attribute")),
            TargetSection::Image | TargetSection::Text | TargetSection::FullPage => None,
        };

        match found {
            Some((span, strategy)) => {
                tracing::debug!(strategy, start = span.start, end = span.end, "located section");
                Some(SectionContext::new(&document[span], strategy))
            }
            None => {
                tracing::debug!(
                    target = %classification.target_section,
                    "no section located; whole document will be sent"
                );
                None
            }
        }
    }

    /// Every top-level section (plus header and footer) that contains the
    /// target kind, in document order.
    #[must_use]
    pub fn locate_all(document: &str, target: TargetSection) -> Vec<SectionContext> {
        top_level_elements(document, MULTI_SCAN_TAGS)
            .into_iter()
            .map(|span| &document[span])
            .filter(|html| section_contains(html, target))
            .map(|html| SectionContext {
                html: html.to_string(),
                locator_strategy: "multi-target-scan".to_string(),
                target_type: Some(target),
            })
            .collect()
    }
}

/// Whether a section holds at least one element of the target kind.
#[must_use]
pub fn section_contains(html: &str, target: TargetSection) -> bool {
    match target {
        TargetSection::Button => has_button(html),
        TargetSection::Heading => heading_count(html) > 0,
        TargetSection::Pricing => PRICE_TEXT.is_match(html),
        TargetSection::Text => has_tag(html, "p"),
        TargetSection::Header => has_tag(html, "header"),
        TargetSection::Footer => has_tag(html, "footer"),
        TargetSection::Form => has_tag(html, "form") || html.to_lowercase().contains("contact"),
        TargetSection::Image => has_tag(html, "img"),
        TargetSection::Hero => html.to_lowercase().contains("hero"),
        TargetSection::Style => html.to_lowercase().contains("style"),
        TargetSection::SpecificElement | TargetSection::FullPage => true,
    }
}

fn sections(document: &str) -> Vec<Range<usize>> {
    top_level_elements(document, SECTIONING_TAGS)
}

fn first_section(document: &str) -> Option<Range<usize>> {
    sections(document).into_iter().next()
}

fn locate_hero(document: &str) -> Option<(Range<usize>, &'static str)> {
    find_by_attribute(document, "hero", SECTION_LIKE_TAGS)
        .or_else(|| find_by_attribute(document, "banner", SECTION_LIKE_TAGS))
        .map(|s| (s, "hero-attribute"))
        .or_else(|| first_section(document).map(|s| (s, "first-section")))
}

fn locate_button(document: &str) -> Option<(Range<usize>, &'static str)> {
    top_level_elements(document, BUTTON_SCAN_TAGS)
        .into_iter()
        .find(|span| has_button(&document[span.clone()]))
        .map(|s| (s, "button-section"))
}

fn locate_heading(document: &str) -> Option<(Range<usize>, &'static str)> {
    let mut best: Option<(Range<usize>, usize)> = None;
    for span in sections(document) {
        let count = heading_count(&document[span.clone()]);
        if count > 0 && best.as_ref().is_none_or(|(_, max)| count > *max) {
            best = Some((span, count));
        }
    }
    best.map(|(span, _)| (span, "heading-density"))
}

fn has_button(html: &str) -> bool {
    has_tag(html, "button") || BUTTON_CLASS.is_match(html)
}

fn heading_count(html: &str) -> usize {
    HEADING_TAGS.iter().map(|tag| count_tags(html, tag)).sum()
}
