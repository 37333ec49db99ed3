//! Instruction classification.
//!
//! Turns a free-text edit instruction into an [`EditClassification`] using
//! ordered keyword tables. Rule order is significant: the first matching rule
//! wins, and some keywords only make sense when checked before others
//! ("change all headings to blue color" is a heading edit, not a style edit).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::EditError;
use crate::types::{
    Complexity, EditClassification, EditType, InsertPosition, InsertionAnchor, TargetSection,
};

/// Anchor used when an insertion names no position.
pub const DEFAULT_INSERTION_ANCHOR: &str = "hero";

const LONG_INSTRUCTION_CHARS: usize = 200;
const MEDIUM_INSTRUCTION_CHARS: usize = 100;

struct TargetRule {
    keywords: &'static [&'static str],
    target: TargetSection,
}

const TARGET_RULES: &[TargetRule] = &[
    TargetRule { keywords: &["hero", "banner"], target: TargetSection::Hero },
    TargetRule { keywords: &["header", "nav"], target: TargetSection::Header },
    TargetRule { keywords: &["footer"], target: TargetSection::Footer },
    TargetRule { keywords: &["form", "contact"], target: TargetSection::Form },
    TargetRule { keywords: &["image", "picture", "photo"], target: TargetSection::Image },
    TargetRule { keywords: &["button"], target: TargetSection::Button },
    TargetRule { keywords: &["heading", "title"], target: TargetSection::Heading },
    TargetRule { keywords: &["color", "background"], target: TargetSection::Style },
    TargetRule { keywords: &["price", "pricing"], target: TargetSection::Pricing },
    TargetRule { keywords: &["text", "paragraph"], target: TargetSection::Text },
];

const EDIT_TYPE_RULES: &[(EditType, fn(&str) -> bool)] = &[
    (EditType::StyleChange, is_style_change),
    (EditType::Addition, is_addition),
    (EditType::Removal, is_removal),
    (EditType::ContentChange, is_content_change),
    (EditType::ImageReplacement, is_image_replacement),
];

const MULTI_TARGET_WORDS: &[&str] = &["all", "every", "each"];
const STYLE_KEYWORDS: &[&str] = &["color", "background", "font", "size"];
const IMAGE_NOUNS: &[&str] = &["image", "picture", "photo"];
const IMAGE_VERBS: &[&str] = &["change", "replace", "update"];

static ANCHOR_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(after|before)\s+(?:the\s+)?([a-z][a-z0-9_-]*)")
        .expect("Failed to compile anchor pattern")
});

static SELECTOR_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)([#.][A-Za-z_][A-Za-z0-9_-]*)").expect("Failed to compile selector pattern")
});

/// Keyword-based instruction classifier.
pub struct RequestClassifier;

impl RequestClassifier {
    /// Classify an instruction against a document.
    ///
    /// Never fails: on internal failure returns [`EditClassification::fallback`],
    /// which routes the edit to the full-document prompt.
    #[must_use]
    pub fn classify(instruction: &str, document: &str) -> EditClassification {
        match Self::try_classify(instruction, document) {
            Ok(classification) => classification,
            Err(error) => {
                tracing::warn!(error = %error, "classification failed; using full-page fallback");
                EditClassification::fallback()
            }
        }
    }

    /// Classify, reporting why classification was impossible.
    pub fn try_classify(
        instruction: &str,
        document: &str,
    ) -> Result<EditClassification, EditError> {
        let text = instruction.trim().to_lowercase();
        if text.is_empty() {
            return Err(EditError::EmptyInstruction);
        }
        if document.trim().is_empty() {
            return Err(EditError::EmptyDocument);
        }

        let is_multi_target = MULTI_TARGET_WORDS.iter().any(|w| contains_word(&text, w));
        let is_insertion = is_insertion(&text);
        let insertion_anchor = is_insertion.then(|| resolve_anchor(&text));
        let target_section = infer_target(&text);
        let edit_type = EDIT_TYPE_RULES
            .iter()
            .find(|(_, matches)| matches(&text))
            .map_or(EditType::Modification, |(edit_type, _)| *edit_type);

        let complexity = if is_multi_target || is_insertion {
            Complexity::Medium
        } else {
            let length = text.chars().count();
            if length > LONG_INSTRUCTION_CHARS
                || text.contains("complete")
                || text.contains("entire")
            {
                Complexity::High
            } else if length > MEDIUM_INSTRUCTION_CHARS {
                Complexity::Medium
            } else {
                Complexity::Low
            }
        };

        let is_style_only = STYLE_KEYWORDS.iter().any(|k| text.contains(k))
            && !contains_word(&text, "add")
            && !text.contains("image");
        let is_image_only = IMAGE_NOUNS.iter().any(|n| text.contains(n))
            && IMAGE_VERBS.iter().any(|v| text.contains(v));

        let classification = EditClassification {
            target_section,
            target_type: is_multi_target.then_some(target_section),
            element_selector: element_selector(instruction),
            edit_type,
            complexity,
            is_style_only,
            is_image_only,
            is_multi_target,
            is_insertion,
            insertion_anchor,
        };
        tracing::debug!(
            target = %classification.target_section,
            edit_type = %classification.edit_type,
            multi = classification.is_multi_target,
            insertion = classification.is_insertion,
            "classified edit instruction"
        );
        Ok(classification)
    }
}

fn infer_target(text: &str) -> TargetSection {
    TARGET_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| text.contains(k)))
        .map_or(TargetSection::SpecificElement, |rule| rule.target)
}

fn is_insertion(text: &str) -> bool {
    contains_word(text, "add")
        || contains_word(text, "insert")
        || text.contains("create new")
        || text.contains("include new")
}

fn resolve_anchor(text: &str) -> InsertionAnchor {
    if let Some(caps) = ANCHOR_PHRASE.captures(text) {
        let position = if &caps[1] == "before" {
            InsertPosition::Before
        } else {
            InsertPosition::After
        };
        return InsertionAnchor::new(position, &caps[2]);
    }
    if text.contains("at the top") {
        return InsertionAnchor::new(InsertPosition::After, "header");
    }
    if text.contains("at the bottom") || text.contains("at the end") {
        return InsertionAnchor::new(InsertPosition::Before, "footer");
    }
    InsertionAnchor::new(InsertPosition::After, DEFAULT_INSERTION_ANCHOR)
}

fn element_selector(instruction: &str) -> Option<String> {
    SELECTOR_TOKEN
        .captures(instruction)
        .map(|caps| caps[1].to_string())
}

fn is_style_change(text: &str) -> bool {
    text.contains("change color") || text.contains("make it")
}

fn is_addition(text: &str) -> bool {
    contains_word(text, "add") || contains_word(text, "include")
}

fn is_removal(text: &str) -> bool {
    contains_word(text, "remove") || contains_word(text, "delete")
}

fn is_content_change(text: &str) -> bool {
    text.contains("rewrite") || text.contains("rephrase")
}

fn is_image_replacement(text: &str) -> bool {
    text.contains("image") && text.contains("change")
}

/// Whole-word match: `word` must not be flanked by alphanumerics.
fn contains_word(text: &str, word: &str) -> bool {
    text.match_indices(word).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
