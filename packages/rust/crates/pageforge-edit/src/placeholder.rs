//! Image placeholder tokens.
//!
//! Inserted markup carries `{{IMAGE_n:description}}` tokens instead of image
//! URLs. Resolving them is the image service's job; this module only finds them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{IMAGE_(\d+):([^}]*)\}\}").expect("Failed to compile placeholder pattern")
});

/// One `{{IMAGE_n:description}}` token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePlaceholder {
    /// `n` in the token.
    pub index: usize,
    /// Requested image description.
    pub description: String,
    /// Byte offset of the token start.
    pub start: usize,
    /// Byte offset just past the token.
    pub end: usize,
}

/// Find all placeholder tokens in document order.
#[must_use]
pub fn scan_placeholders(markup: &str) -> Vec<ImagePlaceholder> {
    PLACEHOLDER
        .captures_iter(markup)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(ImagePlaceholder {
                index: caps[1].parse().ok()?,
                description: caps[2].trim().to_string(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_placeholders() {
        let markup = r#"<img src="{{IMAGE_1: smiling team }}"><img src="{{IMAGE_2:office}}">"#;
        let found = scan_placeholders(markup);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].index, 1);
        assert_eq!(found[0].description, "smiling team");
        assert_eq!(&markup[found[1].start..found[1].end], "{{IMAGE_2:office}}");
    }

    #[test]
    fn test_ignores_malformed_tokens() {
        assert!(scan_placeholders("{{IMAGE_x:nope}} {{IMAGE_1}}").is_empty());
    }
}
