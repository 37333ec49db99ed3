//! Tests for classify module - RequestClassifier rules.

use pageforge_edit::{
    Complexity, EditClassification, EditError, EditType, InsertPosition, InsertionAnchor,
    RequestClassifier, TargetSection,
};

const DOC: &str = r#"<header>H</header><section class="hero">Hi</section><footer>F</footer>"#;

fn classify(instruction: &str) -> EditClassification {
    RequestClassifier::classify(instruction, DOC)
}

#[test]
fn test_multi_target_whole_words() {
    assert!(classify("change all buttons to red").is_multi_target);
    assert!(classify("make every heading bold").is_multi_target);
    assert!(classify("give each section more padding").is_multi_target);
    assert!(classify("Make ALL links underlined").is_multi_target);
}

#[test]
fn test_multi_target_ignores_substrings() {
    assert!(!classify("improve the overall layout").is_multi_target);
    assert!(!classify("use a smaller font").is_multi_target);
    assert!(!classify("teach the reader about eachother").is_multi_target);
}

#[test]
fn test_image_only_short_circuit_flag() {
    let c = classify("change the image");
    assert!(c.is_image_only);
    assert_eq!(c.target_section, TargetSection::Image);
    assert_eq!(c.edit_type, EditType::ImageReplacement);

    assert!(classify("replace the photo in the hero").is_image_only);
    assert!(!classify("make the photo caption italic").is_image_only);
}

#[test]
fn test_insertion_default_anchor() {
    let c = classify("add a newsletter signup");
    assert!(c.is_insertion);
    assert_eq!(
        c.insertion_anchor,
        Some(InsertionAnchor::new(InsertPosition::After, "hero"))
    );
    assert_eq!(c.edit_type, EditType::Addition);
    assert_eq!(c.complexity, Complexity::Medium);
}

#[test]
fn test_insertion_explicit_anchor() {
    let c = classify("add a testimonials section after the hero");
    assert!(c.is_insertion);
    assert_eq!(
        c.insertion_anchor,
        Some(InsertionAnchor::new(InsertPosition::After, "hero"))
    );

    let c = classify("insert a faq before the footer");
    assert_eq!(
        c.insertion_anchor,
        Some(InsertionAnchor::new(InsertPosition::Before, "footer"))
    );

    let c = classify("create new announcement bar at the top");
    assert!(c.is_insertion);
    assert_eq!(
        c.insertion_anchor,
        Some(InsertionAnchor::new(InsertPosition::After, "header"))
    );
}

#[test]
fn test_padding_is_not_an_insertion() {
    let c = classify("more padding in the hero");
    assert!(!c.is_insertion);
    assert!(c.insertion_anchor.is_none());
}

#[test]
fn test_heading_checked_before_style() {
    let c = classify("change all headings to blue color");
    assert_eq!(c.target_section, TargetSection::Heading);
    assert_eq!(c.target_type, Some(TargetSection::Heading));
    assert!(c.is_multi_target);
}

#[test]
fn test_header_background_scenario() {
    let c = classify("make the header background blue");
    assert_eq!(c.target_section, TargetSection::Header);
    assert!(!c.is_multi_target);
    assert!(!c.is_insertion);
    assert!(c.is_style_only);
    assert_eq!(c.complexity, Complexity::Low);
    assert_eq!(c.target_type, None);
}

#[test]
fn test_target_rule_order() {
    assert_eq!(classify("make the banner taller").target_section, TargetSection::Hero);
    assert_eq!(classify("shrink the nav links").target_section, TargetSection::Header);
    assert_eq!(classify("update the contact details").target_section, TargetSection::Form);
    assert_eq!(classify("round the button corners").target_section, TargetSection::Button);
    assert_eq!(classify("use a darker background").target_section, TargetSection::Style);
    assert_eq!(classify("show the pricing in euros").target_section, TargetSection::Pricing);
    assert_eq!(classify("shorten the paragraph").target_section, TargetSection::Text);
    assert_eq!(classify("make it pop").target_section, TargetSection::SpecificElement);
}

#[test]
fn test_edit_types() {
    assert_eq!(classify("make it blue").edit_type, EditType::StyleChange);
    assert_eq!(classify("remove the footer links").edit_type, EditType::Removal);
    assert_eq!(classify("rewrite the hero copy").edit_type, EditType::ContentChange);
    assert_eq!(classify("tighten the spacing").edit_type, EditType::Modification);
}

#[test]
fn test_complexity_by_length_and_keywords() {
    assert_eq!(classify("tighten the spacing").complexity, Complexity::Low);
    assert_eq!(classify(&"tweak ".repeat(25)).complexity, Complexity::Medium);
    assert_eq!(classify(&"tweak ".repeat(40)).complexity, Complexity::High);
    assert_eq!(classify("rework the entire layout").complexity, Complexity::High);
}

#[test]
fn test_style_only_excludes_add_and_image() {
    assert!(classify("bigger font size in the footer").is_style_only);
    assert!(!classify("add a background color band").is_style_only);
    assert!(!classify("image background should be darker").is_style_only);
}

#[test]
fn test_style_only_add_is_whole_word() {
    assert!(classify("more padding and a darker background color").is_style_only);
    assert!(classify("padded footer with a gray background").is_style_only);
}

#[test]
fn test_element_selector() {
    let c = classify("make #signup-box wider");
    assert_eq!(c.element_selector.as_deref(), Some("#signup-box"));
    assert_eq!(c.target_section, TargetSection::SpecificElement);
}

#[test]
fn test_fallback_on_empty_input() {
    assert_eq!(classify("   "), EditClassification::fallback());
    assert_eq!(
        RequestClassifier::classify("make it blue", ""),
        EditClassification::fallback()
    );
    assert_eq!(
        RequestClassifier::try_classify("", DOC),
        Err(EditError::EmptyInstruction)
    );

    let fallback = EditClassification::fallback();
    assert_eq!(fallback.target_section, TargetSection::FullPage);
    assert_eq!(fallback.complexity, Complexity::High);
    assert!(!fallback.is_multi_target && !fallback.is_insertion);
    assert!(!fallback.is_style_only && !fallback.is_image_only);
}

#[test]
fn test_classification_serializes_camel_case() {
    let json = serde_json::to_value(classify("add a newsletter signup")).expect("serialize");
    assert_eq!(json["targetSection"], "specific-element");
    assert_eq!(json["editType"], "addition");
    assert_eq!(json["insertionAnchor"]["position"], "after");
    assert_eq!(json["insertionAnchor"]["anchor"], "hero");
}
