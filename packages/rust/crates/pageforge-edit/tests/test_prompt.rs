//! Tests for prompt module - shape selection and prompt content.

use pageforge_edit::{
    EditClassification, EditEngineConfig, EditError, IMAGE_PLACEHOLDER_EXAMPLE, InsertPosition,
    InsertionAnchor, PromptComposer, PromptPlan, PromptShape, RequestClassifier,
};

const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<header><nav>Menu</nav></header>
<section class="hero"><h1>Welcome</h1></section>
<section id="features"><h2>Fast</h2><p>Quick pages</p></section>
<section id="team"><h2>Team</h2><p>People</p></section>
<footer><p>Footer text</p></footer>
</body></html>"#;

fn compose(instruction: &str) -> Result<PromptPlan, EditError> {
    compose_on(PAGE, instruction)
}

fn compose_on(document: &str, instruction: &str) -> Result<PromptPlan, EditError> {
    let classification = RequestClassifier::classify(instruction, document);
    PromptComposer::default().compose(document, instruction, &classification)
}

#[test]
fn test_image_edit_is_redirected() {
    assert_eq!(compose("change the image"), Err(EditError::ImageEditRedirected));
    assert_eq!(
        compose("replace the photo in the hero"),
        Err(EditError::ImageEditRedirected)
    );
}

#[test]
fn test_insertion_prompt_asks_for_new_element_only() {
    let plan = compose("add a faq after the team").expect("plan");
    assert_eq!(plan.shape(), PromptShape::Insertion);

    let PromptPlan::Insertion { prompt, anchor } = plan else {
        panic!("expected insertion plan");
    };
    assert_eq!(anchor, InsertionAnchor::new(InsertPosition::After, "team"));
    assert!(prompt.contains("Return ONLY the markup of the new element"));
    assert!(prompt.contains(IMAGE_PLACEHOLDER_EXAMPLE));
    assert!(prompt.contains(r#"<section id="team"><h2>Team</h2><p>People</p></section>"#));
    assert!(!prompt.contains("Footer text"));
    assert!(!prompt.contains("Welcome"));
}

#[test]
fn test_style_context_is_last_section_before_footer() {
    let composer = PromptComposer::default();
    assert_eq!(
        composer.style_context(PAGE),
        r#"<section id="team"><h2>Team</h2><p>People</p></section>"#
    );
}

#[test]
fn test_style_context_truncated_to_budget() {
    let config = EditEngineConfig {
        style_context_chars: 20,
        ..EditEngineConfig::default()
    };
    let context = PromptComposer::from_config(&config).style_context(PAGE);
    assert_eq!(context.chars().count(), 20);
    assert!(context.ends_with("..."));
}

#[test]
fn test_style_context_without_sections() {
    let composer = PromptComposer::default();
    assert_eq!(
        composer.style_context("<header>H</header><footer>F</footer>"),
        "(the page has no existing sections yet)"
    );
}

#[test]
fn test_multi_target_prompt_per_section() {
    let plan = compose("make all headings larger").expect("plan");
    assert_eq!(plan.shape(), PromptShape::MultiSection);

    let PromptPlan::MultiSection { prompts } = plan else {
        panic!("expected multi-section plan");
    };
    assert_eq!(prompts.len(), 3);
    for section_prompt in &prompts {
        assert!(section_prompt.prompt.contains("ALL heading elements"));
        assert!(section_prompt.prompt.contains(&section_prompt.section.html));
        assert!(!section_prompt.prompt.contains("Footer text"));
    }
    assert!(prompts[0].section.html.contains("Welcome"));
    assert!(prompts[2].section.html.contains("Team"));
}

#[test]
fn test_multi_target_without_matches_uses_full_document() {
    let doc = "<!DOCTYPE html><html><header>H</header><footer>F</footer></html>";
    let plan = compose_on(doc, "make all headings larger").expect("plan");
    assert_eq!(plan.shape(), PromptShape::FullDocument);
}

#[test]
fn test_lightweight_section_prompt() {
    let plan = compose("make the header background blue").expect("plan");
    let PromptPlan::Section { prompt, section } = plan else {
        panic!("expected section plan");
    };
    let section = section.expect("header located");
    assert_eq!(section.html, "<header><nav>Menu</nav></header>");
    assert!(prompt.starts_with("Edit the HTML section below."));
    assert!(prompt.contains("<header><nav>Menu</nav></header>"));
    assert!(!prompt.contains("Footer text"));
}

#[test]
fn test_section_prompt_without_located_section_sends_document() {
    let plan = compose("shorten the paragraph").expect("plan");
    let PromptPlan::Section { prompt, section } = plan else {
        panic!("expected section plan");
    };
    assert!(section.is_none());
    assert!(prompt.starts_with("Edit the HTML document below."));
    assert!(prompt.contains("Footer text"));
}

#[test]
fn test_full_document_prompt() {
    let plan = compose("rewrite the entire page in a friendlier tone").expect("plan");
    assert_eq!(plan.shape(), PromptShape::FullDocument);
    let prompts = plan.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("from <!DOCTYPE html> to </html>"));
    assert!(prompts[0].contains("Footer text"));
}

#[test]
fn test_every_shape_carries_shared_rules() {
    let instructions = [
        "add a faq after the team",
        "make all headings larger",
        "make the header background blue",
        "rewrite the entire page in a friendlier tone",
    ];
    for instruction in instructions {
        let plan = compose(instruction).expect("plan");
        for prompt in plan.prompts() {
            assert!(prompt.contains("data-form-submit"), "{instruction}");
            assert!(prompt.contains("no code fences"), "{instruction}");
            assert!(prompt.contains("src and srcset"), "{instruction}");
        }
    }
}

#[test]
fn test_custom_form_marker_in_rules() {
    let config = EditEngineConfig {
        form_marker_attribute: "data-lead-form".to_string(),
        ..EditEngineConfig::default()
    };
    let classification = RequestClassifier::classify("make the header background blue", PAGE);
    let plan = PromptComposer::from_config(&config)
        .compose(PAGE, "make the header background blue", &classification)
        .expect("plan");
    assert!(plan.prompts()[0].contains("data-lead-form"));
}

#[test]
fn test_fallback_classification_uses_full_document() {
    let plan = PromptComposer::default()
        .compose(PAGE, "do something", &EditClassification::fallback())
        .expect("plan");
    assert_eq!(plan.shape(), PromptShape::FullDocument);
}
