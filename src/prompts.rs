use crate::models::TextLanguage;

pub const ENHANCE_SYSTEM: &str = include_str!("../data/prompts/enhance_system.txt");
pub const ENHANCE_USER: &str = include_str!("../data/prompts/enhance_user.txt");
pub const TEXT_NO_TEXT: &str = include_str!("../data/prompts/text_no_text.txt");
pub const TEXT_LANGUAGE: &str = include_str!("../data/prompts/text_language.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Instruction describing what on-image text the thumbnail may carry.
pub fn text_instruction(language: TextLanguage) -> String {
    match language {
        TextLanguage::NoText => TEXT_NO_TEXT.trim().to_string(),
        lang => render(TEXT_LANGUAGE, &[("language", lang.label())])
            .trim()
            .to_string(),
    }
}

/// User message for the prompt-enhancement request.
pub fn enhance_user_message(concept: &str, language: TextLanguage) -> String {
    render(
        ENHANCE_USER,
        &[
            ("concept", concept),
            ("text_instruction", &text_instruction(language)),
        ],
    )
}
