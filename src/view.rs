//! Renders [`FormState`] for the terminal front end.
//!
//! The view model ([`ResultsPanel`], [`ImageCard`], [`Button`]) is derived
//! purely from state, so the layout rules can be tested without a terminal.

use crate::download::download_name;
use crate::form::FormState;
use crate::models::{AspectRatio, ImageLocator, TextLanguage};

pub const TITLE: &str = "AI YouTube Thumbnail Generator";
pub const TAGLINE: &str = "Turn your ideas into viral thumbnails in seconds.";
const LOADING_TEXT: &str = "AI is crafting your masterpieces...";
const PLACEHOLDER_TEXT: &str = "Your generated thumbnails will appear here.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub enabled: bool,
}

impl Button {
    pub fn enhance(state: &FormState) -> Self {
        Self {
            label: if state.is_enhancing {
                "Optimizing..."
            } else {
                "Create Prompt"
            },
            enabled: state.can_enhance(),
        }
    }

    pub fn generate(state: &FormState) -> Self {
        Self {
            label: if state.is_generating {
                "Generating..."
            } else {
                "Generate Images"
            },
            enabled: state.can_generate(),
        }
    }
}

/// Display shape of a result card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLayout {
    Video,
    Shorts,
}

impl ImageLayout {
    pub fn css_class(&self) -> &'static str {
        match self {
            ImageLayout::Video => "aspect-video",
            ImageLayout::Shorts => "aspect-[9/16]",
        }
    }
}

impl From<AspectRatio> for ImageLayout {
    fn from(ratio: AspectRatio) -> Self {
        match ratio {
            AspectRatio::Wide => ImageLayout::Video,
            AspectRatio::Tall => ImageLayout::Shorts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCard {
    /// 1-based position in the gallery.
    pub index: usize,
    pub src: ImageLocator,
    pub alt: String,
    pub download_name: String,
    pub layout: ImageLayout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsPanel {
    Loading,
    Gallery(Vec<ImageCard>),
    Placeholder,
}

impl ResultsPanel {
    pub fn from_state(state: &FormState) -> Self {
        if state.is_generating {
            return ResultsPanel::Loading;
        }

        match &state.generated_images {
            Some(images) => {
                // Layout follows the current selection, not the ratio the
                // images were generated with.
                let layout = ImageLayout::from(state.aspect_ratio);
                let cards = images
                    .iter()
                    .enumerate()
                    .map(|(i, src)| ImageCard {
                        index: i + 1,
                        src: src.clone(),
                        alt: format!("Generated thumbnail {}", i + 1),
                        download_name: download_name(i + 1),
                        layout,
                    })
                    .collect();
                ResultsPanel::Gallery(cards)
            }
            None => ResultsPanel::Placeholder,
        }
    }
}

fn button_line(button: &Button) -> String {
    let marker = if button.enabled { " " } else { "x" };
    format!("  [{}] {}", marker, button.label)
}

/// Plain-text rendering of the whole page.
pub fn render(state: &FormState) -> String {
    let mut lines: Vec<String> = vec![TITLE.to_string(), TAGLINE.to_string(), String::new()];

    lines.push("STEP 1  Describe Your Idea".to_string());
    lines.push(format!(
        "  Content / Concept: {}",
        display_or_dash(&state.concept)
    ));
    let languages: Vec<String> = TextLanguage::ALL
        .iter()
        .map(|lang| {
            if *lang == state.text_language {
                format!("({})", lang)
            } else {
                lang.to_string()
            }
        })
        .collect();
    lines.push(format!("  Text Language in Image: {}", languages.join(" | ")));
    lines.push(button_line(&Button::enhance(state)));
    lines.push(String::new());

    lines.push("STEP 2  Generate Thumbnail".to_string());
    lines.push(format!("  Prompt: {}", display_or_dash(&state.prompt)));
    let ratios: Vec<String> = [AspectRatio::Wide, AspectRatio::Tall]
        .iter()
        .map(|ratio| {
            if *ratio == state.aspect_ratio {
                format!("({})", ratio.label())
            } else {
                ratio.label().to_string()
            }
        })
        .collect();
    lines.push(format!("  Aspect Ratio: {}", ratios.join(" | ")));
    lines.push(button_line(&Button::generate(state)));
    lines.push(String::new());

    if let Some(error) = &state.error {
        lines.push(format!("! {}", error));
        lines.push(String::new());
    }

    match ResultsPanel::from_state(state) {
        ResultsPanel::Loading => lines.push(LOADING_TEXT.to_string()),
        ResultsPanel::Placeholder => lines.push(PLACEHOLDER_TEXT.to_string()),
        ResultsPanel::Gallery(cards) => {
            for card in cards {
                lines.push(format!(
                    "  #{} {} [{}] -> {}",
                    card.index,
                    card.alt,
                    card.layout.css_class(),
                    card.download_name
                ));
                lines.push(format!("     {}", card.src));
            }
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
