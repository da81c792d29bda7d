//! AI thumbnail generator: turns a short concept into an image prompt, then
//! into a set of downloadable thumbnails.
//!
//! The flow mirrors a two-step form. Step 1 asks a language model to expand
//! the concept; step 2 asks an image model for pictures matching the
//! (possibly hand-edited) prompt and the chosen aspect ratio.

pub mod ai;
pub mod app;
pub mod download;
pub mod error;
pub mod form;
pub mod models;
pub mod prompts;
pub mod view;

pub use error::{Error, Result};
