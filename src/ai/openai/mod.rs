pub mod client;
pub mod image;
pub mod prompt;
pub mod types;

pub use image::OpenAiImageClient;
pub use prompt::OpenAiPromptClient;
