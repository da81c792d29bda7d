use anyhow::Result;
use clap::Parser;
use thumbnail_generator::app::{App, RunRequest};
use thumbnail_generator::models::{AspectRatio, Config, TextLanguage};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "thumbnail-generator")]
#[command(about = "Turn an idea into AI-generated YouTube thumbnails")]
struct CliArgs {
    /// The video idea to expand into an image prompt.
    #[arg(short, long, default_value = "")]
    concept: String,

    /// Language of any text drawn on the thumbnail ("No Text" for none).
    #[arg(short, long, default_value_t = TextLanguage::default())]
    language: TextLanguage,

    /// Use this prompt directly instead of generating one from the concept.
    #[arg(short, long)]
    prompt: Option<String>,

    /// Output shape: 16:9 (video) or 9:16 (shorts).
    #[arg(short, long, default_value_t = AspectRatio::default())]
    aspect_ratio: AspectRatio,

    /// Directory for downloaded images [default: output/<date>_<uuid>].
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<std::path::PathBuf>,

    /// Skip saving images to disk.
    #[arg(long)]
    no_download: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thumbnail_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    info!("Starting thumbnail-generator");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let output_dir = args.output_dir.unwrap_or_else(App::default_output_dir);
    let app = App::new(&config, output_dir)?;

    let request = RunRequest {
        concept: args.concept,
        text_language: args.language,
        prompt: args.prompt,
        aspect_ratio: args.aspect_ratio,
        download: !args.no_download,
    };

    let result = app.run(&request).await;
    println!("{}", app.render());

    match result {
        Ok(saved) => {
            if !saved.is_empty() {
                info!(
                    "Saved {} thumbnails to {}",
                    saved.len(),
                    app.output_dir().display()
                );
            }
            Ok(())
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;
    use thumbnail_generator::models::{AspectRatio, TextLanguage};

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::try_parse_from(["thumbnail-generator", "--concept", "idea"]).unwrap();
        assert_eq!(args.concept, "idea");
        assert_eq!(args.language, TextLanguage::Vietnamese);
        assert_eq!(args.aspect_ratio, AspectRatio::Wide);
        assert!(args.prompt.is_none());
        assert!(!args.no_download);
    }

    #[test]
    fn test_cli_parses_language_and_ratio() {
        let args = CliArgs::try_parse_from([
            "thumbnail-generator",
            "-l",
            "no text",
            "-a",
            "9:16",
            "--no-download",
        ])
        .unwrap();
        assert_eq!(args.language, TextLanguage::NoText);
        assert_eq!(args.aspect_ratio, AspectRatio::Tall);
        assert!(args.no_download);
    }

    #[test]
    fn test_cli_rejects_unknown_ratio() {
        let err = CliArgs::try_parse_from(["thumbnail-generator", "-a", "4:3"]).unwrap_err();
        assert!(err.to_string().contains("4:3"));
    }
}
