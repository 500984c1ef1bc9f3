//! Generation service commands.

use std::path::PathBuf;

use url::Url;

use atelier_sync::ai::{AskOptions, GenerationClient, PhotoSource, TryOnRequest};

use crate::config::CliConfig;

type Error = Box<dyn std::error::Error>;

/// Generate text from a prompt.
#[allow(clippy::print_stdout)]
pub async fn ask(
    config: &CliConfig,
    prompt: &str,
    system: Option<String>,
    max_tokens: u32,
) -> Result<(), Error> {
    let client = GenerationClient::new(config.require_ai()?);
    let text = client
        .ask(
            prompt,
            AskOptions {
                system_prompt: system,
                max_tokens,
            },
        )
        .await?;

    println!("{text}");
    Ok(())
}

/// Run a virtual try-on and write the generated image to disk.
#[allow(clippy::print_stdout)]
pub async fn try_on(
    config: &CliConfig,
    photo_file: Option<PathBuf>,
    photo_url: Option<Url>,
    product_image: Url,
    name: String,
    category: String,
    output: PathBuf,
) -> Result<(), Error> {
    let person_photo = match (photo_file, photo_url) {
        (Some(path), _) => {
            let data = tokio::fs::read(&path).await?;
            PhotoSource::Bytes {
                data,
                mime_type: guess_mime(&path).to_owned(),
            }
        }
        (None, Some(url)) => PhotoSource::Url(url),
        (None, None) => return Err("provide --photo-file or --photo-url".into()),
    };

    let client = GenerationClient::new(config.require_ai()?);
    let image = client
        .try_on(TryOnRequest {
            person_photo,
            product_photo_url: product_image,
            product_name: name,
            product_category: category,
        })
        .await?;

    tokio::fs::write(&output, &image.bytes).await?;
    println!(
        "Wrote {} ({}, {} bytes)",
        output.display(),
        image.mime_type,
        image.bytes.len()
    );
    Ok(())
}

fn guess_mime(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}
