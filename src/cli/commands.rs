use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::app::{AppContext, ChatpressError, Result};
use crate::cli::RenderArgs;
use crate::domain::{Conversation, ShareUrl};
use crate::renderer::{PdfRenderer, ORIGINAL_FILENAME};

pub fn validate(url: &str) -> Result<()> {
    let url = ShareUrl::parse(url)?;
    println!("{}", url);
    Ok(())
}

pub async fn extract(ctx: &AppContext, url: &str, output: Option<&Path>) -> Result<()> {
    let url = ShareUrl::parse(url)?;
    let conversation = ctx.extractor.extract(&url).await?;
    let json = serde_json::to_string_pretty(&conversation)?;

    match output {
        Some(path) => {
            fs::write(path, json)?;
            println!("Wrote {} turns to {}", conversation.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub async fn render(ctx: &AppContext, args: &RenderArgs) -> Result<()> {
    let conversation = match (&args.source.url, &args.source.input) {
        (Some(url), _) => {
            let url = ShareUrl::parse(url)?;
            ctx.extractor.extract(&url).await?
        }
        (None, Some(path)) => read_conversation(path)?,
        (None, None) => {
            return Err(ChatpressError::Other(
                "Either --url or --input is required".to_string(),
            ))
        }
    };

    if conversation.is_empty() {
        warn!("Conversation has no turns; the PDF will only contain the title");
    }

    let renderer = if args.a4 {
        PdfRenderer::new(ctx.renderer.config().clone().with_a4_paper())
    } else {
        ctx.renderer.clone()
    };

    let pdf = renderer.render(&conversation, !args.no_metadata)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(ORIGINAL_FILENAME));
    fs::write(&output, &pdf)?;
    println!("Wrote {} ({} bytes)", output.display(), pdf.len());

    if args.open {
        info!("Opening {}", output.display());
        open::that(&output)?;
    }
    Ok(())
}

/// Load turns previously written by `extract`.
pub fn read_conversation(path: &Path) -> Result<Conversation> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
