//! Terminal implementations of the UI collaborators.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Context;
use catalog_app::{Confirmer, Navigator, Route};
use catalog_core::ImageFile;

/// The terminal has a single view, so navigation is only logged.
pub(crate) struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "navigate");
    }
}

pub(crate) struct TerminalConfirmer {
    assume_yes: bool,
}

impl TerminalConfirmer {
    pub(crate) fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirmer for TerminalConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let prompt = prompt.to_owned();
        tokio::task::spawn_blocking(move || ask(&prompt))
            .await
            .unwrap_or(false)
    }
}

fn ask(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    is_yes(&line)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Reads an image from disk as an upload attachment.
pub(crate) async fn load_image(path: &Path) -> anyhow::Result<ImageFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_owned();
    Ok(ImageFile::new(file_name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_yes_accepts_short_and_long_forms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
        assert!(!is_yes("yep"));
    }

    #[tokio::test]
    async fn assume_yes_skips_prompt() {
        assert!(TerminalConfirmer::new(true).confirm("Delete?").await);
    }

    #[tokio::test]
    async fn load_image_reports_missing_file() {
        let err = load_image(Path::new("/nonexistent/catalog/shot.png"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read image"), "{err}");
    }
}
