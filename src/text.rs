//! Whitespace normalization and persistence of the final text.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("I/O Error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, WriteError>;

/// Unicode whitespace plus the byte order mark, except NEL (U+0085).
fn is_collapsible(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Replaces every maximal run of whitespace with a single space.
///
/// Leading and trailing runs become a single space too; nothing is trimmed.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;

    for c in s.chars() {
        if is_collapsible(c) {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }

    out
}

/// `title + " " + body`, whitespace-collapsed.
pub fn normalize(title: &str, body: &str) -> String {
    collapse_whitespace(&format!("{title} {body}"))
}

/// Writes `text` to `path`, replacing whatever is there.
pub fn write_text(text: &str, path: &Path) -> Result<()> {
    std::fs::write(path, text).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), bytes = text.len(), "wrote text");
    Ok(())
}
