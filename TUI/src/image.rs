//! The image picked by the user, and the drop-path parsing that feeds it.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A locally selected file plus its data-URL preview source. The bytes are
/// passed through to the server untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub data_url: String,
}

impl SelectedImage {
    pub async fn read(path: &Path) -> Result<Self, ImageError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ImageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(path, bytes))
    }

    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Self {
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let data_url = format!("data:{};base64,{}", mime, STANDARD.encode(&bytes));

        Self {
            file_name,
            mime,
            bytes,
            data_url,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Split text delivered by a terminal drop into file paths.
///
/// Terminals differ: some quote paths, some backslash-escape spaces, some
/// paste `file://` URIs, one per line. Backslash is a path separator on
/// Windows, so it only escapes on unix.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    split_drop(text, cfg!(unix))
        .into_iter()
        .map(|token| to_path(&token))
        .collect()
}

fn split_drop(text: &str, backslash_escapes: bool) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(c),
            (None, '\\') if backslash_escapes => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn to_path(token: &str) -> PathBuf {
    if token.starts_with("file://") {
        if let Some(path) = Url::parse(token).ok().and_then(|url| url.to_file_path().ok()) {
            return path;
        }
    }
    PathBuf::from(token)
}
