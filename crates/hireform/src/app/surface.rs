//! Filesystem-backed selection surface producing resume payload batches.

use std::fs;
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use thiserror::Error;

use crate::app::validation::FormRules;
use crate::domain::model::FilePayload;

const OCTET_STREAM: &str = "application/octet-stream";

/// Failure to turn a user-supplied path into payloads.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Offers files from disk, restricted to the accepted MIME types when browsing.
#[derive(Debug, Clone)]
pub struct SelectionSurface {
    rules: FormRules,
}

impl SelectionSurface {
    pub fn new(rules: FormRules) -> Self {
        Self { rules }
    }

    /// Resolve each input into payloads, preserving input order.
    ///
    /// Explicit files are taken as-is. Directories are listed one level deep and glob patterns
    /// are expanded; both only offer accepted types, sorted by path.
    pub fn pick<I, P>(&self, inputs: I) -> Result<Vec<FilePayload>, SurfaceError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut batch = Vec::new();
        for input in inputs {
            let input = input.as_ref();
            if input.is_file() {
                batch.push(payload_for(input)?);
            } else if input.is_dir() {
                batch.extend(self.browse(input, 1, None)?);
            } else if is_glob(input) {
                let pattern = input.to_string_lossy().into_owned();
                let matcher = Glob::new(&pattern)
                    .map_err(|source| SurfaceError::Pattern {
                        pattern: pattern.clone(),
                        source,
                    })?
                    .compile_matcher();
                let base = literal_base(input);
                batch.extend(self.browse(&base, usize::MAX, Some(&matcher))?);
            } else {
                return Err(SurfaceError::NotFound(input.to_path_buf()));
            }
        }
        tracing::debug!(files = batch.len(), "selection surface produced batch");
        Ok(batch)
    }

    fn browse(
        &self,
        dir: &Path,
        depth: usize,
        matcher: Option<&GlobMatcher>,
    ) -> Result<Vec<FilePayload>, SurfaceError> {
        let mut builder = WalkBuilder::new(dir);
        builder.hidden(true).git_ignore(false).max_depth(Some(depth));

        let mut paths = Vec::new();
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "selection surface walk error");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ty| ty.is_file()) {
                continue;
            }
            let path = entry.path();
            let path = path.strip_prefix("./").unwrap_or(path);
            if matcher.is_some_and(|matcher| !matcher.is_match(path)) {
                continue;
            }
            if self.rules.accepts(guess_mime(path)) {
                paths.push(path.to_path_buf());
            }
        }
        paths.sort();
        paths.iter().map(|path| payload_for(path)).collect()
    }
}

/// Build a payload for one file on disk.
pub fn payload_for(path: &Path) -> Result<FilePayload, SurfaceError> {
    let metadata = fs::metadata(path).map_err(|source| SurfaceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FilePayload {
        name,
        mime_type: guess_mime(path).to_string(),
        size: metadata.len(),
        handle: path.to_path_buf(),
    })
}

/// MIME type derived from the file extension.
pub fn guess_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("odt") => "application/vnd.oasis.opendocument.text",
        Some("rtf") => "application/rtf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        _ => OCTET_STREAM,
    }
}

fn is_glob(path: &Path) -> bool {
    path.to_string_lossy()
        .contains(['*', '?', '[', '{'])
}

/// Leading directories of a pattern up to the first component with glob syntax.
fn literal_base(pattern: &Path) -> PathBuf {
    let mut base = PathBuf::new();
    for component in pattern.components() {
        if let Component::Normal(part) = component
            && is_glob(Path::new(part))
        {
            break;
        }
        base.push(component);
    }
    if base.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        base
    }
}
