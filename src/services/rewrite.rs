use crate::domain::models::{FormatKind, OutcomeStatus, PropagationOutcome};
use regex::{Captures, Regex};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(thiserror::Error, Debug)]
pub enum RewriteError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid pattern for {0}: {1}")]
    Pattern(String, regex::Error),
}

fn scalar_line(field: &str) -> Result<Regex, RewriteError> {
    let raw = format!(r"(?m)^{}:[ \t]*([^\r\n]*)", regex::escape(field));
    Regex::new(&raw).map_err(|e| RewriteError::Pattern(field.to_string(), e))
}

fn assignment(key: &str) -> Result<Regex, RewriteError> {
    let raw = format!(r#"\b({}[ \t]*=?[ \t]*")[^"\r\n]*(")"#, regex::escape(key));
    Regex::new(&raw).map_err(|e| RewriteError::Pattern(key.to_string(), e))
}

fn attribute(attr: &str) -> Result<Regex, RewriteError> {
    let raw = format!(r#"(\s{}\s*=\s*")[^"]*(")"#, regex::escape(attr));
    Regex::new(&raw).map_err(|e| RewriteError::Pattern(attr.to_string(), e))
}

fn plist_pair(key: &str) -> Result<Regex, RewriteError> {
    let raw = format!(
        r"(<key>{}</key>\s*<string>)[^<]*(</string>)",
        regex::escape(key)
    );
    Regex::new(&raw).map_err(|e| RewriteError::Pattern(key.to_string(), e))
}

/// Replace the value between capture groups 1 and 2 of every match.
fn replace_enclosed(re: &Regex, content: &str, value: &str) -> Option<String> {
    if !re.is_match(content) {
        return None;
    }
    let out = re.replace_all(content, |caps: &Captures| {
        format!("{}{}{}", &caps[1], value, &caps[2])
    });
    Some(out.into_owned())
}

impl FormatKind {
    /// Rewrite `content` so the recognised field holds `value`.
    ///
    /// `None` means the pattern is absent; the caller must leave the file alone.
    pub fn apply(&self, content: &str, value: &str) -> Result<Option<String>, RewriteError> {
        Ok(match self {
            FormatKind::ManifestScalar { field } => {
                let re = scalar_line(field)?;
                if !re.is_match(content) {
                    return Ok(None);
                }
                let line = format!("{}: {}", field, value);
                Some(re.replacen(content, 1, regex::NoExpand(&line)).into_owned())
            }
            FormatKind::BuildScriptAssignment { key } => {
                replace_enclosed(&assignment(key)?, content, value)
            }
            FormatKind::MarkupAttribute { attribute: attr } => {
                replace_enclosed(&attribute(attr)?, content, value)
            }
            FormatKind::PlistKeyString { key } => {
                replace_enclosed(&plist_pair(key)?, content, value)
            }
            FormatKind::GeneratedNote => Some(value.to_string()),
        })
    }

    /// Current value of the recognised field, if present.
    pub fn current_value(&self, content: &str) -> Result<Option<String>, RewriteError> {
        let re = match self {
            FormatKind::ManifestScalar { field } => scalar_line(field)?,
            FormatKind::BuildScriptAssignment { key } => assignment(key)?,
            FormatKind::MarkupAttribute { attribute: attr } => attribute(attr)?,
            FormatKind::PlistKeyString { key } => plist_pair(key)?,
            FormatKind::GeneratedNote => return Ok(Some(content.to_string())),
        };
        let Some(caps) = re.captures(content) else {
            return Ok(None);
        };
        let value = match self {
            FormatKind::ManifestScalar { .. } => caps[1]
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .to_string(),
            _ => {
                let (start, end) = (caps.get(1), caps.get(2));
                match (start, end) {
                    (Some(s), Some(e)) => content[s.end()..e.start()].to_string(),
                    _ => return Ok(None),
                }
            }
        };
        Ok(Some(value))
    }
}

/// Replace `path` with `contents` via a sibling temp file and rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), RewriteError> {
    let werr = |source| RewriteError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(werr)?;
    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(werr)?;
    tmp.write_all(contents.as_bytes()).map_err(werr)?;
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(werr)?;
    }
    tmp.persist(path).map_err(|e| werr(e.error))?;
    Ok(())
}

fn outcome(status: OutcomeStatus, error: Option<String>) -> PropagationOutcome {
    PropagationOutcome {
        found: matches!(status, OutcomeStatus::Updated | OutcomeStatus::Unchanged),
        updated: status == OutcomeStatus::Updated,
        error,
        status,
    }
}

fn rewrite_file(path: &Path, format: &FormatKind, value: &str) -> Result<OutcomeStatus, RewriteError> {
    let current = if path.exists() {
        Some(
            std::fs::read_to_string(path).map_err(|source| RewriteError::Read {
                path: path.to_path_buf(),
                source,
            })?,
        )
    } else {
        None
    };

    let current = match (current, format) {
        (Some(c), _) => c,
        (None, FormatKind::GeneratedNote) => {
            write_atomic(path, value)?;
            return Ok(OutcomeStatus::Updated);
        }
        (None, _) => return Ok(OutcomeStatus::Missing),
    };

    match format.apply(&current, value)? {
        None => Ok(OutcomeStatus::PatternNotFound),
        Some(next) if next == current => Ok(OutcomeStatus::Unchanged),
        Some(next) => {
            write_atomic(path, &next)?;
            Ok(OutcomeStatus::Updated)
        }
    }
}

/// Apply one identifier to one file. Never fails: missing files, absent
/// patterns and I/O errors are all reported in the outcome.
pub fn apply_identifier(path: &Path, format: &FormatKind, value: &str) -> PropagationOutcome {
    match rewrite_file(path, format, value) {
        Ok(status) => {
            match status {
                OutcomeStatus::Missing => debug!(path = %path.display(), "target missing"),
                OutcomeStatus::PatternNotFound => {
                    warn!(path = %path.display(), "pattern not found, file left untouched")
                }
                _ => debug!(path = %path.display(), ?status, "target processed"),
            }
            outcome(status, None)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "target failed");
            outcome(OutcomeStatus::Failed, Some(e.to_string()))
        }
    }
}
