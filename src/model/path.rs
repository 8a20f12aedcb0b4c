use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PathError;

/// How a path string is interpreted for separators and case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// Drive letters, UNC shares or backslashes. Case-insensitive.
    Windows,
    /// Forward slashes only. Case-sensitive.
    Posix,
}

impl PathStyle {
    pub fn detect(path: &str) -> PathStyle {
        if has_drive_prefix(path) || path.starts_with("\\\\") || path.contains('\\') {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    fn is_separator(self, c: char) -> bool {
        match self {
            PathStyle::Windows => c == '\\' || c == '/',
            PathStyle::Posix => c == '/',
        }
    }

    fn separator(self) -> char {
        match self {
            PathStyle::Windows => '\\',
            PathStyle::Posix => '/',
        }
    }
}

/// Lookup key derived from a normalized path.
///
/// Windows-style paths are folded to lowercase so `C:\Foo` and `c:\foo`
/// address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathKey(String);

impl PathKey {
    /// Key for an already-normalized path.
    pub fn from_normalized(normalized: &str) -> PathKey {
        match PathStyle::detect(normalized) {
            PathStyle::Windows => PathKey(normalized.to_lowercase()),
            PathStyle::Posix => PathKey(normalized.to_string()),
        }
    }

    /// Normalize `raw` and derive its key.
    pub fn for_path(raw: &str) -> Result<PathKey, PathError> {
        normalize(raw).map(|p| PathKey::from_normalized(&p))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Canonical string form of a file path.
///
/// Resolves `.` and `..` lexically, collapses repeated separators and trims
/// trailing ones. Drive roots keep exactly one trailing separator (`C:` and
/// `C:\\` both become `C:\`). Surrounding whitespace is part of the name and
/// is kept. Never touches the filesystem.
pub fn normalize(raw: &str) -> Result<String, PathError> {
    if raw.is_empty() {
        return Err(PathError::Empty);
    }
    if raw.chars().count() < 2 {
        return Err(PathError::TooShort(raw.to_string()));
    }

    let style = PathStyle::detect(raw);
    let sep = style.separator();

    // Split off the root: drive (`C:`), UNC share (`\\server\share`), or `/`.
    let (prefix, rest, rooted): (String, &str, bool) = match style {
        PathStyle::Windows if has_drive_prefix(raw) => {
            let rest = &raw[2..];
            // `C:` on its own is treated as the drive root.
            let rooted = rest.is_empty() || rest.starts_with(|c: char| style.is_separator(c));
            (raw[..2].to_string(), rest, rooted)
        }
        PathStyle::Windows if raw.starts_with("\\\\") => {
            let mut parts = raw[2..]
                .split(|c: char| style.is_separator(c))
                .filter(|s| !s.is_empty());
            let server = parts.next().unwrap_or_default();
            let share = parts.next().unwrap_or_default();
            let consumed = unc_root_len(raw, style);
            let mut prefix = format!("\\\\{}", server);
            if !share.is_empty() {
                prefix.push(sep);
                prefix.push_str(share);
            }
            (prefix, &raw[consumed..], true)
        }
        _ => {
            let rooted = raw.starts_with(|c: char| style.is_separator(c));
            (String::new(), raw, rooted)
        }
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split(|c: char| style.is_separator(c)) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !rooted {
                    // Cannot climb above a root.
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let mut out = prefix;
    let is_unc = out.starts_with("\\\\");
    if rooted && !is_unc {
        out.push(sep);
    }
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 || is_unc {
            out.push(sep);
        }
        out.push_str(segment);
    }

    if style == PathStyle::Posix && out == "/" {
        return Err(PathError::Root(raw.to_string()));
    }
    if out == "\\\\" {
        return Err(PathError::Root(raw.to_string()));
    }
    // Only dots and separators, e.g. `./.`
    if out.chars().count() < 2 {
        return Err(PathError::TooShort(raw.to_string()));
    }
    Ok(out)
}

/// Byte length of the `\\server\share` root including its separators.
fn unc_root_len(path: &str, style: PathStyle) -> usize {
    let mut seen = 0;
    let mut in_name = false;
    for (i, c) in path.char_indices().skip(2) {
        if style.is_separator(c) {
            if in_name {
                seen += 1;
                in_name = false;
                if seen == 2 {
                    return i;
                }
            }
        } else {
            in_name = true;
        }
    }
    path.len()
}
