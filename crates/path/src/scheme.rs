//! crates/path/src/scheme.rs
//!
//! URI-scheme detection for path strings.

/// Backend tag for a path, derived once from its textual form.
///
/// Operations in `fskit-engine` branch on this tag instead of re-sniffing
/// the path string: local paths participate in freshness checks and byte
/// verification, custom-scheme paths always copy and use the bounded
/// temporary-name retry when staging files.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum PathScheme {
    /// A plain path or a `file://` path on the local filesystem.
    Local,
    /// A path carrying a non-`file` scheme prefix, e.g. `s3://bucket/key`.
    ///
    /// The scheme name is stored lowercased.
    Custom(String),
}

impl PathScheme {
    /// Derives the scheme tag for a path string.
    ///
    /// `file://` counts as [`PathScheme::Local`] because it addresses the
    /// local filesystem through the same primitives as a plain path.
    #[must_use]
    pub fn of(path: &str) -> Self {
        match split_scheme(path) {
            Some((scheme, _)) if scheme.eq_ignore_ascii_case("file") => Self::Local,
            Some((scheme, _)) => Self::Custom(scheme.to_ascii_lowercase()),
            None => Self::Local,
        }
    }

    /// Returns `true` for paths on the local filesystem.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }

    /// Returns the custom scheme name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Local => None,
            Self::Custom(name) => Some(name),
        }
    }
}

/// Splits `scheme://rest` into `(scheme, rest)` when the prefix is a valid
/// URI scheme: one ASCII letter followed by letters, digits, `+`, `-` or `.`.
///
/// Returns `None` for plain paths and for strings whose prefix is not a
/// well-formed scheme (a Windows drive letter such as `C:/` has no `//` and
/// never matches).
#[must_use]
pub fn split_scheme(path: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = path.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some((scheme, rest))
    } else {
        None
    }
}
