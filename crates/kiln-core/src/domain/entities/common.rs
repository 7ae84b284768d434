use super::DomainError;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A path relative to the project root that cannot leave it.
///
/// Invariant: never absolute, never contains `..`. Enforced at construction.
/// Stored with `/` separators so artifact paths compare equal across
/// platforms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    pub fn try_new(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        if path.is_absolute() || display.starts_with('/') || display.starts_with('\\') {
            return Err(DomainError::AbsolutePathNotAllowed { path: display });
        }

        let mut parts = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(DomainError::PathEscapesRoot { path: display });
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DomainError::AbsolutePathNotAllowed { path: display });
                }
            }
        }

        if parts.is_empty() {
            return Err(DomainError::InvalidOption(format!(
                "empty artifact path: '{display}'"
            )));
        }

        Ok(Self(parts.join("/")))
    }

    /// Join a segment, keeping the relative invariant.
    pub fn join(&self, segment: impl AsRef<Path>) -> Result<Self, DomainError> {
        Self::try_new(Path::new(&self.0).join(segment))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.0.split('/').collect()
    }

    /// Parent directory, `None` for a top-level file.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| Self(parent.to_string()))
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl TryFrom<&str> for RelativePath {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_current_dir_segments() {
        let path = RelativePath::try_new("./src/./app.ts").unwrap();
        assert_eq!(path.as_str(), "src/app.ts");
    }

    #[test]
    fn rejects_absolute_paths() {
        let err = RelativePath::try_new("/etc/passwd").unwrap_err();
        assert!(matches!(err, DomainError::AbsolutePathNotAllowed { .. }));
    }

    #[test]
    fn rejects_parent_components() {
        let err = RelativePath::try_new("src/../../outside.ts").unwrap_err();
        assert!(matches!(err, DomainError::PathEscapesRoot { .. }));
    }

    #[test]
    fn rejects_empty_paths() {
        assert!(RelativePath::try_new("").is_err());
        assert!(RelativePath::try_new(".").is_err());
    }

    #[test]
    fn join_keeps_invariant() {
        let base = RelativePath::try_new("src").unwrap();
        assert_eq!(base.join("routes/index.ts").unwrap().as_str(), "src/routes/index.ts");
        assert!(base.join("../x").is_err());
    }

    #[test]
    fn parent_and_file_name() {
        let path = RelativePath::try_new("src/config/database.ts").unwrap();
        assert_eq!(path.parent().unwrap().as_str(), "src/config");
        assert_eq!(path.file_name(), "database.ts");
        assert!(RelativePath::try_new("package.json").unwrap().parent().is_none());
    }
}
