use crate::error::StorageError;
use std::path::{Path, PathBuf};

/// Joins `relative` onto the sandbox root and proves the result stays inside it.
///
/// Components are validated upstream (scope names and item keys cannot contain separators),
/// so the remaining risk is a symlinked directory pointing outside the root. The first
/// existing ancestor is canonicalized and checked against the root.
pub(crate) fn confine(root: &Path, relative: &Path) -> Result<PathBuf, StorageError> {
    if relative.is_absolute() {
        return Err(StorageError::PathTraversalAttempt {
            message: relative.display().to_string().into(),
            context: Some("Absolute paths are not allowed in sandbox".into()),
        });
    }

    let joined = root.join(relative);
    let mut current = Some(joined.as_path());

    while let Some(path) = current {
        if path == root {
            return Ok(joined);
        }

        if path.exists() {
            return match path.canonicalize() {
                Ok(canonical) if canonical.starts_with(root) => Ok(joined),
                Ok(canonical) => Err(StorageError::PathTraversalAttempt {
                    message: canonical.display().to_string().into(),
                    context: Some("Existing path resolves outside the sandbox".into()),
                }),
                Err(e) => Err(StorageError::Io {
                    source: e,
                    context: Some(format!("Failed to verify {}", path.display()).into()),
                }),
            };
        }

        current = path.parent();
    }

    Err(StorageError::PathTraversalAttempt {
        message: joined.display().to_string().into(),
        context: Some("No valid parent directory found within sandbox".into()),
    })
}
