//! Common utility functions shared across the codebase.

use std::path::Path;

/// Display a path with `/` separators on every platform.
///
/// ```
/// use std::path::Path;
/// use mdl10n::utils::to_slash;
///
/// assert_eq!(to_slash(Path::new("docs/de-DE/intro.md")), "docs/de-DE/intro.md");
/// ```
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// `"1 file"`, `"2 files"`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
