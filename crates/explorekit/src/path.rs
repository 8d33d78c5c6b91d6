//! Path model for the simulated multi-root file system.
//!
//! Paths are absolute and backslash-delimited, starting with a root name:
//! `C:`, `C:\Docs`, `OneDrive\Pictures\cat.png`. Root paths and folder paths
//! never end in a separator. Two virtual locations sit on top of the roots:
//! [`THIS_PC`] (the root listing) and [`RECYCLE_BIN`]. Neither is reachable by
//! splitting or joining normal paths.
//!
//! All comparisons are case-sensitive on the [`normalize`]d form.

/// Path separator.
pub const SEPARATOR: char = '\\';

/// Virtual location listing all roots.
pub const THIS_PC: &str = "This PC";

/// Virtual location holding soft-deleted items.
pub const RECYCLE_BIN: &str = "Recycle Bin";

/// Returns true for [`THIS_PC`] and [`RECYCLE_BIN`].
pub fn is_special_location(path: &str) -> bool {
    path == THIS_PC || path == RECYCLE_BIN
}

/// Unify separators and drop trailing separators.
///
/// `C:/Docs/` becomes `C:\Docs`.
pub fn normalize(path: &str) -> String {
    let unified = path.replace('/', "\\");
    unified.trim_end_matches(SEPARATOR).to_string()
}

/// Name of the root a path lives under, or `None` for virtual locations.
pub fn root_of(path: &str) -> Option<&str> {
    if path.is_empty() || is_special_location(path) {
        return None;
    }
    path.split(SEPARATOR).find(|part| !part.is_empty())
}

/// True when the path names a root itself (`C:`, `OneDrive`).
pub fn is_root(path: &str) -> bool {
    if path.is_empty() || is_special_location(path) {
        return false;
    }
    path.split(SEPARATOR).filter(|part| !part.is_empty()).count() == 1
}

/// Parent location of a path.
///
/// - parent of a root is [`THIS_PC`]
/// - parent of [`RECYCLE_BIN`] is [`THIS_PC`]
/// - [`THIS_PC`] has no parent
pub fn parent(path: &str) -> Option<&str> {
    if path.is_empty() || path == THIS_PC {
        return None;
    }
    if path == RECYCLE_BIN || is_root(path) {
        return Some(THIS_PC);
    }
    path.rfind(SEPARATOR).map(|idx| &path[..idx])
}

/// Last segment of a path.
///
/// `C:\Docs\File.txt` gives `File.txt`; a root path gives the root name.
pub fn name(path: &str) -> &str {
    path.rsplit(SEPARATOR).next().unwrap_or(path)
}

/// Join a parent path and a child name.
///
/// Joining onto [`THIS_PC`] (or nothing) yields the bare name, matching the
/// drive listing where roots are addressed by name alone.
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() || parent == THIS_PC {
        return name.to_string();
    }
    format!("{}{}{}", parent, SEPARATOR, name)
}

/// True when `path` lies strictly below `ancestor`.
pub fn is_descendant(path: &str, ancestor: &str) -> bool {
    if path.is_empty() || ancestor.is_empty() {
        return false;
    }
    let path = normalize(path);
    let ancestor = normalize(ancestor);
    if path == ancestor {
        return false;
    }
    path.starts_with(&format!("{}{}", ancestor, SEPARATOR))
}

/// Compare two paths on their normalized form.
pub fn same_path(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Path segments below the root, skipping empty parts.
pub(crate) fn segments_below_root(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|part| !part.is_empty()).skip(1)
}
