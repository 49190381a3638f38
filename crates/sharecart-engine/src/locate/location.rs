use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A resolved sharecart file.
///
/// Two locations are equal when they point at the same path, whatever their
/// auto-created flag says.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    path: PathBuf,
    auto_created: bool,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>, auto_created: bool) -> Self {
        Self {
            path: path.into(),
            auto_created,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The resolver created this file during the current search and it has
    /// not been populated yet.
    pub fn is_auto_created(&self) -> bool {
        self.auto_created
    }

    pub(crate) fn clear_auto_created(&mut self) {
        self.auto_created = false;
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_auto_created() {
        let a = Location::new("/g/dat/o_o.ini", true);
        let b = Location::new("/g/dat/o_o.ini", false);
        assert_eq!(a, b);

        let set: HashSet<Location> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn different_paths_differ() {
        assert_ne!(
            Location::new("/a/dat/o_o.ini", false),
            Location::new("/b/dat/o_o.ini", false)
        );
    }

    #[test]
    fn clearing_flag() {
        let mut loc = Location::new("/g/dat/o_o.ini", true);
        assert!(loc.is_auto_created());
        loc.clear_auto_created();
        assert!(!loc.is_auto_created());
    }
}
