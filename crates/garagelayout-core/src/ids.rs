//! Deterministic id generation for layout elements and devices.

use crate::data::Site;

/// Counter-backed id generator.
///
/// Ids have the form `{prefix}-{n}`. A generator built with
/// [`IdGenerator::for_site`] starts after the highest counter already present
/// in the site, so freshly generated ids never collide with loaded ones.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    next: u64,
}

impl IdGenerator {
    /// Creates a generator starting at `1`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    /// Creates a generator whose first id uses `start`.
    pub fn starting_at(prefix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: start,
        }
    }

    /// Creates a generator that continues after every `{prefix}-{n}` id in the site.
    pub fn for_site(prefix: impl Into<String>, site: &Site) -> Self {
        let prefix = prefix.into();
        let highest = site
            .garages
            .iter()
            .flat_map(|g| g.levels.iter())
            .flat_map(|l| {
                l.layout_elements
                    .iter()
                    .map(|e| e.id.as_str())
                    .chain(l.devices.iter().map(|d| d.id.as_str()))
            })
            .filter_map(|id| Self::counter_of(&prefix, id))
            .max()
            .unwrap_or(0);
        Self::starting_at(prefix, highest + 1)
    }

    /// Returns the next id.
    pub fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }

    /// Peeks the counter that the next id will use.
    pub fn peek(&self) -> u64 {
        self.next
    }

    fn counter_of(prefix: &str, id: &str) -> Option<u64> {
        id.strip_prefix(prefix)?.strip_prefix('-')?.parse().ok()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("el")
    }
}
