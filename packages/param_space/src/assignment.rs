use std::fmt::{self, Display};
use std::slice;
use std::vec;

/// A mapping from axis name to one selected value of that axis.
///
/// Entries keep the order in which they were inserted, which for generated assignments is
/// the order of the axes in the [`Space`][crate::Space].
///
/// Inserting a name that is already present replaces the value in place. Axis names are
/// expected to be unique, so this only matters when combining assignments of axes that
/// share a name, in which case the last value wins.
///
/// # Examples
///
/// ```
/// use param_space::Assignment;
///
/// let combined = Assignment::combine([
///     Assignment::single("level", 3),
///     Assignment::single("threads", 8),
/// ]);
///
/// assert_eq!(combined.get("level"), Some(&3));
/// assert_eq!(combined.to_string(), "level=3 threads=8");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment<V> {
    entries: Vec<(String, V)>,
}

impl<V> Assignment<V> {
    /// Creates an assignment without any entries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an assignment with exactly one entry.
    #[must_use]
    pub fn single(name: impl Into<String>, value: V) -> Self {
        Self {
            entries: vec![(name.into(), value)],
        }
    }

    /// Merges a sequence of assignments into one.
    ///
    /// Later assignments overwrite the values of earlier ones for any name they share.
    #[must_use]
    pub fn combine(parts: impl IntoIterator<Item = Self>) -> Self {
        parts.into_iter().collect()
    }

    /// Sets the value for `name`, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        let name = name.into();

        if let Some((_, existing)) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            return Some(std::mem::replace(existing, value));
        }

        self.entries.push((name, value));
        None
    }

    /// Returns the value selected for `name`, if the assignment has one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    /// Whether the assignment has a value for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the assignment has no entries. Only the single assignment of an empty space
    /// is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> Entries<'_, V> {
        Entries {
            inner: self.entries.iter(),
        }
    }

    /// Iterates over the names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Iterates over the values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<V> Default for Assignment<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<Self> for Assignment<V> {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        let mut result = Self::new();

        for part in iter {
            result.extend(part);
        }

        result
    }
}

impl<N, V> FromIterator<(N, V)> for Assignment<V>
where
    N: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut result = Self::new();
        result.extend(iter);
        result
    }
}

impl<N, V> Extend<(N, V)> for Assignment<V>
where
    N: Into<String>,
{
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<V> IntoIterator for Assignment<V> {
    type Item = (String, V);
    type IntoIter = vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Assignment<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Entries<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: Display> Display for Assignment<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, value)) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }

            write!(f, "{name}={value}")?;
        }

        Ok(())
    }
}

/// Borrowing iterator over the entries of an [`Assignment`].
#[derive(Clone, Debug)]
pub struct Entries<'a, V> {
    inner: slice::Iter<'a, (String, V)>,
}

impl<'a, V> Iterator for Entries<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(n, v)| (n.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Entries<'_, V> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn combine_keeps_every_name_once() {
        let combined = Assignment::combine([
            Assignment::single("p1", 1),
            Assignment::single("p2", 2),
            Assignment::single("p3", 3),
        ]);

        let names: Vec<_> = combined.names().collect();
        assert_eq!(names, ["p1", "p2", "p3"]);
        assert_eq!(combined.len(), 3);
        assert_eq!(combined.get("p2"), Some(&2));
    }

    #[test]
    fn later_value_wins_in_original_position() {
        let combined = Assignment::combine([
            Assignment::from_iter([("a", 1), ("b", 2)]),
            Assignment::single("a", 10),
        ]);

        let pairs: Vec<_> = combined.iter().collect();
        assert_eq!(pairs, [("a", &10), ("b", &2)]);
    }

    #[test]
    fn insert_reports_replaced_value() {
        let mut assignment = Assignment::new();

        assert_eq!(assignment.insert("x", 'a'), None);
        assert_eq!(assignment.insert("x", 'b'), Some('a'));
        assert_eq!(assignment.len(), 1);
    }

    #[test]
    fn empty_combination_is_empty() {
        let combined = Assignment::<u8>::combine([]);

        assert!(combined.is_empty());
        assert_eq!(combined, Assignment::default());
        assert_eq!(combined.to_string(), "");
    }

    #[test]
    fn missing_name() {
        let assignment = Assignment::single("x", 1);

        assert!(assignment.contains("x"));
        assert!(!assignment.contains("y"));
        assert_eq!(assignment.get("y"), None);
    }

    #[test]
    fn display_joins_pairs() {
        let assignment: Assignment<&str> = [("preset", "-9"), ("extreme", "-e")]
            .into_iter()
            .collect();

        assert_eq!(assignment.to_string(), "preset=-9 extreme=-e");
    }
}
