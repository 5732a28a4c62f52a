//! Structured cache keys.

/// A namespaced cache key: a namespace plus an ordered list of parts.
///
/// Keys render canonically as `namespace:part1:part2:...`. Building keys
/// from typed parts instead of ad hoc string concatenation keeps part
/// ordering consistent across callers. A key with fewer parts also serves
/// as a prefix for invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: &'static str,
    parts: Vec<String>,
}

impl CacheKey {
    /// Creates a key with the given namespace and no parts.
    pub fn new(namespace: &'static str) -> Self {
        Self {
            namespace,
            parts: Vec::new(),
        }
    }

    /// Appends one part, consuming and returning the key.
    pub fn part(mut self, part: impl ToString) -> Self {
        self.parts.push(part.to_string());
        self
    }

    /// Returns the namespace.
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// Renders the canonical `:`-joined form.
    pub fn render(&self) -> String {
        let mut out = String::from(self.namespace);
        for part in &self.parts {
            out.push(':');
            out.push_str(part);
        }
        out
    }

    /// Returns true if `self` is a prefix of `key` on part boundaries.
    pub fn is_prefix_of(&self, key: &CacheKey) -> bool {
        self.namespace == key.namespace
            && self.parts.len() <= key.parts.len()
            && self.parts.iter().zip(&key.parts).all(|(a, b)| a == b)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}
