//! Name search
//!
//! Search input is matched as a literal, case-insensitive substring. Nothing
//! the caller sends is interpreted as a pattern, so `(`, `.*` or `[` simply
//! match those characters.

/// Compiled form of a `?q=` search query
#[derive(Debug, Clone)]
pub struct NameMatcher {
    needle: String,
}

impl NameMatcher {
    /// A missing query behaves like an empty one and matches everything
    pub fn new(query: Option<&str>) -> Self {
        Self {
            needle: query.unwrap_or_default().to_lowercase(),
        }
    }

    pub fn matches(&self, name: Option<&str>) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        name.is_some_and(|n| n.to_lowercase().contains(&self.needle))
    }
}
