//! Paths that bypass the authentication filter.

/// Substring patterns checked against the request path.
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    patterns: Vec<String>,
}

impl ExclusionRules {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// False when `path` contains any configured pattern.
    pub fn should_intercept(&self, path: &str) -> bool {
        !self
            .patterns
            .iter()
            .any(|pattern| path.contains(pattern.as_str()))
    }
}
