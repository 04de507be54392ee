//! Glob-based ignore rules applied while copying managed directories.
use globset::{GlobBuilder, GlobMatcher};

use crate::error::ConfigError;

/// One compiled ignore pattern.
#[derive(Debug, Clone)]
struct IgnoreRule {
    pattern: String,
    matcher: GlobMatcher,
}

/// Compiled set of ignore patterns.
///
/// `*` does not cross `/`; `**` does. `?`, `[...]` and `{a,b}` follow
/// [`globset`] syntax. Rules keep the order of the patterns they were built
/// from.
///
/// # Examples
///
/// ```
/// use dotfiles_sync::config::ignore::IgnoreMatcher;
///
/// let ignore = IgnoreMatcher::compile(&["*.log", "node_modules"]).unwrap();
///
/// assert!(ignore.is_ignored("debug.log", "nvim/debug.log"));
/// assert!(ignore.is_ignored("node_modules", "plugin/node_modules"));
/// assert!(!ignore.is_ignored("init.lua", "nvim/init.lua"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    /// Compile every pattern, failing on the first malformed one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if a pattern is not a valid glob.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let rules = patterns
            .iter()
            .map(|p| {
                let pattern = p.as_ref();
                GlobBuilder::new(pattern)
                    .literal_separator(true)
                    .build()
                    .map(|glob| IgnoreRule {
                        pattern: pattern.to_string(),
                        matcher: glob.compile_matcher(),
                    })
                    .map_err(|e| ConfigError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: e.kind().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Return `true` if any rule matches either `base_name` or
    /// `relative_path` (path below the copy root, `/`-separated).
    #[must_use]
    pub fn is_ignored(&self, base_name: &str, relative_path: &str) -> bool {
        self.rules
            .iter()
            .any(|r| r.matcher.is_match(base_name) || r.matcher.is_match(relative_path))
    }

    /// Source patterns in rule order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.pattern.as_str())
    }

    /// Number of compiled rules.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rules.len()
    }

    /// Return `true` if there are no rules.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
