//! Hostname-based exclusion of platforms that never serve direct files.

use serde::{Deserialize, Serialize};
use url::Url;

/// One excluded platform and the hostname fragments that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    /// Human-readable platform name used in the rejection reason.
    pub platform: String,
    /// Lowercase substrings matched against the candidate's hostname.
    pub host_patterns: Vec<String>,
}

impl ExclusionRule {
    pub fn new(platform: &str, host_patterns: &[&str]) -> Self {
        Self {
            platform: platform.to_string(),
            host_patterns: host_patterns.iter().map(|p| p.to_ascii_lowercase()).collect(),
        }
    }

    pub fn rejection_reason(&self) -> String {
        format!("{} URLs are not supported.", self.platform)
    }

    fn matches_host(&self, host: &str) -> bool {
        self.host_patterns
            .iter()
            .any(|p| !p.is_empty() && host.contains(&p.to_ascii_lowercase()))
    }
}

/// Ordered set of exclusion rules. The first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionList {
    rules: Vec<ExclusionRule>,
}

impl Default for ExclusionList {
    fn default() -> Self {
        Self::new(vec![ExclusionRule::new("YouTube", &["youtube.com", "youtu.be"])])
    }
}

impl ExclusionList {
    pub fn new(rules: Vec<ExclusionRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }

    /// Rule matching the hostname of `candidate`, if any.
    ///
    /// Candidates that do not parse as a URL, or have no host, never match.
    pub fn matching_rule(&self, candidate: &str) -> Option<&ExclusionRule> {
        let url = Url::parse(candidate).ok()?;
        let host = url.host_str()?.to_ascii_lowercase();
        self.rules.iter().find(|rule| rule.matches_host(&host))
    }
}
