//! Filter mode
//!
//! ```text
//! allow: navigation proceeds only to listed domains
//! block: navigation proceeds everywhere except listed domains
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Only listed domains stay reachable
    Allow,
    /// Listed domains become unreachable
    Block,
}

impl FilterMode {
    /// Returns true if a list match means the navigation is intercepted
    pub fn intercepts_on_match(&self) -> bool {
        matches!(self, FilterMode::Block)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Allow => "allow",
            FilterMode::Block => "block",
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allow" => Ok(FilterMode::Allow),
            "block" => Ok(FilterMode::Block),
            _ => Err(format!("Unknown filter mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_trip() {
        assert_eq!(FilterMode::from_str("allow").unwrap(), FilterMode::Allow);
        assert_eq!(FilterMode::from_str("Block").unwrap(), FilterMode::Block);
        assert_eq!(FilterMode::Allow.as_str(), "allow");
        assert_eq!(FilterMode::Block.to_string(), "block");
    }

    #[test]
    fn test_unknown_mode() {
        assert!(FilterMode::from_str("deny").is_err());
    }

    #[test]
    fn test_interception_direction() {
        assert!(FilterMode::Block.intercepts_on_match());
        assert!(!FilterMode::Allow.intercepts_on_match());
    }
}
