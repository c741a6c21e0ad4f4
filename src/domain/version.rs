use std::fmt;

/// Semantic version triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SemVer {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SemVer {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        SemVer {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string of the form `M.m` or `M.m.p`.
    ///
    /// A `-suffix` after the numeric part is discarded (e.g. "1.2.3-rc1"
    /// parses as 1.2.3). A missing patch defaults to 0. Returns `None` for
    /// anything else.
    pub fn parse(s: &str) -> Option<Self> {
        let numeric = s.split_once('-').map(|(head, _)| head).unwrap_or(s);

        let parts: Vec<&str> = numeric.split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return None;
        }

        let major = parts[0].parse::<u32>().ok()?;
        let minor = parts[1].parse::<u32>().ok()?;
        let patch = match parts.get(2) {
            Some(part) => part.parse::<u32>().ok()?,
            None => 0,
        };

        Some(SemVer {
            major,
            minor,
            patch,
        })
    }

    /// Two versions are in the same series when major and minor are equal
    pub fn same_series(&self, other: &SemVer) -> bool {
        self.major == other.major && self.minor == other.minor
    }

    /// The next patch version in the same series
    pub fn bump_patch(&self) -> Self {
        SemVer {
            major: self.major,
            minor: self.minor,
            patch: self.patch + 1,
        }
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_triple() {
        let v = SemVer::parse("1.2.3").unwrap();
        assert_eq!(v, SemVer::new(1, 2, 3));
    }

    #[test]
    fn test_parse_two_part_defaults_patch() {
        let v = SemVer::parse("2.1").unwrap();
        assert_eq!(v, SemVer::new(2, 1, 0));
    }

    #[test]
    fn test_parse_discards_suffix() {
        assert_eq!(SemVer::parse("1.2.3-rc1"), Some(SemVer::new(1, 2, 3)));
        assert_eq!(SemVer::parse("1.2-beta"), Some(SemVer::new(1, 2, 0)));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(SemVer::parse("1").is_none());
        assert!(SemVer::parse("1.2.3.4").is_none());
        assert!(SemVer::parse("a.b.c").is_none());
        assert!(SemVer::parse("").is_none());
        assert!(SemVer::parse("1..3").is_none());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(SemVer::new(2, 0, 0) > SemVer::new(1, 9, 9));
        assert!(SemVer::new(1, 3, 0) > SemVer::new(1, 2, 9));
        assert!(SemVer::new(1, 2, 4) > SemVer::new(1, 2, 3));
    }

    #[test]
    fn test_same_series() {
        assert!(SemVer::new(1, 2, 0).same_series(&SemVer::new(1, 2, 9)));
        assert!(!SemVer::new(1, 2, 0).same_series(&SemVer::new(1, 3, 0)));
        assert!(!SemVer::new(1, 2, 0).same_series(&SemVer::new(2, 2, 0)));
    }

    #[test]
    fn test_bump_patch() {
        assert_eq!(SemVer::new(1, 2, 3).bump_patch(), SemVer::new(1, 2, 4));
    }

    #[test]
    fn test_display_always_renders_patch() {
        assert_eq!(SemVer::parse("1.2").unwrap().to_string(), "1.2.0");
        assert_eq!(SemVer::new(1, 2, 3).to_string(), "1.2.3");
    }
}
