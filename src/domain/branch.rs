use crate::domain::tag::strip_prefix_ignore_case;
use crate::domain::version::SemVer;

/// Branch classification driving the version-composition rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Main,
    Release,
    Feature,
}

impl BranchKind {
    /// Classify a branch name. Total: every name maps to exactly one kind,
    /// and anything unrecognized is a feature branch.
    pub fn classify(name: &str) -> Self {
        if name.eq_ignore_ascii_case("main") || name.eq_ignore_ascii_case("master") {
            return BranchKind::Main;
        }

        let lower = name.to_ascii_lowercase();
        if lower.starts_with("release/") || lower.starts_with("release-") {
            return BranchKind::Release;
        }

        if let Ok(re) = regex::Regex::new(r"^[vV]\d+\.\d+(\.\d+)?$") {
            if re.is_match(name) {
                return BranchKind::Release;
            }
        }

        BranchKind::Feature
    }
}

/// Extract the release version from a release branch name.
///
/// Strips a `release/` or `release-` prefix, then the tag prefix, then parses
/// what remains (`release/v2.0` with prefix "v" yields 2.0.0). Returns `None`
/// when the remainder is not a version.
pub fn extract_release_version(name: &str, tag_prefix: &str) -> Option<SemVer> {
    let lower = name.to_ascii_lowercase();
    let rest = if lower.starts_with("release/") {
        &name["release/".len()..]
    } else if lower.starts_with("release-") {
        &name["release-".len()..]
    } else {
        name
    };

    let rest = strip_prefix_ignore_case(rest, tag_prefix).unwrap_or(rest);
    SemVer::parse(rest)
}

/// Branch name as it appears in a feature-version suffix: lowercased, with
/// `/` and `_` mapped to `-`
pub fn branch_slug(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '_' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
