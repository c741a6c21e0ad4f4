use crate::domain::version::SemVer;
use git2::Oid;

/// Scope of a version tag: the whole repository or a single project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagScope {
    Global,
    Project(String),
}

/// A repository tag interpreted as a version tag.
///
/// Two name shapes are recognized, both behind a configurable prefix:
/// global tags (`v1.2.3`) and project-scoped tags (`v1.2.3-core`). The scope
/// is determined solely by the name shape: a `-` after the version part makes
/// the tag project-scoped, with everything after the first `-` taken as the
/// lowercased project slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub name: String,
    pub semver: SemVer,
    pub commit_id: Oid,
    pub scope: TagScope,
}

impl VersionTag {
    /// Parse a tag name against the configured prefix.
    ///
    /// The prefix is stripped case-insensitively. Tags without the prefix,
    /// with an unparseable version, or with an empty slug are not version
    /// tags and yield `None`.
    pub fn parse(name: &str, commit_id: Oid, tag_prefix: &str) -> Option<Self> {
        let rest = strip_prefix_ignore_case(name, tag_prefix)?;

        let (version_part, scope) = match rest.split_once('-') {
            Some((_, slug)) if slug.is_empty() => return None,
            Some((version, slug)) => (version, TagScope::Project(slug.to_lowercase())),
            None => (rest, TagScope::Global),
        };

        let semver = SemVer::parse(version_part)?;

        Some(VersionTag {
            name: name.to_string(),
            semver,
            commit_id,
            scope,
        })
    }

    /// Whether this tag applies to the whole repository
    pub fn is_global(&self) -> bool {
        self.scope == TagScope::Global
    }

    /// The project slug for a project-scoped tag
    pub fn project_slug(&self) -> Option<&str> {
        match &self.scope {
            TagScope::Project(slug) => Some(slug),
            TagScope::Global => None,
        }
    }

    /// Render the canonical tag name for a version and optional project slug.
    ///
    /// The patch component is always rendered explicitly.
    pub fn format_name(tag_prefix: &str, semver: SemVer, slug: Option<&str>) -> String {
        match slug {
            Some(slug) => format!("{}{}-{}", tag_prefix, semver, slug),
            None => format!("{}{}", tag_prefix, semver),
        }
    }
}

/// Strip `prefix` from the start of `s`, ignoring ASCII case
pub(crate) fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}
