use crate::domain::tag::VersionTag;
use crate::domain::version::SemVer;
use git2::Oid;

/// Where the effective base version came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseOrigin {
    Global,
    Project,
    DefaultFallback,
}

impl BaseOrigin {
    /// Short label for rationale text
    pub fn describe(&self) -> &'static str {
        match self {
            BaseOrigin::Global => "global tag",
            BaseOrigin::Project => "project tag",
            BaseOrigin::DefaultFallback => "default",
        }
    }
}

/// The version a decision starts from, before any change-driven bump.
///
/// `commit_id` is `None` only for the synthesized default base, when the
/// repository carries no global version tag at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseVersion {
    pub semver: SemVer,
    pub commit_id: Option<Oid>,
    pub origin: BaseOrigin,
}

/// Version synthesized when no global tag exists
pub const DEFAULT_BASE: SemVer = SemVer {
    major: 0,
    minor: 1,
    patch: 0,
};

/// Pick the highest-versioned tag among `candidates`, optionally restricted
/// to one `major.minor` series.
///
/// Ordering is `(major, minor, patch)` descending; on a tie the first tag
/// encountered in enumeration order wins.
pub fn select_latest<'a, I>(candidates: I, series: Option<SemVer>) -> Option<&'a VersionTag>
where
    I: IntoIterator<Item = &'a VersionTag>,
{
    let mut best: Option<&VersionTag> = None;
    for tag in candidates {
        if let Some(series) = series {
            if !tag.semver.same_series(&series) {
                continue;
            }
        }
        match best {
            Some(current) if tag.semver <= current.semver => {}
            _ => best = Some(tag),
        }
    }
    best
}

/// Latest global tag, optionally restricted to a series
pub fn select_latest_global(tags: &[VersionTag], series: Option<SemVer>) -> Option<&VersionTag> {
    select_latest(tags.iter().filter(|t| t.is_global()), series)
}

/// Latest project-scoped tag for `slug`, optionally restricted to a series
pub fn select_latest_project<'a>(
    tags: &'a [VersionTag],
    slug: &str,
    series: Option<SemVer>,
) -> Option<&'a VersionTag> {
    select_latest(tags.iter().filter(|t| t.project_slug() == Some(slug)), series)
}

/// Combine the selected global and project tags into the effective base.
///
/// A project-scoped tag is a refinement within the current global series: it
/// becomes the base only when its `major.minor` equal the global's. A stale
/// project tag from an earlier series must not hold the project back, so the
/// global tag wins otherwise. With no global tag at all, the base degrades to
/// 0.1.0 with no commit.
pub fn resolve_base(global: Option<&VersionTag>, project: Option<&VersionTag>) -> BaseVersion {
    let (global_semver, global_commit, global_origin) = match global {
        Some(tag) => (tag.semver, Some(tag.commit_id), BaseOrigin::Global),
        None => (DEFAULT_BASE, None, BaseOrigin::DefaultFallback),
    };

    if let Some(project_tag) = project {
        if project_tag.semver.same_series(&global_semver) {
            return BaseVersion {
                semver: project_tag.semver,
                commit_id: Some(project_tag.commit_id),
                origin: BaseOrigin::Project,
            };
        }
    }

    BaseVersion {
        semver: global_semver,
        commit_id: global_commit,
        origin: global_origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(byte: u8) -> Oid {
        Oid::from_bytes(&[byte; 20]).unwrap()
    }

    fn tag(name: &str, byte: u8) -> VersionTag {
        VersionTag::parse(name, oid(byte), "v").unwrap()
    }

    #[test]
    fn test_select_latest_global() {
        let tags = vec![tag("v1.0.0", 1), tag("v1.2.0", 2), tag("v1.1.0", 3)];
        let latest = select_latest_global(&tags, None).unwrap();
        assert_eq!(latest.name, "v1.2.0");
    }

    #[test]
    fn test_select_ignores_project_tags_for_global() {
        let tags = vec![tag("v1.0.0", 1), tag("v9.9.9-core", 2)];
        let latest = select_latest_global(&tags, None).unwrap();
        assert_eq!(latest.name, "v1.0.0");
    }

    #[test]
    fn test_select_latest_project_by_slug() {
        let tags = vec![
            tag("v1.0.1-core", 1),
            tag("v1.0.2-data", 2),
            tag("v1.0.3-core", 3),
        ];
        let latest = select_latest_project(&tags, "core", None).unwrap();
        assert_eq!(latest.name, "v1.0.3-core");
        assert!(select_latest_project(&tags, "api", None).is_none());
    }

    #[test]
    fn test_select_series_filter() {
        let tags = vec![tag("v1.0.5", 1), tag("v2.0.1", 2), tag("v1.1.0", 3)];
        let latest = select_latest_global(&tags, Some(SemVer::new(1, 0, 0))).unwrap();
        assert_eq!(latest.name, "v1.0.5");
        assert!(select_latest_global(&tags, Some(SemVer::new(3, 0, 0))).is_none());
    }

    #[test]
    fn test_select_tie_keeps_first_encountered() {
        let tags = vec![tag("v1.0.0", 1), tag("V1.0.0", 2)];
        let latest = select_latest_global(&tags, None).unwrap();
        assert_eq!(latest.commit_id, oid(1));
    }

    #[test]
    fn test_select_monotonicity() {
        // Adding a strictly greater tag always wins the selection.
        let mut tags = vec![tag("v1.0.0", 1), tag("v1.4.2", 2), tag("v0.9.9", 3)];
        let before = select_latest_global(&tags, None).unwrap().semver;
        tags.push(tag("v1.4.3", 4));
        let after = select_latest_global(&tags, None).unwrap();
        assert!(after.semver > before);
        assert_eq!(after.name, "v1.4.3");
    }

    #[test]
    fn test_resolve_base_prefers_same_series_project_tag() {
        let global = tag("v1.0.0", 1);
        let project = tag("v1.0.4-core", 2);
        let base = resolve_base(Some(&global), Some(&project));
        assert_eq!(base.semver, SemVer::new(1, 0, 4));
        assert_eq!(base.commit_id, Some(oid(2)));
        assert_eq!(base.origin, BaseOrigin::Project);
    }

    #[test]
    fn test_resolve_base_ignores_stale_project_tag() {
        let global = tag("v2.0.0", 1);
        let project = tag("v1.0.4-core", 2);
        let base = resolve_base(Some(&global), Some(&project));
        assert_eq!(base.semver, SemVer::new(2, 0, 0));
        assert_eq!(base.origin, BaseOrigin::Global);
    }

    #[test]
    fn test_resolve_base_default_fallback() {
        let base = resolve_base(None, None);
        assert_eq!(base.semver, SemVer::new(0, 1, 0));
        assert_eq!(base.commit_id, None);
        assert_eq!(base.origin, BaseOrigin::DefaultFallback);
    }

    #[test]
    fn test_resolve_base_project_tag_refines_default() {
        // No global tag, but a project tag inside the default 0.1 series.
        let project = tag("v0.1.3-core", 2);
        let base = resolve_base(None, Some(&project));
        assert_eq!(base.semver, SemVer::new(0, 1, 3));
        assert_eq!(base.origin, BaseOrigin::Project);
    }
}
