use crate::domain::branch::{branch_slug, BranchKind};
use crate::domain::version::SemVer;
use crate::engine::selector::BaseVersion;
use git2::Oid;

/// Apply the branch-type rules to a base version and change signal.
///
/// - Main: the base triple, patch incremented by one when changed.
/// - Release: `major.minor` come from the release branch name (falling back
///   to the base series when the branch name carries no version), patch from
///   the base, incremented when changed.
/// - Feature: the bare base triple when unchanged; with a
///   `-<branch-slug>.<short-hash>` suffix when changed.
///
/// Total: never fails, whatever the branch name looks like.
pub fn compose_version(
    kind: BranchKind,
    base: &BaseVersion,
    release_version: Option<SemVer>,
    changed: bool,
    branch_name: &str,
    head_commit: Oid,
) -> String {
    match kind {
        BranchKind::Main => {
            let version = if changed {
                base.semver.bump_patch()
            } else {
                base.semver
            };
            version.to_string()
        }
        BranchKind::Release => {
            let series = release_version.unwrap_or(base.semver);
            let patch = if changed {
                base.semver.patch + 1
            } else {
                base.semver.patch
            };
            SemVer::new(series.major, series.minor, patch).to_string()
        }
        BranchKind::Feature => {
            if changed {
                format!(
                    "{}-{}.{}",
                    base.semver,
                    branch_slug(branch_name),
                    short_hash(head_commit)
                )
            } else {
                base.semver.to_string()
            }
        }
    }
}

/// First seven hexadecimal characters of a commit id, `0000000` when the
/// commit id is unavailable
pub fn short_hash(oid: Oid) -> String {
    let full = oid.to_string();
    match full.get(..7) {
        Some(head) => head.to_string(),
        None => "0000000".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::selector::BaseOrigin;

    fn oid(byte: u8) -> Oid {
        Oid::from_bytes(&[byte; 20]).unwrap()
    }

    fn base(major: u32, minor: u32, patch: u32) -> BaseVersion {
        BaseVersion {
            semver: SemVer::new(major, minor, patch),
            commit_id: Some(oid(1)),
            origin: BaseOrigin::Global,
        }
    }

    #[test]
    fn test_main_unchanged() {
        let v = compose_version(
            BranchKind::Main,
            &base(1, 0, 0),
            None,
            false,
            "main",
            oid(2),
        );
        assert_eq!(v, "1.0.0");
    }

    #[test]
    fn test_main_changed_bumps_patch() {
        let v = compose_version(
            BranchKind::Main,
            &base(1, 0, 0),
            None,
            true,
            "main",
            oid(2),
        );
        assert_eq!(v, "1.0.1");
    }

    #[test]
    fn test_release_series_comes_from_branch() {
        let v = compose_version(
            BranchKind::Release,
            &base(1, 4, 2),
            Some(SemVer::new(2, 0, 0)),
            false,
            "release/v2.0",
            oid(2),
        );
        assert_eq!(v, "2.0.2");
    }

    #[test]
    fn test_release_changed_bumps_patch() {
        let v = compose_version(
            BranchKind::Release,
            &base(2, 0, 0),
            Some(SemVer::new(2, 0, 0)),
            true,
            "release/v2.0",
            oid(2),
        );
        assert_eq!(v, "2.0.1");
    }

    #[test]
    fn test_release_unparseable_branch_falls_back_to_base_series() {
        let v = compose_version(
            BranchKind::Release,
            &base(1, 4, 2),
            None,
            true,
            "release/next",
            oid(2),
        );
        assert_eq!(v, "1.4.3");
    }

    #[test]
    fn test_feature_unchanged_has_no_suffix() {
        let v = compose_version(
            BranchKind::Feature,
            &base(1, 0, 0),
            None,
            false,
            "feature/data-improvements",
            oid(2),
        );
        assert_eq!(v, "1.0.0");
        assert!(!v.contains('-'));
    }

    #[test]
    fn test_feature_changed_appends_slug_and_hash() {
        let head = Oid::from_str("abc1234567890abc1234567890abc1234567890a").unwrap();
        let v = compose_version(
            BranchKind::Feature,
            &base(1, 0, 0),
            None,
            true,
            "feature/data-improvements",
            head,
        );
        assert_eq!(v, "1.0.0-feature-data-improvements.abc1234");
    }

    #[test]
    fn test_short_hash_of_zero_oid() {
        assert_eq!(short_hash(Oid::zero()), "0000000");
    }
}
