use crate::domain::project::{path_is_under, ProjectRef};
use crate::domain::tag::VersionTag;
use crate::engine::lock;
use crate::engine::selector;
use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use tracing::warn;

/// A direct dependency resolved to its display name and tag slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef {
    pub path: String,
    pub name: String,
    pub slug: String,
}

/// Outcome of change detection for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    pub changed: bool,
    pub rationale: String,
}

impl ChangeReport {
    fn changed(rationale: String) -> Self {
        ChangeReport {
            changed: true,
            rationale,
        }
    }
}

const MAX_SAMPLE_PATHS: usize = 3;

/// Determine whether a project has changed since the base-tag commit.
///
/// Rules are evaluated in order and the first match decides:
/// 1. a file under the project directory changed;
/// 2. a file under a direct dependency's directory changed;
/// 3. a direct dependency received a project-scoped tag strictly newer than
///    the base commit;
/// 4. the project's package lock file changed.
///
/// Transitive dependencies are deliberately not followed: each dependent
/// project observes its dependency's new tag (rule 3) or co-changed files
/// (rule 2) in its own decision.
///
/// Adapter failures on the diff abort the decision. A failed ancestry check
/// for a single dependency is logged and that dependency treated as
/// unchanged; it never fails the whole decision.
pub fn detect_changes<R: Repository>(
    repo: &R,
    base_commit: Option<Oid>,
    head_commit: Oid,
    project: &ProjectRef,
    deps: &[DependencyRef],
    tags: &[VersionTag],
) -> Result<ChangeReport> {
    let base = match base_commit {
        Some(oid) => oid,
        None => return Ok(ChangeReport::changed("no base".to_string())),
    };

    let diff = repo.diff_paths(base, head_commit)?;

    // Rule 1: files under the project directory
    let own: Vec<&str> = diff
        .iter()
        .filter(|d| path_is_under(&d.path, &project.relative_path))
        .map(|d| d.path.as_str())
        .collect();
    if !own.is_empty() {
        let mut rationale = format!(
            "files changed under {}: {}",
            dir_label(&project.relative_path),
            sample_paths(&own)
        );
        append_lock_detail(repo, base, head_commit, project, &own, &mut rationale);
        return Ok(ChangeReport::changed(rationale));
    }

    // Rule 2: files under a direct dependency's directory
    for dep in deps {
        let touched: Vec<&str> = diff
            .iter()
            .filter(|d| path_is_under(&d.path, &dep.path))
            .map(|d| d.path.as_str())
            .collect();
        if !touched.is_empty() {
            return Ok(ChangeReport::changed(format!(
                "files changed under dependency {}: {}",
                dir_label(&dep.path),
                sample_paths(&touched)
            )));
        }
    }

    // Rule 3: a dependency was re-tagged after the base commit
    for dep in deps {
        let dep_tag = match selector::select_latest_project(tags, &dep.slug, None) {
            Some(tag) => tag,
            None => continue,
        };
        if dep_tag.commit_id == base {
            continue;
        }
        match repo.is_ancestor(base, dep_tag.commit_id) {
            Ok(true) => {
                return Ok(ChangeReport::changed(format!(
                    "Dependency {} was versioned at {}",
                    dep.name, dep_tag.name
                )));
            }
            Ok(false) => {}
            Err(e) => {
                warn!(
                    dependency = %dep.name,
                    tag = %dep_tag.name,
                    error = %e,
                    "ancestry check failed, treating dependency as unchanged"
                );
            }
        }
    }

    // Rule 4: the package lock file changed
    let lock_path = project.lock_file_path();
    if diff.iter().any(|d| d.path == lock_path) {
        let mut rationale = format!("{} changed", lock_path);
        append_lock_detail(
            repo,
            base,
            head_commit,
            project,
            &[lock_path.as_str()],
            &mut rationale,
        );
        return Ok(ChangeReport::changed(rationale));
    }

    Ok(ChangeReport {
        changed: false,
        rationale: format!("no changes since {}", short_id(base)),
    })
}

/// When the deciding paths include the project's lock file, name the package
/// versions that moved. Purely informational: read or parse failures leave
/// the rationale as it was.
fn append_lock_detail<R: Repository>(
    repo: &R,
    base: Oid,
    head: Oid,
    project: &ProjectRef,
    matched: &[&str],
    rationale: &mut String,
) {
    let lock_path = project.lock_file_path();
    if !matched.iter().any(|p| *p == lock_path) {
        return;
    }

    let old = read_locked(repo, base, &lock_path);
    let new = read_locked(repo, head, &lock_path);
    if let (Some(old), Some(new)) = (old, new) {
        let deltas = lock::version_deltas(&old, &new);
        if !deltas.is_empty() {
            let shown: Vec<&str> = deltas
                .iter()
                .take(MAX_SAMPLE_PATHS)
                .map(String::as_str)
                .collect();
            rationale.push_str(&format!(" (packages: {})", shown.join(", ")));
        }
    }
}

fn read_locked<R: Repository>(
    repo: &R,
    commit: Oid,
    path: &str,
) -> Option<std::collections::BTreeMap<String, String>> {
    match repo.read_blob(commit, path) {
        Ok(Some(bytes)) => lock::locked_versions(&bytes),
        Ok(None) => None,
        Err(e) => {
            warn!(path = %path, error = %e, "cannot read lock file, skipping package detail");
            None
        }
    }
}

fn sample_paths(paths: &[&str]) -> String {
    let mut shown: Vec<&str> = paths.iter().take(MAX_SAMPLE_PATHS).copied().collect();
    shown.sort_unstable();
    let mut out = shown.join(", ");
    if paths.len() > MAX_SAMPLE_PATHS {
        out.push_str(&format!(" and {} more", paths.len() - MAX_SAMPLE_PATHS));
    }
    out
}

fn dir_label(dir: &str) -> &str {
    if dir.is_empty() {
        "<repository root>"
    } else {
        dir
    }
}

fn short_id(oid: Oid) -> String {
    let full = oid.to_string();
    full.chars().take(7).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{ChangeKind, ChangedFile, MockRepository};

    fn oid(byte: u8) -> Oid {
        Oid::from_bytes(&[byte; 20]).unwrap()
    }

    fn changed(path: &str) -> ChangedFile {
        ChangedFile {
            path: path.to_string(),
            kind: ChangeKind::Modified,
        }
    }

    fn core_project() -> ProjectRef {
        ProjectRef::new("Core", "src/Core")
    }

    fn data_with_core_dep() -> (ProjectRef, Vec<DependencyRef>) {
        let mut data = ProjectRef::new("Data", "src/Data");
        data.dependencies = vec!["src/Core".to_string()];
        let deps = vec![DependencyRef {
            path: "src/Core".to_string(),
            name: "Core".to_string(),
            slug: "core".to_string(),
        }];
        (data, deps)
    }

    #[test]
    fn test_no_base_is_always_changed() {
        let repo = MockRepository::new();
        let report =
            detect_changes(&repo, None, oid(9), &core_project(), &[], &[]).unwrap();
        assert!(report.changed);
        assert_eq!(report.rationale, "no base");
    }

    #[test]
    fn test_direct_project_change() {
        let mut repo = MockRepository::new();
        repo.set_diff(oid(1), oid(2), vec![changed("src/Core/CoreModels.cs")]);

        let report =
            detect_changes(&repo, Some(oid(1)), oid(2), &core_project(), &[], &[]).unwrap();
        assert!(report.changed);
        assert!(report.rationale.contains("src/Core/CoreModels.cs"));
    }

    #[test]
    fn test_sibling_prefix_does_not_match() {
        let mut repo = MockRepository::new();
        repo.set_diff(oid(1), oid(2), vec![changed("src/CoreTests/Test.cs")]);

        let report =
            detect_changes(&repo, Some(oid(1)), oid(2), &core_project(), &[], &[]).unwrap();
        assert!(!report.changed);
    }

    #[test]
    fn test_dependency_directory_change() {
        let mut repo = MockRepository::new();
        repo.set_diff(oid(1), oid(2), vec![changed("src/Core/CoreServices.cs")]);

        let (data, deps) = data_with_core_dep();
        let report = detect_changes(&repo, Some(oid(1)), oid(2), &data, &deps, &[]).unwrap();
        assert!(report.changed);
        assert!(report.rationale.contains("dependency src/Core"));
    }

    #[test]
    fn test_dependency_retag_after_base() {
        let mut repo = MockRepository::new();
        repo.set_diff(oid(1), oid(3), vec![changed("docs/notes.txt")]);
        repo.add_ancestor(oid(1), oid(2));

        let tags = vec![VersionTag::parse("v1.0.1-core", oid(2), "v").unwrap()];
        let (data, deps) = data_with_core_dep();
        let report = detect_changes(&repo, Some(oid(1)), oid(3), &data, &deps, &tags).unwrap();
        assert!(report.changed);
        assert!(report.rationale.contains("Dependency Core was versioned"));
    }

    #[test]
    fn test_dependency_tag_on_base_commit_is_not_newer() {
        let mut repo = MockRepository::new();
        repo.set_diff(oid(1), oid(3), vec![]);

        let tags = vec![VersionTag::parse("v1.0.1-core", oid(1), "v").unwrap()];
        let (data, deps) = data_with_core_dep();
        let report = detect_changes(&repo, Some(oid(1)), oid(3), &data, &deps, &tags).unwrap();
        assert!(!report.changed);
    }

    #[test]
    fn test_dependency_tag_not_reachable_is_unchanged() {
        // Tag exists but its commit is not a descendant of the base
        // (e.g. it lives on an unmerged branch).
        let mut repo = MockRepository::new();
        repo.set_diff(oid(1), oid(3), vec![]);

        let tags = vec![VersionTag::parse("v1.0.1-core", oid(7), "v").unwrap()];
        let (data, deps) = data_with_core_dep();
        let report = detect_changes(&repo, Some(oid(1)), oid(3), &data, &deps, &tags).unwrap();
        assert!(!report.changed);
    }

    #[test]
    fn test_unchanged_project() {
        let mut repo = MockRepository::new();
        repo.set_diff(oid(1), oid(2), vec![changed("src/Data/DataModels.cs")]);

        let report =
            detect_changes(&repo, Some(oid(1)), oid(2), &core_project(), &[], &[]).unwrap();
        assert!(!report.changed);
        assert!(report.rationale.contains("no changes"));
    }

    #[test]
    fn test_rationale_samples_at_most_three_paths() {
        let mut repo = MockRepository::new();
        repo.set_diff(
            oid(1),
            oid(2),
            vec![
                changed("src/Core/a.cs"),
                changed("src/Core/b.cs"),
                changed("src/Core/c.cs"),
                changed("src/Core/d.cs"),
            ],
        );

        let report =
            detect_changes(&repo, Some(oid(1)), oid(2), &core_project(), &[], &[]).unwrap();
        assert!(report.changed);
        assert!(report.rationale.contains("and 1 more"));
    }

    #[test]
    fn test_lock_change_names_moved_packages() {
        let old_lock = br#"{
            "version": 1,
            "dependencies": {
                "net8.0": {
                    "Newtonsoft.Json": { "type": "Direct", "resolved": "12.0.1" }
                }
            }
        }"#;
        let new_lock = br#"{
            "version": 1,
            "dependencies": {
                "net8.0": {
                    "Newtonsoft.Json": { "type": "Direct", "resolved": "13.0.1" }
                }
            }
        }"#;

        let mut repo = MockRepository::new();
        repo.set_diff(
            oid(1),
            oid(2),
            vec![changed("src/Core/packages.lock.json")],
        );
        repo.add_blob(oid(1), "src/Core/packages.lock.json", old_lock.to_vec());
        repo.add_blob(oid(2), "src/Core/packages.lock.json", new_lock.to_vec());

        let report =
            detect_changes(&repo, Some(oid(1)), oid(2), &core_project(), &[], &[]).unwrap();
        assert!(report.changed);
        assert!(
            report
                .rationale
                .contains("Newtonsoft.Json 12.0.1 -> 13.0.1"),
            "rationale was: {}",
            report.rationale
        );
    }

    #[test]
    fn test_root_project_sees_top_level_lock() {
        let mut repo = MockRepository::new();
        repo.set_diff(oid(1), oid(2), vec![changed("packages.lock.json")]);

        let root = ProjectRef::new("App", "");
        let report = detect_changes(&repo, Some(oid(1)), oid(2), &root, &[], &[]).unwrap();
        assert!(report.changed);
    }
}
