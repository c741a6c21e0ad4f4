//! The version-decision engine
//!
//! Given a branch, a project and read access to the repository, decides the
//! project's version: resolve the applicable base from tags, detect whether
//! the project changed since that base, then compose the final version
//! string from the branch-type rules. The engine holds no state across
//! decisions and never mutates the repository.

pub mod changes;
pub mod composer;
pub mod lock;
pub mod selector;

pub use changes::{ChangeReport, DependencyRef};
pub use selector::{BaseOrigin, BaseVersion};

use crate::config::Config;
use crate::domain::branch::{extract_release_version, BranchKind};
use crate::domain::project::{normalize_path, ProjectRef};
use crate::domain::tag::VersionTag;
use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use tracing::debug;

/// Everything a single version decision needs from the caller
#[derive(Debug, Clone)]
pub struct DecisionInput {
    pub branch_name: String,
    pub head_commit_id: Oid,
    pub project: ProjectRef,
    pub tag_prefix: String,
}

/// The computed version for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutput {
    pub version: String,
    pub changed: bool,
    pub rationale: String,
}

/// Compute the version of one project on one branch at one commit.
///
/// `projects` is the full loaded project set; it is only used to resolve the
/// project's dependency paths to their names and tag slugs. Order of work:
/// forced version, skip short-circuit (no repository reads), branch
/// classification, one tag enumeration, base resolution, change detection,
/// composition. Identical inputs against identical repository state produce
/// byte-identical outputs.
pub fn compute_version<R: Repository>(
    repo: &R,
    input: &DecisionInput,
    projects: &[ProjectRef],
    config: &Config,
) -> Result<DecisionOutput> {
    if let Some(forced) = &config.force_version {
        return Ok(DecisionOutput {
            version: forced.clone(),
            changed: true,
            rationale: "forced".to_string(),
        });
    }

    let project = &input.project;
    if (project.is_test && config.skip_tests)
        || (!project.is_packable && config.skip_non_packable)
    {
        return Ok(DecisionOutput {
            version: "1.0.0".to_string(),
            changed: false,
            rationale: "skipped".to_string(),
        });
    }

    let kind = BranchKind::classify(&input.branch_name);
    let release_version = match kind {
        BranchKind::Release => extract_release_version(&input.branch_name, &input.tag_prefix),
        _ => None,
    };

    // One tag enumeration per decision; rule 3 of the change detector reuses
    // the parsed list.
    let tags = parse_tags(repo, &input.tag_prefix)?;

    let slug = project.slug();
    let global = selector::select_latest_global(&tags, release_version);
    let project_tag = selector::select_latest_project(&tags, &slug, release_version);
    let base = selector::resolve_base(global, project_tag);

    let deps = resolve_dependencies(project, projects);
    let report = changes::detect_changes(
        repo,
        base.commit_id,
        input.head_commit_id,
        project,
        &deps,
        &tags,
    )?;

    let version = composer::compose_version(
        kind,
        &base,
        release_version,
        report.changed,
        &input.branch_name,
        input.head_commit_id,
    );

    let mut rationale = report.rationale;
    if config.debug {
        rationale.push_str(&format!("; base {} ({})", base.semver, base.origin.describe()));
        if kind == BranchKind::Release && release_version.is_none() {
            rationale.push_str("; release version not parsed from branch name, using base series");
        }
        if config.extra_debug {
            rationale.push_str(&format!("; {} version tags considered", tags.len()));
        }
    }

    Ok(DecisionOutput {
        version,
        changed: report.changed,
        rationale,
    })
}

fn parse_tags<R: Repository>(repo: &R, tag_prefix: &str) -> Result<Vec<VersionTag>> {
    let mut parsed = Vec::new();
    for entry in repo.tags()? {
        match VersionTag::parse(&entry.name, entry.target, tag_prefix) {
            Some(tag) => parsed.push(tag),
            None => debug!(tag = %entry.name, "ignoring tag without a parseable version"),
        }
    }
    Ok(parsed)
}

/// Resolve the project's dependency paths against the loaded project set.
/// A path with no matching project falls back to its last segment as the
/// name, so a partially-loaded manifest still matches conventionally-named
/// tags.
fn resolve_dependencies(project: &ProjectRef, projects: &[ProjectRef]) -> Vec<DependencyRef> {
    project
        .dependencies
        .iter()
        .map(|dep_path| {
            let path = normalize_path(dep_path);
            match projects.iter().find(|p| p.relative_path == path) {
                Some(p) => DependencyRef {
                    path,
                    name: p.name.clone(),
                    slug: p.slug(),
                },
                None => {
                    let name = path
                        .rsplit('/')
                        .next()
                        .unwrap_or(path.as_str())
                        .to_string();
                    let slug = name.to_lowercase();
                    DependencyRef { path, name, slug }
                }
            }
        })
        .collect()
}
