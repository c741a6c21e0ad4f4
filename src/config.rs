use crate::domain::project::{normalize_path, ProjectRef};
use crate::error::{MonoVersionError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default manifest file name, looked up at the repository root
pub const DEFAULT_MANIFEST_NAME: &str = "monoversion.toml";

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_true() -> bool {
    true
}

/// Engine settings controlling a version decision
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Literal prefix stripped from tag names
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    /// Short-circuit projects marked as test projects
    #[serde(default = "default_true")]
    pub skip_tests: bool,

    /// Short-circuit projects marked as not packable
    #[serde(default = "default_true")]
    pub skip_non_packable: bool,

    /// When set, overrides all computation with this version
    #[serde(default)]
    pub force_version: Option<String>,

    /// Append base-version detail to rationales; never alters decisions
    #[serde(default)]
    pub debug: bool,

    /// Append tag statistics to rationales; never alters decisions
    #[serde(default)]
    pub extra_debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_prefix: default_tag_prefix(),
            skip_tests: true,
            skip_non_packable: true,
            force_version: None,
            debug: false,
            extra_debug: false,
        }
    }
}

/// One `[[projects]]` entry in the manifest
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectEntry {
    pub name: String,

    /// Project directory relative to the repository root
    pub path: String,

    /// Relative paths of direct dependencies
    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub test: bool,

    #[serde(default = "default_true")]
    pub packable: bool,
}

/// Root of `monoversion.toml`: engine settings plus the project manifest
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Manifest {
    #[serde(default)]
    pub settings: Config,

    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

impl Manifest {
    /// The manifest's projects as engine values, with normalized paths
    pub fn projects(&self) -> Vec<ProjectRef> {
        self.projects
            .iter()
            .map(|entry| ProjectRef {
                name: entry.name.clone(),
                relative_path: normalize_path(&entry.path),
                dependencies: entry
                    .dependencies
                    .iter()
                    .map(|d| normalize_path(d))
                    .collect(),
                is_test: entry.test,
                is_packable: entry.packable,
            })
            .collect()
    }
}

/// Load the manifest.
///
/// An explicitly given path must exist and parse. Otherwise
/// `monoversion.toml` is looked up under `repo_root`; when absent, defaults
/// with an empty project list are returned.
pub fn load_manifest(explicit: Option<&Path>, repo_root: &Path) -> Result<Manifest> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = repo_root.join(DEFAULT_MANIFEST_NAME);
            if !candidate.exists() {
                return Ok(Manifest::default());
            }
            candidate
        }
    };

    let raw = fs::read_to_string(&path)?;
    toml::from_str(&raw)
        .map_err(|e| MonoVersionError::config(format!("cannot parse {}: {}", path.display(), e)))
}
