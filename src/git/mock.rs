use crate::error::{MonoVersionError, Result};
use crate::git::{BranchTip, ChangedFile, Repository, TagEntry};
use git2::Oid;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock implementation of the Repository trait for testing
///
/// Simulates repository reads without requiring an actual git repository.
/// Branch tip, tags, per-commit-pair diffs, blobs, and the ancestry relation
/// are stored in memory, enabling fast, deterministic tests.
///
/// The mock also counts every trait-method call, which lets tests assert
/// that short-circuit paths perform no repository work at all.
///
/// ```rust
/// # use mono_version::git::{MockRepository, Repository};
/// # use git2::Oid;
/// let mut repo = MockRepository::new();
/// let oid = Oid::from_bytes(&[1; 20]).unwrap();
///
/// repo.set_current_branch("main", oid);
/// repo.add_tag("v1.0.0", oid);
///
/// assert_eq!(repo.current_branch().unwrap().tip, oid);
/// assert_eq!(repo.tags().unwrap().len(), 1);
/// assert_eq!(repo.call_count(), 2);
/// ```
pub struct MockRepository {
    branch: Option<BranchTip>,
    tags: Vec<TagEntry>,
    /// Diffs keyed by (from, to) commit pair
    diffs: HashMap<(Oid, Oid), Vec<ChangedFile>>,
    /// Blob contents keyed by (commit, path)
    blobs: HashMap<(Oid, String), Vec<u8>>,
    /// Explicit (ancestor, descendant) pairs; the relation is reflexive
    ancestry: HashSet<(Oid, Oid)>,
    calls: AtomicUsize,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            branch: None,
            tags: Vec::new(),
            diffs: HashMap::new(),
            blobs: HashMap::new(),
            ancestry: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Set the checked-out branch and its tip commit
    pub fn set_current_branch(&mut self, name: impl Into<String>, tip: Oid) {
        self.branch = Some(BranchTip {
            name: name.into(),
            tip,
        });
    }

    /// Add a tag pointing at a commit. Tags are enumerated in insertion
    /// order, which keeps tie-breaking deterministic in tests.
    pub fn add_tag(&mut self, name: impl Into<String>, target: Oid) {
        self.tags.push(TagEntry {
            name: name.into(),
            target,
        });
    }

    /// Record the diff between two commits
    pub fn set_diff(&mut self, from: Oid, to: Oid, changes: Vec<ChangedFile>) {
        self.diffs.insert((from, to), changes);
    }

    /// Store a blob at (commit, path)
    pub fn add_blob(&mut self, commit: Oid, path: impl Into<String>, contents: Vec<u8>) {
        self.blobs.insert((commit, path.into()), contents);
    }

    /// Declare `ancestor` an ancestor of `descendant`
    pub fn add_ancestor(&mut self, ancestor: Oid, descendant: Oid) {
        self.ancestry.insert((ancestor, descendant));
    }

    /// Number of trait-method calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<BranchTip> {
        self.record_call();
        self.branch
            .clone()
            .ok_or_else(|| MonoVersionError::repo_unavailable("no branch configured in mock"))
    }

    fn tags(&self) -> Result<Vec<TagEntry>> {
        self.record_call();
        Ok(self.tags.clone())
    }

    fn diff_paths(&self, from: Oid, to: Oid) -> Result<Vec<ChangedFile>> {
        self.record_call();
        Ok(self.diffs.get(&(from, to)).cloned().unwrap_or_default())
    }

    fn read_blob(&self, commit: Oid, path: &str) -> Result<Option<Vec<u8>>> {
        self.record_call();
        Ok(self.blobs.get(&(commit, path.to_string())).cloned())
    }

    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        self.record_call();
        Ok(ancestor == descendant || self.ancestry.contains(&(ancestor, descendant)))
    }
}
