//! Read-only git access abstraction layer
//!
//! This module provides a trait-based abstraction over the repository reads
//! the version-decision engine needs, allowing for multiple implementations
//! including real Git repositories and mock implementations for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! Most code should depend on the [Repository] trait rather than concrete
//! implementations to enable easy testing and flexibility. The engine never
//! mutates the repository; the trait deliberately exposes reads only.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// The checked-out branch and its tip commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchTip {
    pub name: String,
    pub tip: Oid,
}

/// A tag name together with the commit it ultimately points to.
///
/// Annotated and lightweight tags are represented uniformly; annotated tag
/// objects are peeled to the tagged commit before they get here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub name: String,
    pub target: Oid,
}

/// How a path changed between two commit trees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// One changed path between two commit trees.
///
/// Paths are repository-root-relative with forward slashes and no leading
/// `./`. A renamed file contributes a single entry keyed on the new path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub path: String,
    pub kind: ChangeKind,
}

/// Common read-only git operation trait for abstraction
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` so independent decisions can run on
/// their own handles in parallel.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying failures to [crate::error::MonoVersionError::RepoUnavailable]
/// (the repository cannot be read) or
/// [crate::error::MonoVersionError::UnknownCommit] (a referenced commit is
/// missing).
pub trait Repository: Send + Sync {
    /// Get the current branch name and its tip commit
    ///
    /// # Returns
    /// * `Ok(BranchTip)` - Name and tip OID of the checked-out branch
    /// * `Err` - If HEAD cannot be resolved
    fn current_branch(&self) -> Result<BranchTip>;

    /// Enumerate all tags with their target commits
    ///
    /// Annotated tags are peeled to the commit they ultimately reference.
    ///
    /// # Example
    /// ```rust
    /// # use mono_version::git::{MockRepository, Repository};
    /// # use git2::Oid;
    /// let mut repo = MockRepository::new();
    /// repo.add_tag("v1.0.0", Oid::from_bytes(&[1; 20]).unwrap());
    ///
    /// let tags = repo.tags().unwrap();
    /// assert_eq!(tags.len(), 1);
    /// assert_eq!(tags[0].name, "v1.0.0");
    /// ```
    fn tags(&self) -> Result<Vec<TagEntry>>;

    /// List the paths that differ between two commit trees
    ///
    /// # Arguments
    /// * `from` - The older commit
    /// * `to` - The newer commit
    ///
    /// # Returns
    /// * `Ok(Vec<ChangedFile>)` - Changed paths, forward-slash, root-relative
    /// * `Err` - If either commit is missing or the diff fails
    fn diff_paths(&self, from: Oid, to: Oid) -> Result<Vec<ChangedFile>>;

    /// Read a file's contents at a given commit
    ///
    /// # Returns
    /// * `Ok(Some(bytes))` - The blob contents
    /// * `Ok(None)` - The path does not exist in that commit's tree
    /// * `Err` - If the commit is missing or the repository cannot be read
    fn read_blob(&self, commit: Oid, path: &str) -> Result<Option<Vec<u8>>>;

    /// Test whether `ancestor` is an ancestor of `descendant`
    ///
    /// The relation is reflexive: a commit is its own ancestor. Callers that
    /// need "strictly newer" must additionally compare the two OIDs.
    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool>;
}
