use crate::error::{MonoVersionError, Result};
use crate::git::{BranchTip, ChangeKind, ChangedFile, TagEntry};
use git2::{Delta, DiffFindOptions, DiffOptions, ObjectType, Oid, Repository as Git2Repo};
use std::path::{Path, PathBuf};

/// Concrete implementation of the Repository trait using the git2 library
///
/// This struct wraps `git2::Repository` and provides implementations for all
/// methods defined in the `Repository` trait. It performs read operations
/// only; the engine never creates tags or writes to the repository.
///
/// # Error Handling
///
/// Open/HEAD failures surface as `RepoUnavailable`; a commit id that cannot
/// be resolved surfaces as `UnknownCommit`. Other `git2::Error`s pass through
/// on the `Git` variant.
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository at the given path
    ///
    /// Searches for a `.git` directory starting from the provided path and
    /// going up the directory hierarchy until one is found.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use mono_version::git::repository::Git2Repository;
    /// let repo = Git2Repository::open(".").expect("not inside a git repository");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)
            .map_err(|e| MonoVersionError::repo_unavailable(format!("cannot open repository: {}", e)))?;

        Ok(Git2Repository { repo })
    }

    /// Create a Git2Repository from an existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// The repository's working directory, if it has one
    pub fn workdir(&self) -> Option<PathBuf> {
        self.repo.workdir().map(Path::to_path_buf)
    }

    fn find_commit_checked(&self, oid: Oid) -> Result<git2::Commit<'_>> {
        self.repo
            .find_commit(oid)
            .map_err(|_| MonoVersionError::unknown_commit(oid.to_string()))
    }
}

impl super::Repository for Git2Repository {
    fn current_branch(&self) -> Result<BranchTip> {
        let head = self
            .repo
            .head()
            .map_err(|e| MonoVersionError::repo_unavailable(format!("cannot read HEAD: {}", e)))?;

        let tip = head.target().ok_or_else(|| {
            MonoVersionError::repo_unavailable("HEAD does not point at a commit".to_string())
        })?;

        let name = head.shorthand().unwrap_or("HEAD").to_string();

        Ok(BranchTip { name, tip })
    }

    fn tags(&self) -> Result<Vec<TagEntry>> {
        let names = self.repo.tag_names(None)?;

        let mut entries = Vec::new();
        for name in names.iter().flatten() {
            let reference = match self.repo.find_reference(&format!("refs/tags/{}", name)) {
                Ok(reference) => reference,
                Err(_) => continue,
            };

            // Peel annotated tag objects through to the tagged commit so
            // lightweight and annotated tags look the same to callers.
            if let Ok(object) = reference.peel(ObjectType::Commit) {
                entries.push(TagEntry {
                    name: name.to_string(),
                    target: object.id(),
                });
            }
        }

        Ok(entries)
    }

    fn diff_paths(&self, from: Oid, to: Oid) -> Result<Vec<ChangedFile>> {
        let from_tree = self.find_commit_checked(from)?.tree()?;
        let to_tree = self.find_commit_checked(to)?.tree()?;

        let mut opts = DiffOptions::new();
        let mut diff =
            self.repo
                .diff_tree_to_tree(Some(&from_tree), Some(&to_tree), Some(&mut opts))?;

        let mut find = DiffFindOptions::new();
        find.renames(true);
        diff.find_similar(Some(&mut find))?;

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            let kind = match delta.status() {
                Delta::Added | Delta::Copied => ChangeKind::Added,
                Delta::Deleted => ChangeKind::Deleted,
                Delta::Renamed => ChangeKind::Renamed,
                _ => ChangeKind::Modified,
            };

            // A rename is keyed on its new path; a deletion only has the old.
            let file = match kind {
                ChangeKind::Deleted => delta.old_file(),
                _ => delta.new_file(),
            };

            if let Some(path) = file.path().and_then(|p| p.to_str()) {
                changes.push(ChangedFile {
                    path: path.replace('\\', "/"),
                    kind,
                });
            }
        }

        Ok(changes)
    }

    fn read_blob(&self, commit: Oid, path: &str) -> Result<Option<Vec<u8>>> {
        let tree = self.find_commit_checked(commit)?.tree()?;

        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let object = entry.to_object(&self.repo)?;
        match object.as_blob() {
            Some(blob) => Ok(Some(blob.content().to_vec())),
            None => Ok(None),
        }
    }

    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        if ancestor == descendant {
            return Ok(true);
        }

        self.find_commit_checked(ancestor)?;
        self.find_commit_checked(descendant)?;

        self.repo
            .graph_descendant_of(descendant, ancestor)
            .map_err(Into::into)
    }
}

// SAFETY: Git2Repository wraps git2::Repository which is Send.
// git2 library is thread-safe for read operations via libgit2's thread-safe
// design, and this type only performs reads.
unsafe impl Sync for Git2Repository {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_nonexistent_path_is_repo_unavailable() {
        let result = Git2Repository::open("/definitely/not/a/repo/path");
        match result {
            Err(MonoVersionError::RepoUnavailable(_)) => {}
            other => panic!("expected RepoUnavailable, got {:?}", other.err()),
        }
    }
}
