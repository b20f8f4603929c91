//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory, with a local
    /// identity so the `git` CLI can commit in it.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
            config.set_bool("commit.gpgsign", false).unwrap();
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Canonical form of the work tree path, as `resolve_repo_root` reports it.
    pub fn canonical_path(&self) -> PathBuf {
        std::fs::canonicalize(self.dir.path()).expect("Failed to canonicalize repo path")
    }

    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write `contents` to `name` and add it to the index without committing.
    pub fn stage_file(&self, name: &str, contents: &str) {
        let file_path = self.dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&file_path, contents).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(name)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Commit `contents` as `name` on HEAD. Returns the commit OID.
    pub fn commit_file(&self, name: &str, contents: &str, message: &str) -> Oid {
        self.stage_file(name, contents);

        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let sig = self.signature();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Commit a change to `test.txt` with the given message.
    pub fn commit(&self, message: &str) -> Oid {
        let content = format!(
            "{}\n{}",
            message,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );
        self.commit_file("test.txt", &content, message)
    }

    /// Create a side commit off `base` that is not on HEAD.
    pub fn side_commit(&self, base: Oid, name: &str, contents: &str, message: &str) -> Oid {
        let base_commit = self.repo.find_commit(base).expect("Failed to find base");
        let blob = self.repo.blob(contents.as_bytes()).expect("Failed to write blob");

        let mut builder = self
            .repo
            .treebuilder(Some(&base_commit.tree().unwrap()))
            .expect("Failed to create tree builder");
        builder.insert(name, blob, 0o100644).expect("Failed to insert blob");
        let tree_id = builder.write().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).unwrap();

        let sig = self.signature();
        self.repo
            .commit(None, &sig, &sig, message, &tree, &[&base_commit])
            .expect("Failed to create side commit")
    }

    /// Merge `other` into HEAD keeping HEAD's tree, so the merge commit's
    /// diff against its first parent is empty.
    pub fn merge_ours(&self, other: Oid, message: &str) -> Oid {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        let other = self.repo.find_commit(other).unwrap();
        let tree = head.tree().unwrap();

        let sig = self.signature();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&head, &other])
            .expect("Failed to create merge commit")
    }
}
