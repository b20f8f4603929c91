//! In-memory example store and scope keys.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

/// Store key for examples shared by every repository.
pub const GLOBAL_SCOPE: &str = "global";

/// One historical change paired with the message a human wrote for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub diff: String,
    pub message: String,
}

/// Where a set of examples lives in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    /// Canonical absolute path of a repository root.
    Repo(PathBuf),
}

impl Scope {
    /// The string used as the store key.
    pub fn key(&self) -> String {
        match self {
            Scope::Global => GLOBAL_SCOPE.to_string(),
            Scope::Repo(path) => path.to_string_lossy().into_owned(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Mapping from scope key to examples, in the order they were learned.
///
/// Serializes as `{"examples": {<key>: [{"diff", "message"}, ...]}}`.
/// Keys are kept sorted so the on-disk form is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleStore {
    #[serde(default, deserialize_with = "null_as_empty")]
    examples: BTreeMap<String, Vec<Example>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<Example>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

impl ExampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Number of scopes with stored examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.examples.keys().map(String::as_str)
    }

    /// Examples stored under `key`, empty if the scope is unknown.
    pub fn get(&self, key: &str) -> &[Example] {
        self.examples.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.examples.contains_key(key)
    }

    /// Replace the examples for `key` wholesale.
    pub fn set_scope(&mut self, key: impl Into<String>, examples: Vec<Example>) {
        self.examples.insert(key.into(), examples);
    }

    /// Remove `key`. Returns whether anything was there.
    pub fn clear_scope(&mut self, key: &str) -> bool {
        self.examples.remove(key).is_some()
    }

    /// Examples to condition a generation on: global ones first, then
    /// those learned for `repo_root`.
    pub fn examples_for(&self, repo_root: Option<&Path>) -> Vec<Example> {
        let mut selected = self.get(GLOBAL_SCOPE).to_vec();
        if let Some(root) = repo_root {
            selected.extend_from_slice(self.get(&Scope::Repo(root.to_path_buf()).key()));
        }
        selected
    }
}
