//! Reads nodes out of a repository's object database.

use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Tree};

use super::graph::Node;
use crate::error::NotifierError;

/// An open repository, read as a graph of objects.
pub struct ObjectGraph {
    repo: Repository,
}

impl fmt::Debug for ObjectGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectGraph")
            .field("git_dir", &self.repo.path())
            .finish()
    }
}

impl ObjectGraph {
    /// Opens the repository at `path` (work tree or `.git` directory).
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Git`] if `path` is not a repository.
    pub fn open(path: &Path) -> Result<Self, NotifierError> {
        Ok(Self {
            repo: Repository::open(path)?,
        })
    }

    /// The loose-object directory, `<git_dir>/objects`.
    #[must_use]
    pub fn objects_dir(&self) -> PathBuf {
        self.repo.path().join("objects")
    }

    /// Every object id in the database, loose and packed, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Git`] if the database cannot be iterated.
    pub fn object_ids(&self) -> Result<Vec<Oid>, NotifierError> {
        let odb = self.repo.odb()?;
        let mut ids = Vec::new();
        odb.foreach(|oid| {
            ids.push(*oid);
            true
        })?;
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// Reads one object as a [`Node`].
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Git`] if the object is missing or unreadable.
    pub fn node(&self, oid: Oid) -> Result<Node, NotifierError> {
        let odb = self.repo.odb()?;
        let raw = odb.read(oid)?;
        let kind = raw.kind();
        let object = self.repo.find_object(oid, Some(kind))?;
        let short_id = object.short_id()?.as_str().unwrap_or_default().to_string();

        let content = match object.as_tree() {
            Some(tree) => describe_tree(tree),
            None => String::from_utf8_lossy(raw.data()).into_owned(),
        };

        tracing::debug!(%short_id, object_type = kind.str(), size = raw.len(), "read object");

        Ok(Node {
            id: oid.to_string(),
            short_id,
            object_type: kind.str().to_string(),
            size: raw.len(),
            content,
        })
    }

    /// Reads every object in the database.
    ///
    /// # Errors
    ///
    /// Returns the first [`NotifierError::Git`] encountered.
    pub fn nodes(&self) -> Result<Vec<Node>, NotifierError> {
        self.object_ids()?
            .into_iter()
            .map(|oid| self.node(oid))
            .collect()
    }
}

/// Renders a tree like `git ls-tree`: `<mode> <type> <id>\t<name>` per entry.
fn describe_tree(tree: &Tree<'_>) -> String {
    let mut out = String::new();
    for entry in tree.iter() {
        let kind = entry.kind().map_or("unknown", |k| k.str());
        let name = String::from_utf8_lossy(entry.name_bytes());
        let _ = writeln!(out, "{:06o} {kind} {}\t{name}", entry.filemode_raw(), entry.id());
    }
    out
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use git2::Signature;
    use tokio_test::assert_ok;

    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        graph: ObjectGraph,
        commit: Oid,
        tree: Oid,
        blob: Oid,
    }

    fn fixture() -> Fixture {
        let dir = assert_ok!(tempfile::tempdir());
        let repo = assert_ok!(Repository::init(dir.path()));
        let blob = assert_ok!(repo.blob(b"hello\n"));
        let tree = {
            let mut builder = assert_ok!(repo.treebuilder(None));
            assert_ok!(builder.insert("README", blob, 0o100_644));
            assert_ok!(builder.write())
        };
        let commit = {
            let tree_obj = assert_ok!(repo.find_tree(tree));
            let sig = assert_ok!(Signature::now("Test", "test@example.com"));
            assert_ok!(repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree_obj, &[]))
        };
        drop(repo);
        let graph = assert_ok!(ObjectGraph::open(dir.path()));
        Fixture {
            _dir: dir,
            graph,
            commit,
            tree,
            blob,
        }
    }

    #[test]
    fn lists_every_object() {
        let f = fixture();
        let ids = assert_ok!(f.graph.object_ids());
        assert_eq!(ids.len(), 3);
        for id in [f.commit, f.tree, f.blob] {
            assert!(ids.contains(&id));
        }
    }

    #[test]
    fn blob_node_carries_raw_content() {
        let f = fixture();
        let node = assert_ok!(f.graph.node(f.blob));
        assert_eq!(node.id, f.blob.to_string());
        assert_eq!(node.object_type, "blob");
        assert_eq!(node.size, 6);
        assert_eq!(node.content, "hello\n");
        assert!(node.id.starts_with(&node.short_id));
    }

    #[test]
    fn tree_node_lists_entries() {
        let f = fixture();
        let node = assert_ok!(f.graph.node(f.tree));
        assert_eq!(node.object_type, "tree");
        assert_eq!(node.content, format!("100644 blob {}\tREADME\n", f.blob));
        assert_eq!(node.edges().len(), 1);
    }

    #[test]
    fn commit_node_points_at_its_tree() {
        let f = fixture();
        let node = assert_ok!(f.graph.node(f.commit));
        assert_eq!(node.object_type, "commit");
        let targets: Vec<String> = node.edges().into_iter().map(|e| e.target).collect();
        assert_eq!(targets, vec![f.tree.to_string()]);
    }

    #[test]
    fn missing_object_is_git_error() {
        let f = fixture();
        let missing = assert_ok!(Oid::from_str("0123456789012345678901234567890123456789"));
        assert!(matches!(f.graph.node(missing), Err(NotifierError::Git(_))));
    }

    #[test]
    fn objects_dir_is_inside_git_dir() {
        let f = fixture();
        assert!(f.graph.objects_dir().ends_with(".git/objects"));
    }

    #[test]
    fn open_rejects_plain_directory() {
        let dir = assert_ok!(tempfile::tempdir());
        assert!(matches!(ObjectGraph::open(dir.path()), Err(NotifierError::Git(_))));
    }
}
