use std::fs::Metadata;
use std::io::ErrorKind;
use std::os::unix::prelude::*;
use std::path::Path;

use tracing::*;
use walkdir::WalkDir;

use crate::digest::Digest;
use crate::error::{Result, WithPath};
use crate::filemode::FileMode;
use crate::storable::tree::{Tree, TreeEntry};
use crate::storable::Storable;

use super::GIT_DIR;

/// `(st_dev, st_ino)` of a directory currently being walked.
type DirId = (u64, u64);

fn dir_id(metadata: &Metadata) -> DirId {
    (metadata.dev(), metadata.ino())
}

impl super::Repo {
    /// Snapshot the whole working directory (minus `.git`) and return the root tree's id.
    pub fn write_tree(&self) -> Result<Digest> {
        trace!(path=%self.dir, "Writing tree");
        self.build_tree(self.dir.as_std_path())
    }

    /// Store every file under `dir` as a blob and every directory as a tree, children before
    /// parents, and return the id of the tree for `dir` itself.
    ///
    /// A symlink that leads back to a directory already being walked is skipped. Objects
    /// written before a failure are left in place.
    pub fn build_tree(&self, dir: &Path) -> Result<Digest> {
        let metadata = std::fs::metadata(dir).with_path(dir)?;
        let mut ancestors = vec![dir_id(&metadata)];
        self.build_subtree(dir, &mut ancestors)
    }

    fn build_subtree(&self, dir: &Path, ancestors: &mut Vec<DirId>) -> Result<Digest> {
        let mut entries = Vec::new();

        let children = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for child in children {
            let child = child.map_err(std::io::Error::from).with_path(dir)?;
            let name = child.file_name();
            if name == GIT_DIR {
                continue;
            }
            let path = child.path();

            let (mode, oid) = match self.build_entry(path, ancestors)? {
                Some(built) => built,
                None => continue,
            };
            trace!(?path, mode = format_args!("{mode:o}"), oid = %oid.short(), "Found entry");
            entries.push(TreeEntry::new(mode, name.as_bytes(), oid));
        }

        let tree = Tree::new(entries);
        self.database.store(&tree)?;
        debug!(?dir, oid = %tree.get_oid(), "Stored tree");
        Ok(tree.into_oid())
    }

    /// Store one directory child, returning `None` for things that are neither files nor
    /// directories (sockets, fifos, dangling links, links back into the walk).
    fn build_entry(
        &self,
        path: &Path,
        ancestors: &mut Vec<DirId>,
    ) -> Result<Option<(FileMode, Digest)>> {
        if self.detect_modes {
            let metadata = std::fs::symlink_metadata(path).with_path(path)?;
            if metadata.file_type().is_symlink() {
                let target = std::fs::read_link(path).with_path(path)?;
                let oid = self.database.store_blob(target.as_os_str().as_bytes())?;
                return Ok(Some((FileMode::SYMLINK, oid)));
            }
            return self.build_plain_entry(path, metadata, ancestors);
        }

        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound && path.is_symlink() => {
                warn!(?path, "Skipping dangling symlink");
                return Ok(None);
            }
            Err(e) => return Err(e).with_path(path),
        };
        self.build_plain_entry(path, metadata, ancestors)
    }

    fn build_plain_entry(
        &self,
        path: &Path,
        metadata: Metadata,
        ancestors: &mut Vec<DirId>,
    ) -> Result<Option<(FileMode, Digest)>> {
        if metadata.is_dir() {
            let id = dir_id(&metadata);
            if ancestors.contains(&id) {
                warn!(?path, "Skipping symlink to a directory that contains it");
                return Ok(None);
            }
            ancestors.push(id);
            let built = self.build_subtree(path, ancestors);
            ancestors.pop();
            Ok(Some((FileMode::DIRECTORY, built?)))
        } else if metadata.is_file() {
            let mode = if self.detect_modes && FileMode::is_executable(metadata.mode()) {
                FileMode::EXECUTABLE
            } else {
                FileMode::REGULAR
            };
            let data = std::fs::read(path).with_path(path)?;
            let oid = self.database.store_blob(&data)?;
            Ok(Some((mode, oid)))
        } else {
            trace!(?path, "Skipping special file");
            Ok(None)
        }
    }
}
