pub mod database;

mod commit;
mod workspace;

use std::fmt::Display;
use std::io::ErrorKind;
use std::path::Path;

use bstr::BString;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::*;

use crate::author::{Clock, Identity, SystemClock};
use crate::digest::Digest;
use crate::error::{Error, Result, WithPath};
use crate::storable::commit::Commit;
use crate::storable::tree::{Tree, TreeEntry};
use crate::storable::ObjectKind;

use database::{Database, LoadedItem};

/// Name of the metadata directory at the root of a repository.
pub const GIT_DIR: &str = ".git";

/// What `HEAD` holds in a fresh repository. The core never moves it.
pub const DEFAULT_HEAD: &str = "ref: refs/heads/main\n";

pub struct Repo {
    dir: Utf8PathBuf,
    git_dir: Utf8PathBuf,
    database: Database,
    identity: Identity,
    clock: Box<dyn Clock>,
    detect_modes: bool,
}

impl Repo {
    /// Create `<root>/.git` with `objects/`, `refs/` and `HEAD`. Fails if the metadata directory
    /// is already there.
    pub fn init(root: impl AsRef<Utf8Path>) -> Result<()> {
        let root = root.as_ref();
        let git_dir = root.join(GIT_DIR);
        trace!(path=%root, "Initialising repo");

        std::fs::create_dir_all(root).with_path(root)?;
        match std::fs::create_dir(&git_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::AlreadyExists(git_dir))
            }
            Err(e) => return Err(e).with_path(&git_dir),
        }

        for d in ["objects", "refs"] {
            let dir = git_dir.join(d);
            trace!(path=%dir, "Creating directory");
            std::fs::create_dir(&dir).with_path(&dir)?;
        }

        let head = git_dir.join("HEAD");
        std::fs::write(&head, DEFAULT_HEAD).with_path(&head)?;

        debug!(path=%git_dir, "Initialised repo");
        Ok(())
    }

    pub fn open(repo_root: impl Into<Utf8PathBuf>) -> Result<Self> {
        let dir = repo_root.into();
        let git_dir = dir.join(GIT_DIR);
        if !git_dir.join("objects").is_dir() {
            return Err(Error::NotARepository(dir));
        }
        let database = Database::new(&git_dir);
        trace!(path=%dir, "Opened repo");
        Ok(Self {
            dir,
            git_dir,
            database,
            identity: Identity::default(),
            clock: Box::new(SystemClock),
            detect_modes: false,
        })
    }

    /// Use `identity` for the author and committer of new commits.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    /// Take commit timestamps from `clock` instead of the system clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// When enabled, executables are recorded as `100755` and symlinks as `120000`. Otherwise
    /// every file is `100644` and symlinks are followed.
    pub fn with_mode_detection(mut self, detect_modes: bool) -> Self {
        self.detect_modes = detect_modes;
        self
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn git_dir(&self) -> &Utf8Path {
        &self.git_dir
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// The raw content of a blob.
    pub fn read_blob(&self, oid: &Digest) -> Result<Vec<u8>> {
        self.database.read_kind(oid, ObjectKind::Blob)
    }

    /// Store the content of the file at `path` as a blob.
    pub fn write_blob(&self, path: impl AsRef<Path>) -> Result<Digest> {
        let path = path.as_ref();
        trace!(?path, "Hashing file");
        let data = std::fs::read(path).with_path(path)?;
        self.database.store_blob(&data)
    }

    pub fn read_tree(&self, oid: &Digest) -> Result<Vec<TreeEntry>> {
        let payload = self.database.read_kind(oid, ObjectKind::Tree)?;
        Tree::parse(&payload)
    }

    /// The entries of a tree in on-disk order, either as bare names or as full entries.
    pub fn list_tree(&self, oid: &Digest, name_only: bool) -> Result<Vec<Listing>> {
        let entries = self.read_tree(oid)?;
        Ok(entries
            .into_iter()
            .map(|entry| {
                if name_only {
                    Listing::Name(entry.name().to_owned())
                } else {
                    Listing::Entry(entry)
                }
            })
            .collect())
    }

    pub fn read_commit(&self, oid: &Digest) -> Result<Commit> {
        let payload = self.database.read_kind(oid, ObjectKind::Commit)?;
        Commit::parse(&payload)
    }

    /// Decode whatever object `oid` names.
    pub fn cat_file(&self, oid: &Digest) -> Result<LoadedItem> {
        self.database.load(oid)
    }
}

/// One line of `ls-tree` output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Listing {
    Name(BString),
    Entry(TreeEntry),
}

impl Listing {
    pub fn name(&self) -> &bstr::BStr {
        match self {
            Listing::Name(name) => name.as_ref(),
            Listing::Entry(entry) => entry.name(),
        }
    }
}

impl Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Listing::Name(name) => write!(f, "{name}"),
            Listing::Entry(entry) => write!(f, "{entry}"),
        }
    }
}
