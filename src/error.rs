use std::io;
use std::path::{Path, PathBuf};

use camino::Utf8PathBuf;

use crate::digest::Digest;
use crate::storable::ObjectKind;

/// Everything that can go wrong while reading or writing the object store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The string is not 40 lowercase hex characters.
    #[error("invalid object hash: {0:?}")]
    InvalidHash(String),

    #[error("object not found: {0}")]
    ObjectNotFound(Digest),

    /// The stored file failed to decompress, or its `"<kind> <len>\0"` header is bad.
    #[error("corrupt object {oid}: {reason}")]
    CorruptObject { oid: Digest, reason: String },

    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// An entry's 20 byte hash runs past the end of the payload.
    #[error("truncated tree: entry {name:?} needs 20 hash bytes, found {available}")]
    TruncatedTree { name: String, available: usize },

    #[error("malformed commit: {0}")]
    MalformedCommit(String),

    /// An author name or email that would not survive a round trip through a commit.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("object {oid} is a {found}, expected a {expected}")]
    WrongKind {
        oid: Digest,
        expected: ObjectKind,
        found: ObjectKind,
    },

    #[error("{}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("repository already exists: {0}")]
    AlreadyExists(Utf8PathBuf),

    #[error("not a repository (no metadata directory): {0}")]
    NotARepository(Utf8PathBuf),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Attach the path an I/O operation was working on.
pub(crate) trait WithPath<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> WithPath<T> for io::Result<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Filesystem {
            path: path.as_ref().to_owned(),
            source,
        })
    }
}
