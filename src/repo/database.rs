use crate::digest::Digest;
use crate::error::{Error, Result, WithPath};
use crate::storable::blob::Blob;
use crate::storable::commit::Commit;
use crate::storable::tree::{Tree, TreeEntry};
use crate::storable::{parse_header, ObjectKind, Storable};
use crate::util;

use std::io::{ErrorKind, Read, Write};

use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::*;

/// The loose object store: `objects/<2 hex>/<38 hex>`, each file the zlib-compressed canonical
/// encoding of one object.
pub struct Database {
    pub database_root: Utf8PathBuf,
}

impl Database {
    pub fn new(git_folder: impl AsRef<Utf8Path>) -> Self {
        Self {
            database_root: git_folder.as_ref().join("objects"),
        }
    }

    /// Hash and store an already framed `"<kind> <len>\0<payload>"` byte sequence.
    pub fn write(&self, canonical: &[u8]) -> Result<Digest> {
        let oid = Digest::new(canonical);
        self.write_formatted(&oid, canonical)?;
        Ok(oid)
    }

    pub fn store<T: Storable>(&self, obj: &T) -> Result<()> {
        self.write_formatted(obj.get_oid(), obj.formatted())
    }

    /// Compress `content` into a temporary file next to its final location, then rename it into
    /// place. An existing object at that path is replaced with identical bytes.
    fn write_formatted(&self, oid: &Digest, content: &[u8]) -> Result<()> {
        trace!(%oid, "Writing object to database");

        let object_path = self.object_path(oid);

        let dirname = object_path
            .parent()
            .unwrap_or_else(|| self.database_root.as_path());

        // `create_dir_all` already treats a directory that appeared underneath us as success.
        std::fs::create_dir_all(dirname).with_path(dirname)?;

        let temp_path = dirname.join(util::tmp_file_name());

        let mut e = ZlibEncoder::new(Vec::with_capacity(content.len()), Compression::default());
        e.write_all(content).with_path(&temp_path)?;
        let compressed_bytes = e.finish().with_path(&temp_path)?;

        let mut file = std::fs::File::create(&temp_path).with_path(&temp_path)?;
        file.write_all(&compressed_bytes).with_path(&temp_path)?;
        drop(file);

        std::fs::rename(&temp_path, &object_path).with_path(&object_path)?;

        Ok(())
    }

    pub fn object_path(&self, oid: &Digest) -> Utf8PathBuf {
        let mut x = self.database_root.to_owned();
        let oid = oid.to_hex();
        let (prefix, suffix) = oid.split_at(2);
        debug_assert_eq!(prefix.len(), 2);
        x.push(prefix);
        x.push(suffix);
        x
    }

    pub fn exists(&self, oid: &Digest) -> bool {
        self.object_path(oid).exists()
    }

    /// Read and decompress an object, returning its full canonical encoding (header included).
    /// The header is validated before anything is returned.
    pub fn read_to_vec(&self, oid: &Digest) -> Result<Vec<u8>> {
        trace!(%oid, "Reading object from database");

        let object_path = self.object_path(oid);

        let compressed = match std::fs::read(&object_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::ObjectNotFound(*oid)),
            Err(e) => return Err(e).with_path(&object_path),
        };

        let mut d = ZlibDecoder::new(&*compressed);

        let mut decompressed = Vec::new();

        d.read_to_end(&mut decompressed)
            .map_err(|e| Error::CorruptObject {
                oid: *oid,
                reason: format!("failed to decompress: {e}"),
            })?;

        parse_header(&decompressed).map_err(|reason| Error::CorruptObject { oid: *oid, reason })?;

        Ok(decompressed)
    }

    /// Read an object and split off its header.
    pub fn read_typed(&self, oid: &Digest) -> Result<(ObjectKind, Vec<u8>)> {
        let mut bytes = self.read_to_vec(oid)?;
        let (kind, payload) =
            parse_header(&bytes).map_err(|reason| Error::CorruptObject { oid: *oid, reason })?;
        let content_start = bytes.len() - payload.len();
        bytes.drain(..content_start);
        Ok((kind, bytes))
    }

    /// The object's bytes with the `"<kind> <len>\0"` prefix removed.
    pub fn read_payload(&self, oid: &Digest) -> Result<Vec<u8>> {
        Ok(self.read_typed(oid)?.1)
    }

    /// Read an object's payload, insisting that it is of kind `expected`.
    pub fn read_kind(&self, oid: &Digest, expected: ObjectKind) -> Result<Vec<u8>> {
        let (found, payload) = self.read_typed(oid)?;
        if found != expected {
            return Err(Error::WrongKind {
                oid: *oid,
                expected,
                found,
            });
        }
        Ok(payload)
    }

    pub fn load(&self, oid: &Digest) -> Result<LoadedItem> {
        let (kind, bytes) = self.read_typed(oid)?;
        debug!(%oid, %kind, len = bytes.len(), "Loaded object");

        match kind {
            ObjectKind::Blob => Ok(LoadedItem::Blob(bytes)),
            ObjectKind::Tree => Ok(LoadedItem::Tree(Tree::parse(&bytes)?)),
            ObjectKind::Commit => Ok(LoadedItem::Commit(Commit::parse(&bytes)?)),
        }
    }

    /// Store `data` as a blob.
    pub fn store_blob(&self, data: &[u8]) -> Result<Digest> {
        let blob = Blob::new(data);
        self.store(&blob)?;
        Ok(blob.into_oid())
    }
}

/// A decoded object.
pub enum LoadedItem {
    Blob(Vec<u8>),
    Tree(Vec<TreeEntry>),
    Commit(Commit),
}

impl LoadedItem {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Blob(_) => ObjectKind::Blob,
            Self::Tree(_) => ObjectKind::Tree,
            Self::Commit(_) => ObjectKind::Commit,
        }
    }
}
