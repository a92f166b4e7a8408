use std::fmt::Display;

use bstr::{BStr, BString, ByteSlice};

use super::{frame, ObjectKind, Storable};

use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::filemode::{EntryType, FileMode};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    mode: FileMode,
    name: BString,
    oid: Digest,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<BString>, oid: Digest) -> Self {
        Self {
            mode,
            name: name.into(),
            oid,
        }
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn entry_type(&self) -> EntryType {
        self.mode.entry_type()
    }

    pub fn name(&self) -> &BStr {
        self.name.as_ref()
    }

    pub fn oid(&self) -> &Digest {
        &self.oid
    }

    /// Parses an entry from the front of a tree payload. Entries are of the form
    /// `<mode> <name>\0<20 byte oid>`, with nothing separating one entry from the next.
    ///
    /// Returns the entry and the unconsumed remainder.
    fn parse(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let nul_idx = memchr::memchr(b'\0', bytes)
            .ok_or_else(|| Error::MalformedTree("entry header is not NUL terminated".into()))?;
        let header = &bytes[..nul_idx];

        let space_idx = memchr::memchr(b' ', header).ok_or_else(|| {
            Error::MalformedTree(format!("entry header {:?} has no mode", header.as_bstr()))
        })?;
        let mode = FileMode::parse(&header[..space_idx])?;

        let name = &header[space_idx + 1..];
        if name.is_empty() || name.contains(&b'/') {
            return Err(Error::MalformedTree(format!(
                "invalid entry name {:?}",
                name.as_bstr()
            )));
        }

        let rest = &bytes[nul_idx + 1..];
        if rest.len() < 20 {
            return Err(Error::TruncatedTree {
                name: name.to_str_lossy().into_owned(),
                available: rest.len(),
            });
        }
        let (oid, rest) = rest.split_at(20);
        let mut raw = [0; 20];
        raw.copy_from_slice(oid);

        Ok((Self::new(mode, name, Digest(raw)), rest))
    }
}

impl Display for TreeEntry {
    /// `<mode> <type> <hash>\t<name>`, the long `ls-tree` form.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:o} {} {}\t{}",
            self.mode,
            self.entry_type(),
            self.oid,
            self.name
        )
    }
}

pub struct Tree {
    entries: Vec<TreeEntry>,
    formatted: Vec<u8>,
    oid: Digest,
}

impl Tree {
    /// Encode a directory snapshot. Entries end up in ascending byte order of name no matter
    /// what order they are supplied in, so the encoding depends only on the entry set.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_unstable_by(|a, b| a.name.cmp(&b.name));

        let mut data = Vec::new();
        for entry in &entries {
            data.extend_from_slice(format!("{:o}", entry.mode).as_bytes());
            data.push(b' ');
            data.extend_from_slice(&entry.name);
            data.push(b'\0');
            data.extend_from_slice(&*entry.oid);
        }

        let formatted = frame(ObjectKind::Tree, &data);
        let oid = Digest::new(&formatted);

        Self {
            entries,
            formatted,
            oid,
        }
    }

    /// Decode a tree payload (the bytes after the header) into its entries, in on-disk order.
    pub fn parse(mut bytes: &[u8]) -> Result<Vec<TreeEntry>> {
        let mut entries = Vec::new();
        while !bytes.is_empty() {
            let (entry, rest) = TreeEntry::parse(bytes)?;
            entries.push(entry);
            bytes = rest;
        }
        Ok(entries)
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }
}

impl Storable for Tree {
    fn formatted(&self) -> &[u8] {
        // "{type} {len}\0{formatted}"
        &self.formatted
    }

    fn get_oid(&self) -> &Digest {
        &self.oid
    }

    fn into_oid(self) -> Digest {
        self.oid
    }
}
