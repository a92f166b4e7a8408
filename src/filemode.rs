use std::fmt::Display;

use crate::error::{Error, Result};

/// The mode recorded against a tree entry. Only the four modes git writes into trees are
/// representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct FileMode(u32);

impl std::fmt::Octal for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

impl FileMode {
    pub const DIRECTORY: FileMode = FileMode(0o040000);
    pub const EXECUTABLE: FileMode = FileMode(0o100755);
    pub const REGULAR: FileMode = FileMode(0o100644);
    pub const SYMLINK: FileMode = FileMode(0o120000);

    /// Whether the owner-execute bit is set in a raw `st_mode`.
    pub fn is_executable(st_mode: u32) -> bool {
        st_mode & libc::S_IXUSR as u32 != 0
    }

    /// Parse the ASCII mode token of a tree entry, e.g. `b"100644"`.
    pub fn parse(token: &[u8]) -> Result<Self> {
        match token {
            b"100644" => Ok(Self::REGULAR),
            b"100755" => Ok(Self::EXECUTABLE),
            b"120000" => Ok(Self::SYMLINK),
            b"40000" => Ok(Self::DIRECTORY),
            other => Err(Error::MalformedTree(format!(
                "unrecognised mode {:?}",
                String::from_utf8_lossy(other)
            ))),
        }
    }

    pub fn entry_type(self) -> EntryType {
        if self == Self::DIRECTORY {
            EntryType::Directory
        } else {
            EntryType::Blob
        }
    }
}

/// What kind of object a tree entry points at, as reported by `ls-tree`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryType {
    Blob,
    Directory,
}

impl Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EntryType::Blob => "blob",
            EntryType::Directory => "directory",
        })
    }
}
