mod parse;

use std::fmt::Display;

use super::{frame, ObjectKind, Storable};

use crate::author::Identity;
use crate::digest::Digest;
use crate::timestamp::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: Timestamp,
}

impl Signature {
    pub fn new(identity: &Identity, when: Timestamp) -> Self {
        Self {
            name: identity.name.clone(),
            email: identity.email.clone(),
            when,
        }
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}> {}", self.name, self.email, self.when)
    }
}

pub struct Commit {
    tree_id: Digest,
    parent: Option<Digest>,
    author: Signature,
    committer: Signature,
    message: String,
    formatted: Vec<u8>,
    oid: Digest,
}

impl Commit {
    /// Build a commit whose author and committer are both `signature`. Without a parent this
    /// is a root commit.
    pub fn new(
        tree_id: Digest,
        parent: Option<Digest>,
        signature: Signature,
        message: String,
    ) -> Self {
        let data = format!(
            "\
            tree {}\n\
            {}\
            author {}\n\
            committer {}\n\
            \n\
            {}\n",
            tree_id,
            match parent {
                Some(parent) => format!("parent {parent}\n"),
                None => String::new(),
            },
            signature,
            signature,
            message
        );

        let formatted = frame(ObjectKind::Commit, data.as_bytes());
        let oid = Digest::new(&formatted);

        Self {
            tree_id,
            parent,
            committer: signature.clone(),
            author: signature,
            message,
            formatted,
            oid,
        }
    }

    pub fn tree_id(&self) -> &Digest {
        &self.tree_id
    }

    pub fn parent(&self) -> Option<&Digest> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Signature {
        &self.author
    }

    pub fn committer(&self) -> &Signature {
        &self.committer
    }

    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// The commit text, without the object header.
    pub fn payload(&self) -> &[u8] {
        let start = memchr::memchr(b'\0', &self.formatted).map_or(0, |nul| nul + 1);
        &self.formatted[start..]
    }
}

impl Storable for Commit {
    fn formatted(&self) -> &[u8] {
        &self.formatted
    }

    fn get_oid(&self) -> &Digest {
        &self.oid
    }

    fn into_oid(self) -> Digest {
        self.oid
    }
}
