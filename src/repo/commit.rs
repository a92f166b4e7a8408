use tracing::trace;

use crate::digest::Digest;
use crate::error::Result;
use crate::storable::commit::{Commit, Signature};
use crate::storable::Storable;

impl super::Repo {
    /// Record `tree_id` as a commit, optionally on top of `parent`. Neither id is checked
    /// against the store, but the identity is checked so the commit can be parsed again.
    pub fn write_commit(
        &self,
        tree_id: &Digest,
        parent: Option<&Digest>,
        message: &str,
    ) -> Result<Digest> {
        trace!(tree = %tree_id, parent = ?parent, %message, "Starting commit");

        self.identity.validate()?;

        let signature = Signature::new(&self.identity, self.clock.now());
        let commit = Commit::new(*tree_id, parent.copied(), signature, message.to_owned());

        self.database.store(&commit)?;

        Ok(commit.into_oid())
    }
}
