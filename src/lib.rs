//! A small content-addressed object store using git's loose object format.
//!
//! Blobs, trees and commits are framed as `"<kind> <len>\0<payload>"`, named by the SHA-1 of
//! that framing, and stored zlib-compressed under `.git/objects/<2 hex>/<38 hex>`.

#[cfg(test)]
mod test;

pub mod author;
pub mod digest;
pub mod error;
pub mod filemode;
pub mod repo;
pub mod storable;
pub mod timestamp;
mod util;

pub use crate::author::{Clock, FixedClock, Identity, SystemClock};
pub use crate::digest::Digest;
pub use crate::error::{Error, Result};
pub use crate::repo::database::{Database, LoadedItem};
pub use crate::repo::{Listing, Repo};
