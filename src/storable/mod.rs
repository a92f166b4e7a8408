pub mod blob;
pub mod commit;
pub mod tree;

use std::fmt::Display;

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit1};
use nom::combinator::{map_opt, value};
use nom::sequence::{separated_pair, terminated};
use nom::IResult;

use crate::digest::Digest;

/// The closed set of object kinds the store knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Storable {
    /// Returns the storable uncompressed but formatted `"{type} {len}\0{data}"`.
    /// e.g.
    /// a blob `"hello\n"` becomes `"blob 6\0hello\n"`
    fn formatted(&self) -> &[u8];
    fn get_oid(&self) -> &Digest;
    fn into_oid(self) -> Digest;
}

/// Wrap a payload in the `"<kind> <len>\0"` header. The result is the canonical encoding that
/// gets hashed and stored.
pub fn frame(kind: ObjectKind, data: &[u8]) -> Vec<u8> {
    let mut formatted = Vec::with_capacity(data.len() + 16);
    formatted.extend_from_slice(kind.as_str().as_bytes());
    formatted.push(b' ');
    formatted.extend_from_slice(format!("{}", data.len()).as_bytes());
    formatted.push(b'\0');
    formatted.extend_from_slice(data);
    formatted
}

fn header(input: &[u8]) -> IResult<&[u8], (ObjectKind, usize)> {
    let kind = alt((
        value(ObjectKind::Blob, tag("blob")),
        value(ObjectKind::Tree, tag("tree")),
        value(ObjectKind::Commit, tag("commit")),
    ));
    let len = map_opt(digit1, |d: &[u8]| std::str::from_utf8(d).ok()?.parse::<usize>().ok());
    terminated(separated_pair(kind, char(' '), len), char('\0'))(input)
}

/// Split a canonical encoding into its kind and payload, checking that the declared length
/// matches what follows the header.
///
/// The error is a human readable reason; callers attach the object id.
pub fn parse_header(bytes: &[u8]) -> Result<(ObjectKind, &[u8]), String> {
    let (payload, (kind, len)) = header(bytes).map_err(|_| {
        let end = memchr::memchr(b'\0', bytes).unwrap_or(bytes.len()).min(32);
        format!(
            "bad object header {:?}",
            String::from_utf8_lossy(&bytes[..end])
        )
    })?;
    if payload.len() != len {
        return Err(format!(
            "header declares {len} bytes but payload is {} bytes",
            payload.len()
        ));
    }
    Ok((kind, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame() {
        assert_eq!(frame(ObjectKind::Blob, b"hello\n"), b"blob 6\0hello\n");
        assert_eq!(frame(ObjectKind::Tree, b""), b"tree 0\0");
        assert_eq!(frame(ObjectKind::Commit, b"x"), b"commit 1\0x");
    }

    #[test]
    fn test_parse_header() {
        let (kind, payload) = parse_header(b"blob 6\0hello\n").unwrap();
        assert_eq!(kind, ObjectKind::Blob);
        assert_eq!(payload, b"hello\n");

        let (kind, payload) = parse_header(b"tree 0\0").unwrap();
        assert_eq!(kind, ObjectKind::Tree);
        assert!(payload.is_empty());

        // The payload itself may contain NUL bytes.
        let (kind, payload) = parse_header(b"commit 3\0a\0b").unwrap();
        assert_eq!(kind, ObjectKind::Commit);
        assert_eq!(payload, b"a\0b");
    }

    #[test]
    fn test_parse_header_rejects_bad_framing() {
        for bad in [
            &b"blob 6hello\n"[..],
            b"blob six\0hello\n",
            b"blob 7\0hello\n",
            b"blob 5\0hello\n",
            b"tag 1\0x",
            b"blob\0",
            b"",
        ] {
            assert!(parse_header(bad).is_err(), "{:?} was accepted", bad);
        }
    }
}
