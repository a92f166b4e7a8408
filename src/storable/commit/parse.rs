use std::str::FromStr;

use bstr::ByteSlice;
use memchr::memmem;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use tracing::trace;

use crate::error::{Error, Result};

use super::*;

fn malformed(reason: impl Into<String>) -> Error {
    Error::MalformedCommit(reason.into())
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|_| malformed(format!("invalid utf-8: {:?}", bytes.as_bstr())))
}

impl Commit {
    /// Parse a decompressed commit payload.
    ///
    /// ## Example
    /// ```text
    /// tree 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5
    /// parent e6a49274aa0893ce2e2928589100387aee220c5b
    /// author Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100
    /// committer Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100
    ///
    /// Fix the frobnicator
    /// ```
    ///
    /// Header lines after `committer` (e.g. `gpgsig`) are skipped.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let split = memmem::find(bytes, b"\n\n")
            .ok_or_else(|| malformed("no blank line between headers and message"))?;
        let (headers, body) = (&bytes[..split], &bytes[split + 2..]);
        let mut lines = headers.split(|b| *b == b'\n');

        let tree_id = {
            let line = lines.next().unwrap_or_default();
            let hex = line
                .strip_prefix(b"tree ")
                .ok_or_else(|| malformed("first line is not `tree <hash>`"))?;
            Digest::from_str(utf8(hex)?).map_err(|e| malformed(e.to_string()))?
        };

        let mut parent = None;
        let author = loop {
            let line = lines
                .next()
                .ok_or_else(|| malformed("missing author line"))?;
            match line.strip_prefix(b"parent ") {
                Some(hex) => {
                    if parent.is_some() {
                        return Err(malformed("multiple parents are not supported"));
                    }
                    let digest =
                        Digest::from_str(utf8(hex)?).map_err(|e| malformed(e.to_string()))?;
                    parent = Some(digest);
                }
                None => break Signature::parse(line, "author")?,
            }
        };
        let committer = Signature::parse(
            lines
                .next()
                .ok_or_else(|| malformed("missing committer line"))?,
            "committer",
        )?;

        for line in lines {
            trace!(line = %line.as_bstr(), "Skipping extra commit header");
        }

        let message = utf8(body.strip_suffix(b"\n").unwrap_or(body))?.to_owned();

        let formatted = frame(ObjectKind::Commit, bytes);
        let oid = Digest::new(&formatted);

        Ok(Self {
            tree_id,
            parent,
            author,
            committer,
            message,
            formatted,
            oid,
        })
    }
}

impl Signature {
    /// Parse a signature line from a commit.
    ///
    /// ## Example
    /// `author Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100`
    /// `committer Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100`
    fn parse(bytes: &[u8], field: &str) -> Result<Self> {
        static REGEX: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^(author|committer) (.*) <([^<>]*)> (\d+ [+-]\d{4})$")
                .expect("signature regex is valid")
        });

        let groups = REGEX
            .captures(bytes)
            .filter(|groups| &groups[1] == field.as_bytes())
            .ok_or_else(|| {
                malformed(format!("invalid {field} line: {:?}", bytes.as_bstr()))
            })?;

        let name = utf8(&groups[2])?.to_owned();
        let email = utf8(&groups[3])?.to_owned();
        let when = Timestamp::from_git(utf8(&groups[4])?)
            .ok_or_else(|| malformed(format!("invalid timestamp in {field} line")))?;

        Ok(Self { name, email, when })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_signature() {
        let input = "author Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100";

        let signature = Signature::parse(input.as_bytes(), "author").unwrap();

        assert_eq!(signature.name, "Jamie Quigley");
        assert_eq!(signature.email, "jamie@quigley.xyz");
        assert_eq!(signature.when, Timestamp::from_unix(1658312219, 3600).unwrap());

        assert!(Signature::parse(input.as_bytes(), "committer").is_err());
        assert!(Signature::parse(b"author Jamie <jamie@quigley.xyz> soon", "author").is_err());
    }

    #[test]
    fn test_parse_commit() {
        let input = "tree 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5
parent e6a49274aa0893ce2e2928589100387aee220c5b
author Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100
committer Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100
gpgsig -----BEGIN PGP SIGNATURE-----
 iQEzBAABCAAdFiEEMLv/P6sLuz4ENfg8jo/2biro2XAFAmLX1h0ACgkQjo/2biro
 -----END PGP SIGNATURE-----

Merge remote-tracking branch 'origin/renovate/clap-3.x' into develop

With a body.
";

        let commit = Commit::parse(input.as_bytes()).unwrap();
        assert_eq!(
            commit.tree_id,
            Digest::from_str("090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5").unwrap()
        );
        assert_eq!(
            commit.parent,
            Some(Digest::from_str("e6a49274aa0893ce2e2928589100387aee220c5b").unwrap())
        );
        assert_eq!(commit.author.name, "Jamie Quigley");
        assert_eq!(commit.committer.email, "jamie@quigley.xyz");
        assert_eq!(
            commit.message,
            "Merge remote-tracking branch 'origin/renovate/clap-3.x' into develop\n\nWith a body."
        );
        assert_eq!(commit.payload(), input.as_bytes());
    }

    #[test]
    fn test_roundtrip() {
        let signature = Signature::new(
            &Identity::new("A U Thor", "author@example.com"),
            Timestamp::from_unix(1112911993, -7 * 3600).unwrap(),
        );
        let tree = Digest::new(b"tree");
        let parent = Digest::new(b"parent");
        let written = Commit::new(tree, Some(parent), signature.clone(), "msg".into());

        let parsed = Commit::parse(written.payload()).unwrap();
        assert_eq!(parsed.tree_id(), &tree);
        assert_eq!(parsed.parent(), Some(&parent));
        assert_eq!(parsed.author(), &signature);
        assert_eq!(parsed.committer(), &signature);
        assert_eq!(parsed.message(), "msg");
        assert_eq!(parsed.get_oid(), written.get_oid());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let sig = "Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100";
        let tree = "tree 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5";
        let parent = "parent e6a49274aa0893ce2e2928589100387aee220c5b";
        for bad in [
            format!("{tree}\nauthor {sig}\ncommitter {sig}\nno blank line\n"),
            format!("author {sig}\ncommitter {sig}\n\nmsg\n"),
            format!("tree 090c4c\nauthor {sig}\ncommitter {sig}\n\nmsg\n"),
            format!("{tree}\n{parent}\n{parent}\nauthor {sig}\ncommitter {sig}\n\nmsg\n"),
            format!("{tree}\nauthor {sig}\n\nmsg\n"),
        ] {
            assert!(
                matches!(Commit::parse(bad.as_bytes()), Err(Error::MalformedCommit(_))),
                "{bad:?} was accepted"
            );
        }
    }
}
