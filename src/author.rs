//! Where commit authorship comes from.
//!
//! The wall clock and the local timezone are process-global inputs, so they sit behind [`Clock`]
//! to let callers pin them.

use crate::error::{Error, Result};
use crate::timestamp::Timestamp;

/// The name and email written into the `author` and `committer` lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub const DEFAULT_NAME: &'static str = "Cairn";
    pub const DEFAULT_EMAIL: &'static str = "cairn@localhost";

    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Check that the identity can be written into a signature line and read back: neither
    /// field may contain `<`, `>` or a newline.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("name", &self.name), ("email", &self.email)] {
            if value.contains(|c: char| matches!(c, '<' | '>' | '\n')) {
                return Err(Error::InvalidIdentity(format!(
                    "author {field} {value:?} contains '<', '>' or a newline"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME, Self::DEFAULT_EMAIL)
    }
}

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The local wall clock and UTC offset.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Identity::default().validate().is_ok());
        assert!(Identity::new("Jamie Quigley", "jamie@quigley.xyz").validate().is_ok());

        for identity in [
            Identity::new("Ann", "ann>x@example.com"),
            Identity::new("Ann", "<ann@example.com"),
            Identity::new("Ann", "ann@example.com\n"),
            Identity::new("Ann\nEvil", "ann@example.com"),
            Identity::new("Ann <", "ann@example.com"),
        ] {
            assert!(
                matches!(identity.validate(), Err(Error::InvalidIdentity(_))),
                "{identity:?} was accepted"
            );
        }
    }
}
