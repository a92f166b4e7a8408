mod init;

use camino::{Utf8Path, Utf8PathBuf};
use tempdir::TempDir;

use crate::{FixedClock, Identity, Repo, Result};

pub const COMMIT_NAME: &str = "Jamie Quigley";
pub const COMMIT_EMAIL: &str = "jamie@quigley.xyz";

/// Write each path under `$root` with the contents `"<path>-contents\n"`, creating parent
/// directories as needed.
#[macro_export]
macro_rules! create_test_files {
    ($root:expr, [$($path:expr),* $(,)?]) => {{
        $({
            let path = $root.join($path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, format!("{}-contents\n", $path)).unwrap();
        })*
    }};
}

/// A fresh repository in a temporary directory, with a pinned author and clock.
pub fn init_repo() -> Result<(TempDir, Utf8PathBuf, Repo)> {
    let dir = TempDir::new("").unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap().to_owned();
    Repo::init(&root)?;
    let repo = Repo::open(root.clone())?
        .with_identity(Identity::new(COMMIT_NAME, COMMIT_EMAIL))
        .with_clock(FixedClock(
            crate::timestamp::Timestamp::from_unix(1658312219, 3600).unwrap(),
        ));
    Ok((dir, root, repo))
}
