use tempdir::TempDir;

use camino::Utf8Path;

use crate::repo::DEFAULT_HEAD;
use crate::*;

#[test]
fn cairn_init() -> Result<()> {
    let dir = TempDir::new("").unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap();
    Repo::init(root)?;

    let git_dir = root.join(".git");

    assert!(git_dir.is_dir());
    assert!(git_dir.join("objects").is_dir());
    assert!(git_dir.join("refs").is_dir());
    assert_eq!(std::fs::read_to_string(git_dir.join("HEAD")).unwrap(), DEFAULT_HEAD);

    let repo = Repo::open(root)?;
    assert_eq!(repo.git_dir(), git_dir.as_path());

    Ok(())
}

#[test]
fn init_twice_fails() -> Result<()> {
    let dir = TempDir::new("").unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap();
    Repo::init(root)?;

    std::fs::write(root.join(".git/HEAD"), "untouched").unwrap();
    assert!(matches!(Repo::init(root), Err(Error::AlreadyExists(_))));
    assert_eq!(
        std::fs::read_to_string(root.join(".git/HEAD")).unwrap(),
        "untouched"
    );

    Ok(())
}

#[test]
fn open_without_init_fails() {
    let dir = TempDir::new("").unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap();
    assert!(matches!(Repo::open(root), Err(Error::NotARepository(_))));
}
