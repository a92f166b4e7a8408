mod interface;

use std::io::Write;

use cairn::{Digest, Identity, LoadedItem, Repo};
use camino::Utf8PathBuf;
use clap::Parser;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use tracing_subscriber::prelude::*;

use crate::interface::*;

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Opt::parse();

    let path = match args.path {
        Some(ref path) => path
            .canonicalize_utf8()
            .wrap_err(format!("Directory not found: '{path}'"))?,
        None => current_dir()?,
    };

    let identity = Identity::new(args.author_name, args.author_email);

    match args.command {
        Command::Init => {
            Repo::init(&path)?;
            println!("Initialized git directory");
        }
        Command::CatFile { object } => cat_file(&open_repo(path, identity)?, &object)?,
        Command::HashObject { write, file } => {
            if !write {
                return Err(eyre!("hash-object without -w is not supported"));
            }
            let repo = open_repo(path, identity)?;
            println!("{}", repo.write_blob(&file)?);
        }
        Command::LsTree { name_only, object } => {
            let repo = open_repo(path, identity)?;
            for line in repo.list_tree(&object, name_only)? {
                println!("{line}");
            }
        }
        Command::WriteTree { detect_modes } => {
            let repo = open_repo(path, identity)?.with_mode_detection(detect_modes);
            println!("{}", repo.write_tree()?);
        }
        Command::CommitTree {
            tree,
            parent,
            message,
        } => {
            let repo = open_repo(path, identity)?;
            println!("{}", repo.write_commit(&tree, parent.as_ref(), &message)?);
        }
    }
    Ok(())
}

fn open_repo(path: Utf8PathBuf, identity: Identity) -> Result<Repo> {
    Ok(Repo::open(path)?.with_identity(identity))
}

fn current_dir() -> Result<Utf8PathBuf> {
    let dir = std::env::current_dir()?.canonicalize()?;
    Utf8PathBuf::from_path_buf(dir)
        .map_err(|dir| eyre!("Working directory is not valid unicode: {}", dir.display()))
}

fn cat_file(repo: &Repo, object: &Digest) -> Result<()> {
    match repo.cat_file(object)? {
        LoadedItem::Blob(data) => std::io::stdout().write_all(&data)?,
        LoadedItem::Tree(entries) => {
            for entry in entries {
                println!("{entry}");
            }
        }
        LoadedItem::Commit(commit) => std::io::stdout().write_all(commit.payload())?,
    }
    Ok(())
}
