use camino::Utf8PathBuf;
use clap::Parser;
use clap::Subcommand;

use cairn::Digest;

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Create an empty repository
    Init,

    /// Print the contents of an object
    CatFile {
        /// Pretty-print the contents of `object` based on its type
        #[clap(short = 'p', value_name = "object")]
        object: Digest,
    },

    /// Store a file as a blob and print its hash
    HashObject {
        /// Write the object into the object database
        #[clap(short = 'w')]
        write: bool,

        file: Utf8PathBuf,
    },

    /// List the contents of a tree object
    LsTree {
        /// List only file names
        #[clap(long)]
        name_only: bool,

        #[clap(value_name = "tree")]
        object: Digest,
    },

    /// Snapshot the working directory as a tree
    WriteTree {
        /// Record executable bits and symlinks instead of storing every file as 100644
        #[clap(long, env = "CAIRN_DETECT_MODES")]
        detect_modes: bool,
    },

    /// Create a commit object from a tree
    CommitTree {
        #[clap(value_name = "tree")]
        tree: Digest,

        /// The parent commit, if any
        #[clap(short = 'p', value_name = "parent")]
        parent: Option<Digest>,

        #[clap(short, long, env = "CAIRN_COMMIT_MESSAGE")]
        message: String,
    },
}

#[derive(Debug, Parser)]
pub struct Opt {
    #[clap(subcommand)]
    pub command: Command,

    /// The path to be used.
    #[clap(short = 'C', long, global = true)]
    pub path: Option<Utf8PathBuf>,

    #[clap(
        long,
        env = "CAIRN_AUTHOR_NAME",
        default_value = cairn::Identity::DEFAULT_NAME,
        global = true
    )]
    pub author_name: String,

    #[clap(
        long,
        env = "CAIRN_AUTHOR_EMAIL",
        default_value = cairn::Identity::DEFAULT_EMAIL,
        global = true
    )]
    pub author_email: String,
}
