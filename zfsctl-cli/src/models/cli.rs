use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use zfsctl_core::DatasetKind;

/// zfsctl: typed front end for the zfs and zpool tools.
/// Output is tab-separated by default, or JSON with --json.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase message verbosity.
    ///
    /// Specify multiple times for more verbose output:
    ///  -v:  INFO level
    ///  -vv: DEBUG level (shows every command line run)
    ///  -vvv: TRACE level (most verbose)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to <config dir>/zfsctl/zfsctl.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print records as JSON instead of tab-separated rows.
    #[arg(long, global = true)]
    pub json: bool,

    /// Also write logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dataset operations (zfs).
    Zfs {
        #[command(subcommand)]
        action: ZfsCommand,
    },
    /// Pool operations (zpool).
    Zpool {
        #[command(subcommand)]
        action: ZpoolCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ZfsCommand {
    /// List datasets.
    List {
        /// Restrict to one dataset type.
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<KindArg>,
        /// Sort by this property.
        #[arg(short, long)]
        sort: Option<String>,
        /// Include descendants of the target.
        #[arg(short, long)]
        recursive: bool,
        target: Option<String>,
    },
    /// Show a property of one or all datasets.
    Get(GetArgs),
    /// Set a property: `zfsctl zfs set compression=lz4 tank/data`.
    Set(SetArgs),
    /// Destroy a dataset.
    Destroy {
        #[arg(short, long)]
        recursive: bool,
        name: String,
    },
    /// Create a filesystem, or a volume when --size is given.
    Create {
        /// Property assignment, repeatable: -o compression=lz4
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,
        /// Volume size, e.g. 10G.
        #[arg(short = 'V', long)]
        size: Option<String>,
        name: String,
    },
    /// Take a snapshot: `zfsctl zfs snapshot tank/data@daily`.
    Snapshot {
        #[arg(short, long)]
        recursive: bool,
        snapshot: String,
    },
    /// Clone a snapshot into a new dataset.
    Clone { snapshot: String, dataset: String },
}

#[derive(Subcommand, Debug)]
pub enum ZpoolCommand {
    /// List pools.
    List { name: Option<String> },
    /// Show a property of one or all pools.
    Get(GetArgs),
    /// Set a pool property.
    Set(SetArgs),
    /// Destroy a pool (always forced).
    Destroy { name: String },
    /// Create a pool: `zfsctl zpool create tank mirror /dev/a /dev/b`.
    Create {
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,
        #[arg(short, long)]
        mountpoint: Option<String>,
        name: String,
        #[arg(required = true, num_args = 1..)]
        devices: Vec<String>,
    },
    /// Add vdevs to a pool: `zfsctl zpool add tank cache /dev/nvme0n1`.
    Add {
        name: String,
        #[arg(required = true, num_args = 1..)]
        devices: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Only show properties from these sources, e.g. local,inherited.
    #[arg(short, long)]
    pub source: Option<String>,
    pub property: String,
    pub target: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// property=value
    pub assignment: String,
    pub name: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Filesystem,
    Volume,
    Snapshot,
    Bookmark,
    All,
}

impl From<KindArg> for DatasetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Filesystem => DatasetKind::Filesystem,
            KindArg::Volume => DatasetKind::Volume,
            KindArg::Snapshot => DatasetKind::Snapshot,
            KindArg::Bookmark => DatasetKind::Bookmark,
            KindArg::All => DatasetKind::All,
        }
    }
}
