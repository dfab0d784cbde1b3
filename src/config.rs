/*!
 * Configuration handling for treeclip
 */

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap_complete::Shell;

use crate::error::{Result, TreeClipError};
use crate::filter::Filter;
use crate::retry::RetryPolicy;
use crate::utils::absolutize;
use crate::{bail, ensure};

/// Command-line arguments for treeclip
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "treeclip",
    version = env!("CARGO_PKG_VERSION"),
    about = "Copy a project tree listing and file contents to the clipboard",
    long_about = "Lists the selected files and folders as a tree, then appends every selected file's contents in fenced blocks, and copies the result to the system clipboard for pasting into a chat tool."
)]
pub struct Args {
    /// Files and folders to export (takes precedence over --target)
    pub paths: Vec<String>,

    /// Single file or folder to export when no paths are given
    #[clap(long)]
    pub target: Option<String>,

    /// Project root that labels are relative to
    #[clap(long, default_value = ".")]
    pub root: String,

    /// Comma-separated list of file name patterns to ignore
    #[clap(long, value_delimiter = ',')]
    pub ignore_patterns: Vec<String>,

    /// Skip entries matched by the root's .gitignore
    #[clap(long)]
    pub respect_gitignore: bool,

    /// Number of times a failed file read is retried
    #[clap(long, default_value = "3")]
    pub retries: u32,

    /// Delay between read retries, in milliseconds
    #[clap(long, default_value = "100")]
    pub retry_delay_ms: u64,

    /// How long file metadata stays cached, in milliseconds
    #[clap(long, default_value = "5000")]
    pub cache_ttl_ms: u64,

    /// Print the export to stdout instead of copying it
    #[clap(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Write the export to a file instead of copying it
    #[clap(long, short)]
    pub output: Option<String>,

    /// Hide the progress spinner and the summary report
    #[clap(long, short)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Where the finished export goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// System clipboard (default)
    Clipboard,
    /// Standard output
    Stdout,
    /// A file on disk
    File(PathBuf),
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clipboard => write!(f, "clipboard"),
            Self::Stdout => write!(f, "stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Absolute project root
    pub root: PathBuf,

    /// Explicitly selected paths, absolute
    pub selected: Vec<PathBuf>,

    /// Primary target, absolute
    pub target: Option<PathBuf>,

    /// Patterns to ignore
    pub ignore_patterns: Vec<String>,

    /// Whether to respect the root's .gitignore
    pub respect_gitignore: bool,

    /// Entries to leave out, built from the two settings above
    pub filter: Filter,

    /// Retry policy for file reads
    pub retry: RetryPolicy,

    /// Metadata cache time-to-live
    pub cache_ttl: Duration,

    /// Where to deliver the export
    pub destination: Destination,

    /// Suppress progress and report output
    pub quiet: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            TreeClipError::Config(format!("Cannot determine current directory: {}", e))
        })?;
        let root = absolutize(&cwd, &PathBuf::from(&args.root));

        let destination = match (args.stdout, args.output) {
            (true, Some(_)) => bail!(Config, "--stdout cannot be combined with --output"),
            (true, None) => Destination::Stdout,
            (false, Some(path)) => Destination::File(absolutize(&cwd, &PathBuf::from(path))),
            (false, None) => Destination::Clipboard,
        };

        let ignore_patterns: Vec<String> = args
            .ignore_patterns
            .into_iter()
            .map(|p| p.trim().to_string())
            .collect();

        Ok(Self {
            selected: args
                .paths
                .iter()
                .map(|p| absolutize(&cwd, &PathBuf::from(p)))
                .collect(),
            target: args.target.map(|p| absolutize(&cwd, &PathBuf::from(p))),
            filter: Filter::none(),
            ignore_patterns,
            respect_gitignore: args.respect_gitignore,
            retry: RetryPolicy {
                retries: args.retries,
                delay: Duration::from_millis(args.retry_delay_ms),
            },
            cache_ttl: Duration::from_millis(args.cache_ttl_ms),
            destination,
            quiet: args.quiet,
            root,
        })
    }

    /// Validate the configuration and build the ignore filter
    pub fn validate(&mut self) -> Result<()> {
        ensure!(
            self.root.is_dir(),
            Config,
            "Root directory not found: {}",
            self.root.display()
        );

        if let Destination::File(path) = &self.destination {
            if let Some(parent) = path.parent() {
                ensure!(
                    parent.is_dir(),
                    Config,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        ensure!(
            self.ignore_patterns.iter().all(|p| !p.is_empty()),
            Config,
            "Ignore patterns must not be empty"
        );

        self.filter = Filter::new(
            &self.root,
            self.ignore_patterns.clone(),
            self.respect_gitignore,
        )?;

        Ok(())
    }

    /// Paths to export: the explicit selection, else the primary target
    ///
    /// Fails with `InvalidInput` when neither is given.
    pub fn selections(&self) -> Result<Vec<PathBuf>> {
        if !self.selected.is_empty() {
            return Ok(self.selected.clone());
        }

        match &self.target {
            Some(target) => Ok(vec![target.clone()]),
            None => bail!(InvalidInput, "Please select files or folders to export."),
        }
    }
}
