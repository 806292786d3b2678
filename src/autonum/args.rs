use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for
/// non-release builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "autonum",
    bin_name = "autonum",
    version = get_version(),
    about = "Sequential numbering for tagged attributes in drawing snapshots",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Drawing snapshot to operate on
    #[arg(short, long, global = true, default_value = "drawing.json")]
    pub drawing: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report the value numbering would start from, without changing anything
    Scan {
        /// Container (block definition) holding the tracked references
        container: String,
        /// Attribute tag to number
        tag: String,
    },
    /// Number the drawing's pending commits and write the result back
    Apply {
        /// Container (block definition) holding the tracked references
        container: String,
        /// Attribute tag to number
        tag: String,
        /// Start from this value instead of the scanned seed (must not be
        /// below it)
        #[arg(short, long)]
        seed: Option<i64>,
    },
}
