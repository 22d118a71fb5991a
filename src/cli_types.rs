use clap::Args;

#[derive(Args, Debug, Default)]
pub struct FmtArgs {
    /// Files or directories to format (use '-' for stdin)
    #[arg(required = false)]
    pub paths: Vec<String>,

    /// Exit with code 1 if any file would be reformatted, without writing (for CI)
    #[arg(long, help = "Exit with code 1 if any formatting changes would be made (for CI)")]
    pub check: bool,

    /// Read from stdin and write the formatted document to stdout
    #[arg(long, help = "Read from stdin instead of files")]
    pub stdin: bool,

    /// Filename used for file-type detection and messages when reading from stdin
    #[arg(long, help = "Filename to use for stdin input (e.g. BUILD.bazel or defs.bzl)")]
    pub stdin_filename: Option<String>,

    /// Cursor byte offset in the stdin document, restored after formatting
    #[arg(long)]
    pub cursor: Option<usize>,

    /// Emit a JSON object with the formatted content and cursor instead of raw text
    #[arg(long)]
    pub json: bool,

    /// Formatter executable (overrides $BAZELFMT_FORMATTER and the config file)
    #[arg(long)]
    pub formatter: Option<String>,

    /// Formatter timeout in milliseconds, 0 disables it
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Respect .gitignore files when scanning directories
    #[arg(
        long,
        num_args(0..=1),
        require_equals(true),
        default_missing_value = "true",
        help = "Respect .gitignore files when scanning directories (does not apply to explicitly provided paths)"
    )]
    pub respect_gitignore: Option<bool>,

    /// Only print errors
    #[arg(short, long, help = "Only print errors")]
    pub quiet: bool,
}

impl FmtArgs {
    pub fn reads_stdin(&self) -> bool {
        self.stdin || (self.paths.len() == 1 && self.paths[0] == "-")
    }

    /// A stdin-only flag given while formatting files, if any.
    pub fn misplaced_stdin_flag(&self) -> Option<&'static str> {
        if self.reads_stdin() {
            None
        } else if self.cursor.is_some() {
            Some("--cursor")
        } else if self.json {
            Some("--json")
        } else {
            None
        }
    }
}
