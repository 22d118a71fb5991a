//! Formatting a document through an external formatter.
//!
//! The adapter hands the full document text to the formatter on stdin and reads the
//! formatted text back from stdout. Exit status 0 is the only outcome that touches the
//! document; every other outcome leaves it exactly as it was and produces a
//! notification instead.
//!
//! # Example
//!
//! ```no_run
//! use bazelfmt_lib::config::FormatterConfig;
//! use bazelfmt_lib::document::Document;
//! use bazelfmt_lib::format_adapter::FormatAdapter;
//! use bazelfmt_lib::notify::LogNotifier;
//!
//! let mut adapter = FormatAdapter::new(FormatterConfig::default());
//! let mut doc = Document::with_cursor("cc_library(name='x')\n", 4);
//! let result = adapter.format_document(&mut doc, None, &LogNotifier);
//! if result.is_success() {
//!     println!("{}", doc.text());
//! }
//! ```

pub mod executor;

pub use executor::{ToolExecutor, ToolOutput};

use crate::config::FormatterConfig;
use crate::document::Document;
use crate::file_kind::FileKind;
use crate::notify::{Notification, Notifier};
use std::io;

/// Why a format invocation produced no output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The formatter could not be started (not found, not executable, permission denied)
    #[error("{}", spawn_message(.tool, .kind, .reason))]
    SpawnFailure {
        tool: String,
        kind: io::ErrorKind,
        reason: String,
    },

    /// The formatter ran and exited with a non-zero status
    #[error("{}", exit_message(.tool, .code, .stderr))]
    NonZeroExit {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("'{tool}' timed out after {timeout_ms}ms")]
    Timeout { tool: String, timeout_ms: u64 },

    /// Output could not be used as document text
    #[error("'{tool}' produced unusable output: {message}")]
    InvalidOutput { tool: String, message: String },

    #[error("I/O error while running '{tool}': {message}")]
    Io { tool: String, message: String },
}

impl FormatError {
    pub(crate) fn spawn(tool: &str, err: &io::Error) -> Self {
        Self::SpawnFailure {
            tool: tool.to_string(),
            kind: err.kind(),
            reason: err.to_string(),
        }
    }

    /// Name of the formatter the error is about.
    pub fn tool(&self) -> &str {
        match self {
            Self::SpawnFailure { tool, .. }
            | Self::NonZeroExit { tool, .. }
            | Self::Timeout { tool, .. }
            | Self::InvalidOutput { tool, .. }
            | Self::Io { tool, .. } => tool,
        }
    }
}

fn spawn_message(tool: &str, kind: &io::ErrorKind, reason: &str) -> String {
    match kind {
        io::ErrorKind::NotFound => format!("Formatter '{tool}' not found in PATH"),
        io::ErrorKind::PermissionDenied => format!("Formatter '{tool}' is not executable: {reason}"),
        _ => format!("Failed to start formatter '{tool}': {reason}"),
    }
}

fn exit_message(tool: &str, code: &Option<i32>, stderr: &str) -> String {
    let status = match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    };
    let detail = stderr.trim();
    if detail.is_empty() {
        format!("'{tool}' failed with {status}")
    } else {
        format!("'{tool}' failed with {status}: {detail}")
    }
}

/// Outcome of one format invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatResult {
    /// Formatter stdout, verbatim
    Success(String),
    Failure(FormatError),
}

impl FormatResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<Result<String, FormatError>> for FormatResult {
    fn from(result: Result<String, FormatError>) -> Self {
        match result {
            Ok(text) => Self::Success(text),
            Err(err) => Self::Failure(err),
        }
    }
}

/// Whether a formatter process is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdapterState {
    #[default]
    Idle,
    Formatting,
}

/// Mediates between a [`Document`] and the external formatter.
pub struct FormatAdapter {
    config: FormatterConfig,
    executor: ToolExecutor,
    state: AdapterState,
}

impl FormatAdapter {
    pub fn new(config: FormatterConfig) -> Self {
        let executor = ToolExecutor::new(config.timeout);
        Self {
            config,
            executor,
            state: AdapterState::Idle,
        }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    pub fn state(&self) -> AdapterState {
        self.state
    }

    /// Arguments for one invocation: configured args, then `--type=<kind>` if enabled.
    pub fn formatter_args(&self, kind: Option<FileKind>) -> Vec<String> {
        let mut args = self.config.args.clone();
        if self.config.pass_file_type
            && let Some(kind) = kind
        {
            args.push(format!("--type={}", kind.as_type_arg()));
        }
        args
    }

    /// Run the formatter over `text`. Never retries.
    pub fn format(&mut self, text: &str, kind: Option<FileKind>) -> FormatResult {
        self.invoke(text, kind).map(|formatted| formatted.text).into()
    }

    fn invoke(&mut self, text: &str, kind: Option<FileKind>) -> Result<Formatted, FormatError> {
        let args = self.formatter_args(kind);
        let _busy = StateGuard::enter(&mut self.state);
        run_formatter(&self.executor, &self.config.formatter, &args, text)
    }

    /// Format `doc` in place.
    ///
    /// On success the document holds the formatter's output and its cursor is restored
    /// according to the configured replace strategy; anything the formatter wrote to
    /// stderr is passed on as a warning. On failure the document is left untouched and
    /// `notifier` receives one error notification.
    pub fn format_document(
        &mut self,
        doc: &mut Document,
        kind: Option<FileKind>,
        notifier: &dyn Notifier,
    ) -> FormatResult {
        match self.invoke(doc.text(), kind) {
            Ok(formatted) => {
                let diagnostics = formatted.diagnostics.trim();
                if !diagnostics.is_empty() {
                    notifier.notify(Notification::warning(format!(
                        "'{}' reported: {diagnostics}",
                        self.config.formatter
                    )));
                }
                if !doc.replace(&formatted.text, self.config.replace_strategy) {
                    log::debug!("Document already formatted");
                }
                FormatResult::Success(formatted.text)
            }
            Err(err) => {
                log::debug!("Leaving document unchanged: {err}");
                notifier.notify(Notification::error(err.to_string()));
                FormatResult::Failure(err)
            }
        }
    }
}

/// Format `text` with the formatter described by `config`.
///
/// Convenience for one-shot callers that do not keep a [`FormatAdapter`] around.
pub fn format(text: &str, config: &FormatterConfig) -> FormatResult {
    FormatAdapter::new(config.clone()).format(text, None)
}

/// Output of a successful formatter run.
struct Formatted {
    text: String,
    /// Stderr of a run that still exited 0
    diagnostics: String,
}

fn run_formatter(executor: &ToolExecutor, program: &str, args: &[String], text: &str) -> Result<Formatted, FormatError> {
    let output = executor.execute(program, args, text.as_bytes(), None)?;

    if !output.success {
        return Err(FormatError::NonZeroExit {
            tool: program.to_string(),
            code: output.exit_code,
            stderr: output.stderr,
        });
    }

    let text = String::from_utf8(output.stdout).map_err(|e| FormatError::InvalidOutput {
        tool: program.to_string(),
        message: format!("stdout is not valid UTF-8 ({e})"),
    })?;
    Ok(Formatted {
        text,
        diagnostics: output.stderr,
    })
}

/// Holds the adapter in [`AdapterState::Formatting`] and returns it to `Idle` on drop,
/// whichever way the invocation ends.
struct StateGuard<'a> {
    state: &'a mut AdapterState,
}

impl<'a> StateGuard<'a> {
    fn enter(state: &'a mut AdapterState) -> Self {
        log::debug!("Formatter state: {:?} -> Formatting", *state);
        *state = AdapterState::Formatting;
        Self { state }
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        *self.state = AdapterState::Idle;
        log::debug!("Formatter state: Formatting -> Idle");
    }
}
