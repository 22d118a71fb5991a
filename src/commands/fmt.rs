//! Handler for the `fmt` command.

use bazelfmt_lib::config::ConfigOverrides;
use bazelfmt_lib::discovery::find_bazel_files;
use bazelfmt_lib::document::Document;
use bazelfmt_lib::exit_codes::{self, exit};
use bazelfmt_lib::file_kind::FileKind;
use bazelfmt_lib::format_adapter::{FormatAdapter, FormatResult};
use bazelfmt_lib::notify::{Notification, Notifier, StderrNotifier};
use colored::*;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::FmtArgs;
use crate::cli_utils::load_config_with_cli_error_handling;

/// Tally of one `fmt` run over files.
#[derive(Debug, Default)]
struct FmtSummary {
    reformatted: usize,
    unchanged: usize,
    failed: usize,
    io_errors: usize,
}

impl FmtSummary {
    fn exit_code(&self, check: bool) -> i32 {
        if self.io_errors > 0 {
            exit_codes::TOOL_ERROR
        } else if self.failed > 0 || (check && self.reformatted > 0) {
            exit_codes::FORMAT_FAILED
        } else {
            exit_codes::SUCCESS
        }
    }
}

/// Attaches the file name to every notification raised while formatting it.
struct FileNotifier<'a> {
    inner: &'a dyn Notifier,
    path: &'a str,
}

impl Notifier for FileNotifier<'_> {
    fn notify(&self, notification: Notification) {
        self.inner.notify(notification.with_source(self.path));
    }
}

pub fn handle_fmt(args: &FmtArgs, config_path: Option<&str>, no_config: bool) {
    if let Some(flag) = args.misplaced_stdin_flag() {
        eprintln!("{}: {flag} requires input on stdin (--stdin or '-')", "Error".red().bold());
        exit::tool_error();
    }

    let overrides = ConfigOverrides {
        formatter: args.formatter.clone(),
        timeout: args.timeout,
    };
    let loaded = load_config_with_cli_error_handling(config_path, no_config, &overrides);
    let notifier = StderrNotifier::new(args.quiet);
    let mut adapter = FormatAdapter::new(loaded.config);

    if args.reads_stdin() {
        crate::stdin_processor::process_stdin(&mut adapter, args, &notifier);
        return;
    }

    let paths: Vec<&str> = if args.paths.is_empty() {
        vec!["."]
    } else {
        args.paths.iter().map(String::as_str).collect()
    };

    let files = match find_bazel_files(&paths, args.respect_gitignore.unwrap_or(true)) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            exit::tool_error();
        }
    };

    if files.is_empty() {
        if !args.quiet {
            println!("No Bazel files found");
        }
        exit::success();
    }

    let mut summary = FmtSummary::default();
    for file in &files {
        format_file(&mut adapter, file, args, &notifier, &mut summary);
    }

    if !args.quiet {
        print_summary(&summary, args.check);
    }

    std::process::exit(summary.exit_code(args.check));
}

fn format_file(
    adapter: &mut FormatAdapter,
    path: &Path,
    args: &FmtArgs,
    notifier: &dyn Notifier,
    summary: &mut FmtSummary,
) {
    let display = path.display().to_string();
    let file_notifier = FileNotifier {
        inner: notifier,
        path: &display,
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            file_notifier.notify(Notification::error(format!("Failed to read file: {e}")));
            summary.io_errors += 1;
            return;
        }
    };

    let mut doc = Document::new(content.as_str());
    let kind = FileKind::from_path(path);
    log::debug!("Formatting {display} (kind: {kind:?}, {} bytes)", doc.len());

    match adapter.format_document(&mut doc, kind, &file_notifier) {
        FormatResult::Failure(_) => {
            summary.failed += 1;
            return;
        }
        FormatResult::Success(formatted) if formatted == content => {
            summary.unchanged += 1;
            return;
        }
        FormatResult::Success(_) => {}
    }

    summary.reformatted += 1;
    if args.check {
        if !args.quiet {
            println!("Would reformat: {display}");
        }
        return;
    }

    if let Err(e) = write_atomically(path, doc.text()) {
        file_notifier.notify(Notification::error(format!("Failed to write file: {e}")));
        summary.io_errors += 1;
    }
}

/// Replace the file at `path` with `contents` through a sibling temp file and a rename,
/// so a failed write never leaves it truncated. Symlinks are followed and the target's
/// permissions are kept.
fn write_atomically(path: &Path, contents: &str) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(&target)?.permissions();

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

fn print_summary(summary: &FmtSummary, check: bool) {
    let verb = if check { "would be reformatted" } else { "reformatted" };
    let mut parts = vec![format!("{} file(s) {verb}", summary.reformatted)];
    if summary.unchanged > 0 {
        parts.push(format!("{} already formatted", summary.unchanged));
    }
    if summary.failed > 0 {
        parts.push(format!("{} failed", summary.failed).red().to_string());
    }
    if summary.io_errors > 0 {
        parts.push(format!("{} unreadable or unwritable", summary.io_errors).red().to_string());
    }
    println!("{}", parts.join(", "));
}
