//! Stdin processing: the editor-facing "format current document" path.
//!
//! The whole document arrives on stdin and the resulting document leaves on stdout.
//! When formatting fails the original bytes are written back unchanged, so an editor
//! that replaces its buffer with our stdout never loses content.

use bazelfmt_lib::document::Document;
use bazelfmt_lib::exit_codes::exit;
use bazelfmt_lib::file_kind::FileKind;
use bazelfmt_lib::format_adapter::{FormatAdapter, FormatResult};
use bazelfmt_lib::notify::{Notification, Notifier};
use serde::Serialize;
use std::io::{self, Read, Write};

use crate::FmtArgs;

/// JSON reply for `--json`.
#[derive(Debug, Serialize)]
struct StdinReply<'a> {
    /// Absent when the input was not UTF-8 and cannot be carried in JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    cursor: usize,
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

struct NamedNotifier<'a> {
    inner: &'a dyn Notifier,
    name: &'a str,
}

impl Notifier for NamedNotifier<'_> {
    fn notify(&self, notification: Notification) {
        self.inner.notify(notification.with_source(self.name));
    }
}

/// Format the document read from stdin
pub fn process_stdin(adapter: &mut FormatAdapter, args: &FmtArgs, notifier: &dyn Notifier) {
    let mut input = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut input) {
        notifier.notify(Notification::error(format!("Error reading from stdin: {e}")));
        exit::tool_error();
    }

    let display_name = args.stdin_filename.as_deref().unwrap_or("<stdin>");
    let kind = args.stdin_filename.as_deref().and_then(FileKind::from_path);
    let named = NamedNotifier {
        inner: notifier,
        name: display_name,
    };

    let content = match String::from_utf8(input) {
        Ok(content) => content,
        Err(e) => {
            let message = format!("Input is not valid UTF-8 ({}), leaving it unchanged", e.utf8_error());
            named.notify(Notification::error(message.clone()));
            let payload = if args.json {
                let reply = StdinReply {
                    content: None,
                    cursor: args.cursor.unwrap_or(0),
                    changed: false,
                    error: Some(message),
                };
                encode_reply(&reply, notifier).into_bytes()
            } else {
                e.into_bytes()
            };
            write_stdout(&payload, notifier);
            exit::format_failed();
        }
    };

    let mut doc = Document::with_cursor(content.as_str(), args.cursor.unwrap_or(0));
    let result = adapter.format_document(&mut doc, kind, &named);
    let changed = doc.text() != content;

    let payload = if args.json {
        let reply = StdinReply {
            content: Some(doc.text()),
            cursor: doc.cursor(),
            changed,
            error: match &result {
                FormatResult::Failure(err) => Some(err.to_string()),
                FormatResult::Success(_) => None,
            },
        };
        encode_reply(&reply, notifier)
    } else {
        doc.text().to_string()
    };
    write_stdout(payload.as_bytes(), notifier);

    if !result.is_success() || (args.check && changed) {
        exit::format_failed();
    }
}

fn encode_reply(reply: &StdinReply<'_>, notifier: &dyn Notifier) -> String {
    match serde_json::to_string(reply) {
        Ok(json) => json + "\n",
        Err(e) => {
            notifier.notify(Notification::error(format!("Failed to encode JSON reply: {e}")));
            exit::tool_error();
        }
    }
}

fn write_stdout(payload: &[u8], notifier: &dyn Notifier) {
    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(payload).and_then(|()| stdout.flush()) {
        notifier.notify(Notification::error(format!("Error writing output: {e}")));
        exit::tool_error();
    }
}
