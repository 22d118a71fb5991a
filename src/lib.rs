pub mod config;
pub mod discovery;
pub mod document;
pub mod exit_codes;
pub mod file_kind;
pub mod format_adapter;
pub mod init;
pub mod notify;

pub use crate::config::FormatterConfig;
pub use crate::document::{Document, ReplaceStrategy};
pub use crate::file_kind::FileKind;
pub use crate::format_adapter::{AdapterState, FormatAdapter, FormatError, FormatResult, format};
pub use crate::notify::{Notification, Notifier};
