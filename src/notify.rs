//! User-facing notifications.
//!
//! Hosts decide how a failed format is shown to the user. A notification is
//! fire-and-forget: the adapter never waits on, or reacts to, how it was displayed.

use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    /// File the notification is about, if any
    pub source: Option<String>,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            source: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            source: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Sends notifications to the `log` facade.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        let prefix = notification.source.map(|s| format!("{s}: ")).unwrap_or_default();
        match notification.severity {
            Severity::Info => log::info!("{prefix}{}", notification.message),
            Severity::Warning => log::warn!("{prefix}{}", notification.message),
            Severity::Error => log::error!("{prefix}{}", notification.message),
        }
    }
}

/// Prints one coloured line per notification to stderr.
pub struct StderrNotifier {
    quiet: bool,
}

impl StderrNotifier {
    /// With `quiet`, only errors are printed.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn render(notification: &Notification) -> String {
        let label = match notification.severity {
            Severity::Info => "info".blue().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Error => "error".red().bold(),
        };
        match &notification.source {
            Some(source) => format!("{label}: {}: {}", source.cyan(), notification.message),
            None => format!("{label}: {}", notification.message),
        }
    }
}

impl Notifier for StderrNotifier {
    fn notify(&self, notification: Notification) {
        if self.quiet && notification.severity != Severity::Error {
            return;
        }
        eprintln!("{}", Self::render(&notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain() {
        colored::control::set_override(false);
        let line = StderrNotifier::render(&Notification::error("'buildifier' failed with exit code 1"));
        assert_eq!(line, "error: 'buildifier' failed with exit code 1");

        let line = StderrNotifier::render(&Notification::warning("skipped").with_source("pkg/BUILD"));
        assert_eq!(line, "warning: pkg/BUILD: skipped");
    }

    #[test]
    fn test_constructors() {
        let n = Notification::info("done");
        assert_eq!(n.severity, Severity::Info);
        assert_eq!(n.source, None);
    }
}
