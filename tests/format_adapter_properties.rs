// Property-based tests for the format adapter.
// These use POSIX tools as stand-in formatters and verify:
// 1. An echoing formatter is the identity
// 2. A failing or missing formatter never touches the document
// 3. Formatting with an idempotent formatter is idempotent
// 4. The cursor never ends up outside the new content
#![cfg(unix)]

use bazelfmt_lib::config::FormatterConfig;
use bazelfmt_lib::document::{Document, ReplaceStrategy};
use bazelfmt_lib::format_adapter::{FormatAdapter, FormatResult, format};
use bazelfmt_lib::notify::{Notification, Notifier};
use proptest::prelude::*;
use std::cell::Cell;

#[derive(Default)]
struct CountingNotifier {
    count: Cell<usize>,
}

impl Notifier for CountingNotifier {
    fn notify(&self, _notification: Notification) {
        self.count.set(self.count.get() + 1);
    }
}

fn config(formatter: &str, args: &[&str], strategy: ReplaceStrategy) -> FormatterConfig {
    FormatterConfig {
        args: args.iter().map(|a| a.to_string()).collect(),
        replace_strategy: strategy,
        pass_file_type: false,
        ..FormatterConfig::with_formatter(formatter)
    }
}

/// Strategy for generating Starlark-like documents, including trailing blank lines and
/// non-ASCII string literals
fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z_]{1,12}\\(name = \"[a-z0-9_é]{0,8}\"\\)",
            "load\\(\"//[a-z/]{1,10}:[a-z]{1,6}\\.bzl\", \"[a-z_]{1,8}\"\\)",
            "    [a-z_]{1,8} = \\[\"[a-zA-Z0-9:/]{0,12}\"\\],",
            "# [ -~]{0,30}",
            Just(String::new()),
        ],
        0..12,
    )
    .prop_map(|lines| lines.join("\n"))
}

fn replace_strategy() -> impl Strategy<Value = ReplaceStrategy> {
    prop_oneof![Just(ReplaceStrategy::Minimal), Just(ReplaceStrategy::Whole)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn echo_formatter_is_identity(text in document_strategy()) {
        let result = format(&text, &config("cat", &[], ReplaceStrategy::Minimal));
        prop_assert_eq!(result, FormatResult::Success(text.clone()));

        let mut adapter = FormatAdapter::new(config("cat", &[], ReplaceStrategy::Minimal));
        let mut doc = Document::new(text.as_str());
        adapter.format_document(&mut doc, None, &CountingNotifier::default());
        prop_assert_eq!(doc.text(), text.as_str());
    }

    #[test]
    fn failing_formatter_leaves_document_unchanged(
        text in document_strategy(),
        cursor in 0usize..400,
        strategy in replace_strategy(),
    ) {
        let mut adapter = FormatAdapter::new(config("false", &[], strategy));
        let notifier = CountingNotifier::default();
        let mut doc = Document::with_cursor(text.as_str(), cursor);
        let before = doc.clone();

        let result = adapter.format_document(&mut doc, None, &notifier);

        prop_assert!(matches!(result, FormatResult::Failure(_)));
        prop_assert_eq!(doc, before);
        prop_assert_eq!(notifier.count.get(), 1);
    }

    #[test]
    fn missing_formatter_leaves_document_unchanged(text in document_strategy(), cursor in 0usize..400) {
        let mut adapter = FormatAdapter::new(config("bazelfmt-no-such-formatter", &[], ReplaceStrategy::Minimal));
        let mut doc = Document::with_cursor(text.as_str(), cursor);
        let before = doc.clone();

        let result = adapter.format_document(&mut doc, None, &CountingNotifier::default());

        prop_assert!(matches!(result, FormatResult::Failure(_)));
        prop_assert_eq!(doc, before);
    }

    #[test]
    fn idempotent_formatter_formats_idempotently(text in document_strategy(), strategy in replace_strategy()) {
        let mut adapter = FormatAdapter::new(config("tr", &["a-z", "A-Z"], strategy));
        let notifier = CountingNotifier::default();

        let mut once = Document::new(text.as_str());
        adapter.format_document(&mut once, None, &notifier);

        let mut twice = once.clone();
        adapter.format_document(&mut twice, None, &notifier);

        prop_assert_eq!(once.text(), twice.text());
        prop_assert_eq!(notifier.count.get(), 0);
    }

    #[test]
    fn cursor_clamped_when_content_shrinks(
        text in "[a-z \n]{10,200}",
        keep in 0usize..10,
        strategy in replace_strategy(),
    ) {
        let keep_arg = keep.to_string();
        let mut adapter = FormatAdapter::new(config("head", &["-c", &keep_arg], strategy));
        let cursor = text.len();
        let mut doc = Document::with_cursor(text.as_str(), cursor);

        adapter.format_document(&mut doc, None, &CountingNotifier::default());

        prop_assert_eq!(doc.text(), &text[..keep]);
        prop_assert!(doc.cursor() <= doc.len());
    }
}

proptest! {
    #[test]
    fn replace_always_yields_new_text_and_valid_cursor(
        old in "\\PC{0,60}",
        new in "\\PC{0,60}",
        cursor in 0usize..250,
        strategy in replace_strategy(),
    ) {
        let mut doc = Document::with_cursor(old.as_str(), cursor);
        doc.replace(&new, strategy);

        prop_assert_eq!(doc.text(), new.as_str());
        prop_assert!(doc.cursor() <= new.len());
        prop_assert!(new.is_char_boundary(doc.cursor()));
    }
}
