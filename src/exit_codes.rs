/// Exit codes for bazelfmt
///
/// These let editors and CI distinguish "the formatter refused this file" from
/// "bazelfmt itself could not run".
/// Success - Every document was formatted (or was already formatted)
pub const SUCCESS: i32 = 0;

/// Formatting failed for at least one document, or `--check` found a file that would change
pub const FORMAT_FAILED: i32 = 1;

/// Tool error - Configuration error, file access error, or bad arguments
pub const TOOL_ERROR: i32 = 2;

/// Helper functions for consistent exit behavior
pub mod exit {
    use super::{FORMAT_FAILED, SUCCESS, TOOL_ERROR};

    /// Exit with success code (0)
    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    /// Exit with format failure code (1)
    pub fn format_failed() -> ! {
        std::process::exit(FORMAT_FAILED);
    }

    /// Exit with tool error code (2)
    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
