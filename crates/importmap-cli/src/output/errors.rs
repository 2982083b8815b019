//! Error message formatting with actionable suggestions.

use std::error::Error;

use importmap_core::error::ImportmapError;

use super::colors::ColorSupport;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    pub fn new() -> Self {
        Self {
            colors: ColorSupport::detect(),
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            colors: ColorSupport::disabled(),
        }
    }

    /// Format an error with its location, suggestion and cause chain
    pub fn format_error(&self, error: &ImportmapError) -> String {
        let mut output = format!("{}: {}\n", self.colors.red("error"), error);

        if let ImportmapError::TomlParse { line, column, .. } = error {
            if *line > 0 {
                output.push_str(&self.format_location(*line, *column));
                output.push('\n');
            }
        }

        if let Some(suggestion) = error.suggestion() {
            output.push('\n');
            output.push_str(&self.colors.dim("help"));
            output.push_str(": ");
            output.push_str(suggestion);
            output.push('\n');
        }

        let mut source = error.source();
        while let Some(err) = source {
            output.push('\n');
            output.push_str(&self.colors.dim("caused by"));
            output.push_str(": ");
            output.push_str(&err.to_string());
            source = err.source();
        }

        output
    }

    fn format_location(&self, line: usize, column: usize) -> String {
        format!("  {} line {}, column {}", self.colors.dim("-->"), line, column)
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_and_cause() {
        let error = ImportmapError::io(
            "Failed to write assets/htmx/htmx.min.js".to_string(),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        );

        let formatted = ErrorFormatter::plain().format_error(&error);
        assert!(formatted.starts_with("error: IO error: Failed to write assets/htmx/htmx.min.js\n"));
        assert!(formatted.contains("help: Check that the cache and assets directories are writable"));
        assert!(formatted.ends_with("caused by: permission denied"));
    }

    #[test]
    fn test_toml_location() {
        let error = ImportmapError::TomlParse {
            message: "expected `=`".to_string(),
            line: 3,
            column: 7,
        };

        let formatted = ErrorFormatter::plain().format_error(&error);
        assert!(formatted.contains("--> line 3, column 7"));
    }
}
