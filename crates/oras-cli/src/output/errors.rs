//! Error message formatting with actionable suggestions.

use std::error::Error;

use oras_core::error::OrasError;

use super::colors::ColorSupport;

/// Renders an error, its help line and its cause chain
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    pub fn new() -> Self {
        Self::with_colors(ColorSupport::detect())
    }

    pub fn with_colors(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with context and suggestions
    pub fn format_error(&self, error: &OrasError) -> String {
        let mut output = String::new();

        output.push_str(&self.colors.red("error"));
        output.push_str(": ");
        output.push_str(&error.to_string());
        output.push('\n');

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
    fn test_format_includes_help() {
        let formatter = ErrorFormatter::with_colors(ColorSupport::disabled());
        let err = OrasError::InvalidReference {
            reference: "::".to_string(),
            reason: "empty repository".to_string(),
        };

        let text = formatter.format_error(&err);
        assert!(text.starts_with("error: "));
        assert!(text.contains("help: References look like"));
    }

    #[test]
    fn test_format_includes_cause_chain() {
        let formatter = ErrorFormatter::with_colors(ColorSupport::disabled());
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = OrasError::io("Failed to read config".to_string(), io);

        let text = formatter.format_error(&err);
        assert!(text.contains("caused by: denied"));
    }
}
