//! Terminal output formatting.
//!
//! Results go to stdout; warnings and errors go to stderr so that
//! command output stays pipeable.

pub mod colors;
pub mod errors;

use oras_core::error::OrasError;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    pub fn new() -> Self {
        Self {
            colors: colors::ColorSupport::detect(),
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{}", self.colors.dim(message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", self.colors.green("✓"), message);
    }

    /// Print an aligned `label: value` line
    pub fn field(&self, label: &str, value: &str) {
        println!("{:>14}: {}", self.colors.dim(label), value);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print a degradation warning with its suggestion, if any
    pub fn warning(&self, warning: &OrasError) {
        eprintln!("{}: {}", self.colors.yellow("warning"), warning);
        if let Some(help) = warning.suggestion() {
            eprintln!("  {}: {}", self.colors.dim("help"), help);
        }
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
