use super::Formatter;
use crate::{
    error::{Error, Result},
    types::GenerationMode,
};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Pipes source through a formatting program such as `gofmt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFormatter {
    program: String,
    args: Vec<String>,
}

impl ExternalFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `gofmt` for stubs, `goimports` for mock files
    pub fn for_mode(mode: GenerationMode) -> Self {
        match mode {
            GenerationMode::Stub => Self::new("gofmt", Vec::new()),
            GenerationMode::Mock => Self::new("goimports", Vec::new()),
        }
    }

    /// Split a whitespace-separated command line into program and arguments
    pub fn from_command_line(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self::new(program, parts.collect())
    }

    pub fn is_available(&self) -> bool {
        !self.program.is_empty() && which::which(&self.program).is_ok()
    }
}

impl Formatter for ExternalFormatter {
    fn format(&self, source: &str, _mode: GenerationMode) -> Result<String> {
        debug!("Running {} {:?}", self.program, self.args);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::format_failure(format!("cannot run {}: {e}", self.program), source))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|e| Error::format_failure(format!("writing to {}: {e}", self.program), source))?;
        }
        let output = child
            .wait_with_output()
            .map_err(|e| Error::format_failure(format!("waiting for {}: {e}", self.program), source))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::format_failure(
                format!("{} failed ({}): {}", self.program, output.status, stderr.trim()),
                source,
            ));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| Error::format_failure(format!("{} wrote invalid UTF-8: {e}", self.program), source))
    }

    fn name(&self) -> &str {
        &self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_mode() {
        assert_eq!(ExternalFormatter::for_mode(GenerationMode::Stub).name(), "gofmt");
        assert_eq!(ExternalFormatter::for_mode(GenerationMode::Mock).name(), "goimports");
    }

    #[test]
    fn test_command_line_split() {
        let formatter = ExternalFormatter::from_command_line("gofumpt -extra");
        assert_eq!(
            formatter,
            ExternalFormatter::new("gofumpt", vec!["-extra".to_string()])
        );
    }

    #[test]
    fn test_missing_program_is_format_failure() {
        let formatter = ExternalFormatter::new("definitely-not-a-go-formatter-1b7c", Vec::new());
        assert!(!formatter.is_available());
        let err = formatter.format("package x\n", GenerationMode::Mock).unwrap_err();
        match err {
            Error::FormatFailure { code, .. } => assert_eq!(code, "package x\n"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_pipes_through_program() {
        let formatter = ExternalFormatter::new("cat", Vec::new());
        let out = formatter.format("func f() {\n}\n", GenerationMode::Stub).unwrap();
        assert_eq!(out, "func f() {\n}\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_format_failure() {
        let formatter = ExternalFormatter::new("false", Vec::new());
        assert!(matches!(
            formatter.format("x", GenerationMode::Stub),
            Err(Error::FormatFailure { .. })
        ));
    }
}
