use anyhow::Result;
use clap::Parser;
use ifacegen_core::FormatterKind;
use std::path::PathBuf;

use crate::commands::generate_command;

#[derive(Parser, Debug)]
#[command(name = "ifacegen")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    GOROOT, GOPATH, GOOS, GOARCH    Go build context\n    IFACEGEN_FORMATTER              auto, builtin or external\n    RUST_LOG=debug                  Enable debug logging"
)]
pub struct Cli {
    /// Interface to implement, as [import_path.]InterfaceName (e.g. io.Reader)
    #[arg(short, long = "interface", value_name = "ID")]
    pub interface: String,

    /// Receiver type of the generated methods [default: *<Interface>Gen or *<Interface>Mock]
    #[arg(short, long, value_name = "R")]
    pub receiver: Option<String>,

    /// Write the generated code to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Generate a complete call-counting mock instead of method stubs
    #[arg(short, long)]
    pub mock: bool,

    /// Place the mock in the destination's external test package
    #[arg(short = 't', long)]
    pub mock_in_test: bool,

    /// Package clause of the generated mock
    #[arg(short, long, value_name = "NAME")]
    pub package: Option<String>,

    /// Directory of the destination package [default: current directory]
    #[arg(short = 'C', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// How to format the generated code
    #[arg(long, value_name = "KIND", value_parser = parse_formatter)]
    pub formatter: Option<FormatterKind>,

    /// Print the resolved interface as JSON instead of generating code
    #[arg(long)]
    pub dump_spec: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_formatter(value: &str) -> std::result::Result<FormatterKind, String> {
    value.parse().map_err(|e: ifacegen_core::Error| e.to_string())
}

impl Cli {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        generate_command(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "ifacegen", "-i", "io.Reader", "-m", "-t", "-r", "*FakeReader", "-o", "mock_test.go",
            "--formatter", "builtin",
        ])
        .unwrap();
        assert_eq!(cli.interface, "io.Reader");
        assert!(cli.mock);
        assert!(cli.mock_in_test);
        assert_eq!(cli.receiver.as_deref(), Some("*FakeReader"));
        assert_eq!(cli.output, Some(PathBuf::from("mock_test.go")));
        assert_eq!(cli.formatter, Some(FormatterKind::Builtin));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_interface_is_required() {
        assert!(Cli::try_parse_from(["ifacegen", "-m"]).is_err());
    }

    #[test]
    fn test_unknown_formatter_is_rejected() {
        assert!(Cli::try_parse_from(["ifacegen", "-i", "Shape", "--formatter", "gofmt"]).is_err());
    }
}
