use clap::Parser;
use ifacegen_cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so generated code on stdout stays clean
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.execute() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
