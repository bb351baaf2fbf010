use anyhow::{Context, Result};
use ifacegen_core::{
    Config, GenerateRequest, GenerationMode, Generator, GoLocator, InterfaceTarget,
    select_formatter, write_output,
};
use std::env;
use tracing::{debug, info};

use crate::cli::Cli;

pub fn generate_command(args: &Cli) -> Result<()> {
    let dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Failed to access directory {}", dir.display()))?;

    let config = Config::load(&dir).context("Failed to load configuration")?;
    debug!("Effective config: {config:?}");

    let target = InterfaceTarget::parse(&args.interface)?;
    let mode = GenerationMode::from_mock_flag(args.mock);
    let request = build_request(args, target, mode);

    let locator = GoLocator::new(config.build_context(&dir));
    let kind = args.formatter.or(config.formatter).unwrap_or_default();
    let formatter = select_formatter(kind, mode, config.formatter_command.as_deref());
    let generator = Generator::new(&locator, formatter.as_ref());

    let spec = generator
        .build_spec(&request)
        .with_context(|| format!("Failed to resolve interface {}", request.target))?;

    let text = if args.dump_spec {
        let mut json = serde_json::to_string_pretty(&spec)?;
        json.push('\n');
        json
    } else {
        generator
            .generate_from_spec(&spec)
            .with_context(|| format!("Failed to generate code for {}", request.target))?
    };

    write_output(args.output.as_deref(), &text)?;
    if let Some(path) = &args.output {
        info!("Generated {} into {}", spec.struct_name, path.display());
    }
    Ok(())
}

fn build_request(args: &Cli, target: InterfaceTarget, mode: GenerationMode) -> GenerateRequest {
    let mut request = GenerateRequest::new(target, mode).in_test_package(args.mock_in_test);
    if let Some(receiver) = &args.receiver {
        request = request.with_receiver(receiver.clone());
    }
    if let Some(package) = &args.package {
        request = request.with_package(package.clone());
    }
    request
}
