//! The generation pipeline, from an interface identifier to formatted Go

use crate::{
    error::Result,
    format::Formatter,
    locator::PackageLocator,
    parser::{GoParser, SourceFile, SymbolTable},
    qualifier::Qualifier,
    render,
    resolve::{PackageNames, SignatureResolver, find_interface, guess_package_name},
    types::{GenerationMode, InterfaceSpec, InterfaceTarget, PackageIdentity},
};
use tracing::{debug, info};

/// What to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub target: InterfaceTarget,
    /// Receiver type; defaults to `*<Interface>Gen` or `*<Interface>Mock`
    pub receiver: Option<String>,
    pub mode: GenerationMode,
    /// Generated code lives in the destination's `_test` package
    pub mock_in_test: bool,
    /// Package clause of the generated file, replacing the destination's
    pub package_override: Option<String>,
}

impl GenerateRequest {
    pub fn new(target: InterfaceTarget, mode: GenerationMode) -> Self {
        Self {
            target,
            receiver: None,
            mode,
            mock_in_test: false,
            package_override: None,
        }
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    pub fn in_test_package(mut self, mock_in_test: bool) -> Self {
        self.mock_in_test = mock_in_test;
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package_override = Some(package.into());
        self
    }
}

/// Runs locator, resolvers, renderer and formatter for one request
pub struct Generator<'a> {
    locator: &'a dyn PackageLocator,
    formatter: &'a dyn Formatter,
}

impl<'a> Generator<'a> {
    pub fn new(locator: &'a dyn PackageLocator, formatter: &'a dyn Formatter) -> Self {
        Self { locator, formatter }
    }

    /// Identity the generated code is qualified against
    pub fn destination(&self, request: &GenerateRequest) -> PackageIdentity {
        let import_path = self.locator.destination_import_path();
        let name = match &request.package_override {
            Some(name) => name.clone(),
            None => self
                .destination_package_name()
                .unwrap_or_else(|| guess_package_name(&import_path)),
        };
        let destination = PackageIdentity::new(import_path, name);
        if request.mock_in_test && !destination.is_test_variant() {
            destination.test_variant()
        } else {
            destination
        }
    }

    fn destination_package_name(&self) -> Option<String> {
        let package = match self.locator.resolve("") {
            Ok(package) => package,
            Err(e) => {
                debug!("Destination package has no Go files yet: {e}");
                return None;
            }
        };
        let mut parser = GoParser::new().ok()?;
        package
            .files
            .iter()
            .filter_map(|path| SourceFile::load(&mut parser, path).ok())
            .find_map(|file| file.package_name().map(str::to_string))
    }

    /// Resolve the interface into everything the templates need
    pub fn build_spec(&self, request: &GenerateRequest) -> Result<InterfaceSpec> {
        let destination = self.destination(request);
        info!(
            "Generating {:?} for {} into package {}",
            request.mode, request.target, destination
        );

        let package = self.locator.resolve(&request.target.import_path)?;
        let mut parser = GoParser::new()?;
        let table = SymbolTable::load(&mut parser, &package)?;

        let names = PackageNames::new(self.locator);
        names.remember(table.package());
        let qualifier = Qualifier::new(destination.clone());

        let interface = find_interface(&table, &request.target.name)?;
        let (methods, imports) =
            SignatureResolver::new(&qualifier, &names, Some(self.locator))?.resolve(&table, &interface)?;

        let receiver = request
            .receiver
            .clone()
            .unwrap_or_else(|| request.mode.default_receiver(&request.target.name));
        let struct_name = receiver.trim_start_matches('*').to_string();
        let package_name = match request.mode {
            GenerationMode::Stub => String::new(),
            GenerationMode::Mock => destination.name,
        };

        Ok(InterfaceSpec {
            interface_name: request.target.name.clone(),
            receiver,
            struct_name,
            package_name,
            methods,
            imports,
        })
    }

    /// Rendered and formatted source for `request`
    pub fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let spec = self.build_spec(request)?;
        self.generate_from_spec(&spec)
    }

    pub fn generate_from_spec(&self, spec: &InterfaceSpec) -> Result<String> {
        let rendered = render::render(spec)?;
        let formatted = self.formatter.format(&rendered, spec.mode())?;
        info!(
            "Generated {} method(s) for {} with the {} formatter",
            spec.methods.len(),
            spec.interface_name,
            self.formatter.name()
        );
        Ok(formatted)
    }
}
