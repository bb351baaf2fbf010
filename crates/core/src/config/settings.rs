use crate::{
    error::{Error, Result},
    format::FormatterKind,
    locator::{BuildContext, go_env_goroot},
};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names searched upward from the working directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = [".ifacegen.json", "ifacegen.json"];

/// Settings that shape package lookup and output formatting.
///
/// Values come from a config file, are overridden by the Go environment
/// variables and finally by command line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goroot: Option<PathBuf>,
    /// List of GOPATH entries, joined with the platform path separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gopath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goarch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<FormatterKind>,
    /// External formatter program replacing the gofmt/goimports defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter_command: Option<String>,
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents).map_err(|e| {
            Error::ConfigError(format!("Failed to parse config {}: {e}", path.display()))
        })?;
        Ok(config)
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.is_file() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }

    /// Config file found from `start_path` (or defaults) with the process
    /// environment applied on top
    pub fn load(start_path: &Path) -> Result<Self> {
        let config = match Self::find_config_file(start_path) {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::load_from_file(&path)?
            }
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Apply `GOROOT`, `GOPATH`, `GOOS`, `GOARCH` and `IFACEGEN_FORMATTER`
    /// from `lookup`; set and non-empty variables win over file values
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(goroot) = var("GOROOT") {
            self.goroot = Some(PathBuf::from(goroot));
        }
        if let Some(gopath) = var("GOPATH") {
            self.gopath = Some(gopath);
        }
        if let Some(goos) = var("GOOS") {
            self.goos = Some(goos);
        }
        if let Some(goarch) = var("GOARCH") {
            self.goarch = Some(goarch);
        }
        if let Some(formatter) = var("IFACEGEN_FORMATTER") {
            self.formatter = Some(formatter.parse()?);
        }
        Ok(self)
    }

    /// GOPATH entries, defaulting to `$HOME/go` like the go command does
    pub fn gopath_entries(&self) -> Vec<PathBuf> {
        match &self.gopath {
            Some(gopath) => std::env::split_paths(gopath)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            None => dirs::home_dir()
                .map(|home| vec![home.join("go")])
                .unwrap_or_default(),
        }
    }

    /// Build context for `working_dir`. Without a configured GOROOT the
    /// `go` tool on `PATH` is asked for it.
    pub fn build_context(&self, working_dir: &Path) -> BuildContext {
        self.build_context_with_search_path(working_dir, std::env::var_os("PATH"))
    }

    pub fn build_context_with_search_path(
        &self,
        working_dir: &Path,
        search_path: Option<OsString>,
    ) -> BuildContext {
        let mut context = BuildContext::new(working_dir).with_gopath(self.gopath_entries());
        let goroot = self
            .goroot
            .clone()
            .or_else(|| go_env_goroot(search_path, working_dir));
        match goroot {
            Some(goroot) => context = context.with_goroot(&goroot),
            None => debug!("No GOROOT; standard library packages will not resolve"),
        }
        if let Some(goos) = &self.goos {
            context.goos = goos.clone();
        }
        if let Some(goarch) = &self.goarch {
            context.goarch = goarch.clone();
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_config_serialization() {
        let config = Config {
            goroot: Some(PathBuf::from("/usr/local/go")),
            gopath: Some("/home/dev/go".to_string()),
            formatter: Some(FormatterKind::Builtin),
            ..Default::default()
        };

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"goroot\": \"/usr/local/go\""));
        assert!(json.contains("\"formatter\": \"builtin\""));
        assert!(!json.contains("goarch"));

        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp_dir.path().join(".ifacegen.json"), r#"{"goos":"plan9"}"#).unwrap();

        let found = Config::find_config_file(&nested).unwrap();
        assert_eq!(found, temp_dir.path().join(".ifacegen.json"));

        let config = Config::load_from_file(&found).unwrap();
        assert_eq!(config.goos.as_deref(), Some("plan9"));
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ifacegen.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Config::load_from_file(&path),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GOROOT", "/opt/go"),
            ("GOOS", "windows"),
            ("GOARCH", ""),
            ("IFACEGEN_FORMATTER", "external"),
        ]);
        let config = Config {
            goos: Some("linux".to_string()),
            goarch: Some("arm64".to_string()),
            ..Default::default()
        }
        .with_env(|key| env.get(key).map(|v| v.to_string()))
        .unwrap();

        assert_eq!(config.goroot, Some(PathBuf::from("/opt/go")));
        assert_eq!(config.goos.as_deref(), Some("windows"));
        // empty variables do not override
        assert_eq!(config.goarch.as_deref(), Some("arm64"));
        assert_eq!(config.formatter, Some(FormatterKind::External));
    }

    #[test]
    fn test_bad_formatter_env_is_rejected() {
        let result = Config::default().with_env(|key| {
            (key == "IFACEGEN_FORMATTER").then(|| "prettier".to_string())
        });
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[cfg(unix)]
    fn fake_go(dir: &Path, goroot: &Path) {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("go");
        std::fs::write(&path, format!("#!/bin/sh\necho {}\n", goroot.display())).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_goroot_from_go_tool_resolves_standard_packages() {
        use crate::locator::{GoLocator, PackageLocator};

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        let goroot = root.join("sdk");
        std::fs::create_dir_all(goroot.join("src/sort")).unwrap();
        std::fs::write(goroot.join("src/sort/sort.go"), "package sort\n").unwrap();
        let bin = root.join("bin");
        std::fs::create_dir(&bin).unwrap();
        fake_go(&bin, &goroot);
        let app = root.join("app");
        std::fs::create_dir(&app).unwrap();

        let context = Config::default()
            .with_env(|_| None)
            .unwrap()
            .build_context_with_search_path(&app, Some(bin.into_os_string()));
        assert_eq!(context.goroot, Some(goroot.clone()));

        let package = GoLocator::new(context).resolve("sort").unwrap();
        assert_eq!(package.dir, goroot.join("src/sort"));
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_goroot_wins_over_go_tool() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        fake_go(&root, &root.join("from-go-tool"));
        let config = Config {
            goroot: Some(root.join("configured")),
            ..Default::default()
        };

        let context = config.build_context_with_search_path(&root, Some(root.clone().into_os_string()));
        assert_eq!(context.goroot, Some(root.join("configured")));
    }

    #[test]
    fn test_no_goroot_without_go_tool() {
        let temp_dir = TempDir::new().unwrap();
        let empty = Some(temp_dir.path().as_os_str().to_owned());
        let context = Config::default().build_context_with_search_path(temp_dir.path(), empty);
        assert_eq!(context.goroot, None);
    }

    #[test]
    fn test_gopath_entries_split() {
        let joined = std::env::join_paths(["/one", "/two"]).unwrap();
        let config = Config {
            gopath: Some(joined.to_string_lossy().into_owned()),
            ..Default::default()
        };
        assert_eq!(
            config.gopath_entries(),
            vec![PathBuf::from("/one"), PathBuf::from("/two")]
        );
    }
}
