use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Where Go sources live and which platform files are selected for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub goroot: Option<PathBuf>,
    pub gopath: Vec<PathBuf>,
    pub goos: String,
    pub goarch: String,
    /// Directory of the destination package
    pub working_dir: PathBuf,
}

impl BuildContext {
    pub fn new(working_dir: &Path) -> Self {
        Self {
            goroot: None,
            gopath: Vec::new(),
            goos: host_goos().to_string(),
            goarch: host_goarch().to_string(),
            working_dir: canonical(working_dir),
        }
    }

    pub fn with_goroot(mut self, goroot: &Path) -> Self {
        self.goroot = Some(canonical(goroot));
        self
    }

    pub fn with_gopath(mut self, gopath: Vec<PathBuf>) -> Self {
        self.gopath = gopath.iter().map(|p| canonical(p)).collect();
        self
    }

    pub fn with_platform(mut self, goos: &str, goarch: &str) -> Self {
        self.goos = goos.to_string();
        self.goarch = goarch.to_string();
        self
    }

    /// `src` directories that import paths are resolved against directly
    pub fn source_roots(&self) -> Vec<PathBuf> {
        self.goroot
            .iter()
            .chain(self.gopath.iter())
            .map(|root| root.join("src"))
            .collect()
    }
}

/// Resolve symlinks so prefix comparisons between directories hold
pub(crate) fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// GOROOT as reported by `go env GOROOT`, with `go` looked up on
/// `search_path` (a `PATH`-style list)
pub fn go_env_goroot(search_path: Option<OsString>, cwd: &Path) -> Option<PathBuf> {
    let go = match which::which_in("go", search_path, cwd) {
        Ok(go) => go,
        Err(e) => {
            debug!("No go tool to ask for GOROOT: {e}");
            return None;
        }
    };
    let output = match Command::new(&go)
        .args(["env", "GOROOT"])
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            debug!("Failed to run {}: {e}", go.display());
            return None;
        }
    };
    if !output.status.success() {
        debug!("{} env GOROOT exited with {}", go.display(), output.status);
        return None;
    }

    let goroot = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if goroot.is_empty() {
        return None;
    }
    debug!("GOROOT from {}: {goroot}", go.display());
    Some(PathBuf::from(goroot))
}

/// Host operating system under Go's naming
pub fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// Host architecture under Go's naming
pub fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}
