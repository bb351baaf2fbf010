//! Selection of the Go files that make up a package for a target platform

use super::BuildContext;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::trace;

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

fn constraint_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^//\s*(?:go:build|\+build)\s+(.+)$").expect("constraint pattern is valid")
    })
}

/// Sorted buildable `.go` files of `dir`; test files are never included
pub fn list_go_files(dir: &Path, context: &BuildContext) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_candidate_name(name) {
            continue;
        }
        if !matches_platform(name, &context.goos, &context.goarch) {
            trace!("Skipping {name}: built for another platform");
            continue;
        }
        if is_ignored(&read_header(&path)?) {
            trace!("Skipping {name}: ignore build constraint");
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Leading blank and comment lines of a Go file, where build constraints
/// live; the rest of the file is not read
pub fn read_header(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut header = String::new();
    let mut line = Vec::new();
    let mut in_block = false;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&line);
        let trimmed = text.trim();
        if in_block || trimmed.starts_with("/*") {
            in_block = !trimmed.ends_with("*/");
        } else if !trimmed.is_empty() && !trimmed.starts_with("//") {
            break;
        }
        header.push_str(&text);
    }
    Ok(header)
}

/// `.go` files that are not tests and not hidden from the go tool
pub fn is_candidate_name(name: &str) -> bool {
    name.ends_with(".go")
        && !name.ends_with("_test.go")
        && !name.starts_with('_')
        && !name.starts_with('.')
}

/// Apply `_GOOS`, `_GOARCH` and `_GOOS_GOARCH` file name suffixes
pub fn matches_platform(name: &str, goos: &str, goarch: &str) -> bool {
    let stem = name.strip_suffix(".go").unwrap_or(name);
    // everything before the first underscore is free-form
    let Some(underscore) = stem.find('_') else {
        return true;
    };
    let parts: Vec<&str> = stem[underscore..].split('_').collect();
    let n = parts.len();

    if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
        return os_matches(parts[n - 2], goos) && parts[n - 1] == goarch;
    }
    let last = parts[n - 1];
    if KNOWN_OS.contains(&last) {
        return os_matches(last, goos);
    }
    if KNOWN_ARCH.contains(&last) {
        return last == goarch;
    }
    true
}

fn os_matches(file_os: &str, goos: &str) -> bool {
    file_os == goos
        || (goos == "android" && file_os == "linux")
        || (goos == "illumos" && file_os == "solaris")
        || (goos == "ios" && file_os == "darwin")
}

/// Whether the file header carries an `ignore` build constraint
pub fn is_ignored(contents: &str) -> bool {
    for line in contents.lines() {
        let line = line.trim();
        if line.starts_with("package ") {
            break;
        }
        if let Some(captures) = constraint_pattern().captures(line) {
            if captures[1].split_whitespace().any(|tag| tag == "ignore") {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_names() {
        assert!(is_candidate_name("reader.go"));
        assert!(!is_candidate_name("reader_test.go"));
        assert!(!is_candidate_name("_scratch.go"));
        assert!(!is_candidate_name(".hidden.go"));
        assert!(!is_candidate_name("README.md"));
    }

    #[test]
    fn test_platform_suffixes() {
        assert!(matches_platform("file_linux.go", "linux", "amd64"));
        assert!(!matches_platform("file_windows.go", "linux", "amd64"));
        assert!(matches_platform("file_linux_amd64.go", "linux", "amd64"));
        assert!(!matches_platform("file_linux_arm64.go", "linux", "amd64"));
        assert!(!matches_platform("file_arm64.go", "linux", "amd64"));
        assert!(matches_platform("linux.go", "windows", "amd64"));
        assert!(matches_platform("read_file.go", "windows", "amd64"));
        assert!(matches_platform("poll_linux.go", "android", "arm64"));
    }

    #[test]
    fn test_ignore_constraint() {
        assert!(is_ignored("//go:build ignore\n\npackage main\n"));
        assert!(is_ignored("// +build ignore\n\npackage main\n"));
        assert!(!is_ignored("//go:build linux\n\npackage store\n"));
        assert!(!is_ignored("package store\n\n//go:build ignore\n"));
    }

    #[test]
    fn test_list_go_files_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("b.go"), "package p\n").unwrap();
        std::fs::write(dir.join("a.go"), "package p\n").unwrap();
        std::fs::write(dir.join("a_test.go"), "package p\n").unwrap();
        std::fs::write(dir.join("gen.go"), "//go:build ignore\n\npackage main\n").unwrap();
        std::fs::write(dir.join("z_plan9.go"), "package p\n").unwrap();
        std::fs::create_dir(dir.join("sub.go")).unwrap();
        std::fs::write(dir.join("c.go"), b"package p\n\nvar s = \"\xff\xfe\"\n").unwrap();

        let context = BuildContext::new(dir).with_platform("linux", "amd64");
        let files = list_go_files(dir, &context).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a.go", "b.go", "c.go"]);
    }

    #[test]
    fn test_header_stops_at_first_code_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gen.go");
        let mut contents = b"// Copyright\n/* multi\n   line */\n\n//go:build ignore\n\npackage main\n".to_vec();
        contents.extend_from_slice(b"// \xc3\x28 not utf-8\n");
        std::fs::write(&path, contents).unwrap();

        let header = read_header(&path).unwrap();
        assert!(header.ends_with("//go:build ignore\n\n"));
        assert!(!header.contains("package"));
        assert!(is_ignored(&header));
    }
}
