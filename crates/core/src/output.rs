use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write generated code to `path`, or to stdout when there is none.
///
/// Files are created owner-only (0600 on Unix) and truncated.
pub fn write_output(path: Option<&Path>, code: &str) -> Result<()> {
    match path {
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(code.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|source| Error::WriteFailure {
                    target: "stdout".to_string(),
                    source,
                })
        }
        Some(path) => {
            let wrap = |source| Error::WriteFailure {
                target: path.display().to_string(),
                source,
            };
            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o600);
            }
            let mut file = options.open(path).map_err(wrap)?;
            file.write_all(code.as_bytes()).map_err(wrap)?;
            info!("Wrote {} bytes to {}", code.len(), path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mock.go");
        std::fs::write(&path, "stale contents that are longer\n").unwrap();

        write_output(Some(&path), "package x\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "package x\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stub.go");
        write_output(Some(&path), "func f() {\n}\n").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_missing_directory_is_write_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("mock.go");
        let err = write_output(Some(&path), "x").unwrap_err();
        match err {
            Error::WriteFailure { target, .. } => assert!(target.ends_with("mock.go")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
