use std::ffi::OsStr;
use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Scratch directory holding the three pipeline files.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self, String> {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    #[must_use]
    pub fn input(&self) -> PathBuf {
        self.path("data.txt")
    }

    #[must_use]
    pub fn output(&self) -> PathBuf {
        self.path("ans.txt")
    }

    #[must_use]
    pub fn diff(&self) -> PathBuf {
        self.path("diff.txt")
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, path: &Path, content: &str) -> Result<(), String> {
        fs::write(path, content).map_err(|err| format!("write {} failed: {}", path.display(), err))
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self, path: &Path) -> Result<String, String> {
        fs::read_to_string(path).map_err(|err| format!("read {} failed: {}", path.display(), err))
    }

    /// File flags pointing every pipeline path into this workspace.
    #[must_use]
    pub fn path_args(&self) -> Vec<String> {
        vec![
            "--input".to_owned(),
            self.input().to_string_lossy().into_owned(),
            "--output".to_owned(),
            self.output().to_string_lossy().into_owned(),
            "--diff".to_owned(),
            self.diff().to_string_lossy().into_owned(),
        ]
    }

    /// Runs the binary from inside the workspace so no stray config file in
    /// the caller's directory is picked up.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary cannot be executed.
    pub fn run<I, S>(&self, args: I) -> Result<Output, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let bin = roundtrip_bin()?;
        Command::new(bin)
            .args(args)
            .current_dir(self.dir.path())
            .env("ROUNDTRIP_LOG", "error")
            .env_remove("AWS_SESSION_TOKEN")
            .env_remove("AWS_ACCESS_KEY_ID")
            .env_remove("AWS_SECRET_ACCESS_KEY")
            .output()
            .map_err(|err| format!("run metrics-roundtrip failed: {}", err))
    }
}

/// Address of a port that was free a moment ago and now has no listener.
///
/// # Errors
///
/// Returns an error if no local port can be reserved.
pub fn closed_local_addr() -> Result<String, String> {
    let listener =
        TcpListener::bind("127.0.0.1:0").map_err(|err| format!("bind failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("local_addr failed: {}", err))?;
    drop(listener);
    Ok(addr.to_string())
}

#[must_use]
pub fn describe(output: &Output) -> String {
    format!(
        "status: {}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn roundtrip_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_metrics-roundtrip").map_or_else(
        || Err("CARGO_BIN_EXE_metrics-roundtrip missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
