//! External variable font compiler (fontmake).

use std::{
    path::Path,
    process::{Command, Stdio},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use log::debug;
use wait_timeout::ChildExt;

/// Runs `<program> -g <source> -o variable` inside a working directory.
#[derive(Debug, Clone)]
pub struct Compiler {
    program: String,
    timeout: Duration,
}

impl Compiler {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self { program: program.into(), timeout }
    }

    /// Compile `source` into variable binaries under `work_dir`.
    ///
    /// fontmake writes its output relative to its current directory, so the
    /// child runs with `work_dir` as cwd and receives an absolute source path.
    pub fn compile_variable(&self, source: &Path, work_dir: &Path) -> Result<()> {
        let source = source
            .canonicalize()
            .with_context(|| format!("Source not found: {}", source.display()))?;

        debug!("Executing: {} -g {} -o variable", self.program, source.display());

        let mut child = Command::new(&self.program)
            .arg("-g")
            .arg(&source)
            .args(["-o", "variable"])
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn '{}'", self.program))?;

        match child.wait_timeout(self.timeout)? {
            Some(status) if status.success() => Ok(()),
            Some(status) => {
                let code = status.code().unwrap_or(-1);
                bail!("'{}' failed with exit code {code}", self.program)
            }
            None => {
                let _ = child.kill();
                let _ = child.wait();
                bail!("'{}' timed out after {} seconds", self.program, self.timeout.as_secs())
            }
        }
    }
}
