//! CLI definitions and dispatch.

use std::{ffi::OsString, path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, error::ErrorKind};
use log::debug;
use vfbeta_core::{
    Workspace,
    config::{DEFAULT_COMPILER, DEFAULT_COMPILER_TIMEOUT},
    run_batch,
};

#[derive(Debug, Parser)]
#[command(name = "vfbeta", version)]
#[command(about = "Build variable font betas from multi-master Glyphs sources")]
pub struct Cli {
    /// Tree of font families containing `source`/`sources` folders
    pub sources: PathBuf,
    /// Root of per-family license folders holding OFL.txt and METADATA.pb
    pub license_root: PathBuf,
    /// Compiler working directory; also holds the mm_src scratch directory
    #[arg(long, default_value = ".")]
    pub work_dir: PathBuf,
    /// Where `<family>vfbeta` directories are written [default: work dir]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Description template [default: <work dir>/DESCRIPTION.en_us_temp.html,
    /// falling back to the bundled one]
    #[arg(long)]
    pub template: Option<PathBuf>,
    /// Program invoked as `<compiler> -g <source> -o variable`
    #[arg(long, default_value = DEFAULT_COMPILER)]
    pub compiler: String,
    /// Seconds before a compiler run is killed
    #[arg(long, default_value_t = DEFAULT_COMPILER_TIMEOUT.as_secs())]
    pub timeout: u64,
}

impl Cli {
    /// Parse arguments, printing usage to stdout when they are wrong.
    ///
    /// Returns `None` when there is nothing to run.
    pub fn parse_or_usage<I, T>(args: I) -> Option<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => Some(cli),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                println!("{}", e.render());
                None
            }
        }
    }

    pub fn workspace(&self) -> Workspace {
        let mut workspace = Workspace::new(&self.work_dir)
            .with_compiler(&self.compiler)
            .with_compiler_timeout(Duration::from_secs(self.timeout));
        if let Some(output_dir) = &self.output_dir {
            workspace = workspace.with_output_dir(output_dir);
        }
        if let Some(template) = &self.template {
            workspace = workspace.with_template(template);
        }
        workspace
    }

    pub fn run(self) -> Result<()> {
        let workspace = self.workspace();
        debug!("{workspace:?}");
        run_batch(&self.sources, &self.license_root, &workspace)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn every_argument_has_help() {
        let command = Cli::command();
        for arg in command.get_arguments() {
            let id = arg.get_id().as_str();
            if matches!(id, "help" | "version") {
                continue;
            }
            assert!(arg.get_help().is_some(), "--{id} has no help text");
        }
    }

    #[test]
    fn two_positionals_use_defaults() {
        let cli = Cli::parse_or_usage(["vfbeta", "fonts", "ofl"]).unwrap();
        assert_eq!(cli.sources, PathBuf::from("fonts"));
        assert_eq!(cli.license_root, PathBuf::from("ofl"));

        let workspace = cli.workspace();
        assert_eq!(workspace.work_dir, PathBuf::from("."));
        assert_eq!(workspace.output_dir, PathBuf::from("."));
        assert_eq!(workspace.scratch_dir, PathBuf::from("./mm_src"));
        assert_eq!(workspace.compiler, "fontmake");
        assert_eq!(workspace.compiler_timeout, DEFAULT_COMPILER_TIMEOUT);
    }

    #[test]
    fn missing_argument_prints_usage() {
        assert!(Cli::parse_or_usage(["vfbeta", "fonts"]).is_none());
        assert!(Cli::parse_or_usage(["vfbeta"]).is_none());
    }

    #[test]
    fn extra_argument_prints_usage() {
        assert!(Cli::parse_or_usage(["vfbeta", "fonts", "ofl", "extra"]).is_none());
    }

    #[test]
    fn options_map_onto_workspace() {
        let cli = Cli::parse_or_usage([
            "vfbeta",
            "fonts",
            "ofl",
            "--work-dir",
            "/tmp/work",
            "--output-dir",
            "/tmp/out",
            "--template",
            "desc.html",
            "--compiler",
            "/opt/fontmake",
            "--timeout",
            "60",
        ])
        .unwrap();

        let workspace = cli.workspace();
        assert_eq!(workspace.scratch_dir, PathBuf::from("/tmp/work/mm_src"));
        assert_eq!(workspace.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(workspace.template, PathBuf::from("desc.html"));
        assert_eq!(workspace.compiler, "/opt/fontmake");
        assert_eq!(workspace.compiler_timeout, Duration::from_secs(60));
    }
}
