// brickforge/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brickforge")]
#[command(about = "Scaffolds Databricks Asset Bundle projects from a JSON configuration", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🏗️  Generates a new bundle project into <output-dir>/<project_name>
    Init {
        /// JSON configuration file
        #[arg(long)]
        config_file: PathBuf,

        /// Parent directory of the generated project
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Load templates from this directory instead of the built-in set
        #[arg(long)]
        template_dir: Option<PathBuf>,
    },

    /// ✅ Validates a configuration and prints the resolved targets
    Validate {
        /// JSON configuration file
        #[arg(long)]
        config_file: PathBuf,
    },

    /// 🔍 Re-checks a generated project against its bundle_init_config.json
    Verify {
        /// Generated project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 📋 Lists every configuration option with its legal values
    Options,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_init_defaults() -> Result<()> {
        let args = Cli::parse_from(["brickforge", "init", "--config-file", "acme.json"]);
        assert!(!args.verbose);
        match args.command {
            Commands::Init {
                config_file,
                output_dir,
                template_dir,
            } => {
                assert_eq!(config_file.to_string_lossy(), "acme.json");
                assert_eq!(output_dir.to_string_lossy(), ".");
                assert_eq!(template_dir, None);
                Ok(())
            }
            _ => bail!("Expected Init command"),
        }
    }

    #[test]
    fn test_cli_parse_init_template_dir() -> Result<()> {
        let args = Cli::parse_from([
            "brickforge",
            "init",
            "--config-file",
            "acme.json",
            "--output-dir",
            "/tmp",
            "--template-dir",
            "my_templates",
            "--verbose",
        ]);
        assert!(args.verbose);
        match args.command {
            Commands::Init {
                output_dir,
                template_dir,
                ..
            } => {
                assert_eq!(output_dir.to_string_lossy(), "/tmp");
                assert_eq!(template_dir, Some(PathBuf::from("my_templates")));
                Ok(())
            }
            _ => bail!("Expected Init command"),
        }
    }

    #[test]
    fn test_cli_init_requires_config_file() {
        assert!(Cli::try_parse_from(["brickforge", "init"]).is_err());
    }

    #[test]
    fn test_cli_parse_verify() -> Result<()> {
        let args = Cli::parse_from(["brickforge", "-v", "verify", "--project-dir", "acme"]);
        assert!(args.verbose);
        match args.command {
            Commands::Verify { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), "acme");
                Ok(())
            }
            _ => bail!("Expected Verify command"),
        }
    }

    #[test]
    fn test_cli_parse_options() {
        let args = Cli::parse_from(["brickforge", "options"]);
        assert!(matches!(args.command, Commands::Options));
    }
}
