// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and subcommands for tfx

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tfx")]
#[command(about = "Inline template substitution for <<variables>> and <<functions()>>")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

/// Variable sources shared by every subcommand
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct VariableArgs {
    #[arg(short = 'V', long = "var", help = "Template variable (key=value)")]
    pub vars: Vec<String>,

    #[arg(long, help = "YAML or JSON file with template variables")]
    pub vars_file: Option<PathBuf>,

    #[arg(long, help = "Do not register built-in functions")]
    pub no_builtins: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Substitute placeholders in a file, or stdin when the input is '-'
    Render {
        #[arg(help = "Path to the template file, or '-' for stdin")]
        input: PathBuf,

        #[command(flatten)]
        variables: VariableArgs,

        #[arg(long, help = "Left anchor (default '<<')")]
        left: Option<String>,

        #[arg(long, help = "Right anchor (default '>>')")]
        right: Option<String>,

        #[arg(short, long, help = "Write the result to this file instead of stdout")]
        output: Option<PathBuf>,

        #[arg(long, help = "Substitute and emit the input line by line")]
        stream: bool,
    },

    /// Report placeholders that would be left unresolved
    Check {
        #[arg(help = "Path to the template file")]
        input: PathBuf,

        #[command(flatten)]
        variables: VariableArgs,
    },

    /// Print the variables and functions available to templates
    Vars {
        #[command(flatten)]
        variables: VariableArgs,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse variables from key=value format
    pub fn parse_variables(vars: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
        let mut variables = BTreeMap::new();

        for var in vars {
            if let Some((key, value)) = var.split_once('=') {
                variables.insert(key.to_string(), value.to_string());
            } else {
                return Err(anyhow::anyhow!(
                    "Invalid variable format '{}'. Expected 'key=value'",
                    var
                ));
            }
        }

        Ok(variables)
    }
}
