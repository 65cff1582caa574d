//! The `asn` command line.
//!
//! Parsing lives here so the commands can be driven from tests; `main` only
//! sets up logging and the rule registry.

use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use jwst_asn::{ExpType, ProductSelector, Result, RuleRegistry};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "asn")]
#[command(about = "Build, validate and edit JWST Level 2 associations")]
#[command(version)]
pub struct Cli {
    /// Raise the log level (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build associations from an exposure pool
    Generate {
        /// Pool file: JSON array or pipe-delimited table
        pool: PathBuf,

        /// Rule to run; repeat for several (default: every rule)
        #[arg(short, long = "rule")]
        rules: Vec<String>,

        /// TOML or YAML builder configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory association files are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Version id stamped into every association
        #[arg(long)]
        version_id: Option<String>,

        /// Only build associations for this program
        #[arg(long)]
        program: Option<String>,

        /// Print associations to stdout instead of writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Check association documents against the schema and invariants
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Add a member to a product
    AddMember {
        file: PathBuf,
        #[command(flatten)]
        member: MemberArgs,
    },

    /// Remove a member from a product
    RemoveMember {
        file: PathBuf,
        #[command(flatten)]
        member: MemberArgs,
    },

    /// List member filenames
    Members {
        file: PathBuf,

        /// Only list members of this exposure type
        #[arg(long)]
        exptype: Option<ExpType>,
    },

    /// List registered rules and their constraints
    Rules,
}

/// Identifies one member of one product.
#[derive(clap::Args, Debug, Clone)]
pub struct MemberArgs {
    /// Product index or name
    #[arg(short, long, value_parser = parse_product)]
    pub product: ProductSelector,

    /// Exposure filename
    #[arg(short, long)]
    pub expname: String,

    /// SCIENCE, BACKGROUND or IMPRINT
    #[arg(short = 't', long)]
    pub exptype: ExpType,
}

// All-digit values select by index, anything else by name.
fn parse_product(value: &str) -> std::result::Result<ProductSelector, String> {
    if value.is_empty() {
        return Err("product must not be empty".to_string());
    }
    Ok(match value.parse::<usize>() {
        Ok(index) => ProductSelector::Index(index),
        Err(_) => ProductSelector::Name(value.to_string()),
    })
}

/// Runs one command, writing its report to `out`.
///
/// Returns `Ok(false)` when the command completed but found problems:
/// invalid documents or rejected associations.
pub fn run(command: Command, registry: &RuleRegistry, out: &mut impl Write) -> Result<bool> {
    match command {
        Command::Generate {
            pool,
            rules,
            config,
            output_dir,
            version_id,
            program,
            dry_run,
        } => {
            let options = commands::GenerateOptions {
                pool,
                rules,
                config,
                output_dir,
                version_id,
                program,
                dry_run,
            };
            commands::generate(options, registry, out)
        }
        Command::Validate { files } => commands::validate(&files, out),
        Command::AddMember { file, member } => commands::add_member(&file, member, out),
        Command::RemoveMember { file, member } => commands::remove_member(&file, member, out),
        Command::Members { file, exptype } => commands::members(&file, exptype, out),
        Command::Rules => commands::rules(registry, out),
    }
}
