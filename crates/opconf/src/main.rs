// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! opconf - resolve 1Password secret references in configuration files.
//!
//! This is the binary entry point for the `opconf` command-line tool.

mod mask;
mod resolve;
mod scan;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use opconf_config::{DocumentFormat, OpconfConfig};

/// opconf - resolve 1Password secret references in configuration files.
#[derive(Parser, Debug)]
#[command(name = "opconf", version, about, long_about = None)]
struct Cli {
    /// Tool configuration file (defaults to the XDG lookup hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve every secret reference in a TOML or JSON document.
    Resolve {
        /// Document to resolve.
        file: PathBuf,
        /// Output file (defaults to stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Mask resolved values in the output.
        #[arg(long)]
        mask: bool,
        #[command(flatten)]
        document: DocumentArgs,
        #[command(flatten)]
        resolver: ResolverArgs,
    },
    /// List secret references in a document without resolving them.
    Scan {
        /// Document to scan.
        file: PathBuf,
        /// Output as JSON for scripting.
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        document: DocumentArgs,
        /// Reference schema prefix.
        #[arg(long)]
        schema: Option<String>,
    },
    /// Resolve a single named reference.
    Read {
        /// Parameter name used as the batch identifier.
        name: String,
        /// Secret reference, e.g. op://vault/item/field.
        reference: String,
        /// Mask the resolved value.
        #[arg(long)]
        mask: bool,
        #[command(flatten)]
        resolver: ResolverArgs,
    },
    /// Print the effective tool configuration.
    Config,
}

/// Document format selection.
#[derive(Args, Debug)]
struct DocumentArgs {
    /// Document format (inferred from the file extension when omitted).
    #[arg(long)]
    format: Option<DocumentFormat>,
}

/// Per-invocation overrides of the `[resolver]` section.
#[derive(Args, Debug)]
struct ResolverArgs {
    /// 1Password account or sign-in address.
    #[arg(long)]
    account: Option<String>,
    /// Reference schema prefix.
    #[arg(long)]
    schema: Option<String>,
    /// Leave references untouched instead of failing.
    #[arg(long)]
    fail_silently: bool,
}

impl ResolverArgs {
    fn apply(&self, config: &mut OpconfConfig) {
        if let Some(account) = &self.account {
            config.resolver.account = Some(account.clone());
        }
        if let Some(schema) = &self.schema {
            config.resolver.schema = schema.clone();
        }
        if self.fail_silently {
            config.resolver.fail_silently = true;
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => opconf_config::load_and_validate_path(path),
        None => opconf_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            opconf_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let result = match cli.command {
        Some(Commands::Resolve {
            file,
            output,
            mask,
            document,
            resolver,
        }) => {
            resolver.apply(&mut config);
            resolve::run_resolve(&config, &file, document.format, output.as_deref(), mask).await
        }
        Some(Commands::Scan {
            file,
            json,
            document,
            schema,
        }) => {
            if let Some(schema) = schema {
                config.resolver.schema = schema;
            }
            scan::run_scan(&config, &file, document.format, json)
        }
        Some(Commands::Read {
            name,
            reference,
            mask,
            resolver,
        }) => {
            resolver.apply(&mut config);
            resolve::run_read(&config, &name, &reference, mask).await
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => {
                print!("{rendered}");
                Ok(())
            }
            Err(e) => Err(opconf_core::OpconfError::Internal(format!(
                "failed to render config: {e}"
            ))),
        },
        None => {
            println!("opconf: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber with an env-filter.
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so that
/// resolved documents on stdout stay clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("opconf={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
