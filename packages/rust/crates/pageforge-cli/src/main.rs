//! pageforge CLI: inspect each edit stage, or replay a recorded edit.
//!
//! Settings come from `packages/conf/pageforge.yaml` plus the user file under the
//! config home. Override the config home with `--conf <dir>`.
//!
//! Logging: set `RUST_LOG=pageforge=debug` (or pass `--verbose`) to see pipeline
//! decisions on stderr. Reports are JSON on stdout.

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pageforge_cli::{load_settings, set_config_home_override};

use crate::cli::{Cli, Command};
use crate::commands::{
    ApplyRequest, run_anchor, run_apply, run_classify, run_locate, run_merge, run_prompt,
    run_validate,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(conf_dir) = cli.conf.clone() {
        set_config_home_override(conf_dir);
    }

    // RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "pageforge=debug,pageforge_edit=debug,pageforge_cli=debug"
        } else {
            "pageforge=info,pageforge_edit=info,pageforge_cli=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = load_settings().into_config();
    tracing::debug!(?config, "settings loaded");

    match cli.command {
        Command::Classify {
            document,
            instruction,
        } => run_classify(&document, &instruction, &config),
        Command::Locate {
            document,
            instruction,
        } => run_locate(&document, &instruction, &config),
        Command::Prompt {
            document,
            instruction,
        } => run_prompt(&document, &instruction, &config),
        Command::Anchor {
            document,
            anchor,
            position,
        } => run_anchor(&document, &anchor, position.into()),
        Command::Merge {
            document,
            old,
            new,
            output,
        } => run_merge(&document, &old, &new, output.as_deref()),
        Command::Validate {
            original,
            candidate,
            mode,
        } => run_validate(&original, &candidate, mode.into(), &config),
        Command::Apply {
            document,
            instruction,
            responses,
            output,
            history,
        } => {
            run_apply(
                ApplyRequest {
                    document,
                    instruction,
                    responses,
                    output,
                    history,
                },
                config,
            )
            .await
        }
    }
}
