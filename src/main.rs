//! `tokens`: design tokens → CSS custom properties.
//!
//! Usage:
//!   tokens split             - tokens/tokens.json → tokens/transformed/<set>-tokens.json
//!   tokens globals           - transformed light/dark tokens → app/globals.css
//!   tokens inject-colors     - tailwind.theme.json colors → `@theme inline` in app/globals.css
//!   tokens tailwind-config   - tailwind.generated.json → tailwind.theme.json + tailwind.config.ts
//!   tokens build             - split, globals, then inject-colors if a theme config exists

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use design_tokens::{detect_root, Pipeline, ProjectPaths};
use design_tokens_core::{
    tailwind::{CleanOptions, DEFAULT_MAX_DEPTH},
    ValueStyle,
};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "tokens", version, about = "Builds CSS custom properties from design tokens")]
struct Cli {
    /// Project root (default: nearest ancestor with a package.json)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log every file touched
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split the aggregate token document into one file per token set
    Split,
    /// Generate the global stylesheet from the light and dark token sets
    Globals {
        /// Render `{group.token}` references as `var(--group-token)`
        #[arg(long)]
        css_refs: bool,
    },
    /// Splice theme colors into the `@theme inline` block of the stylesheet
    InjectColors,
    /// Clean the generated Tailwind config into a theme document and tailwind.config.ts
    TailwindConfig {
        /// Keep the raw generated config instead of deleting it
        #[arg(long)]
        keep_source: bool,
        /// Depth below which noisy keys are no longer pruned
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, conflicts_with = "no_prune")]
        max_depth: usize,
        /// Keep every key of the generated config
        #[arg(long)]
        no_prune: bool,
    },
    /// Run split, globals and inject-colors in order
    Build {
        /// Render `{group.token}` references as `var(--group-token)`
        #[arg(long)]
        css_refs: bool,
    },
}

fn value_style(css_refs: bool) -> ValueStyle {
    if css_refs {
        ValueStyle::CssReferences
    } else {
        ValueStyle::Literal
    }
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).format_target(false).init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let root = match cli.root {
        Some(root) => root,
        None => detect_root(&std::env::current_dir().context("Failed to read working directory")?),
    };
    let paths = ProjectPaths::load(&root).context("Failed to load project paths")?;
    let pipeline = Pipeline::new(paths);

    match cli.command {
        Command::Split => {
            pipeline.split().context("Failed to split tokens")?;
        }
        Command::Globals { css_refs } => {
            pipeline
                .globals(value_style(css_refs))
                .context("Failed to generate the global stylesheet")?;
        }
        Command::InjectColors => {
            pipeline
                .inject_colors()
                .context("Failed to inject theme colors")?;
        }
        Command::TailwindConfig {
            keep_source,
            max_depth,
            no_prune,
        } => {
            let options = CleanOptions {
                max_depth: (!no_prune).then_some(max_depth),
                remove_source: !keep_source,
            };
            pipeline
                .tailwind_config(&options)
                .context("Failed to clean the Tailwind config")?;
        }
        Command::Build { css_refs } => {
            pipeline
                .build(value_style(css_refs))
                .context("Token build failed")?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
