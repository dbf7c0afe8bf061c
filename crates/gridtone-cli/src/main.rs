//! gridtone - photo grading from the command line
//!
//! Renders graded images, inspects the LUT catalog and manages posts in a
//! directory store.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "gridtone")]
#[command(author, version, about = "Photo grading engine")]
#[command(long_about = "
Grades photos with tone, HSL band, detail, LUT and vignette controls.

Examples:
  gridtone render photo.jpg -o out.png --set contrast=120 --lut kodak
  gridtone render photo.jpg -o out.png --props look.json --fit cover --size 1080x1350
  gridtone luts --dir ./lut
  gridtone lut-check ./lut/kodak.cube
  gridtone defaults
  gridtone post create --store ./store --id p1 photo.jpg
  gridtone post save --store ./store --id p1 --set hue=20 --user me
  gridtone post reset --store ./store --id p1
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Render config (YAML); defaults to $GRIDTONE_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade an image and write a PNG
    #[command(visible_alias = "r")]
    Render(RenderArgs),

    /// List the LUT catalog
    Luts(LutsArgs),

    /// Parse a .cube file and report its size
    #[command(name = "lut-check")]
    LutCheck(LutCheckArgs),

    /// Print the default properties
    Defaults(DefaultsArgs),

    /// Manage posts in a directory store
    Post(PostArgs),
}

/// Surface options shared by commands that render.
#[derive(Args, Clone, Default)]
struct SurfaceArgs {
    /// Fit policy: contain or cover
    #[arg(long)]
    fit: Option<String>,

    /// Output size WIDTHxHEIGHT (default: source size)
    #[arg(long)]
    size: Option<String>,

    /// Backend: auto, cpu or wgpu
    #[arg(long)]
    backend: Option<String>,

    /// LUT catalog directory
    #[arg(long)]
    lut_dir: Option<PathBuf>,
}

#[derive(Args)]
struct RenderArgs {
    /// Input image (PNG or JPEG)
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Properties JSON (flat field names)
    #[arg(short, long)]
    props: Option<PathBuf>,

    /// Field override NAME=VALUE (repeatable)
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// LUT name from the catalog
    #[arg(short, long)]
    lut: Option<String>,

    #[command(flatten)]
    surface: SurfaceArgs,
}

#[derive(Args)]
struct LutsArgs {
    /// Catalog directory (default: config lut_dir)
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

#[derive(Args)]
struct LutCheckArgs {
    /// .cube file
    file: PathBuf,
}

#[derive(Args)]
struct DefaultsArgs {
    /// Print as NAME=VALUE pairs instead of JSON
    #[arg(long)]
    form: bool,
}

#[derive(Args)]
struct PostArgs {
    #[command(subcommand)]
    command: PostCommand,
}

/// Options identifying a post.
#[derive(Args, Clone)]
struct PostTarget {
    /// Store directory
    #[arg(long)]
    store: PathBuf,

    /// Post id
    #[arg(long)]
    id: String,
}

#[derive(Subcommand)]
enum PostCommand {
    /// Import an image as a new post
    Create {
        #[command(flatten)]
        target: PostTarget,
        /// Source image
        image: PathBuf,
    },

    /// Print the stored record
    Show {
        #[command(flatten)]
        target: PostTarget,
    },

    /// Apply overrides, render and save
    Save {
        #[command(flatten)]
        target: PostTarget,
        /// Field override NAME=VALUE (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
        /// Signed-in user; saving requires one
        #[arg(long)]
        user: Option<String>,
        #[command(flatten)]
        surface: SurfaceArgs,
    },

    /// Delete the saved render and restore defaults
    Reset {
        #[command(flatten)]
        target: PostTarget,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Render(args) => commands::render::run(args, config, cli.verbose),
        Commands::Luts(args) => commands::luts::run(args, config),
        Commands::LutCheck(args) => commands::lut_check::run(args),
        Commands::Defaults(args) => commands::defaults::run(args),
        Commands::Post(args) => commands::post::run(args.command, config, cli.verbose),
    }
}
