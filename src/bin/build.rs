//! srs-build: CLI tool for compiling CIDR list files into sing-box rule-sets.

use clap::{Args, Parser, Subcommand};
use srs_build::config::{
    COMPILER_ENV, DEFAULT_COMPILER, DEFAULT_INTERMEDIATE_DIR, DEFAULT_OUTPUT_DIR,
    DEFAULT_UPSTREAM_DIR,
};
use srs_build::{BuildConfig, BuildTarget, Pipeline, RunSummary, SingBoxCompiler};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "srs-build")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Compile plaintext CIDR lists into sing-box binary rule-sets", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    build: BuildArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every .list file in the upstream directory (default)
    Build(BuildArgs),

    /// Build a single list file
    Convert {
        /// Input list file
        #[arg(short, long)]
        input: PathBuf,

        /// Output .srs file
        #[arg(short, long)]
        output: PathBuf,

        /// Intermediate JSON source (defaults to the output path with .json)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Rule-set compiler executable
        #[arg(long, env = COMPILER_ENV, default_value = DEFAULT_COMPILER)]
        compiler: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Directory holding the .list inputs
    #[arg(long, default_value = DEFAULT_UPSTREAM_DIR)]
    upstream_dir: PathBuf,

    /// Directory for intermediate JSON sources
    #[arg(long, default_value = DEFAULT_INTERMEDIATE_DIR)]
    temp_dir: PathBuf,

    /// Directory for compiled .srs files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Rule-set compiler executable
    #[arg(long, env = COMPILER_ENV, default_value = DEFAULT_COMPILER)]
    compiler: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Build(args)) => {
            init_logging(args.verbose);
            build_all(args)
        }
        None => {
            init_logging(cli.build.verbose);
            build_all(cli.build)
        }
        Some(Commands::Convert {
            input,
            output,
            json,
            compiler,
            verbose,
        }) => {
            init_logging(verbose);
            convert_file(input, output, json, compiler)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn build_all(args: BuildArgs) -> srs_build::Result<()> {
    let config = BuildConfig::new(args.upstream_dir, args.temp_dir, args.output_dir)
        .with_compiler(args.compiler);
    let compiler = SingBoxCompiler::new(config.compiler.clone());
    let pipeline = Pipeline::new(config, compiler);

    match pipeline.run(report_built)? {
        RunSummary::NoInputs => {
            eprintln!("No .{} files found", pipeline.config().list_extension);
        }
        RunSummary::Built(targets) => {
            log::debug!("Built {} rule-sets", targets.len());
        }
    }

    Ok(())
}

fn convert_file(
    input: PathBuf,
    output: PathBuf,
    json: Option<PathBuf>,
    compiler: PathBuf,
) -> srs_build::Result<()> {
    let target = BuildTarget::for_output(input, output, json)?;

    let config = BuildConfig::default().with_compiler(compiler);
    let compiler = SingBoxCompiler::new(config.compiler.clone());
    let pipeline = Pipeline::new(config, compiler);
    pipeline.build_target(&target)?;

    report_built(&target);
    Ok(())
}

fn report_built(target: &BuildTarget) {
    println!("Built: {}", target.output_path.display());
}
