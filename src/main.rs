use clap::{Parser, Subcommand};
use pixel_augment::registry::{self, ParamValue, RawParams};
use pixel_augment::service::AugmentationService;
use pixel_augment::types::TransformKind;
use pixel_augment::{config, output};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pixel-augment")]
#[command(about = "Apply one image augmentation and write the result as PNG")]
#[command(long_about = "\
Apply one image augmentation and write the result as PNG

Pick a transform kind, tune its parameters, get a PNG back. Every stochastic
kind samples its concrete transform from a seeded generator, so passing the
same --seed reproduces the same output.

Parameter resolution (later wins):
  registry defaults → augment.toml [params.<kind>] → -p name=value
Use --strict to send exactly the -p values and nothing else.

Run 'pixel-augment kinds' for the catalog and 'pixel-augment gen-config'
for a documented augment.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./augment.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Augment one JPEG or PNG image
    Apply(ApplyArgs),
    /// List transform kinds with their parameters
    Kinds {
        /// Emit the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock augment.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ApplyArgs {
    /// Input image (JPEG or PNG)
    input: PathBuf,

    /// Transform kind: slug, label or name (e.g. rotation, "Hue & Saturation")
    #[arg(long, short)]
    kind: TransformKind,

    /// Parameter override, repeatable
    #[arg(long = "param", short = 'p', value_name = "NAME=VALUE", value_parser = parse_param)]
    params: Vec<(String, ParamValue)>,

    /// Seed for the transform sampler
    #[arg(long)]
    seed: Option<u64>,

    /// Output path (default: augmented_<kind>.png)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Use only the -p values: no defaults, no config presets
    #[arg(long)]
    strict: bool,
}

fn parse_param(s: &str) -> Result<(String, ParamValue), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let value = value.parse::<ParamValue>().map_err(|e| e.to_string())?;
    Ok((name.trim().to_string(), value))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Apply(args) => {
            let config = match &cli.config {
                Some(path) => config::load_config_file(path)?,
                None => config::load_config(Path::new("."))?,
            };
            init_thread_pool(&config.processing);

            let params = resolve_params(&args, &config);
            let seed = args
                .seed
                .or(config.sampling.seed)
                .unwrap_or_else(|| rand::rng().random());
            let mut rng = StdRng::seed_from_u64(seed);
            log::debug!("seed {seed}, params {params:?}");

            let bytes = std::fs::read(&args.input)?;
            let encoded = AugmentationService::new().run(&bytes, args.kind, &params, &mut rng)?;

            let output_path = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(args.kind.file_name()));
            std::fs::write(&output_path, &encoded)?;
            output::print_apply_summary(args.kind, &params, seed, &output_path, encoded.len());
        }
        Command::Kinds { json } => {
            let specs = registry::catalog();
            if json {
                println!("{}", output::format_catalog_json(&specs)?);
            } else {
                output::print_catalog(&specs);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Config preset (already layered over the registry defaults), then `-p`
/// flags. `--strict` keeps only the flags.
fn resolve_params(args: &ApplyArgs, config: &config::AugmentConfig) -> RawParams {
    let mut params = if args.strict {
        RawParams::new()
    } else {
        config.params_for(args.kind)
    };
    params.extend(args.params.iter().cloned());
    params
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
