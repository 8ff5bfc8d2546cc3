//! GlyphSeed CLI - Icon engine bridge
//!
//! Commands: spec, render, profiles, export, verify
//! Outputs JSON (SVG for render) to stdout, logs to stderr
//! Returns non-zero on failure, 2 on validation or verification failure

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use glyphseed_core::{
    pipeline::MANIFEST_FILENAME,
    CornerRadius, DesignSpec, ExportRequest, IconPipeline, IconTarget, Mode, Overrides,
    ProfileRegistry, Variant,
};

#[derive(Parser)]
#[command(name = "glyphseed-cli")]
#[command(about = "GlyphSeed CLI - Deterministic app icon engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory of extra export profiles (*.json)
    #[arg(short, long, default_value = "profiles")]
    profiles_dir: PathBuf,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args, Default)]
struct DialArgs {
    /// Color vibrancy, 0-100
    #[arg(long)]
    vibrancy: Option<f64>,
    /// Detail level, 0-100
    #[arg(long)]
    complexity: Option<f64>,
    /// Spread of element sizes, 0-100
    #[arg(long)]
    size_variation: Option<f64>,
    /// Rotation in degrees
    #[arg(long, allow_hyphen_values = true)]
    rotation: Option<f64>,
    /// Grid and ring density, 0-100
    #[arg(long)]
    pattern_density: Option<f64>,
}

impl From<&DialArgs> for Overrides {
    fn from(args: &DialArgs) -> Self {
        Overrides {
            vibrancy: args.vibrancy,
            complexity: args.complexity,
            size_variation: args.size_variation,
            rotation: args.rotation,
            pattern_density: args.pattern_density,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    Logo,
    Name,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Logo => Variant::Logo,
            VariantArg::Name => Variant::Name,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Light,
    Dark,
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Light => Mode::Light,
            ModeArg::Dark => Mode::Dark,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the design spec for a name
    Spec {
        /// App name
        #[arg(short, long)]
        name: String,

        #[command(flatten)]
        dials: DialArgs,
    },

    /// Render one icon as SVG
    Render {
        /// App name
        #[arg(short, long)]
        name: String,

        #[arg(long, value_enum, default_value = "logo")]
        variant: VariantArg,

        #[arg(long, value_enum, default_value = "light")]
        mode: ModeArg,

        /// Edge length in pixels
        #[arg(short, long, default_value_t = 1024)]
        size: u32,

        /// squircle, circle, square or a percentage like 18%
        #[arg(long, default_value = "squircle")]
        corner: CornerRadius,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        dials: DialArgs,
    },

    /// List available export profiles
    Profiles,

    /// Export a profile's full icon set
    Export {
        /// App name
        #[arg(short, long)]
        name: String,

        /// Profile ID
        #[arg(short = 'P', long)]
        profile: String,

        /// Output directory
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Override the profile's corner radius
        #[arg(long)]
        corner: Option<CornerRadius>,

        #[command(flatten)]
        dials: DialArgs,
    },

    /// Re-render an export manifest and compare hashes
    Verify {
        /// Manifest path, or an export directory containing one
        #[arg(short, long)]
        manifest: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!(r#"{{"error": "Failed to serialize output: {}"}}"#, e),
    }
}

fn failure(error: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "error": error.to_string(),
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load profiles
    let registry = match ProfileRegistry::load_from_dir(&cli.profiles_dir) {
        Ok(r) => r,
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to load profiles: {}"}}"#, e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = IconPipeline::new(registry);

    match cli.command {
        Commands::Spec { name, dials } => {
            let spec = DesignSpec::build(&name, &Overrides::from(&dials));
            let style = pipeline.dispatcher().select(&spec).name();
            print_json(&serde_json::json!({
                "name": name,
                "style": style,
                "spec": spec,
            }));
            ExitCode::SUCCESS
        }

        Commands::Render { name, variant, mode, size, corner, out, dials } => {
            let spec = DesignSpec::build(&name, &Overrides::from(&dials));
            let target = IconTarget { variant: variant.into(), mode: mode.into(), size };

            let markup = match pipeline.render_icon(&name, &spec, target, corner) {
                Ok(m) => m,
                Err(e) => {
                    print_json(&failure(e));
                    return ExitCode::from(2);
                }
            };

            match out {
                Some(path) => match fs::write(&path, markup) {
                    Ok(()) => {
                        print_json(&serde_json::json!({
                            "success": true,
                            "path": path.display().to_string(),
                        }));
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        print_json(&failure(e));
                        ExitCode::FAILURE
                    }
                },
                None => {
                    println!("{}", markup);
                    ExitCode::SUCCESS
                }
            }
        }

        Commands::Profiles => {
            let profiles: Vec<_> = pipeline.list_profiles()
                .iter()
                .map(|p| serde_json::json!({
                    "id": p.id,
                    "name": p.name,
                    "version": p.profile_version,
                    "platform": p.platform,
                    "corner": p.corner,
                    "sizes": p.sizes.iter().map(|s| s.size).collect::<Vec<_>>(),
                }))
                .collect();

            print_json(&serde_json::Value::Array(profiles));
            ExitCode::SUCCESS
        }

        Commands::Export { name, profile, out_dir, corner, dials } => {
            let request = ExportRequest {
                overrides: Overrides::from(&dials),
                corner,
                ..ExportRequest::new(&name, &profile)
            };

            let result = pipeline
                .export(&request)
                .and_then(|manifest| {
                    pipeline.write_export(&manifest, &out_dir).map(|written| (manifest, written))
                });

            match result {
                Ok((manifest, written)) => {
                    print_json(&serde_json::json!({
                        "success": true,
                        "manifestId": manifest.id,
                        "manifestHash": manifest.manifest_hash,
                        "style": manifest.style,
                        "seed": manifest.spec.seed,
                        "files": written.len(),
                        "outDir": out_dir.display().to_string(),
                    }));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    print_json(&failure(e));
                    ExitCode::from(2)
                }
            }
        }

        Commands::Verify { manifest } => {
            let path = if manifest.is_dir() {
                manifest.join(MANIFEST_FILENAME)
            } else {
                manifest
            };

            let report = IconPipeline::read_manifest(&path)
                .and_then(|m| pipeline.verify(&m));

            match report {
                Ok(report) => {
                    let clean = report.is_clean();
                    print_json(&serde_json::json!({
                        "success": clean,
                        "report": report,
                    }));
                    if clean { ExitCode::SUCCESS } else { ExitCode::from(2) }
                }
                Err(e) => {
                    print_json(&failure(e));
                    ExitCode::FAILURE
                }
            }
        }
    }
}
