//! shapecmp CLI

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::BufRead;
use std::path::{Path, PathBuf};

use sc_analysis::{
    apply_selection, overlay_artifact, BuildOptions, Region, SelectionConfig, EVENT_FIELDS,
    WEIGHT_FIELD,
};
use sc_render::config::resolve_config;
use sc_sample::{read_sample, Sample};

#[derive(Parser)]
#[command(name = "shapecmp")]
#[command(about = "shapecmp - Signal vs background shape comparison")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build normalized overlay histograms and render one plot per variable
    Plot {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        cuts: CutArgs,

        /// Output directory; plots land in a per-region subdirectory
        #[arg(long, default_value = "plots")]
        out_dir: PathBuf,

        /// Plot format (svg or png)
        #[arg(long, default_value = "svg")]
        format: String,

        /// Bin count for continuous variables
        #[arg(long, default_value = "40")]
        bins: usize,

        /// Fill with unit weights instead of per-event weights
        #[arg(long)]
        unweighted: bool,

        /// Also write the overlay artifact (pretty JSON) to this path
        #[arg(long)]
        artifact_out: Option<PathBuf>,

        /// Plot style overrides (YAML file)
        #[arg(long)]
        viz_config: Option<PathBuf>,

        /// Pause for Enter after each rendered variable
        #[arg(long)]
        interactive: bool,
    },

    /// Print per-region event counts and weight sums for both samples
    Inspect {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        cuts: CutArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Signal events file (Parquet)
    #[arg(long)]
    signal: PathBuf,

    /// Background events file (Parquet)
    #[arg(long)]
    background: PathBuf,

    /// Logical table name inside the event files
    #[arg(long, default_value = "ntuple")]
    table: String,

    /// Selection regime (total, zgamma, signal)
    #[arg(long, default_value = "total")]
    region: Region,
}

#[derive(Args)]
struct CutArgs {
    /// Selection threshold overrides (JSON file)
    #[arg(long)]
    cuts: Option<PathBuf>,

    /// Override the required exact lepton multiplicity
    #[arg(long)]
    n_leptons: Option<f64>,

    /// Override the minimum dijet invariant mass [GeV]
    #[arg(long)]
    mjj_min: Option<f64>,

    /// Override the maximum photon centrality
    #[arg(long)]
    centrality_max: Option<f64>,
}

impl CutArgs {
    /// JSON file first, then individual flags on top.
    fn resolve(&self) -> Result<SelectionConfig> {
        let mut cfg = match &self.cuts {
            None => SelectionConfig::default(),
            Some(p) => {
                let text = std::fs::read_to_string(p)
                    .with_context(|| format!("failed to read cuts file {}", p.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid cuts file {}", p.display()))?
            }
        };
        if let Some(v) = self.n_leptons {
            cfg.n_leptons = v;
        }
        if let Some(v) = self.mjj_min {
            cfg.mjj_min = v;
        }
        if let Some(v) = self.centrality_max {
            cfg.centrality_max = v;
        }
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Plot {
            input,
            cuts,
            out_dir,
            format,
            bins,
            unweighted,
            artifact_out,
            viz_config,
            interactive,
        } => cmd_plot(PlotArgs {
            input,
            cuts,
            out_dir,
            format,
            bins,
            unweighted,
            artifact_out,
            viz_config,
            interactive,
        }),
        Commands::Inspect { input, cuts } => cmd_inspect(&input, &cuts),
    }
}

struct PlotArgs {
    input: InputArgs,
    cuts: CutArgs,
    out_dir: PathBuf,
    format: String,
    bins: usize,
    unweighted: bool,
    artifact_out: Option<PathBuf>,
    viz_config: Option<PathBuf>,
    interactive: bool,
}

fn load_filtered(path: &Path, table: &str, region: Region, cfg: &SelectionConfig) -> Result<Sample> {
    let raw = read_sample(path, table, EVENT_FIELDS)
        .with_context(|| format!("failed to load events from {}", path.display()))?;
    let filtered = apply_selection(&raw, region, cfg)?;
    Ok(filtered)
}

fn weight_sum(sample: &Sample) -> f64 {
    sample.column(WEIGHT_FIELD).map(|w| w.iter().sum()).unwrap_or(0.0)
}

fn cmd_plot(args: PlotArgs) -> Result<()> {
    let cfg = args.cuts.resolve()?;
    let region = args.input.region;

    let sig = load_filtered(&args.input.signal, &args.input.table, region, &cfg)?;
    let bg = load_filtered(&args.input.background, &args.input.table, region, &cfg)?;

    tracing::info!(
        region = region.label(),
        signal_entries = sig.n_rows(),
        signal_weight = weight_sum(&sig),
        background_entries = bg.n_rows(),
        background_weight = weight_sum(&bg),
        "loaded and filtered samples"
    );

    let opts = BuildOptions { default_bins: args.bins, use_weights: !args.unweighted };
    let artifact = overlay_artifact(&sig, &bg, region, &opts)?;

    if let Some(path) = &args.artifact_out {
        std::fs::write(path, serde_json::to_string_pretty(&artifact)?)
            .with_context(|| format!("failed to write artifact {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote overlay artifact");
    }

    let viz_yaml = match &args.viz_config {
        None => None,
        Some(p) => Some(
            std::fs::read_to_string(p)
                .with_context(|| format!("failed to read viz config {}", p.display()))?,
        ),
    };
    let config = resolve_config(viz_yaml.as_deref())?;

    let region_dir = args.out_dir.join(region.dir_name());
    std::fs::create_dir_all(&region_dir)
        .with_context(|| format!("failed to create {}", region_dir.display()))?;

    let stdin = std::io::stdin();
    for var in &artifact.variables {
        let path = region_dir.join(format!("{}.{}", var.name, args.format));
        sc_render::render_to_file(&artifact, &var.name, &path, &config)
            .with_context(|| format!("failed to render {}", var.name))?;
        tracing::info!(variable = %var.name, path = %path.display(), "rendered plot");

        if args.interactive {
            println!("rendered {} -> {} (Enter for next)", var.name, path.display());
            let mut line = String::new();
            stdin.lock().read_line(&mut line)?;
        }
    }

    Ok(())
}

fn cmd_inspect(input: &InputArgs, cuts: &CutArgs) -> Result<()> {
    let cfg = cuts.resolve()?;
    let sig = load_filtered(&input.signal, &input.table, input.region, &cfg)?;
    let bg = load_filtered(&input.background, &input.table, input.region, &cfg)?;

    println!("region: {}", input.region.label());
    println!("signal:     {:>8} events, weight sum {:.6}", sig.n_rows(), weight_sum(&sig));
    println!("background: {:>8} events, weight sum {:.6}", bg.n_rows(), weight_sum(&bg));
    Ok(())
}
