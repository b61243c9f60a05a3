use super::CliError;
use anyhow::Context;
use janus_core::common::geometry::Detector;
use janus_core::domain::{AnalysisTool, JanusError, ToolRequest};
use janus_core::modules::ToolExecutor;
use janus_core::modules::beamspot::{BEAMSPOT_DATABASE_FILE, BeamspotModule, SamplerConfig};
use janus_core::modules::chisq::{ChiSquareModule, TransitionLevels, image_stem};
use janus_core::modules::phi_pattern::{PhiPatternInput, PhiPatternModule};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct BeamspotArgs {
    /// Database output path
    #[arg(long, default_value = BEAMSPOT_DATABASE_FILE)]
    output: PathBuf,

    /// Particles sampled per beam offset
    #[arg(long)]
    samples: Option<usize>,

    /// Random seed; a fresh one is drawn and logged when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads for the sweep (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// JSON sampler configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON sweep summary output path
    #[arg(long)]
    report: Option<PathBuf>,
}

impl BeamspotArgs {
    fn sampler_config(&self) -> Result<SamplerConfig, JanusError> {
        let mut config = match &self.config {
            Some(path) => SamplerConfig::from_json_path(path)?,
            None => SamplerConfig::default(),
        };
        if let Some(samples) = self.samples {
            config.samples_per_offset = samples;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

#[derive(clap::Args)]
pub(super) struct PhiPatternArgs {
    /// Beam offset along x in cm
    #[arg(allow_negative_numbers = true)]
    x: f64,

    /// Beam offset along y in cm
    #[arg(allow_negative_numbers = true)]
    y: f64,

    /// Detector number: 1 downstream, 0 upstream
    #[arg(allow_negative_numbers = true)]
    detnum: i64,

    /// Number of theta increments
    n_inc: usize,

    /// Write the pattern to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct ChisqArgs {
    /// Tab-separated chisqsurface output
    file: PathBuf,

    /// Levels of both transitions, e.g. 2+1 0+1 2+1 2+1
    #[arg(long, num_args = 4, value_names = ["X_UPPER", "X_LOWER", "Y_UPPER", "Y_LOWER"])]
    levels: Option<Vec<String>>,
}

pub(super) fn run_beamspot_command(args: BeamspotArgs) -> Result<i32, CliError> {
    let config = args.sampler_config().map_err(CliError::Compute)?;

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure the sampling thread pool")?;
    }

    let module = BeamspotModule::new(&config).map_err(CliError::Compute)?;

    let summary = module
        .run(&ToolRequest::new(AnalysisTool::Beamspot, &args.output))
        .map_err(CliError::Compute)?;
    tracing::info!(
        cells = summary.cells,
        valid = summary.valid_samples,
        discarded = summary.discarded_samples,
        "beam-spot sweep finished"
    );

    if let Some(report_path) = &args.report {
        let rendered = serde_json::to_string_pretty(&summary)
            .context("failed to serialize beam-spot summary")?;
        std::fs::write(report_path, rendered).map_err(|source| {
            CliError::Compute(JanusError::io_system(
                "IO.BEAMSPOT_REPORT",
                format!(
                    "failed to write sweep report '{}': {}",
                    report_path.display(),
                    source
                ),
            ))
        })?;
        println!("JSON report: {}", report_path.display());
    }

    println!("Beam-spot database: {}", args.output.display());
    Ok(0)
}

pub(super) fn run_phi_pattern_command(args: PhiPatternArgs) -> Result<i32, CliError> {
    let detector = Detector::from_number(args.detnum).map_err(CliError::Compute)?;
    let module = PhiPatternModule::new(PhiPatternInput {
        x_offset: args.x,
        y_offset: args.y,
        detector,
        theta_increments: args.n_inc,
    });

    match &args.output {
        Some(output) => {
            module
                .execute(&ToolRequest::new(AnalysisTool::PhiPattern, output))
                .map_err(CliError::Compute)?;
            tracing::info!(output = %output.display(), %detector, "wrote phi pattern");
        }
        None => {
            let pattern = module.compute().map_err(CliError::Compute)?;
            print!("{}", pattern.render());
        }
    }
    Ok(0)
}

pub(super) fn run_chisq_command(args: ChisqArgs) -> Result<i32, CliError> {
    let levels = match &args.levels {
        Some(raw) => TransitionLevels::parse(raw.as_slice())
            .map_err(|error| CliError::Usage(format!("invalid --levels: {}", error.message())))?,
        None => TransitionLevels::default(),
    };

    let request = ToolRequest::new(AnalysisTool::ChiSquare, image_stem(&args.file))
        .with_input(&args.file);
    let report = ChiSquareModule::new(levels)
        .run(&request)
        .map_err(CliError::Compute)?;

    for image in &report.images {
        tracing::info!(path = %image.display(), "wrote heatmap");
    }
    print!("{}", report.summary);
    Ok(0)
}
