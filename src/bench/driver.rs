//! Benchmark driver: the single error boundary around load, measure, and
//! the quality-check image save.

use std::error::Error as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::bench::{benchmark, synthetic_input, BenchOptions};
use crate::errors::BenchError;
use crate::model::DEMO_MODEL_ID;
use crate::pipeline::{EditPipeline, InvocationParams};
use crate::quantization::DEFAULT_THRESHOLD;

/// Seed for the quality-check inference, so the saved sample is reproducible.
const SAMPLE_SEED: u64 = 42;

/// Driver knobs for one full benchmark run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub model_id: String,
    pub steps: usize,
    pub runs: usize,
    /// Reference latency the speedup ratio is computed against. Defaults to
    /// the historical unquantized figure; override it with a measured one.
    pub baseline_secs: f64,
    pub threshold: f32,
    pub quantize: bool,
    /// Where the quality-check sample image is written.
    pub output_image: PathBuf,
    /// Optional machine-readable summary.
    pub json_report: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            model_id: DEMO_MODEL_ID.to_string(),
            steps: 4,
            runs: 5,
            baseline_secs: 9.5,
            threshold: DEFAULT_THRESHOLD,
            quantize: true,
            output_image: PathBuf::from("int8_sample.png"),
            json_report: None,
        }
    }
}

impl RunOptions {
    /// Display label for the measured configuration.
    pub fn label(&self) -> &'static str {
        if self.quantize {
            "INT8 (8-bit)"
        } else {
            "F32 (unquantized)"
        }
    }
}

/// Final summary of one benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub label: String,
    pub steps: usize,
    pub average_secs: f64,
    pub min_secs: f64,
    pub max_secs: f64,
    pub peak_allocated_bytes: u64,
    pub baseline_secs: f64,
    pub speedup: f64,
}

/// Load via `loader`, benchmark, save the quality-check sample, and build
/// the summary.
///
/// This is the one error boundary in the crate: any failure in that
/// sequence is caught here, printed with its full cause chain, and turned
/// into `None`. The summary is only ever produced on full success, so
/// summary printing can never follow a failed run.
pub fn execute<P, L>(loader: L, opts: &RunOptions) -> Option<RunSummary>
where
    P: EditPipeline,
    L: FnOnce() -> Result<P, BenchError>,
{
    match run_inner(loader, opts) {
        Ok(summary) => Some(summary),
        Err(err) => {
            eprintln!("  {} failed: {}", opts.label(), err);
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("    caused by: {}", cause);
                source = cause.source();
            }
            None
        }
    }
}

fn run_inner<P, L>(loader: L, opts: &RunOptions) -> Result<RunSummary, BenchError>
where
    P: EditPipeline,
    L: FnOnce() -> Result<P, BenchError>,
{
    let pipeline = loader()?;
    println!(
        "  peak allocation: {:.2} GB",
        pipeline.peak_allocated_bytes() as f64 / 1e9
    );

    let report = benchmark(
        &pipeline,
        opts.label(),
        &BenchOptions {
            steps: opts.steps,
            runs: opts.runs,
        },
    )?;

    // Quality-check inference: fixed seed, saved for manual inspection only.
    let params = InvocationParams {
        images: vec![synthetic_input()],
        prompt: "oil painting of a landscape".to_string(),
        num_inference_steps: opts.steps,
        ..InvocationParams::default()
    }
    .with_seed(SAMPLE_SEED);
    let output = pipeline.invoke(&params)?;
    if let Some(sample) = output.images.first() {
        sample.save(&opts.output_image)?;
        println!("  sample image saved to {}", opts.output_image.display());
    }

    let summary = RunSummary {
        label: opts.label().to_string(),
        steps: opts.steps,
        average_secs: report.average_secs,
        min_secs: report.min_secs,
        max_secs: report.max_secs,
        peak_allocated_bytes: pipeline.peak_allocated_bytes(),
        baseline_secs: opts.baseline_secs,
        speedup: opts.baseline_secs / report.average_secs,
    };

    if let Some(path) = &opts.json_report {
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        println!("  JSON report written to {}", path.display());
    }

    Ok(summary)
}

/// Print the final comparison banner.
pub fn print_summary(summary: &RunSummary) {
    println!("\n{}", "=".repeat(60));
    println!("Summary");
    println!("{}", "=".repeat(60));
    println!(
        "{} ({} steps): {:.3}s",
        summary.label, summary.steps, summary.average_secs
    );
    println!("Baseline: {:.3}s", summary.baseline_secs);
    println!("Speedup: {:.2}x", summary.speedup);
}
