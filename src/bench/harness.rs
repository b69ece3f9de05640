//! Timing harness: warmup passes, barrier-bracketed timed passes, mean/min/max.

use std::time::Instant;

use image::{Rgb, RgbImage};
use serde::Serialize;
use tracing::info;

use crate::errors::BenchError;
use crate::pipeline::{EditPipeline, InvocationParams};

/// Discarded invocations before the timed loop, to exclude first-call
/// caching and page-in effects.
pub const WARMUP_RUNS: usize = 2;

/// Side of the synthetic benchmark input.
const INPUT_SIDE: u32 = 512;

/// Harness knobs: inference steps per invocation, timed repetitions.
#[derive(Debug, Clone)]
pub struct BenchOptions {
    pub steps: usize,
    pub runs: usize,
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self { steps: 4, runs: 5 }
    }
}

/// Aggregated timings from one benchmark call.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub name: String,
    pub samples_secs: Vec<f64>,
    pub average_secs: f64,
    pub min_secs: f64,
    pub max_secs: f64,
}

impl BenchReport {
    /// Aggregate raw samples. Empty input is [`BenchError::NoSamples`].
    pub fn from_samples(name: &str, samples: Vec<f64>) -> Result<Self, BenchError> {
        if samples.is_empty() {
            return Err(BenchError::NoSamples);
        }
        let average = samples.iter().sum::<f64>() / samples.len() as f64;
        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Ok(Self {
            name: name.to_string(),
            samples_secs: samples,
            average_secs: average,
            min_secs: min,
            max_secs: max,
        })
    }
}

/// The uniform-gray synthetic input every benchmark run edits.
pub fn synthetic_input() -> RgbImage {
    RgbImage::from_pixel(INPUT_SIDE, INPUT_SIDE, Rgb([128, 128, 128]))
}

/// Time `opts.runs` invocations of the pipeline after [`WARMUP_RUNS`] warmup
/// passes, printing each sample as it lands.
///
/// On accelerated devices every timed region is bracketed by a pair of
/// synchronization barriers, and one pair surrounds the warmup block;
/// without them queued asynchronous work would make the timings silently
/// too low. On CPU devices no barrier calls are made at all. Warmup results
/// never influence the report.
pub fn benchmark<P: EditPipeline + ?Sized>(
    pipeline: &P,
    name: &str,
    opts: &BenchOptions,
) -> Result<BenchReport, BenchError> {
    if opts.runs == 0 {
        return Err(BenchError::NoSamples);
    }

    let device = pipeline.device();
    let accelerated = device.is_accelerated();
    let dummy = synthetic_input();

    info!("warming up {} (device: {})", name, device);
    let warm = InvocationParams::edit(dummy.clone(), "test", opts.steps);
    if accelerated {
        pipeline.synchronize();
    }
    for _ in 0..WARMUP_RUNS {
        pipeline.invoke(&warm)?;
    }
    if accelerated {
        pipeline.synchronize();
    }

    let timed = InvocationParams::edit(dummy, "oil painting style", opts.steps);
    let mut samples = Vec::with_capacity(opts.runs);
    for i in 0..opts.runs {
        if accelerated {
            pipeline.synchronize();
        }
        let start = Instant::now();
        pipeline.invoke(&timed)?;
        if accelerated {
            pipeline.synchronize();
        }
        let elapsed = start.elapsed().as_secs_f64();
        println!("    run {}: {:.3}s", i + 1, elapsed);
        samples.push(elapsed);
    }

    let report = BenchReport::from_samples(name, samples)?;
    println!(
        "  {}: avg={:.3}s, min={:.3}s, max={:.3}s",
        report.name, report.average_secs, report.min_secs, report.max_secs
    );
    Ok(report)
}
