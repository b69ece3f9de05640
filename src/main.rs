//! CLI for imgedit-bench: bench, quantize-error.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use imgedit_bench::{
    create_demo_transformer_seeded, dequantize_int8, execute, load_pretrained, print_summary,
    quantization_rmse, ComputeDtype, Device, EditConfig, QuantizationConfig, RunOptions,
    DEMO_MODEL_ID,
};

#[derive(Parser)]
#[command(name = "imgedit-bench")]
#[command(about = "INT8 latency benchmark for an image-edit diffusion pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the pipeline, benchmark it, and print the speedup summary
    Bench {
        #[arg(long, default_value = DEMO_MODEL_ID)]
        model: String,
        /// Inference steps per invocation
        #[arg(long, default_value = "4")]
        steps: usize,
        /// Timed repetitions
        #[arg(long, default_value = "5")]
        runs: usize,
        /// Reference latency in seconds for the speedup ratio
        #[arg(long, default_value = "9.5")]
        baseline_secs: f64,
        /// Outlier threshold: rows above it stay full precision
        #[arg(long, default_value = "6.0")]
        threshold: f32,
        /// Time the unquantized f32 path instead of INT8
        #[arg(long)]
        no_quantize: bool,
        /// Compute dtype for unquantized weights (f32 or bf16)
        #[arg(long, default_value = "f32")]
        dtype: ComputeDtype,
        /// Path for the quality-check sample image
        #[arg(long, default_value = "int8_sample.png")]
        output: PathBuf,
        /// Optional path for a machine-readable JSON summary
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Report per-layer INT8 quantization error and memory footprint
    QuantizeError {
        #[arg(long, default_value = "6.0")]
        threshold: f32,
        #[arg(long, default_value = "60695")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    // Device selection is read from the environment once, before anything
    // else touches the pipeline.
    let device = Device::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Bench {
            model,
            steps,
            runs,
            baseline_secs,
            threshold,
            no_quantize,
            dtype,
            output,
            json,
        } => run_bench(
            device,
            RunOptions {
                model_id: model,
                steps,
                runs,
                baseline_secs,
                threshold,
                quantize: !no_quantize,
                output_image: output,
                json_report: json,
            },
            dtype,
        ),
        Commands::QuantizeError { threshold, seed } => run_quantize_error(threshold, seed),
    }
    Ok(())
}

fn run_bench(device: Device, opts: RunOptions, dtype: ComputeDtype) {
    println!("{}", "=".repeat(60));
    println!("INT8 Quantization Benchmark");
    println!("{}", "=".repeat(60));

    let quantization = if opts.quantize {
        QuantizationConfig::int8(opts.threshold)
    } else {
        QuantizationConfig::unquantized()
    };

    println!("\n[1] Loading {} ({})...", opts.model_id, opts.label());
    let model_id = opts.model_id.clone();
    let summary = execute(
        || load_pretrained(&model_id, &quantization, dtype, device),
        &opts,
    );
    if let Some(summary) = summary {
        print_summary(&summary);
    }
}

fn run_quantize_error(threshold: f32, seed: u64) {
    let original = create_demo_transformer_seeded(seed, EditConfig::default());
    let mut quantized = original.clone();
    quantized.quantize(threshold);

    println!("Per-layer INT8 quantization error (threshold {}):", threshold);
    let originals = original.named_linears();
    for ((name, before), (_, after)) in originals.iter().zip(quantized.named_linears()) {
        let weights = match before.as_f32() {
            Some(w) => w,
            None => continue,
        };
        let (roundtripped, outliers) = match after {
            imgedit_bench::Linear::Int8(m) => (dequantize_int8(m), m.outlier_count()),
            imgedit_bench::Linear::F32 { .. } => continue,
        };
        let rmse = quantization_rmse(weights, &roundtripped);
        println!(
            "  {:<16} rmse={:.6} outlier_rows={}",
            name, rmse, outliers
        );
    }

    let before = original.memory_usage(ComputeDtype::F32);
    let after = quantized.memory_usage(ComputeDtype::F32);
    println!(
        "Memory: {:.2} MB -> {:.2} MB ({:.1}% of f32)",
        before as f64 / 1e6,
        after as f64 / 1e6,
        after as f64 / before as f64 * 100.0
    );
}
