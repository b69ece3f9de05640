//! Demo pipeline and driver behavior: determinism, memory footprint, loader
//! errors, the driver's single error boundary.

use image::RgbImage;
use imgedit_bench::{
    execute, load_pretrained, synthetic_input, BenchError, ComputeDtype, DemoEditPipeline, Device,
    EditPipeline, InvocationParams, QuantizationConfig, RunOptions, DEMO_MODEL_ID,
};

fn int8_pipeline() -> DemoEditPipeline {
    load_pretrained(
        DEMO_MODEL_ID,
        &QuantizationConfig::default(),
        ComputeDtype::F32,
        Device::Cpu,
    )
    .unwrap()
}

fn f32_pipeline() -> DemoEditPipeline {
    load_pretrained(
        DEMO_MODEL_ID,
        &QuantizationConfig::unquantized(),
        ComputeDtype::F32,
        Device::Cpu,
    )
    .unwrap()
}

#[test]
fn seeded_invocations_are_deterministic() {
    let pipeline = int8_pipeline();
    let params = InvocationParams::edit(synthetic_input(), "oil painting style", 2).with_seed(42);

    let a = pipeline.invoke(&params).unwrap();
    let b = pipeline.invoke(&params).unwrap();
    assert_eq!(a.images[0].as_raw(), b.images[0].as_raw());
}

#[test]
fn output_matches_input_dimensions() {
    let pipeline = int8_pipeline();
    let input = RgbImage::from_pixel(128, 96, image::Rgb([200, 10, 10]));
    let params = InvocationParams::edit(input, "test", 1).with_seed(0);

    let out = pipeline.invoke(&params).unwrap();
    assert_eq!(out.images.len(), 1);
    assert_eq!(out.images[0].dimensions(), (128, 96));
}

#[test]
fn int8_pipeline_allocates_less_than_f32() {
    let int8 = int8_pipeline();
    let f32p = f32_pipeline();
    assert!(int8.peak_allocated_bytes() < f32p.peak_allocated_bytes());
}

#[test]
fn bf16_reports_smaller_weight_bytes() {
    let bf16 = load_pretrained(
        DEMO_MODEL_ID,
        &QuantizationConfig::unquantized(),
        ComputeDtype::Bf16,
        Device::Cpu,
    )
    .unwrap();
    let f32p = f32_pipeline();
    assert!(bf16.peak_allocated_bytes() < f32p.peak_allocated_bytes());
}

#[test]
fn invoke_without_input_image_fails() {
    let pipeline = int8_pipeline();
    let params = InvocationParams::default();
    let err = pipeline.invoke(&params).unwrap_err();
    assert!(matches!(err, BenchError::NoInputImage));
}

#[test]
fn unknown_model_id_fails_to_load() {
    let err = load_pretrained(
        "acme/not-a-model",
        &QuantizationConfig::default(),
        ComputeDtype::F32,
        Device::Cpu,
    )
    .unwrap_err();
    assert!(matches!(err, BenchError::ModelLoad(_)));
    assert!(err.to_string().contains("acme/not-a-model"));
}

#[test]
fn unknown_backend_fails_to_load() {
    let config = QuantizationConfig {
        backend: "gguf_q4".to_string(),
        ..QuantizationConfig::default()
    };
    let err =
        load_pretrained(DEMO_MODEL_ID, &config, ComputeDtype::F32, Device::Cpu).unwrap_err();
    assert!(matches!(err, BenchError::UnsupportedBackend(_)));
}

#[test]
fn unknown_component_is_skipped_not_fatal() {
    let config = QuantizationConfig {
        components: vec!["text_encoder".to_string()],
        ..QuantizationConfig::default()
    };
    let pipeline =
        load_pretrained(DEMO_MODEL_ID, &config, ComputeDtype::F32, Device::Cpu).unwrap();
    // Nothing matched, so the footprint is the full-precision one.
    assert_eq!(
        pipeline.peak_allocated_bytes(),
        f32_pipeline().peak_allocated_bytes()
    );
}

#[test]
fn accelerator_request_falls_back_to_cpu() {
    let pipeline = load_pretrained(
        DEMO_MODEL_ID,
        &QuantizationConfig::default(),
        ComputeDtype::F32,
        Device::Accel(7),
    )
    .unwrap();
    assert_eq!(pipeline.device(), Device::Cpu);
}

#[test]
fn failing_loader_yields_no_summary() {
    let opts = RunOptions::default();
    let summary = execute(
        || Err::<DemoEditPipeline, _>(BenchError::ModelLoad("weights missing".to_string())),
        &opts,
    );
    assert!(summary.is_none());
}

#[test]
fn successful_run_writes_sample_and_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let opts = RunOptions {
        steps: 1,
        runs: 1,
        output_image: dir.path().join("sample.png"),
        json_report: Some(dir.path().join("summary.json")),
        ..RunOptions::default()
    };

    let summary = execute(|| Ok(int8_pipeline()), &opts).unwrap();
    assert_eq!(summary.label, "INT8 (8-bit)");
    assert!(summary.average_secs > 0.0);
    assert!((summary.speedup - opts.baseline_secs / summary.average_secs).abs() < 1e-9);
    assert!(opts.output_image.exists());

    let json = std::fs::read_to_string(dir.path().join("summary.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed["average_secs"].as_f64().unwrap() > 0.0);
    assert_eq!(parsed["baseline_secs"].as_f64().unwrap(), 9.5);
}
