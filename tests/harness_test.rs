//! Harness properties against stub pipelines: invocation counts, barrier
//! pairing, aggregation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use imgedit_bench::{
    benchmark, BenchError, BenchOptions, BenchReport, Device, EditPipeline, InvocationParams,
    PipelineOutput, WARMUP_RUNS,
};

struct StubPipeline {
    device: Device,
    delay: Duration,
    invocations: AtomicUsize,
    syncs: AtomicUsize,
    fail_on_invoke: bool,
}

impl StubPipeline {
    fn new(device: Device) -> Self {
        Self {
            device,
            delay: Duration::from_millis(2),
            invocations: AtomicUsize::new(0),
            syncs: AtomicUsize::new(0),
            fail_on_invoke: false,
        }
    }
}

impl EditPipeline for StubPipeline {
    fn device(&self) -> Device {
        self.device
    }

    fn synchronize(&self) {
        self.syncs.fetch_add(1, Ordering::SeqCst);
    }

    fn invoke(&self, _params: &InvocationParams) -> Result<PipelineOutput, BenchError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_invoke {
            return Err(BenchError::NoInputImage);
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(PipelineOutput { images: Vec::new() })
    }

    fn peak_allocated_bytes(&self) -> u64 {
        0
    }
}

#[test]
fn cpu_stub_invocation_count_and_no_barriers() {
    let stub = StubPipeline::new(Device::Cpu);
    let opts = BenchOptions { steps: 1, runs: 3 };
    let report = benchmark(&stub, "stub", &opts).unwrap();

    assert_eq!(stub.invocations.load(Ordering::SeqCst), WARMUP_RUNS + 3);
    assert_eq!(stub.syncs.load(Ordering::SeqCst), 0);
    assert_eq!(report.samples_secs.len(), 3);
}

#[test]
fn accelerated_stub_barriers_always_paired() {
    let stub = StubPipeline::new(Device::Accel(0));
    let opts = BenchOptions { steps: 1, runs: 4 };
    benchmark(&stub, "stub", &opts).unwrap();

    // One pair around the warmup block, one pair per timed run.
    let syncs = stub.syncs.load(Ordering::SeqCst);
    assert_eq!(syncs, 2 + 2 * 4);
    assert_eq!(syncs % 2, 0);
    assert_eq!(stub.invocations.load(Ordering::SeqCst), WARMUP_RUNS + 4);
}

#[test]
fn zero_runs_is_a_defined_error() {
    let stub = StubPipeline::new(Device::Cpu);
    let opts = BenchOptions { steps: 1, runs: 0 };
    let err = benchmark(&stub, "stub", &opts).unwrap_err();

    assert!(matches!(err, BenchError::NoSamples));
    // No invocations at all, not even warmup.
    assert_eq!(stub.invocations.load(Ordering::SeqCst), 0);
}

#[test]
fn warmup_never_enters_the_sample_set() {
    let stub = StubPipeline::new(Device::Cpu);
    let opts = BenchOptions { steps: 1, runs: 1 };
    let report = benchmark(&stub, "stub", &opts).unwrap();

    assert_eq!(stub.invocations.load(Ordering::SeqCst), WARMUP_RUNS + 1);
    assert_eq!(report.samples_secs.len(), 1);
}

#[test]
fn report_bounds_are_consistent() {
    let stub = StubPipeline::new(Device::Cpu);
    let opts = BenchOptions { steps: 1, runs: 5 };
    let report = benchmark(&stub, "stub", &opts).unwrap();

    assert!(report.min_secs > 0.0);
    assert!(report.min_secs <= report.average_secs);
    assert!(report.average_secs <= report.max_secs);
}

#[test]
fn invoke_errors_propagate() {
    let mut stub = StubPipeline::new(Device::Cpu);
    stub.fail_on_invoke = true;
    let opts = BenchOptions { steps: 1, runs: 2 };
    assert!(benchmark(&stub, "stub", &opts).is_err());
}

#[test]
fn aggregation_of_known_samples() {
    let report = BenchReport::from_samples("stub", vec![1.0, 2.0, 1.0, 3.0, 1.0]).unwrap();
    assert!((report.average_secs - 1.6).abs() < 1e-12);
    assert_eq!(report.min_secs, 1.0);
    assert_eq!(report.max_secs, 3.0);
    assert_eq!(report.samples_secs.len(), 5);
}

#[test]
fn aggregation_of_empty_samples_fails() {
    let err = BenchReport::from_samples("stub", Vec::new()).unwrap_err();
    assert!(matches!(err, BenchError::NoSamples));
}
