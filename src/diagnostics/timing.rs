use serde::Serialize;
use std::time::Instant;

/// Wall-clock time spent in one pipeline stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: &'static str,
    pub elapsed_ms: f64,
}

/// Per-stage timings of one extraction, in execution order.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    /// Run `f`, record its duration under `label` and return its output.
    pub fn time<T>(&mut self, label: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.total_ms += elapsed_ms;
        self.stages.push(StageTiming { label, elapsed_ms });
        out
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}
