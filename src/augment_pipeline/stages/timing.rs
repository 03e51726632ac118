use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::info;

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
}

/// Wall-clock time spent in each pipeline step, in execution order.
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    steps: Vec<StepTiming>,
    step_map: HashMap<String, Duration>,
}

impl StageTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: impl Into<String>, duration: Duration) {
        let name = name.into();
        *self.step_map.entry(name.clone()).or_insert(Duration::ZERO) += duration;
        self.steps.push(StepTiming { name, duration });
    }

    pub fn record(&mut self, timer: Timer) {
        let (name, duration) = timer.stop();
        self.add_step(name, duration);
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Summed duration of every step recorded under `name`.
    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.step_map.get(name).copied()
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn log_summary(&self) {
        let total = self.total_duration().as_secs_f64();
        for step in &self.steps {
            let secs = step.duration.as_secs_f64();
            let percentage = if total > 0.0 { secs / total * 100.0 } else { 0.0 };
            info!(
                "{:<12} {:>10.3}ms ({:>5.1}%)",
                step.name,
                secs * 1000.0,
                percentage
            );
        }
        info!("{:<12} {:>10.3}ms", "total", total * 1000.0);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    pub fn stop(self) -> (String, Duration) {
        (self.name, self.start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_steps_accumulate() {
        let mut timings = StageTimings::new();
        timings.add_step("decode", Duration::from_millis(3));
        timings.add_step("transform", Duration::from_millis(5));
        timings.add_step("decode", Duration::from_millis(2));

        assert_eq!(timings.steps().len(), 3);
        assert_eq!(timings.get_step("decode"), Some(Duration::from_millis(5)));
        assert_eq!(timings.total_duration(), Duration::from_millis(10));
        assert_eq!(timings.get_step("layout"), None);
    }

    #[test]
    fn test_timer_records_named_step() {
        let mut timings = StageTimings::new();
        timings.record(Timer::start("sample"));

        assert_eq!(timings.steps()[0].name, "sample");
        assert!(timings.get_step("sample").is_some());
    }

    #[test]
    fn test_log_summary_with_and_without_steps() {
        StageTimings::new().log_summary();

        let mut timings = StageTimings::new();
        timings.add_step("augment", Duration::from_millis(4));
        timings.add_step("preview", Duration::ZERO);
        timings.log_summary();
        assert_eq!(timings.total_duration(), Duration::from_millis(4));
    }
}
