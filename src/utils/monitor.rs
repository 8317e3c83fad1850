#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Resource usage sampled when a pipeline stage finishes.
#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct StageStats {
    pub stage: String,
    pub stage_time: Duration,
    pub total_time: Duration,
    /// `None` when the process could not be sampled.
    pub cpu_usage: Option<f32>,
    pub memory_mb: Option<u64>,
}

#[cfg(feature = "cli")]
struct Checkpoints {
    last: Instant,
    peak_memory_mb: u64,
    stages: Vec<StageStats>,
}

/// Times each map stage and samples this process's CPU and memory.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    started: Instant,
    checkpoints: Mutex<Checkpoints>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            sysinfo::get_current_pid()
                .map_err(|e| tracing::warn!("Process sampling unavailable: {}", e))
                .ok()
        } else {
            None
        };

        let now = Instant::now();
        Self {
            system: Mutex::new(System::new()),
            pid,
            started: now,
            checkpoints: Mutex::new(Checkpoints {
                last: now,
                peak_memory_mb: 0,
                stages: Vec::new(),
            }),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn sample(&self) -> (Option<f32>, Option<u64>) {
        let (Some(pid), Ok(mut system)) = (self.pid, self.system.lock()) else {
            return (None, None);
        };
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        match system.process(pid) {
            Some(process) => (Some(process.cpu_usage()), Some(process.memory() / 1024 / 1024)),
            None => (None, None),
        }
    }

    /// Closes the current stage. Returns `None` when monitoring is off.
    pub fn checkpoint(&self, stage: &str) -> Option<StageStats> {
        if !self.enabled {
            return None;
        }

        let (cpu_usage, memory_mb) = self.sample();
        let mut checkpoints = self.checkpoints.lock().ok()?;
        let now = Instant::now();

        let stats = StageStats {
            stage: stage.to_string(),
            stage_time: now.duration_since(checkpoints.last),
            total_time: now.duration_since(self.started),
            cpu_usage,
            memory_mb,
        };
        checkpoints.last = now;
        if let Some(mb) = memory_mb {
            checkpoints.peak_memory_mb = checkpoints.peak_memory_mb.max(mb);
        }
        checkpoints.stages.push(stats.clone());
        Some(stats)
    }

    pub fn log_stage(&self, stage: &str) {
        let Some(stats) = self.checkpoint(stage) else {
            return;
        };
        match (stats.cpu_usage, stats.memory_mb) {
            (Some(cpu), Some(mb)) => tracing::info!(
                "📊 {} took {:?} - CPU: {:.1}%, Memory: {}MB",
                stats.stage,
                stats.stage_time,
                cpu,
                mb
            ),
            _ => tracing::info!("📊 {} took {:?}", stats.stage, stats.stage_time),
        }
    }

    pub fn stages(&self) -> Vec<StageStats> {
        self.checkpoints
            .lock()
            .map(|c| c.stages.clone())
            .unwrap_or_default()
    }

    pub fn log_summary(&self) {
        if !self.enabled {
            return;
        }
        let Ok(checkpoints) = self.checkpoints.lock() else {
            return;
        };
        let slowest = checkpoints.stages.iter().max_by_key(|s| s.stage_time);
        tracing::info!(
            "📊 Total time: {:?}, peak memory: {}MB, slowest stage: {}",
            self.started.elapsed(),
            checkpoints.peak_memory_mb,
            slowest.map(|s| s.stage.as_str()).unwrap_or("none")
        );
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn log_stage(&self, _stage: &str) {}

    pub fn log_summary(&self) {}
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_records_nothing() {
        let monitor = SystemMonitor::default();

        assert!(!monitor.is_enabled());
        assert!(monitor.checkpoint("Resolve").is_none());
        assert!(monitor.stages().is_empty());
    }

    #[test]
    fn test_checkpoints_follow_stage_order() {
        let monitor = SystemMonitor::new(true);

        let resolve = monitor.checkpoint("Resolve").unwrap();
        std::thread::sleep(Duration::from_millis(5));
        let fetch = monitor.checkpoint("Fetch").unwrap();

        assert!(monitor.is_enabled());
        assert!(fetch.stage_time >= Duration::from_millis(5));
        assert!(fetch.total_time >= resolve.total_time + fetch.stage_time);

        let names: Vec<String> = monitor.stages().into_iter().map(|s| s.stage).collect();
        assert_eq!(names, vec!["Resolve", "Fetch"]);
    }
}
