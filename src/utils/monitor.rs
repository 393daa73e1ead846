#[cfg(feature = "cli")]
use std::sync::Mutex;
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// 單一階段的量測結果
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub elapsed: Duration,
    pub memory_mb: Option<u64>,
}

/// Samples process memory for phase timing; shared by all requests of a generator.
///
/// Phase results are kept per request in a [`PhaseRecorder`] from [`PhaseMonitor::begin`].
pub struct PhaseMonitor {
    enabled: bool,
    #[cfg(feature = "cli")]
    system: Option<Mutex<(System, Pid)>>,
}

/// 單一請求的各階段 (normalize / template / render / store) 耗時與記憶體
pub struct PhaseRecorder<'a> {
    monitor: &'a PhaseMonitor,
    phases: Vec<PhaseStats>,
}

impl PhaseMonitor {
    pub fn new(enabled: bool) -> Self {
        #[cfg(feature = "cli")]
        let system = if enabled {
            // 取不到 PID 時只記錄耗時
            sysinfo::get_current_pid()
                .ok()
                .map(|pid| Mutex::new((System::new(), pid)))
        } else {
            None
        };

        Self {
            enabled,
            #[cfg(feature = "cli")]
            system,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Starts an empty recorder for one request.
    pub fn begin(&self) -> PhaseRecorder<'_> {
        PhaseRecorder {
            monitor: self,
            phases: Vec::new(),
        }
    }

    #[cfg(feature = "cli")]
    fn memory_mb(&self) -> Option<u64> {
        let mut guard = self.system.as_ref()?.lock().ok()?;
        let (system, pid) = &mut *guard;
        let pid = *pid;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        system.process(pid).map(|p| p.memory() / 1024 / 1024)
    }

    #[cfg(not(feature = "cli"))]
    fn memory_mb(&self) -> Option<u64> {
        None
    }
}

impl PhaseRecorder<'_> {
    pub fn start(&self) -> Instant {
        Instant::now()
    }

    pub fn record(&mut self, phase: &str, started: Instant) {
        if !self.monitor.enabled {
            return;
        }

        let stats = PhaseStats {
            phase: phase.to_string(),
            elapsed: started.elapsed(),
            memory_mb: self.monitor.memory_mb(),
        };

        match stats.memory_mb {
            Some(memory) => tracing::info!(
                "📊 {} - Time: {:?}, Memory: {}MB",
                stats.phase,
                stats.elapsed,
                memory
            ),
            None => tracing::info!("📊 {} - Time: {:?}", stats.phase, stats.elapsed),
        }
        self.phases.push(stats);
    }

    pub fn phases(&self) -> &[PhaseStats] {
        &self.phases
    }

    pub fn into_phases(self) -> Vec<PhaseStats> {
        self.phases
    }

    pub fn log_final_stats(&self) {
        if !self.monitor.enabled {
            return;
        }
        let total: Duration = self.phases.iter().map(|p| p.elapsed).sum();
        let peak = self.phases.iter().filter_map(|p| p.memory_mb).max();
        tracing::info!(
            "📊 Final Stats - Phases: {}, Total Time: {:?}, Peak Memory: {}MB",
            self.phases.len(),
            total,
            peak.unwrap_or(0)
        );
    }
}

impl Default for PhaseMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_records_nothing() {
        let monitor = PhaseMonitor::default();
        let mut recorder = monitor.begin();
        let started = recorder.start();
        recorder.record("normalize", started);
        assert!(!monitor.is_enabled());
        assert!(recorder.phases().is_empty());
    }

    #[test]
    fn test_enabled_recorder_keeps_phase_order() {
        let monitor = PhaseMonitor::new(true);
        let mut recorder = monitor.begin();
        for phase in ["normalize", "template", "render", "store"] {
            let started = recorder.start();
            recorder.record(phase, started);
        }
        recorder.log_final_stats();
        let names: Vec<String> = recorder.into_phases().into_iter().map(|p| p.phase).collect();
        assert_eq!(names, vec!["normalize", "template", "render", "store"]);
    }

    #[test]
    fn test_recorders_do_not_share_phases() {
        let monitor = PhaseMonitor::new(true);
        let mut first = monitor.begin();
        let mut second = monitor.begin();

        let started = first.start();
        first.record("normalize", started);
        let started = second.start();
        second.record("render", started);
        second.record("store", started);

        assert_eq!(first.phases().len(), 1);
        assert_eq!(second.phases().len(), 2);
        assert!(monitor.begin().phases().is_empty());
    }
}
