use std::time::Duration;

use crate::skeleton::Pose;

use super::format_elapsed;

/// Leg position limit used by [`LegPositionLimit`] when none is configured.
pub const DEFAULT_FAULT_THRESHOLD: f64 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct FaultRecord {
    pub elapsed: Duration,
    pub description: String,
    pub explanation: String,
}

/// Check run on every playback tick. Returning a record stops playback.
pub trait FaultPredicate {
    fn check(&mut self, pose: Option<&Pose>, elapsed: Duration) -> Option<FaultRecord>;
}

/// Placeholder leg limit check. It compares a fixed zero leg position against the
/// threshold and so never fires; a real joint-limit check replaces it.
pub struct LegPositionLimit {
    threshold: f64,
}

impl LegPositionLimit {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for LegPositionLimit {
    fn default() -> Self {
        Self::new(DEFAULT_FAULT_THRESHOLD)
    }
}

impl FaultPredicate for LegPositionLimit {
    fn check(&mut self, _pose: Option<&Pose>, elapsed: Duration) -> Option<FaultRecord> {
        let leg_pos = [0.0f64, 0.0];
        let max_abs = leg_pos.iter().fold(0.0f64, |acc, p| acc.max(p.abs()));
        if max_abs > self.threshold {
            let fault_time = format_elapsed(elapsed);
            return Some(FaultRecord {
                elapsed,
                description: "Fault detected: Leg position exceeds limit.".to_string(),
                explanation: format!(
                    "At time {fault_time}, the position of one or more legs exceeded the allowed limit. Please check the leg movement parameters."
                ),
            });
        }
        None
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FaultLogEntry {
    Clear { elapsed: Duration },
    Fault(FaultRecord),
}

/// Per-tick fault check results, oldest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaultLog {
    entries: Vec<FaultLogEntry>,
}

impl FaultLog {
    pub fn push(&mut self, entry: FaultLogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[FaultLogEntry] {
        &self.entries
    }

    pub fn faults(&self) -> impl Iterator<Item = &FaultRecord> {
        self.entries.iter().filter_map(|e| match e {
            FaultLogEntry::Fault(record) => Some(record),
            FaultLogEntry::Clear { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_log_filters_faults() {
        let mut log = FaultLog::default();
        log.push(FaultLogEntry::Clear {
            elapsed: Duration::from_secs(1),
        });
        log.push(FaultLogEntry::Fault(FaultRecord {
            elapsed: Duration::from_secs(2),
            description: "d".to_string(),
            explanation: "e".to_string(),
        }));
        assert_eq!(log.len(), 2);
        assert_eq!(log.faults().count(), 1);
        log.clear();
        assert!(log.is_empty());
    }
}
