pub mod battery;
pub mod fault;

use std::{
    path::Path,
    time::{Duration, Instant},
};

use log::{debug, info, warn};

use crate::{
    GaitViewError,
    skeleton::{Pose, PoseSequence, load_pose_sequence},
};

use battery::{Battery, BatteryBand};
use fault::{FaultLog, FaultLogEntry, FaultPredicate, FaultRecord, LegPositionLimit};

pub const DEFAULT_TICK_PERIOD_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

/// Mutable playback bookkeeping. Only [`PlaybackDriver`] touches it.
#[derive(Clone, Debug, Default)]
struct PlaybackState {
    frame: usize,
    running: bool,
    battery: Battery,
    started_at: Option<Instant>,
    elapsed: Duration,
}

/// Read-only view of the playback handed to the presentation layer after every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackSnapshot {
    pub frame: usize,
    pub frame_count: usize,
    pub pose: Option<Pose>,
    pub battery_level: u8,
    pub battery_band: BatteryBand,
    pub elapsed: Duration,
    pub state: RunState,
    pub fault_log: FaultLog,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackEvent {
    /// Regular tick, playback keeps running.
    Advanced(PlaybackSnapshot),
    /// The fault predicate fired and playback was stopped.
    FaultDetected {
        snapshot: PlaybackSnapshot,
        fault: FaultRecord,
    },
    /// The battery ran out and playback was stopped.
    BatteryExhausted(PlaybackSnapshot),
}

impl PlaybackEvent {
    pub fn snapshot(&self) -> &PlaybackSnapshot {
        match self {
            Self::Advanced(snapshot) => snapshot,
            Self::FaultDetected { snapshot, .. } => snapshot,
            Self::BatteryExhausted(snapshot) => snapshot,
        }
    }
}

/// `PlaybackDriver` owns a loaded [`PoseSequence`] and steps through it one frame per tick.
///
/// The driver is a two state machine, `Stopped` (initial) and `Running`. Ticks are
/// supplied by a single external periodic source; ticks received while stopped are
/// ignored. Every running tick drains the battery by one percent, moves the cursor to the
/// next pose (holding the last one once the recording ends) and runs the fault predicate.
/// An empty battery or a detected fault stops playback.
pub struct PlaybackDriver {
    sequence: PoseSequence,
    state: PlaybackState,
    fault_predicate: Box<dyn FaultPredicate>,
    fault_log: FaultLog,
    tick_period: Duration,
}

impl Default for PlaybackDriver {
    fn default() -> Self {
        Self::new(PoseSequence::default())
    }
}

impl PlaybackDriver {
    pub fn new(sequence: PoseSequence) -> Self {
        Self {
            sequence,
            state: PlaybackState::default(),
            fault_predicate: Box::new(LegPositionLimit::default()),
            fault_log: FaultLog::default(),
            tick_period: Duration::from_millis(DEFAULT_TICK_PERIOD_MS),
        }
    }

    pub fn with_battery(mut self, battery: Battery) -> Self {
        self.state.battery = battery;
        self
    }

    pub fn with_fault_predicate(mut self, predicate: Box<dyn FaultPredicate>) -> Self {
        self.fault_predicate = predicate;
        self
    }

    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    /// Swaps in a freshly loaded recording, rewinds to its first frame and starts a new
    /// fault log.
    pub fn load_sequence(&mut self, sequence: PoseSequence) {
        info!("Playback sequence replaced, {} frames", sequence.len());
        self.sequence = sequence;
        self.state.frame = 0;
        self.fault_log.clear();
    }

    /// Loads a joint position file. The current recording, cursor and fault log are only
    /// replaced when the whole file parses.
    pub fn load_file(&mut self, source_file: &Path) -> Result<(), GaitViewError> {
        let sequence = load_pose_sequence(source_file)?;
        self.load_sequence(sequence);
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), GaitViewError> {
        self.start_at(Instant::now())
    }

    pub fn start_at(&mut self, now: Instant) -> Result<(), GaitViewError> {
        if self.state.running {
            return Ok(());
        }
        if self.state.battery.is_empty() {
            warn!("Refusing to start playback with an empty battery");
            return Err(GaitViewError::BatteryExhausted);
        }
        self.state.running = true;
        self.state.started_at = Some(now);
        self.state.elapsed = Duration::ZERO;
        info!("Playback started at frame {}", self.state.frame);
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state.running {
            info!("Playback stopped at frame {}", self.state.frame);
        }
        self.state.running = false;
    }

    pub fn tick(&mut self) -> Option<PlaybackEvent> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<PlaybackEvent> {
        if !self.state.running {
            return None;
        }

        self.state.battery.drain();
        if !self.sequence.is_empty() {
            self.state.frame = (self.state.frame + 1).min(self.sequence.len() - 1);
        }
        if let Some(started_at) = self.state.started_at {
            self.state.elapsed = now.saturating_duration_since(started_at);
        }
        debug!(
            "Tick: frame {} battery {} elapsed {:?}",
            self.state.frame,
            self.state.battery.level(),
            self.state.elapsed
        );

        let fault = self
            .fault_predicate
            .check(self.sequence.get(self.state.frame), self.state.elapsed);
        match fault {
            Some(fault) => {
                warn!("{}", fault.description);
                self.fault_log.push(FaultLogEntry::Fault(fault.clone()));
                self.stop();
                Some(PlaybackEvent::FaultDetected {
                    snapshot: self.snapshot(),
                    fault,
                })
            }
            None => {
                self.fault_log.push(FaultLogEntry::Clear {
                    elapsed: self.state.elapsed,
                });
                if self.state.battery.is_empty() {
                    self.stop();
                    Some(PlaybackEvent::BatteryExhausted(self.snapshot()))
                } else {
                    Some(PlaybackEvent::Advanced(self.snapshot()))
                }
            }
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            frame: self.state.frame,
            frame_count: self.sequence.len(),
            pose: self.current_pose().cloned(),
            battery_level: self.state.battery.level(),
            battery_band: self.state.battery.band(),
            elapsed: self.state.elapsed,
            state: self.run_state(),
            fault_log: self.fault_log.clone(),
        }
    }

    pub fn run_state(&self) -> RunState {
        if self.state.running {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn frame_index(&self) -> usize {
        self.state.frame
    }

    pub fn battery(&self) -> Battery {
        self.state.battery
    }

    pub fn elapsed(&self) -> Duration {
        self.state.elapsed
    }

    pub fn current_pose(&self) -> Option<&Pose> {
        self.sequence.get(self.state.frame)
    }

    pub fn sequence(&self) -> &PoseSequence {
        &self.sequence
    }

    pub fn fault_log(&self) -> &FaultLog {
        &self.fault_log
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }
}

/// Formats a duration as `H:MM:SS`, dropping fractions of a second.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::read_pose_sequence;
    use crate::skeleton::loader::tests::joint_csv;

    fn driver_with_frames(frames: usize) -> PlaybackDriver {
        let sequence = read_pose_sequence(joint_csv(frames + 1).as_bytes()).unwrap();
        PlaybackDriver::new(sequence)
    }

    struct AlwaysFault;

    impl FaultPredicate for AlwaysFault {
        fn check(&mut self, _pose: Option<&Pose>, elapsed: Duration) -> Option<FaultRecord> {
            Some(FaultRecord {
                elapsed,
                description: "always".to_string(),
                explanation: "test predicate".to_string(),
            })
        }
    }

    #[test]
    fn test_tick_while_stopped_changes_nothing() {
        let mut driver = driver_with_frames(3);
        let before = driver.snapshot();
        assert!(driver.tick().is_none());
        assert_eq!(driver.snapshot(), before);
        assert!(driver.fault_log().is_empty());
    }

    #[test]
    fn test_stop_then_tick_keeps_frame() {
        let mut driver = driver_with_frames(5);
        let t0 = Instant::now();
        driver.start_at(t0).unwrap();
        driver.tick_at(t0 + Duration::from_secs(1));
        driver.stop();
        let frame = driver.frame_index();
        let elapsed = driver.elapsed();
        assert!(driver.tick_at(t0 + Duration::from_secs(5)).is_none());
        assert_eq!(driver.frame_index(), frame);
        assert_eq!(driver.elapsed(), elapsed);
        assert_eq!(driver.battery().level(), 99);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut driver = driver_with_frames(2);
        driver.stop();
        driver.stop();
        assert_eq!(driver.run_state(), RunState::Stopped);
    }

    #[test]
    fn test_start_twice_keeps_origin() {
        let mut driver = driver_with_frames(2);
        let t0 = Instant::now();
        driver.start_at(t0).unwrap();
        driver.start_at(t0 + Duration::from_secs(10)).unwrap();
        let event = driver.tick_at(t0 + Duration::from_secs(12)).unwrap();
        assert_eq!(event.snapshot().elapsed, Duration::from_secs(12));
    }

    #[test]
    fn test_frame_cursor_holds_last_frame() {
        let mut driver = driver_with_frames(3);
        let t0 = Instant::now();
        driver.start_at(t0).unwrap();
        let frames: Vec<usize> = (1..=5)
            .map(|s| {
                driver
                    .tick_at(t0 + Duration::from_secs(s))
                    .unwrap()
                    .snapshot()
                    .frame
            })
            .collect();
        assert_eq!(frames, vec![1, 2, 2, 2, 2]);
        assert_eq!(driver.current_pose(), driver.sequence().last());
    }

    #[test]
    fn test_battery_exhaustion_forces_stop() {
        let mut driver = driver_with_frames(10);
        let t0 = Instant::now();
        driver.start_at(t0).unwrap();
        let mut last_level = driver.battery().level();
        for s in 1..100 {
            let event = driver.tick_at(t0 + Duration::from_secs(s)).unwrap();
            assert!(matches!(event, PlaybackEvent::Advanced(_)));
            assert!(event.snapshot().battery_level < last_level);
            last_level = event.snapshot().battery_level;
        }
        let event = driver.tick_at(t0 + Duration::from_secs(100)).unwrap();
        match event {
            PlaybackEvent::BatteryExhausted(snapshot) => {
                assert_eq!(snapshot.battery_level, 0);
                assert_eq!(snapshot.state, RunState::Stopped);
            }
            other => panic!("Expected BatteryExhausted, got {:?}", other),
        }
        assert!(!driver.is_running());
        assert_eq!(driver.fault_log().faults().count(), 0);
        assert!(matches!(
            driver.start(),
            Err(GaitViewError::BatteryExhausted)
        ));
    }

    #[test]
    fn test_fault_stops_playback() {
        let mut driver = driver_with_frames(3).with_fault_predicate(Box::new(AlwaysFault));
        let t0 = Instant::now();
        driver.start_at(t0).unwrap();
        let event = driver.tick_at(t0 + Duration::from_secs(1)).unwrap();
        assert!(matches!(event, PlaybackEvent::FaultDetected { .. }));
        assert!(!driver.is_running());
        assert_eq!(driver.fault_log().faults().count(), 1);
        assert_eq!(event.snapshot().fault_log.faults().count(), 1);
        assert_eq!(&event.snapshot().fault_log, driver.fault_log());
    }

    #[test]
    fn test_snapshot_carries_fault_log_entries() {
        let mut driver = driver_with_frames(3);
        let t0 = Instant::now();
        driver.start_at(t0).unwrap();
        driver.tick_at(t0 + Duration::from_secs(1));
        let event = driver.tick_at(t0 + Duration::from_secs(2)).unwrap();
        assert_eq!(
            event.snapshot().fault_log.entries(),
            &[
                FaultLogEntry::Clear {
                    elapsed: Duration::from_secs(1)
                },
                FaultLogEntry::Clear {
                    elapsed: Duration::from_secs(2)
                },
            ]
        );
    }

    #[test]
    fn test_empty_sequence_still_drains_battery() {
        let mut driver = PlaybackDriver::default().with_battery(Battery::with_level(2));
        driver.start().unwrap();
        let event = driver.tick().unwrap();
        assert_eq!(event.snapshot().pose, None);
        assert_eq!(event.snapshot().frame, 0);
        assert!(matches!(
            driver.tick(),
            Some(PlaybackEvent::BatteryExhausted(_))
        ));
    }

    #[test]
    fn test_load_sequence_rewinds() {
        let mut driver = driver_with_frames(4);
        driver.start().unwrap();
        driver.tick();
        driver.tick();
        let replacement = read_pose_sequence(joint_csv(3).as_bytes()).unwrap();
        driver.load_sequence(replacement);
        assert_eq!(driver.frame_index(), 0);
        assert_eq!(driver.sequence().len(), 2);
        assert!(driver.fault_log().is_empty());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "0:00:00");
        assert_eq!(format_elapsed(Duration::from_millis(61_900)), "0:01:01");
        assert_eq!(format_elapsed(Duration::from_secs(3 * 3600 + 5)), "3:00:05");
    }
}
