// Integration tests for the gait playback pipeline
//
// This test suite validates the complete workflow:
// 1. Write a joint position file to disk
// 2. Load it into a pose sequence
// 3. Play it back until the battery runs out
// 4. Verify the fault log and the final playback state

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use gaitview::{
    GaitViewError, JointName, PlaybackDriver, PlaybackEvent, Point3D, RunState, SKELETON_JOINTS,
    motion::{DEFAULT_PLOT_WINDOW_S, DataTabSource},
    skeleton::{load_pose_sequence, loader::REQUIRED_COLUMNS},
};
use tempfile::NamedTempFile;

/// Helper building a joint file with a header and `rows` data rows
fn joint_file(rows: usize) -> NamedTempFile {
    let mut header = vec!["frame".to_string()];
    for joint in SKELETON_JOINTS {
        for axis in ["X", "Y", "Z"] {
            header.push(format!("{}_{}", joint, axis));
        }
    }

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", header.join(",")).unwrap();
    for r in 0..rows {
        let mut columns = vec![r.to_string()];
        for j in 0..SKELETON_JOINTS.len() {
            // left_foot walks forward along x while the rest of the body follows
            let x = 0.01 * r as f64 + 0.02 * j as f64;
            let y = 0.1 * j as f64;
            let z = 0.05 * (j % 3) as f64;
            columns.extend([x.to_string(), y.to_string(), z.to_string()]);
        }
        writeln!(file, "{}", columns.join(",")).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_three_rows_give_two_poses_rooted_on_left_foot() {
    let file = joint_file(3);
    let sequence = load_pose_sequence(file.path()).unwrap();

    assert_eq!(sequence.len(), 2);
    let first = sequence.first().unwrap();
    assert_eq!(first.len(), 16);
    assert_eq!(first.get(JointName::LeftFoot), Some(Point3D::ORIGIN));

    let mut driver = PlaybackDriver::new(sequence);
    driver.stop();
    assert!(driver.tick().is_none());
    assert_eq!(driver.frame_index(), 0);
}

#[test]
fn test_full_session_until_battery_is_empty() {
    let file = joint_file(50);
    let sequence = load_pose_sequence(file.path()).unwrap();
    let frames = sequence.len();
    let mut driver = PlaybackDriver::new(sequence);

    let t0 = Instant::now();
    driver.start_at(t0).unwrap();
    let mut exhausted_at = None;
    for s in 1..=100u64 {
        let event = driver
            .tick_at(t0 + Duration::from_secs(s))
            .expect("running driver must emit an event");
        if let PlaybackEvent::BatteryExhausted(snapshot) = event {
            exhausted_at = Some(s);
            assert_eq!(snapshot.frame, frames - 1);
            assert_eq!(snapshot.elapsed, Duration::from_secs(100));
        }
    }
    driver.stop();

    assert_eq!(exhausted_at, Some(100));
    assert_eq!(driver.battery().level(), 0);
    assert_eq!(driver.run_state(), RunState::Stopped);
    assert_eq!(driver.fault_log().faults().count(), 0);
    assert_eq!(driver.fault_log().len(), 100);
}

#[test]
fn test_failed_load_keeps_previous_recording() {
    let good = joint_file(4);
    let mut driver = PlaybackDriver::default();
    driver.load_file(good.path()).unwrap();

    let t0 = Instant::now();
    driver.start_at(t0).unwrap();
    driver.tick_at(t0 + Duration::from_secs(1)).unwrap();
    driver.tick_at(t0 + Duration::from_secs(2)).unwrap();
    driver.stop();
    let before = driver.snapshot();
    assert_eq!(before.frame, 2);

    let mut bad = NamedTempFile::new().unwrap();
    writeln!(bad, "frame,a,b,c").unwrap();
    writeln!(bad, "0,1,2,3").unwrap();
    writeln!(bad, "1,1,2,3").unwrap();
    bad.flush().unwrap();

    match driver.load_file(bad.path()) {
        Err(GaitViewError::ShortRow { expected, .. }) => assert_eq!(expected, REQUIRED_COLUMNS),
        other => panic!("Expected ShortRow error, got {:?}", other),
    }
    assert_eq!(driver.sequence().len(), 3);
    assert_eq!(driver.frame_index(), 2);
    assert_eq!(driver.current_pose(), before.pose.as_ref());
    assert_eq!(driver.snapshot(), before);

    let missing = driver.load_file(Path::new("/definitely/not/here.csv"));
    assert!(missing.unwrap_err().is_data_format());
    assert_eq!(driver.snapshot(), before);
}

#[test]
fn test_successful_load_rewinds_and_clears_fault_log() {
    let first = joint_file(4);
    let second = joint_file(6);
    let mut driver = PlaybackDriver::default();
    driver.load_file(first.path()).unwrap();

    let t0 = Instant::now();
    driver.start_at(t0).unwrap();
    driver.tick_at(t0 + Duration::from_secs(1)).unwrap();
    driver.stop();
    assert_eq!(driver.fault_log().len(), 1);

    driver.load_file(second.path()).unwrap();
    assert_eq!(driver.sequence().len(), 5);
    assert_eq!(driver.frame_index(), 0);
    assert!(driver.snapshot().fault_log.is_empty());
}

#[test]
fn test_joint_file_feeds_data_tab() {
    let file = joint_file(10);
    let mut source = DataTabSource::default();
    source.follow_joint_file(file.path()).unwrap();
    let table = source.table().unwrap();
    let curves = table
        .joint_curves(JointName::RightHip, DEFAULT_PLOT_WINDOW_S)
        .unwrap();
    assert_eq!(curves.curves.len(), 3);
    // the frame column counts rows, one per second
    assert_eq!(curves.curves[0].points.len(), 10);
    assert_eq!(curves.curves[0].points[9][0], 9.);
}
