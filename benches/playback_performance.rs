use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gaitview::{
    JointName, PlaybackDriver, SKELETON_JOINTS,
    motion::{DEFAULT_PLOT_WINDOW_S, read_motion_table},
    playback::battery::Battery,
    skeleton::read_pose_sequence,
};
use std::time::{Duration, Instant};

fn create_joint_csv(rows: usize) -> String {
    let mut header = vec!["frame".to_string()];
    for joint in SKELETON_JOINTS {
        for axis in ["X", "Y", "Z"] {
            header.push(format!("{}_{}", joint, axis));
        }
    }
    let mut lines = vec![header.join(",")];
    for r in 0..rows {
        let mut columns = vec![r.to_string()];
        for j in 0..SKELETON_JOINTS.len() {
            let phase = r as f64 * 0.05 + j as f64;
            columns.push(format!("{:.4}", phase.sin()));
            columns.push(format!("{:.4}", 0.1 * j as f64));
            columns.push(format!("{:.4}", phase.cos().abs()));
        }
        lines.push(columns.join(","));
    }
    lines.join("\n")
}

fn bench_pose_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("pose_loading");

    for rows in [100, 1000, 10000] {
        let csv = create_joint_csv(rows);
        group.bench_function(format!("load_{}_frames", rows), |b| {
            b.iter(|| read_pose_sequence(black_box(csv.as_bytes())).unwrap());
        });
    }

    group.finish();
}

fn bench_playback_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("playback");
    let sequence = read_pose_sequence(create_joint_csv(1000).as_bytes()).unwrap();

    group.bench_function("tick_until_battery_empty", |b| {
        b.iter(|| {
            let mut driver = PlaybackDriver::new(sequence.clone()).with_battery(Battery::default());
            let t0 = Instant::now();
            driver.start_at(t0).unwrap();
            let mut s = 0;
            while driver.is_running() {
                s += 1;
                black_box(driver.tick_at(t0 + Duration::from_secs(s)));
            }
        });
    });

    group.bench_function("snapshot", |b| {
        let driver = PlaybackDriver::new(sequence.clone());
        b.iter(|| black_box(driver.snapshot()));
    });

    group.finish();
}

fn bench_joint_curves(c: &mut Criterion) {
    let mut group = c.benchmark_group("data_tab");
    let table = read_motion_table(create_joint_csv(1000).as_bytes()).unwrap();

    group.bench_function("joint_curves_200s_window", |b| {
        b.iter(|| {
            table
                .joint_curves(black_box(JointName::LeftKnee), DEFAULT_PLOT_WINDOW_S)
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_pose_loading,
    bench_playback_ticks,
    bench_joint_curves
);
criterion_main!(benches);
