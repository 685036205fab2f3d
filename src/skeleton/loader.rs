use std::{io::Read, path::Path};

use log::{debug, info, warn};

use super::{JointName, Point3D, Pose, PoseSequence, SKELETON_JOINT_COUNT, SKELETON_JOINTS};
use crate::GaitViewError;

/// Column 0 holds a row label; joints start right after it.
const FIRST_COORDINATE_COLUMN: usize = 1;
const COLUMNS_PER_JOINT: usize = 3;
/// Minimum number of columns a data row must carry.
pub const REQUIRED_COLUMNS: usize = FIRST_COORDINATE_COLUMN + SKELETON_JOINT_COUNT * COLUMNS_PER_JOINT;

/// Loads a joint position file into display-ready poses.
///
/// The layout is positional: the header line is never interpreted and the first data row
/// is dropped as a duplicate artifact of the recording tool. Each remaining row becomes one
/// pose with its `CoM` added, re-rooted on `left_foot` and converted to display axes.
pub fn load_pose_sequence(source_file: &Path) -> Result<PoseSequence, GaitViewError> {
    if !source_file.exists() {
        return Err(GaitViewError::MissingJointFile {
            path: format!("{:?}", source_file),
        });
    }
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(source_file)
        .map_err(|e| GaitViewError::JointFileRead { source: e })?;

    let sequence = parse_records(reader)?;
    info!(
        "Loaded {:?}, found {} poses of {} joints",
        source_file,
        sequence.len(),
        SKELETON_JOINT_COUNT
    );
    Ok(sequence)
}

/// Same as [`load_pose_sequence`] for an in-memory or already opened source.
pub fn read_pose_sequence<R: Read>(source: R) -> Result<PoseSequence, GaitViewError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    parse_records(reader)
}

fn parse_records<R: Read>(mut reader: csv::Reader<R>) -> Result<PoseSequence, GaitViewError> {
    if let Ok(headers) = reader.headers() {
        if headers.len() < REQUIRED_COLUMNS {
            warn!(
                "Joint file header names {} columns, data rows need {}",
                headers.len(),
                REQUIRED_COLUMNS
            );
        } else {
            debug!("Joint file header has {} columns", headers.len());
        }
    }

    let mut poses = Vec::new();
    for (row, record) in reader.records().enumerate().skip(1) {
        let record = record.map_err(|e| GaitViewError::JointFileRead { source: e })?;
        poses.push(parse_pose(row, &record)?);
    }
    if poses.is_empty() {
        return Err(GaitViewError::EmptyJointFile);
    }

    // CoM is taken in recording coordinates; re-rooting is affine so it stays the mean.
    for pose in poses.iter_mut() {
        if let Some(com) = pose.center_of_mass() {
            pose.insert(JointName::CoM, com);
        }
        pose.re_root();
    }

    Ok(PoseSequence::from_poses(poses))
}

fn parse_pose(row: usize, record: &csv::StringRecord) -> Result<Pose, GaitViewError> {
    if record.len() < REQUIRED_COLUMNS {
        return Err(GaitViewError::ShortRow {
            row,
            expected: REQUIRED_COLUMNS,
            found: record.len(),
        });
    }

    let mut pose = Pose::new();
    for (i, joint) in SKELETON_JOINTS.iter().enumerate() {
        let base = FIRST_COORDINATE_COLUMN + i * COLUMNS_PER_JOINT;
        pose.insert(
            *joint,
            Point3D::new(
                parse_coordinate(row, base, record)?,
                parse_coordinate(row, base + 1, record)?,
                parse_coordinate(row, base + 2, record)?,
            ),
        );
    }
    Ok(pose)
}

fn parse_coordinate(
    row: usize,
    column: usize,
    record: &csv::StringRecord,
) -> Result<f64, GaitViewError> {
    let value = record.get(column).unwrap_or_default();
    value.parse::<f64>().map_err(|_| GaitViewError::InvalidNumber {
        row,
        column,
        value: value.to_string(),
    })
}
