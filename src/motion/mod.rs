use std::{
    collections::{HashMap, HashSet},
    io::Read,
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::{GaitViewError, skeleton::JointName};

/// Seconds of data shown on the data tab x axis.
pub const DEFAULT_PLOT_WINDOW_S: f64 = 200.;
/// Spacing of the x axis grid marks, in seconds.
pub const DEFAULT_PLOT_TICK_STEP_S: f64 = 25.;

/// Joints offered by the data tab selector.
pub const SELECTABLE_JOINTS: [JointName; 7] = [
    JointName::LeftFoot,
    JointName::LeftKnee,
    JointName::LeftHip,
    JointName::LeftUpperHip,
    JointName::RightFoot,
    JointName::RightKnee,
    JointName::RightHip,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn suffix(&self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}

/// Column name holding one axis of a joint, e.g. `left_knee_Y`.
pub fn column_name(joint: JointName, axis: Axis) -> String {
    format!("{}_{}", joint.as_str(), axis.suffix())
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisCurve {
    pub axis: Axis,
    pub label: String,
    /// `[seconds, position]` pairs inside the plot window.
    pub points: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct JointCurves {
    pub joint: JointName,
    pub title: String,
    pub curves: Vec<AxisCurve>,
}

/// Time indexed table behind the data tab: the first column is the time index,
/// every other column is addressed by its header name.
#[derive(Clone, Debug, Default)]
pub struct MotionTable {
    index: Vec<f64>,
    columns: HashMap<String, Vec<f64>>,
}

pub fn load_motion_table(source_file: &Path) -> Result<MotionTable, GaitViewError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(source_file)
        .map_err(|e| GaitViewError::MotionFileRead { source: e })?;
    let table = parse_table(reader)?;
    info!(
        "Loaded {:?}, found {} rows and {} data columns",
        source_file,
        table.len(),
        table.columns.len()
    );
    Ok(table)
}

pub fn read_motion_table<R: Read>(source: R) -> Result<MotionTable, GaitViewError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    parse_table(reader)
}

fn parse_table<R: Read>(mut reader: csv::Reader<R>) -> Result<MotionTable, GaitViewError> {
    let headers = reader
        .headers()
        .map_err(|e| GaitViewError::MotionFileRead { source: e })?
        .clone();

    let mut table = MotionTable::default();
    for name in headers.iter().skip(1) {
        table.columns.insert(name.to_string(), Vec::new());
    }
    // labels and other text columns are left out of the table, only the index must be numeric
    let mut text_columns: HashSet<String> = HashSet::new();

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| GaitViewError::MotionFileRead { source: e })?;
        for (column, (name, cell)) in headers.iter().zip(record.iter()).enumerate() {
            if column == 0 {
                table.index.push(parse_cell(row, column, cell)?);
                continue;
            }
            if text_columns.contains(name) {
                continue;
            }
            match parse_cell(row, column, cell) {
                Ok(value) => {
                    if let Some(values) = table.columns.get_mut(name) {
                        values.push(value);
                    }
                }
                Err(_) => {
                    warn!(
                        "Dropping non-numeric column {} (row {}: '{}')",
                        name, row, cell
                    );
                    table.columns.remove(name);
                    text_columns.insert(name.to_string());
                }
            }
        }
    }
    Ok(table)
}

/// Empty cells become NaN so the curve shows a gap instead of failing the whole file.
fn parse_cell(row: usize, column: usize, value: &str) -> Result<f64, GaitViewError> {
    if value.is_empty() {
        return Ok(f64::NAN);
    }
    value.parse::<f64>().map_err(|_| GaitViewError::InvalidNumber {
        row,
        column,
        value: value.to_string(),
    })
}

impl MotionTable {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column(&self, name: &str) -> Result<&[f64], GaitViewError> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| GaitViewError::MissingMotionColumn {
                column: name.to_string(),
            })
    }

    /// Samples per second, derived from the spacing of the first two index values.
    pub fn sample_rate(&self) -> Result<f64, GaitViewError> {
        if self.index.len() < 2 {
            return Err(GaitViewError::InsufficientMotionRows { required: 2 });
        }
        let interval = self.index[1] - self.index[0];
        if !interval.is_finite() || interval <= 0. {
            return Err(GaitViewError::InvalidSampleInterval { interval });
        }
        Ok(1. / interval)
    }

    /// Index values converted to seconds.
    pub fn time_vector(&self) -> Result<Vec<f64>, GaitViewError> {
        let sample_rate = self.sample_rate()?;
        Ok(self.index.iter().map(|i| i / sample_rate).collect())
    }

    /// X, Y and Z curves of `joint`, keeping the samples whose time falls in `[0, window_s]`.
    pub fn joint_curves(
        &self,
        joint: JointName,
        window_s: f64,
    ) -> Result<JointCurves, GaitViewError> {
        let time = self.time_vector()?;
        let curves = Axis::ALL
            .iter()
            .map(|axis| -> Result<AxisCurve, GaitViewError> {
                let values = self.column(&column_name(joint, *axis))?;
                Ok(AxisCurve {
                    axis: *axis,
                    label: format!("{} {}", joint.capitalized(), axis.suffix()),
                    points: time
                        .iter()
                        .zip(values)
                        .filter(|(t, _)| (0.0..=window_s).contains(*t))
                        .map(|(t, v)| [*t, *v])
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(JointCurves {
            joint,
            title: format!("{} Position in X, Y, Z Axes", joint.capitalized()),
            curves,
        })
    }

    /// First file column against row number, used by the motion file preview.
    pub fn preview_series(&self) -> Vec<[f64; 2]> {
        self.index
            .iter()
            .enumerate()
            .map(|(row, v)| [row as f64, *v])
            .collect()
    }
}

/// Table shown on the data tab. An explicitly chosen data file wins; otherwise the tab
/// follows the joint file currently played back.
#[derive(Clone, Debug, Default)]
pub struct DataTabSource {
    joint_file: Option<PathBuf>,
    data_file: Option<PathBuf>,
    table: Option<MotionTable>,
}

impl DataTabSource {
    /// File the current table was read from.
    pub fn path(&self) -> Option<&Path> {
        self.data_file.as_deref().or(self.joint_file.as_deref())
    }

    pub fn table(&self) -> Option<&MotionTable> {
        self.table.as_ref()
    }

    /// Follows a newly loaded joint file. Without an explicit data file the table is
    /// re-read right away so the tab never shows the previous recording.
    pub fn follow_joint_file(&mut self, path: &Path) -> Result<(), GaitViewError> {
        self.joint_file = Some(path.to_path_buf());
        if self.data_file.is_some() {
            return Ok(());
        }
        self.table = None;
        self.table = Some(load_motion_table(path)?);
        Ok(())
    }

    /// Switches the tab to `path`. On error the current table stays in place.
    pub fn load_data_file(&mut self, path: &Path) -> Result<(), GaitViewError> {
        let table = load_motion_table(path)?;
        self.table = Some(table);
        self.data_file = Some(path.to_path_buf());
        Ok(())
    }
}
