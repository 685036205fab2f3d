// Error types for gaitview

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum GaitViewError {
    // Errors while loading the joint position file
    #[snafu(display("Joint file not found: {path}"))]
    MissingJointFile { path: String },
    #[snafu(display("Error reading joint file"))]
    JointFileRead { source: csv::Error },
    #[snafu(display("Joint file contains no data rows after the header row"))]
    EmptyJointFile,
    #[snafu(display("Row {row} has {found} columns, expected at least {expected}"))]
    ShortRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[snafu(display("Row {row}, column {column}: '{value}' is not a number"))]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },

    // Errors while loading the data tab files
    #[snafu(display("Error reading motion file"))]
    MotionFileRead { source: csv::Error },
    #[snafu(display("Motion file has no column named {column}"))]
    MissingMotionColumn { column: String },
    #[snafu(display("Motion file needs at least {required} rows to derive a sample rate"))]
    InsufficientMotionRows { required: usize },
    #[snafu(display("Motion file time index must be strictly increasing, got interval {interval}"))]
    InvalidSampleInterval { interval: f64 },

    // Playback errors
    #[snafu(display("Battery is empty"))]
    BatteryExhausted,

    // Errors for the csv export
    #[snafu(display("Error writing csv file"))]
    ExportError { source: csv::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // User input validation errors
    #[snafu(display("Invalid user input: {field} - {reason}"))]
    InvalidUserInput { field: String, reason: String },
}

impl GaitViewError {
    /// True for the malformed or missing data file family. Operations failing with
    /// one of these leave previously loaded data in place.
    pub fn is_data_format(&self) -> bool {
        matches!(
            self,
            Self::MissingJointFile { .. }
                | Self::JointFileRead { .. }
                | Self::EmptyJointFile
                | Self::ShortRow { .. }
                | Self::InvalidNumber { .. }
                | Self::MotionFileRead { .. }
                | Self::MissingMotionColumn { .. }
                | Self::InsufficientMotionRows { .. }
                | Self::InvalidSampleInterval { .. }
        )
    }
}
