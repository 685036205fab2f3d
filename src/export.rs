use std::{
    io::Write,
    path::{Path, PathBuf},
};

use log::info;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::GaitViewError;

pub const DEFAULT_EXPORT_ROWS: usize = 100;
const EXPORT_HEADERS: [&str; 2] = ["Column1", "Column2"];

/// Checks the user supplied export name and turns it into a `<name>.csv` file name.
pub fn export_file_name(name: &str) -> Result<String, GaitViewError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GaitViewError::InvalidUserInput {
            field: "csv name".to_string(),
            reason: "Please enter a CSV name.".to_string(),
        });
    }
    if name.ends_with(".csv") {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}.csv"))
    }
}

/// Writes `rows` rows of two independent standard normal samples. This is a placeholder
/// save action and does not export playback data.
pub fn write_sample_csv<W: Write, R: Rng>(
    writer: W,
    rows: usize,
    rng: &mut R,
) -> Result<(), GaitViewError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| GaitViewError::ExportError { source: e })?;
    for _ in 0..rows {
        let first: f64 = rng.sample(StandardNormal);
        let second: f64 = rng.sample(StandardNormal);
        csv_writer
            .write_record([first.to_string(), second.to_string()])
            .map_err(|e| GaitViewError::ExportError { source: e })?;
    }
    csv_writer
        .flush()
        .map_err(|e| GaitViewError::ExportError { source: e.into() })?;
    Ok(())
}

pub fn export_sample_csv(path: &Path, rows: usize) -> Result<PathBuf, GaitViewError> {
    let file = std::fs::File::create(path)
        .map_err(|e| GaitViewError::ExportError { source: e.into() })?;
    write_sample_csv(file, rows, &mut rand::thread_rng())?;
    info!("Saved {} sample rows to {:?}", rows, path);
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tempfile::tempdir;

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(matches!(
            export_file_name("   "),
            Err(GaitViewError::InvalidUserInput { .. })
        ));
    }

    #[test]
    fn test_name_gets_csv_extension() {
        assert_eq!(export_file_name("gait").unwrap(), "gait.csv");
        assert_eq!(export_file_name("gait.csv").unwrap(), "gait.csv");
    }

    #[test]
    fn test_sample_csv_shape() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut buffer = Vec::new();
        write_sample_csv(&mut buffer, 5, &mut rng).unwrap();

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        assert_eq!(reader.headers().unwrap(), vec!["Column1", "Column2"]);
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 5);
        for record in records {
            assert_eq!(record.len(), 2);
            for value in record.iter() {
                assert!(value.parse::<f64>().is_ok());
            }
        }
    }

    #[test]
    fn test_export_to_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(export_file_name("run").unwrap());
        let written = export_sample_csv(&path, DEFAULT_EXPORT_ROWS).unwrap();
        assert_eq!(written, path);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), DEFAULT_EXPORT_ROWS + 1);
    }
}
