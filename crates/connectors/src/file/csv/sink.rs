use crate::file::csv::{encoder::CsvValueEncoder, error::FileError};
use model::records::row::RowData;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Writes row sets as CSV files into a single output directory.
///
/// Each file is written under a temporary name and renamed once complete, so
/// a failed write never leaves a file under the final name.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
    encoder: CsvValueEncoder,
}

impl CsvSink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        CsvSink {
            dir: dir.into(),
            encoder: CsvValueEncoder::default(),
        }
    }

    /// Writes `headers` followed by `rows` in the order given and returns the final path.
    pub fn write_rows(
        &self,
        rows: &[RowData],
        headers: &[String],
        file_name: &str,
    ) -> Result<PathBuf, FileError> {
        Self::validate_name(file_name)?;
        fs::create_dir_all(&self.dir)?;

        let final_path = self.dir.join(file_name);
        let tmp_path = self.dir.join(format!("{file_name}.tmp"));

        if let Err(err) = self.write_file(&tmp_path, rows, headers) {
            Self::discard(&tmp_path);
            return Err(err);
        }

        if let Err(source) = fs::rename(&tmp_path, &final_path) {
            Self::discard(&tmp_path);
            return Err(FileError::Persist {
                from: tmp_path,
                to: final_path,
                source,
            });
        }

        debug!(path = %final_path.display(), rows = rows.len(), "Wrote CSV file");
        Ok(final_path)
    }

    fn write_file(&self, path: &Path, rows: &[RowData], headers: &[String]) -> Result<(), FileError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;

        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row.field_values.iter().map(|f| self.encoder.encode_field(f)))?;
        }

        writer.flush()?;
        Ok(())
    }

    fn discard(tmp_path: &Path) {
        if let Err(err) = fs::remove_file(tmp_path) {
            warn!(path = %tmp_path.display(), error = %err, "Failed to remove partial file");
        }
    }

    fn validate_name(file_name: &str) -> Result<(), FileError> {
        let invalid = file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\']);
        if invalid {
            return Err(FileError::InvalidDestination(file_name.to_string()));
        }
        Ok(())
    }
}
