use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use joblink_core::error::AppError;
use joblink_core::record::{FIELDS, JobRecord};
use joblink_core::traits::RowSink;

/// Tracking sheet stored as a local CSV file.
///
/// Row 1 is always the canonical header. A missing or empty file gets the
/// header written; a mismatched first row is replaced in place, leaving
/// every other row untouched.
#[derive(Debug)]
pub struct CsvSheet {
    path: PathBuf,
    header_ready: bool,
}

impl CsvSheet {
    /// Open (creating if needed) the sheet at `path` and ensure its header.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let mut sheet = Self {
            path: path.into(),
            header_ready: false,
        };
        sheet.ensure_header()?;
        Ok(sheet)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows currently in the sheet, header included.
    pub fn read_rows(&self) -> Result<Vec<Vec<String>>, AppError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| self.sink_error(e))?;

        reader
            .records()
            .map(|r| {
                r.map(|rec| rec.iter().map(str::to_string).collect())
                    .map_err(|e| self.sink_error(e))
            })
            .collect()
    }

    fn write_rows(&self, rows: &[Vec<String>]) -> Result<(), AppError> {
        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut writer = WriterBuilder::new()
                .flexible(true)
                .from_path(&tmp)
                .map_err(|e| self.sink_error(e))?;
            for row in rows {
                writer.write_record(row).map_err(|e| self.sink_error(e))?;
            }
            writer.flush().map_err(|e| self.sink_error(e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| self.sink_error(e))
    }

    fn sink_error(&self, e: impl std::fmt::Display) -> AppError {
        AppError::SinkError(format!("{}: {e}", self.path.display()))
    }
}

impl RowSink for CsvSheet {
    fn ensure_header(&mut self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.sink_error(e))?;
        }

        let header: Vec<String> = FIELDS.iter().map(|f| f.to_string()).collect();
        let mut rows = self.read_rows()?;

        match rows.first_mut() {
            None => {
                tracing::info!(path = %self.path.display(), "Creating sheet header");
                self.write_rows(&[header])?;
            }
            Some(first) if *first != header => {
                tracing::warn!(path = %self.path.display(), "Sheet header mismatch, repairing row 1");
                *first = header;
                self.write_rows(&rows)?;
            }
            Some(_) => {}
        }

        self.header_ready = true;
        Ok(())
    }

    fn append_row(&mut self, record: &JobRecord) -> Result<(), AppError> {
        if !self.header_ready {
            return Err(AppError::SinkError(format!(
                "{}: header must be ensured before appending",
                self.path.display()
            )));
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.sink_error(e))?;
        // A last line without its newline would absorb the new row.
        if !ends_with_newline(&mut file).map_err(|e| self.sink_error(e))? {
            file.write_all(b"\n").map_err(|e| self.sink_error(e))?;
        }

        let mut writer = WriterBuilder::new().from_writer(file);
        writer
            .write_record(record.values())
            .map_err(|e| self.sink_error(e))?;
        writer.flush().map_err(|e| self.sink_error(e))?;

        tracing::info!(path = %self.path.display(), aid = %record.aid, "Row appended");
        Ok(())
    }
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(aid: &str, company: &str) -> JobRecord {
        JobRecord {
            aid: aid.into(),
            company: company.into(),
            notes: "likes commas, and \"quotes\"".into(),
            ..Default::default()
        }
    }

    #[test]
    fn creates_header_on_new_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jobs.csv");
        let sheet = CsvSheet::open(&path).unwrap();

        let rows = sheet.read_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], FIELDS.to_vec());
    }

    #[test]
    fn appends_rows_after_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut sheet = CsvSheet::open(dir.path().join("jobs.csv")).unwrap();
        sheet.append_row(&record("R1", "Acme")).unwrap();
        sheet.append_row(&record("R2", "Globex")).unwrap();

        let rows = sheet.read_rows().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(JobRecord::from_row(&rows[1]).unwrap(), record("R1", "Acme"));
        assert_eq!(rows[2][2], "Globex");
    }

    #[test]
    fn reopening_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        CsvSheet::open(&path).unwrap().append_row(&record("R1", "Acme")).unwrap();

        let mut sheet = CsvSheet::open(&path).unwrap();
        sheet.append_row(&record("R2", "Globex")).unwrap();
        assert_eq!(sheet.read_rows().unwrap().len(), 3);
    }

    #[test]
    fn repairs_mismatched_header_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        fs::write(&path, "Id,Company\nR9,Old Co\n").unwrap();

        let sheet = CsvSheet::open(&path).unwrap();
        let rows = sheet.read_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], FIELDS.to_vec());
        assert_eq!(rows[1], vec!["R9", "Old Co"]);
    }

    #[test]
    fn append_after_header_without_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        fs::write(&path, FIELDS.join(",")).unwrap();

        let mut sheet = CsvSheet::open(&path).unwrap();
        sheet.append_row(&record("R1", "Acme")).unwrap();

        let rows = sheet.read_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], FIELDS.to_vec());
        assert_eq!(JobRecord::from_row(&rows[1]).unwrap(), record("R1", "Acme"));
    }

    #[test]
    fn append_after_data_row_without_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        let mut content = FIELDS.join(",");
        content.push_str("\r\nR0");
        content.push_str(&",".repeat(FIELDS.len() - 1));
        fs::write(&path, content).unwrap();

        let mut sheet = CsvSheet::open(&path).unwrap();
        sheet.append_row(&record("R1", "Acme")).unwrap();

        let rows = sheet.read_rows().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "R0");
        assert_eq!(rows[1].len(), FIELDS.len());
        assert_eq!(rows[2][0], "R1");
    }

    #[test]
    fn empty_file_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        fs::write(&path, "").unwrap();

        let sheet = CsvSheet::open(&path).unwrap();
        assert_eq!(sheet.read_rows().unwrap()[0], FIELDS.to_vec());
    }

    #[test]
    fn append_without_header_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut sheet = CsvSheet {
            path: dir.path().join("jobs.csv"),
            header_ready: false,
        };
        let err = sheet.append_row(&record("R1", "Acme")).unwrap_err();
        assert!(matches!(err, AppError::SinkError(_)));
        assert_eq!(err.stage(), "sheet");
    }
}
