//! Sequential driver of the ETL run.
//!
//! Each dataset is processed one file at a time: the file's rows are written
//! in their own transaction, committed, then progress is reported. A failing
//! file either aborts the run or is rolled back and skipped, depending on
//! [`ParseErrorPolicy`]. Database and I/O failures always abort.

use crate::config::{EtlConfig, ParseErrorPolicy};
use crate::discovery::find_files;
use crate::error::EtlError;
use crate::transform::{process_log_file, process_song_file, FileReport};
use crate::warehouse::{LoadTarget, SqliteWarehouse};
use std::path::Path;
use tracing::{info, warn};

/// Transforms one data file and writes its rows to the target.
pub type FileProcessor = fn(&dyn LoadTarget, &Path) -> Result<FileReport, EtlError>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub files_found: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub totals: FileReport,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub songs: DatasetSummary,
    pub logs: DatasetSummary,
}

pub struct Pipeline {
    warehouse: SqliteWarehouse,
    config: EtlConfig,
}

impl Pipeline {
    pub fn new(warehouse: SqliteWarehouse, config: EtlConfig) -> Self {
        Pipeline { warehouse, config }
    }

    pub fn warehouse(&self) -> &SqliteWarehouse {
        &self.warehouse
    }

    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    pub fn into_warehouse(self) -> SqliteWarehouse {
        self.warehouse
    }

    /// Loads the song dataset, then the log dataset.
    ///
    /// Songs go first so that song plays can be matched against the catalog.
    pub fn run(&mut self) -> Result<RunSummary, EtlError> {
        let song_data_dir = self.config.song_data_dir.clone();
        let log_data_dir = self.config.log_data_dir.clone();

        let songs = self.process_data(&song_data_dir, process_song_file)?;
        let logs = self.process_data(&log_data_dir, process_log_file)?;
        Ok(RunSummary { songs, logs })
    }

    /// Runs `processor` on every data file under `root`, committing after each file.
    pub fn process_data(
        &mut self,
        root: &Path,
        processor: FileProcessor,
    ) -> Result<DatasetSummary, EtlError> {
        let files = find_files(root, &self.config.file_extension);
        let num_files = files.len();
        info!("{} files found in {}", num_files, root.display());

        let mut summary = DatasetSummary {
            files_found: num_files,
            ..DatasetSummary::default()
        };

        for (index, data_file) in files.iter().enumerate() {
            let tx = self.warehouse.begin_file()?;
            match processor(&tx, data_file) {
                Ok(report) => {
                    tx.commit()?;
                    summary.files_processed += 1;
                    summary.totals += report;
                }
                Err(e)
                    if e.is_record_error()
                        && self.config.on_parse_error == ParseErrorPolicy::Skip =>
                {
                    tx.rollback()?;
                    warn!("Skipping {}: {}", data_file.display(), e);
                    summary.files_skipped += 1;
                }
                Err(e) => return Err(e),
            }
            info!("{}/{} files processed.", index + 1, num_files);
        }

        Ok(summary)
    }
}
