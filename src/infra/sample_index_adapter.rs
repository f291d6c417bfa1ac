use csv::{QuoteStyle, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::app::ports::SampleIndexPort;
use crate::domain::{Sample, SAMPLE_INDEX_HEADER};
use crate::error::Result;

/// Append-only CSV index of validated samples.
///
/// Fields are quoted only when necessary, with `#` as the quote character. The file is never
/// truncated. Concurrent writers are not coordinated.
pub struct CsvSampleIndex {
    path: PathBuf,
}

impl CsvSampleIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(file: File) -> csv::Writer<File> {
        WriterBuilder::new()
            .delimiter(b',')
            .quote(b'#')
            .quote_style(QuoteStyle::Necessary)
            .from_writer(file)
    }
}

impl SampleIndexPort for CsvSampleIndex {
    fn ensure_index(&self) -> Result<()> {
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %self.path.display(), "Sample index already exists");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let mut writer = Self::writer(file);
        writer.write_record(SAMPLE_INDEX_HEADER)?;
        writer.flush()?;
        info!(path = %self.path.display(), "Created sample index");
        Ok(())
    }

    fn append_samples(&self, samples: &[Sample]) -> Result<usize> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = Self::writer(file);
        for sample in samples {
            writer.write_record(sample.to_index_row())?;
        }
        writer.flush()?;
        Ok(samples.len())
    }
}
