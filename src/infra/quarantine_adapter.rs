use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app::ports::{QuarantinePort, QuarantinedSheet};
use crate::error::Result;

/// Copies rejected sheets, unmodified, into a quarantine directory.
pub struct FsQuarantine {
    root: PathBuf,
}

impl FsQuarantine {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl QuarantinePort for FsQuarantine {
    fn quarantine(&self, sheet: &Path) -> Result<QuarantinedSheet> {
        let file_name = sheet.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("sheet path {} has no file name", sheet.display()),
            )
        })?;
        fs::create_dir_all(&self.root)?;
        let location = self.root.join(file_name);
        // Copying a file onto itself truncates it; a sheet already in the quarantine dir stays put
        if is_same_file(sheet, &location)? {
            warn!(
                "Sheet {} already lives in quarantine dir {}, leaving it in place",
                sheet.display(),
                self.root.display()
            );
        } else {
            fs::copy(sheet, &location)?;
        }

        let bytes = fs::read(&location)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let sha256 = hex::encode(hasher.finalize());

        Ok(QuarantinedSheet { location, sha256 })
    }
}

fn is_same_file(sheet: &Path, location: &Path) -> Result<bool> {
    if !location.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(sheet)? == fs::canonicalize(location)?)
}
