pub mod samples;

pub(crate) use samples::{SampleEntry, read_sample_list};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::error::{CustomError, Result};

/// Line-at-a-time access to a plain or gzip-compressed text file, tracking
/// 1-based line numbers for error messages.
pub(crate) struct TextLines {
    reader: Box<dyn BufRead>,
    path: PathBuf,
    line_num: usize,
}

impl TextLines {
    pub(crate) fn open(path: &impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let f = File::open(&path).map_err(|e| CustomError::ReadWithPath {
            source: e,
            path: path.clone(),
        })?;
        // bgzip output is multi-member gzip
        let reader: Box<dyn BufRead> = if is_gzipped(&path) {
            Box::new(BufReader::new(MultiGzDecoder::new(f)))
        } else {
            Box::new(BufReader::new(f))
        };
        Ok(Self {
            reader,
            path,
            line_num: 0,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the next line with its line number, or `None` at end of file.
    pub(crate) fn next_line(&mut self) -> Option<Result<(usize, String)>> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                self.line_num += 1;
                Some(Ok((self.line_num, line)))
            }
            Err(e) => Some(Err(CustomError::ReadWithPath {
                source: e,
                path: self.path.clone(),
            })),
        }
    }
}

pub(crate) fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Parses a 1-based site position.
pub(crate) fn parse_position(value: &str, line_num: usize) -> Result<u64> {
    let pos: u64 = value.parse().map_err(|e| CustomError::SitePosition {
        source: e,
        line_num,
        value: value.to_string(),
    })?;
    if pos == 0 {
        return Err(CustomError::SitePositionZero { line_num });
    }
    Ok(pos)
}
