use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{CustomError, Result};

pub(crate) const SAMPLE_LIST_FIELDS: usize = 2;

/// One line of the sample list: a sample name and its alignment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Reads a whitespace-delimited `name path` list, keeping file order.
pub(crate) fn read_sample_list(path: &impl AsRef<Path>) -> Result<Vec<SampleEntry>> {
    let f = File::open(path).map_err(|e| CustomError::ReadWithPath {
        source: e,
        path: path.as_ref().to_path_buf(),
    })?;
    let f = BufReader::new(f);
    let mut samples = Vec::new();

    for (line_idx, line) in f.lines().enumerate() {
        let line = line.map_err(|e| CustomError::ReadWithPath {
            source: e,
            path: path.as_ref().to_path_buf(),
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < SAMPLE_LIST_FIELDS {
            return Err(CustomError::SampleListFields {
                line_num: line_idx + 1,
                n_fields: fields.len(),
                expected: SAMPLE_LIST_FIELDS,
            });
        }
        samples.push(SampleEntry {
            name: fields[0].to_string(),
            path: PathBuf::from(fields[1]),
        });
    }

    if samples.is_empty() {
        return Err(CustomError::SampleCount { n_samples: 0 });
    }
    Ok(samples)
}
