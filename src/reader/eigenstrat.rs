use std::path::Path;

use tracing::debug;

use crate::error::{CustomError, Result};
use crate::model::Site;
use crate::reader::SiteReader;
use crate::reader::common::{TextLines, parse_position};

pub(crate) const SNP_FIELDS: usize = 6;

/// Streams sites from an eigenstrat `.snp` file:
/// `id chrom genetic_pos physical_pos ref alt`.
pub struct EigenstratSnpReader {
    lines: TextLines,
    n_skipped: usize,
    done: bool,
}

impl EigenstratSnpReader {
    pub fn open(snp_path: &impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            lines: TextLines::open(snp_path)?,
            n_skipped: 0,
            done: false,
        })
    }
}

impl SiteReader for EigenstratSnpReader {
    fn path(&self) -> &Path {
        self.lines.path()
    }

    fn n_skipped(&self) -> usize {
        self.n_skipped
    }
}

impl Iterator for EigenstratSnpReader {
    type Item = Result<Site>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let (line_num, line) = match self.lines.next_line()? {
                Ok(next) => next,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            match parse_snp_fields(&fields, line_num) {
                Ok(Some(site)) => return Some(Ok(site)),
                Ok(None) => {
                    debug!(line_num, id = fields[0], "skipping non-biallelic SNP");
                    self.n_skipped += 1;
                }
                Err(e) => {
                    // Poison iterator to prevent further reads
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

fn parse_snp_fields(fields: &[&str], line_num: usize) -> Result<Option<Site>> {
    if fields.len() < SNP_FIELDS {
        return Err(CustomError::EigenstratSnpFields {
            line_num,
            n_fields: fields.len(),
            expected: SNP_FIELDS,
        });
    }
    let pos = parse_position(fields[3], line_num)?;
    Ok(Site::biallelic(fields[1], pos, fields[0], fields[4], fields[5]))
}
