use std::path::Path;

use tracing::debug;

use crate::error::{CustomError, Result};
use crate::model::Site;
use crate::reader::SiteReader;
use crate::reader::common::{TextLines, parse_position};

pub(crate) const VCF_SITE_FIELDS: usize = 5;
const HEADER_PREFIX: &str = "#CHROM";

/// Streams biallelic SNPs from the fixed columns of a `.vcf` or `.vcf.gz`.
pub struct VcfSiteReader {
    lines: TextLines,
    n_skipped: usize,
    done: bool,
}

impl VcfSiteReader {
    /// Opens the file and consumes everything up to and including the `#CHROM` line.
    pub fn open(vcf_path: &impl AsRef<Path>) -> Result<Self> {
        let mut lines = TextLines::open(vcf_path)?;
        loop {
            match lines.next_line() {
                Some(Ok((_, line))) if line.starts_with(HEADER_PREFIX) => break,
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e),
                None => {
                    return Err(CustomError::VcfHeaderMissing {
                        path: vcf_path.as_ref().to_path_buf(),
                    });
                }
            }
        }
        Ok(Self {
            lines,
            n_skipped: 0,
            done: false,
        })
    }
}

impl SiteReader for VcfSiteReader {
    fn path(&self) -> &Path {
        self.lines.path()
    }

    fn n_skipped(&self) -> usize {
        self.n_skipped
    }
}

impl Iterator for VcfSiteReader {
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
            let fields: Vec<&str> = line.split_whitespace().take(VCF_SITE_FIELDS).collect();
            if fields.is_empty() {
                continue;
            }
            match parse_vcf_fields(&fields, line_num) {
                Ok(Some(site)) => return Some(Ok(site)),
                Ok(None) => {
                    debug!(line_num, id = fields[2], "skipping non-SNP record");
                    self.n_skipped += 1;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

fn parse_vcf_fields(fields: &[&str], line_num: usize) -> Result<Option<Site>> {
    if fields.len() < VCF_SITE_FIELDS {
        return Err(CustomError::VcfFields {
            line_num,
            n_fields: fields.len(),
            expected: VCF_SITE_FIELDS,
        });
    }
    let pos = parse_position(fields[1], line_num)?;
    Ok(Site::biallelic(fields[0], pos, fields[2], fields[3], fields[4]))
}
