pub mod common;
pub mod eigenstrat;
pub mod vcf;

use std::path::Path;

use crate::error::{CustomError, Result};
use crate::model::Site;
use eigenstrat::EigenstratSnpReader;
use vcf::VcfSiteReader;

/// A forward-only stream of sites, in the order of the (sorted) site list.
pub trait SiteReader: Iterator<Item = Result<Site>> {
    fn path(&self) -> &Path;
    /// Rows dropped so far because they were not biallelic SNPs.
    fn n_skipped(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteSchema {
    Eigenstrat,
    Vcf,
}

impl SiteSchema {
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.ends_with(".snp") || name.ends_with(".snp.gz") {
            Ok(SiteSchema::Eigenstrat)
        } else if name.ends_with(".vcf") || name.ends_with(".vcf.gz") {
            Ok(SiteSchema::Vcf)
        } else {
            Err(CustomError::SiteListSchema {
                path: path.to_path_buf(),
            })
        }
    }
}

pub fn open_site_reader(path: &impl AsRef<Path>) -> Result<Box<dyn SiteReader>> {
    match SiteSchema::from_path(path.as_ref())? {
        SiteSchema::Eigenstrat => Ok(Box::new(EigenstratSnpReader::open(path)?)),
        SiteSchema::Vcf => Ok(Box::new(VcfSiteReader::open(path)?)),
    }
}
