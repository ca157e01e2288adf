use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;
use rust_htslib::bam::{self, record::Cigar, record::CigarString};

pub const CHROM: &str = "chr1";
const CHROM_LEN: u64 = 1_000;

/// 0-based start of every read; the site base sits at read offset 4.
const READ_START: i64 = 95;
const READ_LEN: usize = 10;
const SITE_OFFSET: usize = 4;
/// smallest bin holding [95, 105)
const READ_BIN: u16 = 4681;

const GOOD_QUAL: u8 = 40;
const GOOD_MAPQ: u8 = 60;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

pub struct Dataset {
    pub dir: PathBuf,
    pub bamlist: PathBuf,
    pub snp: PathBuf,
    pub vcf: PathBuf,
    pub bam: PathBuf,
}

/// One sample with reads over chr1:100 (A/G). Passing reads carry A, A, G, G.
/// Extra G reads are low base quality, low mapping quality (5), duplicate,
/// and one read deletes the site.
pub fn create_dataset(label: &str) -> io::Result<Dataset> {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join("apulldown-tests").join(format!(
        "{}-{}-{}",
        std::process::id(),
        id,
        label
    ));
    fs::create_dir_all(&dir)?;

    let bam = dir.join("sample1.bam");
    write_bam(&bam)?;

    let bamlist = dir.join("bams.txt");
    write_text(
        &bamlist,
        &format!("# name path\nsample1 {}\n", bam.display()),
    )?;

    let snp = dir.join("sites.snp");
    write_text(
        &snp,
        "rs1 chr1 0.0 100 A G\n\
         rsN chr1 0.0 250 A N\n\
         rs2 chr1 0.0 300 C T\n\
         rs3 chr2 0.0 50 G A\n",
    )?;

    let vcf = dir.join("sites.vcf");
    write_text(
        &vcf,
        "##fileformat=VCFv4.2\n\
         #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
         chr1\t100\trs1\tA\tG\t.\t.\t.\n\
         chr1\t300\trs2\tC\tT\t.\t.\t.\n",
    )?;

    Ok(Dataset {
        dir,
        bamlist,
        snp,
        vcf,
        bam,
    })
}

pub fn write_text(path: &Path, contents: &str) -> io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(contents.as_bytes())
}

/// Writes each chunk as its own gzip member, the way bgzip splits blocks.
pub fn write_gz_members(path: &Path, members: &[&str]) -> io::Result<()> {
    let mut f = File::create(path)?;
    for member in members {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(member.as_bytes())?;
        f.write_all(&encoder.finish()?)?;
    }
    Ok(())
}

struct TestRead {
    name: &'static str,
    base: u8,
    base_qual: u8,
    mapq: u8,
    flags: u16,
    deletion: bool,
}

impl TestRead {
    fn good(name: &'static str, base: u8) -> Self {
        Self {
            name,
            base,
            base_qual: GOOD_QUAL,
            mapq: GOOD_MAPQ,
            flags: 0,
            deletion: false,
        }
    }
}

fn test_reads() -> Vec<TestRead> {
    vec![
        TestRead::good("ref1", b'A'),
        TestRead::good("ref2", b'A'),
        TestRead::good("alt1", b'G'),
        TestRead::good("alt2", b'G'),
        TestRead {
            base_qual: 10,
            ..TestRead::good("lowbq", b'G')
        },
        TestRead {
            mapq: 5,
            ..TestRead::good("lowmq", b'G')
        },
        TestRead {
            flags: 0x400,
            ..TestRead::good("dup", b'G')
        },
        TestRead {
            deletion: true,
            ..TestRead::good("del", b'G')
        },
    ]
}

fn write_bam(path: &Path) -> io::Result<()> {
    let mut header = bam::header::Header::new();
    let mut hd = bam::header::HeaderRecord::new(b"HD");
    hd.push_tag(b"VN", &"1.6".to_string());
    hd.push_tag(b"SO", &"coordinate".to_string());
    header.push_record(&hd);
    let mut sq = bam::header::HeaderRecord::new(b"SQ");
    sq.push_tag(b"SN", &CHROM.to_string());
    sq.push_tag(b"LN", &CHROM_LEN.to_string());
    header.push_record(&sq);

    let mut writer =
        bam::Writer::from_path(path, &header, bam::Format::Bam).map_err(io::Error::other)?;
    for read in test_reads() {
        let (cigar, seq) = if read.deletion {
            let cigar = CigarString(vec![Cigar::Match(4), Cigar::Del(1), Cigar::Match(5)]);
            (cigar, vec![b'C'; READ_LEN - 1])
        } else {
            let mut seq = vec![b'C'; READ_LEN];
            seq[SITE_OFFSET] = read.base;
            (CigarString(vec![Cigar::Match(READ_LEN as u32)]), seq)
        };
        let mut qual = vec![GOOD_QUAL; seq.len()];
        if !read.deletion {
            qual[SITE_OFFSET] = read.base_qual;
        }

        let mut record = bam::Record::new();
        record.set(read.name.as_bytes(), Some(&cigar), &seq, &qual);
        record.set_tid(0);
        record.set_pos(READ_START);
        record.set_bin(READ_BIN);
        record.set_mapq(read.mapq);
        record.set_flags(read.flags);
        record.set_mtid(-1);
        record.set_mpos(-1);
        record.set_insert_size(0);
        writer.write(&record).map_err(io::Error::other)?;
    }
    // header and records are flushed on drop
    drop(writer);

    bam::index::build(path, None, bam::index::Type::Bai, 1).map_err(io::Error::other)?;
    Ok(())
}
