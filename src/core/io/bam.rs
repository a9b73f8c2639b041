use std::ops::Range;
use std::path::Path;

use bio_types::genome::Position;
use rust_htslib::bam::record::{Aux, Cigar, Record};
use rust_htslib::bam::{Read, Reader};

use crate::core::pileup::PileupError;
use crate::core::read::{AlignedBase, AlignedRead, CigarOp};

// FASTQ-style encoding of the sq/dq/iq string tags
const QV_OFFSET: u8 = 33;

/// Read decoded from a BAM record into aligned-space base slots,
/// optionally clipped to a reference window.
#[derive(Clone, PartialEq, Debug)]
pub struct BamRead {
    name: String,
    begin: Position,
    end: Position,
    chemistry: Option<String>,
    bases: Vec<AlignedBase>,
}

impl AlignedRead for BamRead {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn begin(&self) -> Position {
        self.begin
    }

    #[inline]
    fn end(&self) -> Position {
        self.end
    }

    #[inline]
    fn bases(&self) -> &[AlignedBase] {
        &self.bases
    }

    #[inline]
    fn chemistry(&self) -> &Option<String> {
        &self.chemistry
    }
}

#[inline]
fn covers(region: Option<&Range<Position>>, pos: Position) -> bool {
    region.map_or(true, |x| x.contains(&pos))
}

// Insertions anchor between columns; keep them only strictly inside the window
#[inline]
fn anchors(region: Option<&Range<Position>>, pos: Position) -> bool {
    region.map_or(true, |x| pos > x.start && pos < x.end)
}

/// Per-query-base quality channels of a record. The base QUAL track is
/// absent when the record stores '*'; the rich tracks require all three
/// of the sq/dq/iq tags.
struct QualityTracks {
    qual: Option<Vec<u8>>,
    rich: Option<(Vec<u8>, Vec<u8>, Vec<u8>)>,
}

impl QualityTracks {
    fn decode(record: &Record, name: &str, qlen: usize) -> Result<Self, PileupError> {
        let qual = record.qual();
        let qual = if qual.iter().all(|&x| x == 0xff) { None } else { Some(qual.to_vec()) };

        let sub = string_tag(record, b"sq", name, qlen)?;
        let del = string_tag(record, b"dq", name, qlen)?;
        let ins = string_tag(record, b"iq", name, qlen)?;
        let rich = match (sub, del, ins) {
            (Some(sub), Some(del), Some(ins)) => Some((sub, del, ins)),
            _ => None,
        };
        Ok(Self { qual, rich })
    }

    fn slot(&self, op: CigarOp, nuc: u8, qpos: usize) -> AlignedBase {
        match (&self.qual, &self.rich) {
            (Some(qual), Some((sub, del, ins))) => {
                AlignedBase::with_qvs(op, nuc, qual[qpos], sub[qpos], del[qpos], ins[qpos])
            }
            (Some(qual), None) => AlignedBase::with_qual(op, nuc, qual[qpos]),
            (None, _) => AlignedBase::new(op, nuc),
        }
    }
}

fn string_tag(record: &Record, tag: &[u8], name: &str, qlen: usize) -> Result<Option<Vec<u8>>, PileupError> {
    match record.aux(tag) {
        Ok(Aux::String(values)) => {
            let values: Vec<u8> = values.bytes().map(|x| x.saturating_sub(QV_OFFSET)).collect();
            if values.len() != qlen {
                return Err(PileupError::LengthMismatch {
                    read: name.to_string(),
                    decoded: qlen,
                    stored: values.len(),
                });
            }
            Ok(Some(values))
        }
        _ => Ok(None),
    }
}

impl BamRead {
    /// Expands the CIGAR into per-base slots. Soft clips are excised, hard
    /// clips consume nothing; any other operation outside {M, =, X, I, D}
    /// is rejected. Returns None when nothing overlaps the window.
    pub fn decode(record: &Record, region: Option<&Range<Position>>) -> Result<Option<Self>, PileupError> {
        let name = String::from_utf8_lossy(record.qname()).into_owned();
        let seq = record.seq().as_bytes();

        let qlen: usize = record
            .cigar()
            .iter()
            .map(|block| match block {
                Cigar::Match(ops) | Cigar::Equal(ops) | Cigar::Diff(ops) => *ops as usize,
                Cigar::Ins(ops) | Cigar::SoftClip(ops) => *ops as usize,
                _ => 0,
            })
            .sum();
        if qlen != seq.len() {
            return Err(PileupError::LengthMismatch { read: name, decoded: qlen, stored: seq.len() });
        }
        let quals = QualityTracks::decode(record, &name, qlen)?;

        let mut bases = Vec::with_capacity(seq.len());
        let mut begin: Option<Position> = None;
        let mut refpos = record.pos() as Position;
        let mut qpos = 0;
        for block in record.cigar().iter() {
            match block {
                Cigar::Match(ops) | Cigar::Equal(ops) => {
                    for _ in 0..*ops {
                        if covers(region, refpos) {
                            begin.get_or_insert(refpos);
                            bases.push(quals.slot(CigarOp::Match, seq[qpos], qpos));
                        }
                        refpos += 1;
                        qpos += 1;
                    }
                }
                Cigar::Diff(ops) => {
                    for _ in 0..*ops {
                        if covers(region, refpos) {
                            begin.get_or_insert(refpos);
                            bases.push(quals.slot(CigarOp::Subst, seq[qpos], qpos));
                        }
                        refpos += 1;
                        qpos += 1;
                    }
                }
                Cigar::Ins(ops) => {
                    for _ in 0..*ops {
                        if begin.is_some() && anchors(region, refpos) {
                            bases.push(quals.slot(CigarOp::Ins, seq[qpos], qpos));
                        }
                        qpos += 1;
                    }
                }
                Cigar::Del(ops) => {
                    for _ in 0..*ops {
                        if covers(region, refpos) {
                            begin.get_or_insert(refpos);
                            bases.push(AlignedBase::new(CigarOp::Del, b'-'));
                        }
                        refpos += 1;
                    }
                }
                Cigar::SoftClip(ops) => {
                    qpos += *ops as usize;
                }
                Cigar::HardClip(_) => {}
                Cigar::RefSkip(_) | Cigar::Pad(_) => {
                    return Err(PileupError::MalformedCigar { read: name, op: block.to_string() });
                }
            }
        }

        Ok(begin.map(|begin| {
            let span = bases.iter().filter(|x| x.op().consumes_reference()).count() as Position;
            Self { name, begin, end: begin + span, chemistry: None, bases }
        }))
    }
}

/// Decodes all primary mapped records of a BAM file in order, clipping
/// each read to `region` when one is given.
pub fn load(path: impl AsRef<Path>, region: Option<&Range<Position>>) -> Result<Vec<BamRead>, PileupError> {
    let path = path.as_ref();
    let mut bam = Reader::from_path(path).unwrap_or_else(|_| {
        panic!(
            "Failed to open file {}\n\
                Possible reasons: file is not a valid BAM; you don't have read permissions",
            path.display()
        )
    });

    let mut reads = Vec::new();
    let mut record = Record::new();
    while let Some(result) = bam.read(&mut record) {
        result.unwrap_or_else(|_| panic!("Failed to parse BAM record in {}", path.display()));
        if record.is_unmapped() || record.is_secondary() || record.is_supplementary() {
            continue;
        }
        if let Some(read) = BamRead::decode(&record, region)? {
            reads.push(read);
        }
    }
    Ok(reads)
}
