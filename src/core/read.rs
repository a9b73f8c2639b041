use bio_types::genome::Position;
use derive_getters::Getters;
use derive_more::Constructor;
#[cfg(test)]
use mockall::mock;

/// Aligned-space CIGAR operation for a single base slot.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum CigarOp {
    Match,
    Subst,
    Del,
    Ins,
    Pad,
    SoftClip,
}

impl CigarOp {
    #[inline]
    pub fn from_symbol(symbol: u8) -> Option<Self> {
        match symbol {
            b'=' | b'M' => Some(CigarOp::Match),
            b'X' => Some(CigarOp::Subst),
            b'D' => Some(CigarOp::Del),
            b'I' => Some(CigarOp::Ins),
            b'P' => Some(CigarOp::Pad),
            b'S' => Some(CigarOp::SoftClip),
            _ => None,
        }
    }

    #[inline]
    pub fn consumes_reference(&self) -> bool {
        matches!(self, CigarOp::Match | CigarOp::Subst | CigarOp::Del)
    }
}

/// Minimum quality-value requirements per channel. Unset channels and
/// bases lacking the channel always pass.
#[derive(Clone, Copy, Eq, PartialEq, Default, Debug, Constructor, Getters)]
pub struct QvThresholds {
    qual: Option<u8>,
    sub: Option<u8>,
    del: Option<u8>,
    ins: Option<u8>,
}

/// One base of an aligned read: operation, observed symbol and whatever
/// quality channels the source provided.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct AlignedBase {
    op: CigarOp,
    nuc: u8,
    qual: Option<u8>,
    subqv: Option<u8>,
    delqv: Option<u8>,
    insqv: Option<u8>,
}

#[inline]
fn phred_to_prob(qv: Option<u8>) -> f64 {
    qv.map_or(0.0, |qv| 1.0 - 10f64.powf(-(qv as f64) / 10.0))
}

#[inline]
fn meets(value: Option<u8>, threshold: &Option<u8>) -> bool {
    match (threshold, value) {
        (Some(threshold), Some(value)) => value >= *threshold,
        _ => true,
    }
}

impl AlignedBase {
    pub fn new(op: CigarOp, nuc: u8) -> Self {
        Self { op, nuc, qual: None, subqv: None, delqv: None, insqv: None }
    }

    pub fn with_qual(op: CigarOp, nuc: u8, qual: u8) -> Self {
        Self { op, nuc, qual: Some(qual), subqv: None, delqv: None, insqv: None }
    }

    pub fn with_qvs(op: CigarOp, nuc: u8, qual: u8, subqv: u8, delqv: u8, insqv: u8) -> Self {
        Self { op, nuc, qual: Some(qual), subqv: Some(subqv), delqv: Some(delqv), insqv: Some(insqv) }
    }

    #[inline]
    pub fn op(&self) -> CigarOp {
        self.op
    }

    #[inline]
    pub fn nuc(&self) -> u8 {
        self.nuc
    }

    #[inline]
    pub fn prob_true(&self) -> f64 {
        phred_to_prob(self.qual)
    }

    #[inline]
    pub fn prob_correct_base(&self) -> f64 {
        phred_to_prob(self.subqv)
    }

    #[inline]
    pub fn prob_no_deletion(&self) -> f64 {
        phred_to_prob(self.delqv)
    }

    #[inline]
    pub fn prob_no_insertion(&self) -> f64 {
        phred_to_prob(self.insqv)
    }

    #[inline]
    pub fn meets(&self, thresholds: &QvThresholds) -> bool {
        meets(self.qual, thresholds.qual())
            && meets(self.subqv, thresholds.sub())
            && meets(self.delqv, thresholds.del())
            && meets(self.insqv, thresholds.ins())
    }
}

pub trait AlignedRead {
    fn name(&self) -> &str;
    fn begin(&self) -> Position;
    fn end(&self) -> Position;
    fn bases(&self) -> &[AlignedBase];
    fn chemistry(&self) -> &Option<String>;
}

#[cfg(test)]
mock! {
    pub Read {}
    impl AlignedRead for Read {
        fn name(&self) -> &str;
        fn begin(&self) -> Position;
        fn end(&self) -> Position;
        fn bases(&self) -> &[AlignedBase];
        fn chemistry(&self) -> &Option<String>;
    }
}

/// In-memory read. The reference end is derived from the ops so the span
/// always matches the base vector.
#[derive(Clone, PartialEq, Debug)]
pub struct MemoryRead {
    name: String,
    begin: Position,
    end: Position,
    chemistry: Option<String>,
    bases: Vec<AlignedBase>,
}

impl MemoryRead {
    pub fn new(name: impl Into<String>, begin: Position, chemistry: Option<String>, bases: Vec<AlignedBase>) -> Self {
        let span = bases.iter().filter(|x| x.op().consumes_reference()).count() as Position;
        Self { name: name.into(), begin, end: begin + span, chemistry, bases }
    }
}

impl AlignedRead for MemoryRead {
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
