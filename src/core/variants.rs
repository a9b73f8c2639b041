use std::collections::BTreeMap;

use derive_more::Constructor;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::dna::{Codon, NucCounts};

/// A single alternative codon reported at a variant position. The
/// haplotype-hit vector is filled in later by the phaser, one flag per
/// ranked haplotype.
#[derive(Clone, PartialEq, Debug, serde::Serialize)]
pub struct VariantCodon {
    codon: Codon,
    frequency: f64,
    pvalue: f64,
    known_drm: String,
    haplotype_hit: Vec<bool>,
}

impl VariantCodon {
    pub fn new(codon: Codon, frequency: f64, pvalue: f64, known_drm: String) -> Self {
        Self { codon, frequency, pvalue, known_drm, haplotype_hit: Vec::new() }
    }

    #[inline]
    pub fn codon(&self) -> Codon {
        self.codon
    }

    #[inline]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    #[inline]
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    #[inline]
    pub fn known_drm(&self) -> &str {
        &self.known_drm
    }

    #[inline]
    pub fn haplotype_hit(&self) -> &[bool] {
        &self.haplotype_hit
    }

    #[inline]
    pub fn record_hit(&mut self, hit: bool) {
        self.haplotype_hit.push(hit);
    }
}

/// One pileup column surrounding a variant position, kept for reporting.
#[derive(Clone, PartialEq, Debug, Constructor, serde::Serialize)]
pub struct ColumnContext {
    rel_pos: i64,
    abs_pos: u64,
    #[serde(flatten)]
    counts: NucCounts,
    #[serde(rename = "wt")]
    wildtype: char,
}

/// All calls made at a single in-frame codon position.
#[derive(Clone, PartialEq, Debug)]
pub struct VariantPosition {
    ref_codon: Codon,
    alt_ref: Option<Codon>,
    coverage: u32,
    variants: BTreeMap<char, Vec<VariantCodon>>,
    context: Vec<ColumnContext>,
}

impl VariantPosition {
    pub fn new(ref_codon: Codon) -> Self {
        Self { ref_codon, alt_ref: None, coverage: 0, variants: BTreeMap::new(), context: Vec::new() }
    }

    #[inline]
    pub fn ref_codon(&self) -> Codon {
        self.ref_codon
    }

    #[inline]
    pub fn ref_aminoacid(&self) -> char {
        self.ref_codon.aminoacid()
    }

    #[inline]
    pub fn alt_ref_codon(&self) -> Option<Codon> {
        self.alt_ref
    }

    #[inline]
    pub fn alt_ref_aminoacid(&self) -> Option<char> {
        self.alt_ref.map(|x| x.aminoacid())
    }

    #[inline]
    pub fn coverage(&self) -> u32 {
        self.coverage
    }

    #[inline]
    pub fn variants(&self) -> &BTreeMap<char, Vec<VariantCodon>> {
        &self.variants
    }

    #[inline]
    pub fn variants_mut(&mut self) -> &mut BTreeMap<char, Vec<VariantCodon>> {
        &mut self.variants
    }

    #[inline]
    pub fn context(&self) -> &[ColumnContext] {
        &self.context
    }

    pub fn set_alt_ref(&mut self, codon: Codon) {
        self.alt_ref = Some(codon);
    }

    pub fn set_coverage(&mut self, coverage: u32) {
        self.coverage = coverage;
    }

    pub fn record(&mut self, aminoacid: char, codon: VariantCodon) {
        self.variants.entry(aminoacid).or_default().push(codon);
    }

    pub fn push_context(&mut self, context: ColumnContext) {
        self.context.push(context);
    }

    /// At least one alternative codon was reported here.
    #[inline]
    pub fn is_variant(&self) -> bool {
        !self.variants.is_empty()
    }

    /// An observed raw codon counts as a hit when it equals the reference
    /// codon, the alternative reference codon or any reported variant codon.
    pub fn is_hit(&self, codon: &[u8; 3]) -> bool {
        if self.ref_codon.symbols() == codon {
            return true;
        }
        if let Some(alt) = &self.alt_ref {
            if alt.symbols() == codon {
                return true;
            }
        }
        self.variants.values().flatten().any(|x| x.codon.symbols() == codon)
    }
}

/// Variant table of a single gene, keyed by the 1-based amino-acid position.
#[derive(Clone, PartialEq, Debug)]
pub struct GeneVariants {
    name: String,
    offset: u64,
    positions: BTreeMap<u32, VariantPosition>,
}

impl GeneVariants {
    pub fn new(name: impl Into<String>, offset: u64) -> Self {
        Self { name: name.into(), offset, positions: BTreeMap::new() }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference position of the gene's first codon.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[inline]
    pub fn positions(&self) -> &BTreeMap<u32, VariantPosition> {
        &self.positions
    }

    #[inline]
    pub fn positions_mut(&mut self) -> &mut BTreeMap<u32, VariantPosition> {
        &mut self.positions
    }

    pub fn insert(&mut self, aapos: u32, position: VariantPosition) {
        self.positions.insert(aapos, position);
    }

    pub fn has_variants(&self) -> bool {
        self.positions.values().any(VariantPosition::is_variant)
    }
}

impl Serialize for GeneVariants {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let positions: Vec<PositionRecord> = self
            .positions
            .iter()
            .filter(|(_, x)| x.is_variant())
            .map(|(aapos, x)| PositionRecord { aapos: *aapos, position: x })
            .collect();

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("variant_positions", &positions)?;
        map.end()
    }
}

struct PositionRecord<'a> {
    aapos: u32,
    position: &'a VariantPosition,
}

impl Serialize for PositionRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("ref_codon", &self.position.ref_codon)?;
        map.serialize_entry("ref_amino_acid", &self.position.ref_aminoacid())?;
        if let Some(alt) = self.position.alt_ref_codon() {
            map.serialize_entry("alt_ref_codon", &alt)?;
            map.serialize_entry("alt_ref_amino_acid", &alt.aminoacid())?;
        }
        map.serialize_entry("ref_position", &self.aapos)?;
        map.serialize_entry("coverage", &self.position.coverage())?;

        let aminoacids: Vec<AminoAcidRecord> = self
            .position
            .variants()
            .iter()
            .map(|(aminoacid, codons)| AminoAcidRecord { aminoacid: *aminoacid, codons })
            .collect();
        map.serialize_entry("variant_amino_acids", &aminoacids)?;
        map.serialize_entry("msa", self.position.context())?;
        map.end()
    }
}

struct AminoAcidRecord<'a> {
    aminoacid: char,
    codons: &'a [VariantCodon],
}

impl Serialize for AminoAcidRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("amino_acid", &self.aminoacid)?;
        map.serialize_entry("variant_codons", self.codons)?;
        map.end()
    }
}
