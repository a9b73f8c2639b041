use std::fs;

use derive_getters::Getters;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read the target config from {file}: {source}")]
    Unreadable { file: String, source: std::io::Error },
    #[error("Failed to parse the target config: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// A single drug-resistance mutation. Absent amino acids act as wildcards,
/// i.e. a bare position matches any substitution at that position.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Getters)]
pub struct DrmMutation {
    #[serde(rename = "refAA", default)]
    refaa: Option<char>,
    pos: u32,
    #[serde(rename = "curAA", default)]
    curaa: Option<char>,
}

impl DrmMutation {
    pub fn matches(&self, refaa: char, pos: u32, curaa: char) -> bool {
        self.pos == pos
            && self.refaa.map_or(true, |x| x == refaa)
            && self.curaa.map_or(true, |x| x == curaa)
    }
}

/// A named drug with the resistance mutations it is associated with.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Getters)]
pub struct Drm {
    name: String,
    positions: Vec<DrmMutation>,
}

/// A known minor variant the sample is expected to contain; the amino acid
/// is matched by its first character.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Getters)]
pub struct ExpectedMinor {
    position: u32,
    aminoacid: String,
    codon: String,
}

impl ExpectedMinor {
    pub fn matches(&self, pos: u32, aminoacid: char, codon: &[u8]) -> bool {
        self.position == pos
            && self.aminoacid.as_bytes().first() == Some(&(aminoacid as u8))
            && self.codon.as_bytes() == codon
    }
}

/// A gene region with 0-based half-open reference bounds.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Getters)]
pub struct TargetGene {
    name: String,
    begin: u64,
    end: u64,
    #[serde(default)]
    drms: Vec<Drm>,
    #[serde(rename = "expectedMinors", default)]
    minors: Vec<ExpectedMinor>,
}

impl TargetGene {
    pub fn new(name: impl Into<String>, begin: u64, end: u64) -> Self {
        Self { name: name.into(), begin, end, drms: Vec::new(), minors: Vec::new() }
    }
}

/// User-supplied description of the amplicon: gene regions, the DRM catalog,
/// expected minors and an optional reference sequence.
#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Getters)]
pub struct TargetConfig {
    #[serde(default)]
    version: String,
    #[serde(default)]
    dbversion: String,
    #[serde(rename = "referenceName", default)]
    reference_name: String,
    #[serde(rename = "referenceSequence", default)]
    reference_sequence: String,
    #[serde(default)]
    genes: Vec<TargetGene>,
}

impl TargetConfig {
    /// Accepts either a path to a JSON file or an inline JSON literal.
    pub fn load(input: &str) -> Result<Self, ConfigError> {
        if input.trim_start().starts_with('{') {
            Self::from_json(input)
        } else {
            let content = fs::read_to_string(input)
                .map_err(|source| ConfigError::Unreadable { file: input.to_string(), source })?;
            Self::from_json(&content)
        }
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    #[inline]
    pub fn has_reference(&self) -> bool {
        !self.reference_sequence.is_empty()
    }

    /// Reference triplet starting at the 0-based position, None when the
    /// sequence does not cover it.
    pub fn reference_codon(&self, pos: usize) -> Option<&str> {
        self.reference_sequence.get(pos..pos + 3)
    }

    pub fn reference_base(&self, pos: usize) -> Option<char> {
        self.reference_sequence.as_bytes().get(pos).map(|x| *x as char)
    }

    pub fn expected_minor_count(&self) -> usize {
        self.genes.iter().map(|x| x.minors.len()).sum()
    }

    /// Names of all drugs whose catalog contains the given mutation within
    /// the named gene, joined with " + ". Empty when nothing matches.
    pub fn find_drms(&self, gene: &str, refaa: char, pos: u32, curaa: char) -> String {
        let mut summary = String::new();
        if let Some(gene) = self.genes.iter().find(|x| x.name == gene) {
            for drm in &gene.drms {
                if drm.positions.iter().any(|x| x.matches(refaa, pos, curaa)) {
                    if !summary.is_empty() {
                        summary += " + ";
                    }
                    summary += &drm.name;
                }
            }
        }
        summary
    }
}
