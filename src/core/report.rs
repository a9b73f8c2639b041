use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::calling::{CallOutcome, PerformanceMetrics};
use crate::core::phasing::Phasing;

/// Root JSON document. Genes without reported variants are dropped and
/// the haplotype sections appear only when phasing ran.
pub struct Report<'a> {
    outcome: &'a CallOutcome,
    phasing: Option<&'a Phasing>,
}

impl<'a> Report<'a> {
    pub fn new(outcome: &'a CallOutcome, phasing: Option<&'a Phasing>) -> Self {
        Self { outcome, phasing }
    }
}

impl Serialize for Report<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let genes: Vec<_> = self.outcome.genes().iter().filter(|x| x.has_variants()).collect();

        let entries = if self.phasing.is_some() { 3 } else { 1 };
        let mut map = serializer.serialize_map(Some(entries))?;
        map.serialize_entry("genes", &genes)?;
        if let Some(phasing) = self.phasing {
            map.serialize_entry("haplotypes", phasing.haplotypes())?;
            map.serialize_entry("haplotype_read_counts", phasing.counts())?;
        }
        map.end()
    }
}

/// Default report path: the input with its extension swapped for json.
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("json")
}

pub fn save_json(outcome: &CallOutcome, phasing: Option<&Phasing>, saveto: &Path) -> serde_json::Result<()> {
    let mut writer = BufWriter::new(File::create(saveto).map_err(serde_json::Error::io)?);
    serde_json::to_writer_pretty(&mut writer, &Report::new(outcome, phasing))?;
    writer.flush().map_err(serde_json::Error::io)
}

pub fn save_performance(metrics: &PerformanceMetrics, saveto: &Path) -> serde_json::Result<()> {
    let mut writer = BufWriter::new(File::create(saveto).map_err(serde_json::Error::io)?);
    serde_json::to_writer_pretty(&mut writer, metrics)?;
    writer.flush().map_err(serde_json::Error::io)
}
