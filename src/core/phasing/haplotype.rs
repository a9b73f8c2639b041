use serde::ser::{Serialize, SerializeMap, Serializer};

/// Quality classification bits; a haplotype carrying none of them is clean
/// and reportable.
#[derive(Clone, Copy, Eq, PartialEq, Default, Debug)]
pub struct HaplotypeFlags(u8);

impl HaplotypeFlags {
    pub const WITH_GAP: Self = Self(1);
    pub const WITH_HETERODUPLEX: Self = Self(2);
    pub const PARTIAL: Self = Self(4);
    pub const LOW_COV: Self = Self(8);
    pub const OFFTARGET: Self = Self(16);

    #[inline]
    pub fn add(&mut self, flag: Self) {
        self.0 |= flag.0;
    }

    #[inline]
    pub fn contains(&self, flag: Self) -> bool {
        self.0 & flag.0 != 0
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn bits(&self) -> u8 {
        self.0
    }
}

/// A cluster of reads sharing one exact codon tuple over the variant
/// positions. Soft counts are a reserved extension for fractional collapses
/// and stay zero for now.
#[derive(Clone, PartialEq, Debug)]
pub struct Haplotype {
    name: String,
    read_names: Vec<String>,
    codons: Vec<[u8; 3]>,
    soft_count: f64,
    frequency: f64,
    flags: HaplotypeFlags,
}

impl Haplotype {
    pub fn new(read_name: String, codons: Vec<[u8; 3]>, flags: HaplotypeFlags) -> Self {
        let mut this = Self {
            name: String::new(),
            read_names: vec![read_name],
            codons,
            soft_count: 0.0,
            frequency: 0.0,
            flags,
        };
        this.flag_by_codons();
        this
    }

    fn flag_by_codons(&mut self) {
        for codon in &self.codons {
            if codon.contains(&b'-') {
                self.flags.add(HaplotypeFlags::WITH_GAP);
            }
            if codon.contains(&b'N') {
                self.flags.add(HaplotypeFlags::WITH_HETERODUPLEX);
            }
            if codon.contains(&b' ') {
                self.flags.add(HaplotypeFlags::PARTIAL);
            }
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn read_names(&self) -> &[String] {
        &self.read_names
    }

    #[inline]
    pub fn codons(&self) -> &[[u8; 3]] {
        &self.codons
    }

    #[inline]
    pub fn codon(&self, ind: usize) -> &[u8; 3] {
        &self.codons[ind]
    }

    #[inline]
    pub fn flags(&self) -> HaplotypeFlags {
        self.flags
    }

    #[inline]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Hard read names plus the fractional soft count.
    #[inline]
    pub fn size(&self) -> f64 {
        self.read_names.len() as f64 + self.soft_count
    }

    pub fn add_read(&mut self, name: String) {
        self.read_names.push(name);
    }

    pub fn add_soft_count(&mut self, count: f64) {
        self.soft_count += count;
    }

    pub fn add_flag(&mut self, flag: HaplotypeFlags) {
        self.flags.add(flag);
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }
}

impl Serialize for Haplotype {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let codons: Vec<String> =
            self.codons.iter().map(|x| String::from_utf8_lossy(x).into_owned()).collect();

        let mut map = serializer.serialize_map(Some(6))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("reads_hard", &self.read_names.len())?;
        map.serialize_entry("reads_soft", &self.size())?;
        map.serialize_entry("frequency", &self.frequency)?;
        map.serialize_entry("read_names", &self.read_names)?;
        map.serialize_entry("codons", &codons)?;
        map.end()
    }
}
