use std::fmt::{Display, Formatter};

use serde::ser::{Serialize, Serializer};

use crate::core::dna::Nuc;

/// Resolved coding triplet over {A, C, G, T}. Anything else (gaps, N,
/// blanks) is not a Codon and must stay a raw symbol array.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Codon([u8; 3]);

impl Codon {
    pub fn new(triplet: [Nuc; 3]) -> Option<Self> {
        if triplet.iter().any(|x| matches!(x, Nuc::Gap | Nuc::N)) {
            None
        } else {
            Some(Self([triplet[0].symbol(), triplet[1].symbol(), triplet[2].symbol()]))
        }
    }

    pub fn from_symbols(symbols: &[u8]) -> Option<Self> {
        if symbols.len() != 3 {
            return None;
        }
        let mut triplet = [Nuc::N; 3];
        for (ind, symbol) in symbols.iter().enumerate() {
            triplet[ind] = Nuc::from_symbol(*symbol)?;
        }
        Self::new(triplet)
    }

    #[inline]
    pub fn symbols(&self) -> &[u8; 3] {
        &self.0
    }

    // Standard genetic code; stops are '*'
    pub fn aminoacid(&self) -> char {
        match &self.0 {
            b"TTT" | b"TTC" => 'F',
            b"TTA" | b"TTG" | b"CTT" | b"CTC" | b"CTA" | b"CTG" => 'L',
            b"ATT" | b"ATC" | b"ATA" => 'I',
            b"ATG" => 'M',
            b"GTT" | b"GTC" | b"GTA" | b"GTG" => 'V',
            b"TCT" | b"TCC" | b"TCA" | b"TCG" | b"AGT" | b"AGC" => 'S',
            b"CCT" | b"CCC" | b"CCA" | b"CCG" => 'P',
            b"ACT" | b"ACC" | b"ACA" | b"ACG" => 'T',
            b"GCT" | b"GCC" | b"GCA" | b"GCG" => 'A',
            b"TAT" | b"TAC" => 'Y',
            b"TAA" | b"TAG" | b"TGA" => '*',
            b"CAT" | b"CAC" => 'H',
            b"CAA" | b"CAG" => 'Q',
            b"AAT" | b"AAC" => 'N',
            b"AAA" | b"AAG" => 'K',
            b"GAT" | b"GAC" => 'D',
            b"GAA" | b"GAG" => 'E',
            b"TGT" | b"TGC" => 'C',
            b"TGG" => 'W',
            b"CGT" | b"CGC" | b"CGA" | b"CGG" | b"AGA" | b"AGG" => 'R',
            b"GGT" | b"GGC" | b"GGA" | b"GGG" => 'G',
            _ => unreachable!("Codon must be constructed from {{A, C, G, T}} symbols only"),
        }
    }
}

impl Display for Codon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.0[0] as char, self.0[1] as char, self.0[2] as char)
    }
}

impl Serialize for Codon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_symbols() {
        assert_eq!(Codon::from_symbols(b"ACG").unwrap().to_string(), "ACG");
        assert_eq!(Codon::from_symbols(b"tga").unwrap().to_string(), "TGA");

        for rejected in [&b"AC-"[..], b"NAA", b"A A", b"AC", b"ACGT", b"RGA", b""] {
            assert!(Codon::from_symbols(rejected).is_none());
        }
    }

    #[test]
    fn translation_is_total() {
        let alphabet = [b'A', b'C', b'G', b'T'];
        let mut aminoacids = std::collections::HashSet::new();
        let mut total = 0;
        for first in alphabet {
            for second in alphabet {
                for third in alphabet {
                    let codon = Codon::from_symbols(&[first, second, third]).unwrap();
                    aminoacids.insert(codon.aminoacid());
                    total += 1;
                }
            }
        }
        assert_eq!(total, 64);
        // 20 aminoacids + stop
        assert_eq!(aminoacids.len(), 21);
    }

    #[test]
    fn translation() {
        for (codon, protein) in
            [(&b"ATG"[..], 'M'), (b"AAA", 'K'), (b"AAC", 'N'), (b"TGG", 'W'), (b"TAA", '*'), (b"AGA", 'R')]
        {
            assert_eq!(Codon::from_symbols(codon).unwrap().aminoacid(), protein);
        }
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut codons =
            vec![Codon::from_symbols(b"TTT").unwrap(), Codon::from_symbols(b"AAC").unwrap(), Codon::from_symbols(b"AAA").unwrap()];
        codons.sort();
        assert_eq!(codons.iter().map(|x| x.to_string()).collect::<Vec<_>>(), vec!["AAA", "AAC", "TTT"]);
    }
}
