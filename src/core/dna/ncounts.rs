use std::ops::{Index, IndexMut};

use derive_more::{Add, AddAssign};
use serde::Serialize;

use crate::core::dna::Nuc;

/// Per-column tallies for the six pileup tags.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Add, AddAssign, Default, Serialize)]
#[allow(non_snake_case)]
pub struct NucCounts {
    pub A: u32,
    pub C: u32,
    pub G: u32,
    pub T: u32,
    #[serde(rename = "-")]
    pub Gap: u32,
    pub N: u32,
}

impl NucCounts {
    #[inline]
    pub fn zeros() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment(&mut self, nuc: Nuc) {
        self[nuc] += 1;
    }

    #[inline]
    pub fn coverage(&self) -> u32 {
        self.A + self.C + self.G + self.T + self.Gap + self.N
    }

    /// Most frequent tag; ties resolve to the leftmost in {A, C, G, T, -, N}.
    #[inline]
    pub fn mostfreq(&self) -> (Nuc, u32) {
        let mut argmax = Nuc::A;
        for nuc in Nuc::ALL {
            if self[nuc] > self[argmax] {
                argmax = nuc;
            }
        }
        (argmax, self[argmax])
    }
}

impl Index<Nuc> for NucCounts {
    type Output = u32;

    #[inline]
    fn index(&self, index: Nuc) -> &Self::Output {
        match index {
            Nuc::A => &self.A,
            Nuc::C => &self.C,
            Nuc::G => &self.G,
            Nuc::T => &self.T,
            Nuc::Gap => &self.Gap,
            Nuc::N => &self.N,
        }
    }
}

impl IndexMut<Nuc> for NucCounts {
    #[inline]
    fn index_mut(&mut self, index: Nuc) -> &mut Self::Output {
        match index {
            Nuc::A => &mut self.A,
            Nuc::C => &mut self.C,
            Nuc::G => &mut self.G,
            Nuc::T => &mut self.T,
            Nuc::Gap => &mut self.Gap,
            Nuc::N => &mut self.N,
        }
    }
}
