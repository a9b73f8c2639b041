use std::fmt::{Display, Formatter};

// Order matters: ties in per-column counts resolve to the leftmost tag
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Nuc {
    A,
    C,
    G,
    T,
    Gap,
    N,
}

impl Nuc {
    pub const ALL: [Nuc; 6] = [Nuc::A, Nuc::C, Nuc::G, Nuc::T, Nuc::Gap, Nuc::N];

    #[inline]
    pub fn from_symbol(symbol: u8) -> Option<Self> {
        match symbol {
            b'A' | b'a' => Some(Nuc::A),
            b'C' | b'c' => Some(Nuc::C),
            b'G' | b'g' => Some(Nuc::G),
            b'T' | b't' => Some(Nuc::T),
            b'-' => Some(Nuc::Gap),
            b'N' | b'n' => Some(Nuc::N),
            _ => None,
        }
    }

    #[inline]
    pub fn symbol(&self) -> u8 {
        match self {
            Nuc::A => b'A',
            Nuc::C => b'C',
            Nuc::G => b'G',
            Nuc::T => b'T',
            Nuc::Gap => b'-',
            Nuc::N => b'N',
        }
    }

    #[inline]
    pub fn is_gap(&self) -> bool {
        matches!(self, Nuc::Gap)
    }
}

impl Display for Nuc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol() as char)
    }
}
