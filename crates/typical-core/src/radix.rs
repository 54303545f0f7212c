use std::cmp::Ordering;

use voracious_radix_sort::Radixable;

/// Token index, raw score and typicality, keyed by `(typicality, index)`.
///
/// The key is unique per token, so any radix sort orders ties by ascending index.
#[derive(Copy, Clone, Debug)]
pub struct TypicalityWithIndex {
    pub key: u64,
    pub index: usize,
    pub score: f32,
    pub typicality: f32,
}

impl TypicalityWithIndex {
    /// `index` must fit in 32 bits.
    pub fn new(index: usize, score: f32, typicality: f32) -> Self {
        let key = (u64::from(ordered_bits(typicality)) << 32) | index as u64;
        Self {
            key,
            index,
            score,
            typicality,
        }
    }
}

/// Map a float to bits whose unsigned order matches `f32::total_cmp`.
#[inline]
fn ordered_bits(x: f32) -> u32 {
    let bits = x.to_bits();
    match bits >> 31 {
        0 => bits | 0x8000_0000,
        _ => !bits,
    }
}

impl PartialOrd for TypicalityWithIndex {
    fn partial_cmp(&self, other: &TypicalityWithIndex) -> Option<Ordering> {
        self.key.partial_cmp(&other.key)
    }
}

impl PartialEq for TypicalityWithIndex {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Radixable<u64> for TypicalityWithIndex {
    type Key = u64;
    #[inline]
    fn key(&self) -> Self::Key {
        self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_follow_total_order() {
        let values = [
            f32::NEG_INFINITY,
            -2.5,
            -0.0,
            0.0,
            1e-30,
            0.25,
            3.0,
            f32::INFINITY,
        ];
        for pair in values.windows(2) {
            assert!(ordered_bits(pair[0]) < ordered_bits(pair[1]), "{pair:?}");
        }
    }

    #[test]
    fn index_breaks_ties() {
        let a = TypicalityWithIndex::new(3, 0.0, 0.5);
        let b = TypicalityWithIndex::new(7, 0.0, 0.5);
        let c = TypicalityWithIndex::new(0, 0.0, 0.75);
        assert!(a < b);
        assert!(b < c);
    }
}
