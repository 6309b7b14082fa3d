//! 지각 해시 값.
//!
//! 계산은 `pageshot-vision`이 담당하고, 여기서는 비교 연산만 정의한다.

use serde::{Deserialize, Serialize};

/// 고정 비트 길이 지각 해시
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerceptualHash {
    bytes: Vec<u8>,
}

impl PerceptualHash {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 비트 길이
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8
    }

    /// 해밍 거리
    ///
    /// 길이가 다른 해시(설정 변경 전후)는 남는 바이트의 모든 비트를 다른 것으로 센다.
    /// 따라서 `distance(a, b) == distance(b, a)`가 항상 성립한다.
    pub fn distance(&self, other: &PerceptualHash) -> u32 {
        let common: u32 = self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        let extra = self.bytes.len().abs_diff(other.bytes.len()) as u32 * 8;
        common + extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_distance_is_zero() {
        let h = PerceptualHash::from_bytes(vec![0b1010_1010, 0xFF, 0x00]);
        assert_eq!(h.distance(&h), 0);
    }

    #[test]
    fn distance_counts_differing_bits() {
        let a = PerceptualHash::from_bytes(vec![0b0000_0000, 0b1111_0000]);
        let b = PerceptualHash::from_bytes(vec![0b0000_0111, 0b1111_0001]);
        assert_eq!(a.distance(&b), 4);
        assert_eq!(b.distance(&a), 4);
    }

    #[test]
    fn length_mismatch_is_symmetric() {
        let short = PerceptualHash::from_bytes(vec![0xFF]);
        let long = PerceptualHash::from_bytes(vec![0xFF, 0x00, 0x00]);
        assert_eq!(short.distance(&long), 16);
        assert_eq!(long.distance(&short), 16);
    }

    #[test]
    fn bit_len() {
        assert_eq!(PerceptualHash::from_bytes(vec![0; 32]).bit_len(), 256);
    }
}
