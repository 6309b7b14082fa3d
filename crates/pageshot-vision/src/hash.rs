//! 지각 해시 계산.
//!
//! image_hasher의 DCT 전처리 + 평균 비교(pHash 계열) 알고리즘을 사용한다.
//! 해시 비트 수는 `hash_size²`이며 클수록 구별력이 높고 비교 비용이 커진다.

use image::DynamicImage;
use image_hasher::{HashAlg, Hasher, HasherConfig};
use pageshot_core::models::hash::PerceptualHash;

/// 지각 해시 계산기
pub struct PerceptualHasher {
    hasher: Hasher,
    hash_size: u32,
}

impl PerceptualHasher {
    /// `hash_size × hash_size` 비트 해시 계산기
    pub fn new(hash_size: u32) -> Self {
        let hash_size = hash_size.max(2);
        let hasher = HasherConfig::new()
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .hash_size(hash_size, hash_size)
            .to_hasher();
        Self { hasher, hash_size }
    }

    pub fn hash_size(&self) -> u32 {
        self.hash_size
    }

    pub fn hash(&self, image: &DynamicImage) -> PerceptualHash {
        let hash = self.hasher.hash_image(image);
        PerceptualHash::from_bytes(hash.as_bytes().to_vec())
    }
}

impl std::fmt::Debug for PerceptualHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerceptualHasher")
            .field("hash_size", &self.hash_size)
            .finish()
    }
}
