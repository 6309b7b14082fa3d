//! pageshot-vision 성능 벤치마크
//!
//! 실행: cargo bench -p pageshot-vision
//!
//! 벤치마크 대상:
//! - 지각 해시 계산 (hash_size별)
//! - 중복 인덱스 선형 탐색
//! - 변환 파이프라인 + 인코딩

use std::hint::black_box;

use chrono::Local;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{DynamicImage, Rgba, RgbaImage};
use pageshot_core::config::{OutputConfig, OutputFormat, TransformConfig};
use pageshot_core::models::document::DocumentId;
use pageshot_core::models::hash::PerceptualHash;
use pageshot_vision::hash::PerceptualHasher;
use pageshot_vision::similarity::SimilarityIndex;
use pageshot_vision::transform::TransformPipeline;

/// 문서 페이지 흉내 이미지 (텍스트 줄 + 여백)
fn create_page(width: u32, height: u32, seed: u32) -> DynamicImage {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([250, 250, 250, 255]));
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let line = (y + seed * 7) / 14;
        let in_text = (y + seed * 7) % 14 < 9 && x > width / 10 && x < width - width / 10;
        if in_text && (x / 6 + line + seed) % 5 != 0 {
            *pixel = Rgba([30, 30, 30, 255]);
        }
    }
    DynamicImage::ImageRgba8(img)
}

/// 지각 해시 벤치마크
fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("perceptual_hash");
    let img = create_page(1280, 1600, 1);

    for hash_size in [8u32, 16, 32] {
        let hasher = PerceptualHasher::new(hash_size);
        group.bench_with_input(
            BenchmarkId::new("hash", format!("{hash_size}x{hash_size}")),
            &img,
            |b, img| {
                b.iter(|| black_box(hasher.hash(img)));
            },
        );
    }

    group.finish();
}

/// 중복 탐색 벤치마크 (문서당 기록 수별)
fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_index");
    let doc = DocumentId::normalize("Report.pdf", 50);

    for recorded in [10usize, 100, 1000] {
        let mut index = SimilarityIndex::new();
        for i in 0..recorded {
            let bytes: Vec<u8> = (0..32).map(|j| (i * 31 + j * 7) as u8).collect();
            index.record(PerceptualHash::from_bytes(bytes), &doc);
        }
        // 어떤 기록과도 멀리 떨어진 해시 (전체 탐색)
        let probe = PerceptualHash::from_bytes(vec![0xA5; 32]);

        group.throughput(Throughput::Elements(recorded as u64));
        group.bench_with_input(BenchmarkId::new("is_duplicate", recorded), &index, |b, index| {
            b.iter(|| black_box(index.is_duplicate(&probe, &doc, 0)));
        });
    }

    group.finish();
}

/// 변환 파이프라인 벤치마크
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform_pipeline");
    let (width, height) = (1920, 1080);
    let frame = create_page(width, height, 3);
    let now = Local::now();

    let mut transform = TransformConfig::default();
    transform.scale_percent = 75;
    transform.border.enabled = true;
    transform.watermark.enabled = true;

    group.throughput(Throughput::Elements((width * height) as u64));

    for format in [OutputFormat::Png, OutputFormat::Jpeg, OutputFormat::Webp] {
        let output = OutputConfig {
            format,
            ..OutputConfig::default()
        };
        group.bench_function(BenchmarkId::new("run", format.extension()), |b| {
            b.iter(|| {
                black_box(
                    TransformPipeline::new()
                        .run(frame.clone(), &transform, &output, now)
                        .ok(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hash, bench_similarity, bench_pipeline);
criterion_main!(benches);
