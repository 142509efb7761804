use criterion::{criterion_group, criterion_main, Criterion};
use detpost::{
    suppress, ClassLabels, DecodeConfig, Decoder, Detection, DisplayBox, ModelInput, ScaleContext,
};
use std::hint::black_box;

/// Deterministic YOLO-like output: `rows` anchors, a few of them confident.
fn make_output(rows: usize, num_classes: usize) -> Vec<f32> {
    let cols = 5 + num_classes;
    let mut data = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        let grid = (i % 40) as f32 * 8.0;
        let line = ((i / 40) % 40) as f32 * 8.0;
        data.extend_from_slice(&[grid + 4.0, line + 4.0, 24.0, 32.0]);
        let obj = if i % 7 == 0 { 0.9 } else { ((i * 31) % 100) as f32 / 400.0 };
        data.push(obj);
        for c in 0..num_classes {
            let p = (((i + c * 13) * 17) % 100) as f32 / 100.0;
            data.push(p);
        }
    }
    data
}

fn make_detections(count: usize) -> Vec<Detection> {
    (0..count)
        .map(|i| {
            let x = ((i * 37) % 600) as i32;
            let y = ((i * 53) % 400) as i32;
            Detection {
                class_index: i % 80,
                score: ((i * 7919) % 1000) as f32 / 1000.0,
                bbox: DisplayBox::new(x, y, x + 40, y + 60),
            }
        })
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let labels = ClassLabels::new((0..80).map(|i| format!("class{i}")).collect()).unwrap();
    let raw = make_output(6300, 80);
    let scale = ScaleContext::new(2.0, 1.5, 1.0, 1.0, 0.0, 0.0);

    let decoder = Decoder::new(labels.clone(), ModelInput::default(), DecodeConfig::default())
        .unwrap();
    c.bench_function("decode_per_class_6300x85", |b| {
        b.iter(|| black_box(decoder.decode(black_box(&raw), &scale).unwrap()));
    });

    if cfg!(feature = "rayon") {
        let parallel = Decoder::new(
            labels,
            ModelInput::default(),
            DecodeConfig {
                parallel: true,
                ..DecodeConfig::default()
            },
        )
        .unwrap();
        c.bench_function("decode_per_class_6300x85_parallel", |b| {
            b.iter(|| black_box(parallel.decode(black_box(&raw), &scale).unwrap()));
        });
    }
}

fn bench_suppress(c: &mut Criterion) {
    let detections = make_detections(1000);
    c.bench_function("suppress_1000", |b| {
        b.iter(|| black_box(suppress(detections.clone(), 100, 0.45)));
    });
}

criterion_group!(benches, bench_decode, bench_suppress);
criterion_main!(benches);
