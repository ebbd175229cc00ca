use criterion::{black_box, criterion_group, criterion_main, Criterion};
use voxcheck_audio::Waveform;
use voxcheck_detect::extract;

fn make_sine(freq_hz: f64, n_samples: usize, sample_rate: u32) -> Waveform {
    let samples: Vec<f32> = (0..n_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (freq_hz * 2.0 * std::f64::consts::PI * t).sin() as f32 * 0.6
        })
        .collect();
    Waveform::new(samples, sample_rate)
}

fn bench_extract_1s(c: &mut Criterion) {
    let wav = make_sine(220.0, 16000, 16000);
    c.bench_function("detect_extract_1s", |b| {
        b.iter(|| {
            let _ = black_box(extract(black_box(&wav)));
        });
    });
}

fn bench_extract_4s(c: &mut Criterion) {
    let wav = make_sine(220.0, 64000, 16000);
    c.bench_function("detect_extract_4s", |b| {
        b.iter(|| {
            let _ = black_box(extract(black_box(&wav)));
        });
    });
}

criterion_group!(benches, bench_extract_1s, bench_extract_4s);
criterion_main!(benches);
