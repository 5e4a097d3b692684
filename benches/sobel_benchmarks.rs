// benches/sobel_benchmarks.rs — CPU reference vs GPU kernel.
//
//   cargo bench --bench sobel_benchmarks
//
// The GPU numbers are wall time for upload + dispatch + readback, which is
// what one CLI invocation pays. The first iterations include pipeline JIT on
// some drivers, hence the explicit warm-up. On machines without a compute
// adapter only the CPU group runs.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use sobel_filter::gpu::{GpuDevice, GpuImage, GpuSobelFilter, KernelConfig};
use sobel_filter::gradient::sobel_magnitude;
use sobel_filter::image::{Image, Rgba8};

const SIZES: [(usize, usize); 3] = [(320, 240), (752, 480), (1920, 1080)];

fn make_scene(w: usize, h: usize) -> Image<Rgba8> {
    let mut img = Image::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let base = ((x * 200 / w) + (y * 55 / h)) as u8;
            img.set(x, y, Rgba8::new(base, base / 2, 255 - base, 255));
        }
    }
    for rect in 0..6 {
        let rx = (50 + rect * 100) % w;
        let ry = (40 + (rect % 3) * 120) % h;
        for y in ry..(ry + 60).min(h) {
            for x in rx..(rx + 80).min(w) {
                img.set(x, y, Rgba8::gray(180 + rect as u8 * 10));
            }
        }
    }
    img
}

fn bench_cpu(c: &mut Criterion) {
    let mut group = c.benchmark_group("sobel_cpu");
    for (w, h) in SIZES {
        let img = make_scene(w, h);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{w}x{h}")), &img, |b, img| {
            b.iter(|| sobel_magnitude(img));
        });
    }
    group.finish();
}

fn bench_gpu(c: &mut Criterion) {
    let gpu = match GpuDevice::new() {
        Ok(gpu) => gpu,
        Err(e) => {
            eprintln!("[sobel_benchmarks] skipping GPU group: {e}");
            return;
        }
    };
    let filter = match GpuSobelFilter::new(&gpu, &KernelConfig::default()) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("[sobel_benchmarks] skipping GPU group: {e}");
            return;
        }
    };

    let mut group = c.benchmark_group("sobel_gpu");
    group.warm_up_time(Duration::from_secs(2));
    for (w, h) in SIZES {
        let img = make_scene(w, h);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{w}x{h}")), &img, |b, img| {
            b.iter(|| {
                let input = GpuImage::upload(&gpu, img).unwrap();
                filter.run(&gpu, &input).unwrap().readback(&gpu).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cpu, bench_gpu);
criterion_main!(benches);
