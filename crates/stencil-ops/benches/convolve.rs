//! Kernel throughput: serial vs rayon over a full tile.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use stencil_core::{PixelMode, TileBuffer};
use stencil_ops::{Filter3x3, OverflowPolicy};

fn patterned(rows: usize, cols: usize, mode: PixelMode) -> TileBuffer {
    let mut tile = TileBuffer::new(rows, cols, mode).unwrap();
    for i in 1..=rows {
        for (j, cell) in tile.interior_row_mut(i).iter_mut().enumerate() {
            *cell = (i * 131 + j * 37) as u8;
        }
    }
    tile
}

fn bench_convolve(c: &mut Criterion) {
    let filter = Filter3x3::gaussian();

    for (name, mode) in [("grey", PixelMode::Grey), ("rgb", PixelMode::Rgb)] {
        let src = patterned(512, 512, mode);
        let mut dst = TileBuffer::new(512, 512, mode).unwrap();

        c.bench_function(&format!("convolve_512_{name}_serial"), |b| {
            b.iter(|| {
                stencil_ops::convolve_region(
                    black_box(&src),
                    &mut dst,
                    1..=512,
                    1..=512,
                    &filter,
                    OverflowPolicy::Clamp,
                );
            })
        });

        c.bench_function(&format!("convolve_512_{name}_parallel"), |b| {
            b.iter(|| {
                stencil_ops::parallel::convolve_region(
                    black_box(&src),
                    &mut dst,
                    1..=512,
                    1..=512,
                    &filter,
                    OverflowPolicy::Clamp,
                );
            })
        });
    }
}

criterion_group!(benches, bench_convolve);
criterion_main!(benches);
