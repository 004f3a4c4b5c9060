use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sweeper_core::*;

fn first_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_reveal");
    for difficulty in Difficulty::ALL {
        let config = difficulty.config();
        let center = (config.rows() / 2, config.cols() / 2);
        group.bench_with_input(BenchmarkId::from_parameter(difficulty), &config, |b, &config| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                let mut board = Board::new(config, seed);
                board.reveal(black_box(center));
                black_box(board.status())
            });
        });
    }
    group.finish();
}

fn open_board(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood_fill_empty");
    for side in [16u8, 64, 255] {
        let config = GameConfig::new((side, side), 0);
        group.bench_with_input(BenchmarkId::from_parameter(side), &config, |b, &config| {
            b.iter(|| {
                let mut board = Board::new(config, 0);
                board.reveal(black_box((0, 0)));
                black_box(board.revealed_count())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, first_reveal, open_board);
criterion_main!(benches);
