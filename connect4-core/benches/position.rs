use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use connect4_core::{perft, Player, Position};

/// Mid-game position with several partly filled columns.
const MIDGAME: &str = "3323441155";

fn bench_make_undo(c: &mut Criterion) {
    let mut position: Position = MIDGAME.parse().unwrap();
    c.bench_function("make_undo_all_columns", |b| {
        b.iter(|| {
            for column in position.list_moves() {
                position.make_move_unchecked(black_box(column));
                position.undo_move_unchecked();
            }
        })
    });
}

fn bench_is_win(c: &mut Criterion) {
    let position: Position = MIDGAME.parse().unwrap();
    let mask = position.mask(Player::One);
    c.bench_function("is_win", |b| b.iter(|| Position::is_win(black_box(mask))));
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.sample_size(10);

    for depth in [5usize, 6] {
        let mut position = Position::new();
        let expected = perft(&mut position, depth).leaves;
        group.throughput(Throughput::Elements(expected));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let counts = perft(&mut position, black_box(depth));
                assert_eq!(counts.leaves, expected);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_make_undo, bench_is_win, bench_perft);
criterion_main!(benches);
