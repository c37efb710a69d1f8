use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use mini_crazyhouse::game_state::chess_rules::STARTING_POSITION;
use mini_crazyhouse::game_state::game_state::GameState;
use mini_crazyhouse::move_generation::legal_move_generator::MiniCrazyhouseRules;
use mini_crazyhouse::move_generation::perft::perft;

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    fen: &'static str,
    max_depth: u8,
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "startpos",
        fen: STARTING_POSITION,
        max_depth: 3,
    },
    BenchCase {
        name: "hands",
        fen: "2bnrk/5p/6/6/P5/KRNB2 w Nn",
        max_depth: 2,
    },
    BenchCase {
        name: "promotion",
        fen: "4k1/P5/6/6/5p/K5 w -",
        max_depth: 3,
    },
];

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    for case in CASES {
        let game = GameState::from_fen(case.fen).expect("benchmark position should parse");

        for depth in 1..=case.max_depth {
            // Counts from the warmup run guard every timed run.
            let expected = perft(&MiniCrazyhouseRules, &game, depth)
                .expect("perft should run")
                .nodes;

            group.throughput(Throughput::Elements(expected));
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{}_d{}", case.name, depth)),
                &expected,
                |b, expected| {
                    b.iter(|| {
                        let count = perft(&MiniCrazyhouseRules, black_box(&game), black_box(depth))
                            .expect("perft benchmark run should succeed");
                        assert_eq!(count.nodes, *expected);
                        black_box(count.nodes)
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(perft_benches, bench_perft);
criterion_main!(perft_benches);
