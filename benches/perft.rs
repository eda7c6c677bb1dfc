use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use marbit::{parallel_perft, search::search, Position, STARTING_FEN};

struct BenchCase {
    name: &'static str,
    fen: &'static str,
    depth: u32,
    expected_nodes: u64,
}

const CASES: &[BenchCase] = &[
    BenchCase { name: "startpos", fen: STARTING_FEN, depth: 4, expected_nodes: 197_281 },
    BenchCase {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depth: 3,
        expected_nodes: 97_862,
    },
    BenchCase { name: "endgame", fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", depth: 5, expected_nodes: 674_624 },
];

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    for case in CASES {
        let pos = Position::from_fen(case.fen).unwrap();
        assert_eq!(pos.clone().perft(case.depth), case.expected_nodes, "{}", case.name);
        group.throughput(Throughput::Elements(case.expected_nodes));
        group.bench_with_input(BenchmarkId::new("serial", case.name), &pos, |b, pos| {
            b.iter(|| pos.clone().perft(black_box(case.depth)))
        });
        group.bench_with_input(BenchmarkId::new("parallel", case.name), &pos, |b, pos| {
            b.iter(|| parallel_perft(pos, black_box(case.depth)))
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    for case in CASES {
        let pos = Position::from_fen(case.fen).unwrap();
        group.bench_with_input(BenchmarkId::new("depth_5", case.name), &pos, |b, pos| {
            b.iter(|| search(pos, black_box(5), None))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_perft, bench_search);
criterion_main!(benches);
