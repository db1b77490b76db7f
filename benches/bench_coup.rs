use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use coup_engine::{DecisionProvider, GameConfig, RandomBot, TurnEngine};

fn complete_game(num_players: u64) {
    let seats = (0..num_players)
        .map(|seed| (format!("bot{seed}"), Box::new(RandomBot::new(seed)) as Box<dyn DecisionProvider>))
        .collect();
    let mut coup = black_box(TurnEngine::new(GameConfig::default().with_max_rounds(Some(1000)), seats).unwrap());

    coup.play_game().unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("complete_game");
    for num_players in 3..=6u64 {
        group.bench_with_input(BenchmarkId::from_parameter(num_players), &num_players, |b, &num_players| {
            b.iter(|| complete_game(num_players))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
