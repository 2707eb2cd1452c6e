use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use kicksim_core::{Settings, SimplePlayer, Simulator, TeamSide};

fn simple_match(players: usize, ticks_per_time: u32) -> Simulator {
    Simulator::builder(
        SimplePlayer::team(players, TeamSide::Team1),
        SimplePlayer::team(players, TeamSide::Team2),
    )
    .seed(0xBEEF)
    .settings(Settings::default().with_ticks_per_time(ticks_per_time))
    .build()
    .expect("default settings are valid")
}

fn bench_full_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_match");
    group.sample_size(20);
    for players in [2usize, 4, 6] {
        group.bench_function(format!("players{players}_ticks600"), |b| {
            b.iter_batched(
                || simple_match(players, 300),
                |mut sim| {
                    let env = sim.play_match();
                    black_box((env.score1, env.score2));
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_single_tick(c: &mut Criterion) {
    let mut sim = simple_match(4, 3000);
    c.bench_function("step_4v4", |b| {
        b.iter(|| {
            if !sim.step_if_playing() {
                sim = simple_match(4, 3000);
            }
        })
    });
}

criterion_group!(benches, bench_full_match, bench_single_tick);
criterion_main!(benches);
