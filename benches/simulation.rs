//! Tick throughput of a busy session.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use archer_survival::game::config::GameConfig;
use archer_survival::game::input::InputFrame;
use archer_survival::game::tick::SimulationLoop;
use archer_survival::TICK_MS;

/// Fast spawns and a tough actor keep the collections populated.
fn busy_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.spawn.interval_ms = 100;
    config.actor.max_health = 1.0e9;
    config.actor.fire_interval_ms = 50;
    config
}

fn warmed_session(ticks: u32) -> SimulationLoop {
    let mut session = SimulationLoop::new(busy_config(), 42);
    let input = InputFrame::with_movement(0, 1).firing();
    for t in 0..ticks {
        session.update(&input, u64::from(t) * TICK_MS);
    }
    session
}

fn bench_tick(c: &mut Criterion) {
    let input = InputFrame::with_movement(0, -1).firing();

    c.bench_function("tick_busy_session", |b| {
        b.iter_batched(
            || warmed_session(1200),
            |mut session| {
                for t in 1200..1260u32 {
                    black_box(session.update(&input, u64::from(t) * TICK_MS));
                }
                session
            },
            BatchSize::SmallInput,
        )
    });

    let session = warmed_session(1200);
    c.bench_function("state_hash", |b| b.iter(|| black_box(session.compute_hash())));
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
