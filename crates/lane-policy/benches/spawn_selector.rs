use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lane_core::{GridLocation, MatchConfig, StationaryKind};
use lane_policy::{least_damage_spawn, DamageModel};
use lane_sim::Sandbox;

fn bench_spawn_selector(c: &mut Criterion) {
    let config = MatchConfig::standard();
    let mut sb = Sandbox::new(config.clone());
    for x in (2..26).step_by(3) {
        sb.place_enemy(StationaryKind::Turret, GridLocation::new(x, 15), x % 2 == 0);
    }
    for x in (1..27).step_by(4) {
        sb.place_friendly(StationaryKind::Wall, GridLocation::new(x, 12));
    }
    let candidates: Vec<GridLocation> = [[13, 0], [14, 0], [3, 10], [24, 10], [8, 5], [19, 5]]
        .into_iter()
        .map(GridLocation::from)
        .collect();

    c.bench_function("lane-policy/least_damage_spawn(candidates=6)", |b| {
        b.iter(|| {
            let best = least_damage_spawn(
                black_box(&sb),
                &config,
                DamageModel::PerAttacker,
                black_box(&candidates),
            )
            .expect("sandbox is available");
            black_box(best);
        })
    });
}

criterion_group!(benches, bench_spawn_selector);
criterion_main!(benches);
