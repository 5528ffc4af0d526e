//! Benchmarks for plan persistence and model reply parsing
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fitlife::ai::parse_json_reply;
use fitlife::models::{WorkoutDay, WorkoutExercise, WorkoutPlan};
use fitlife::store::{KeyValueBackend, LocalStore, MemoryBackend, SqliteBackend};
use std::sync::Arc;
use tempfile::tempdir;

fn sample_plan(days: usize) -> WorkoutPlan {
    WorkoutPlan {
        id: "wp-bench".to_string(),
        name: "Bench Plan".to_string(),
        description: Some("Full body strength".to_string()),
        days: (0..days)
            .map(|d| WorkoutDay {
                day: format!("Day {}", d + 1),
                focus: "Full Body".to_string(),
                exercises: (0..6)
                    .map(|i| WorkoutExercise {
                        exercise_id: format!("ex{}", i),
                        name: format!("Exercise {}", i),
                        sets: "3".to_string(),
                        reps: "8-12".to_string(),
                        rest: "60s".to_string(),
                        video_url: None,
                    })
                    .collect(),
                estimated_duration_minutes: Some(45),
            })
            .collect(),
        ..Default::default()
    }
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");
    let plans: Vec<WorkoutPlan> = (0..10).map(|_| sample_plan(5)).collect();

    let dir = tempdir().unwrap();
    let backends: Vec<(&str, Arc<dyn KeyValueBackend>)> = vec![
        ("memory", Arc::new(MemoryBackend::new())),
        (
            "sqlite",
            Arc::new(SqliteBackend::open(dir.path().join("bench.db")).unwrap()),
        ),
    ];

    for (name, backend) in backends {
        let store = LocalStore::new(backend);

        group.bench_function(format!("save_history_{}", name), |b| {
            b.iter(|| store.save("saved_workout_plans", black_box(&plans), Some("user-bench")))
        });

        store.save("saved_workout_plans", &plans, Some("user-bench"));

        group.bench_function(format!("load_history_{}", name), |b| {
            b.iter(|| {
                let loaded: Option<Vec<WorkoutPlan>> =
                    store.load(black_box("saved_workout_plans"), Some("user-bench"));
                loaded.unwrap()
            })
        });
    }

    group.finish();
}

fn bench_parse_reply(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_reply");

    for days in [1, 7] {
        let json = serde_json::to_string_pretty(&sample_plan(days)).unwrap();
        let fenced = format!("```json\n{}\n```", json);

        group.throughput(Throughput::Bytes(fenced.len() as u64));
        group.bench_function(format!("fenced_plan_{}_days", days), |b| {
            b.iter(|| parse_json_reply::<WorkoutPlan>(black_box(&fenced)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_store, bench_parse_reply);
criterion_main!(benches);
