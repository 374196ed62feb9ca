//! Горячие чистые проверки: пересечение окон сеансов и валидация набора мест.
//!
//! Run with: `cargo bench --bench overlap`

use chrono::NaiveTime;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cinema_booking::{models::ShowWindow, services::reservation::validate_seat_ids};

fn window(start: (u32, u32), end: (u32, u32)) -> ShowWindow {
    ShowWindow::new(
        NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
    )
    .unwrap()
}

fn bench_overlap(c: &mut Criterion) {
    let evening = window((18, 0), (20, 0));
    let touching = window((20, 0), (21, 30));
    let later = window((20, 1), (22, 0));

    c.bench_function("overlap_touching", |b| {
        b.iter(|| black_box(&evening).overlaps(black_box(&touching)))
    });
    c.bench_function("overlap_disjoint", |b| {
        b.iter(|| black_box(&evening).overlaps(black_box(&later)))
    });

    // Один день экрана: 23 сеанса по 50 минут против нового окна
    let day: Vec<ShowWindow> = (0..23).map(|h| window((h, 0), (h, 50))).collect();
    c.bench_function("overlap_day_scan", |b| {
        b.iter(|| day.iter().any(|w| w.overlaps(black_box(&later))))
    });
}

fn bench_seat_validation(c: &mut Criterion) {
    let small: Vec<i64> = (1..=4).collect();
    let large: Vec<i64> = (1..=500).collect();

    c.bench_function("validate_4_seats", |b| {
        b.iter(|| validate_seat_ids(black_box(&small)))
    });
    c.bench_function("validate_500_seats", |b| {
        b.iter(|| validate_seat_ids(black_box(&large)))
    });
}

criterion_group!(benches, bench_overlap, bench_seat_validation);
criterion_main!(benches);
