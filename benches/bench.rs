// Criterion benchmarks for peermatch

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use peermatch::core::{cosine_similarity, reduce, InterestMatrix, PeerMatcher};
use peermatch::models::{InterestAssignment, INTEREST_VOCABULARY};

fn synthetic_assignments(students: usize, interests_per_student: usize) -> Vec<InterestAssignment> {
    let vocabulary_len = INTEREST_VOCABULARY.len();
    let mut assignments = Vec::new();

    for student in 0..students {
        for offset in 0..interests_per_student {
            assignments.push(InterestAssignment {
                student_id: student as i64 + 1,
                interest: INTEREST_VOCABULARY[(student * 7 + offset) % vocabulary_len].to_string(),
            });
        }
    }

    assignments
}

fn bench_cosine_similarity(c: &mut Criterion) {
    let a = [0.12, 0.87, 0.33, 0.54, 0.91];
    let b = [0.45, 0.23, 0.78, 0.11, 0.66];

    c.bench_function("cosine_similarity", |bench| {
        bench.iter(|| cosine_similarity(black_box(&a), black_box(&b)));
    });
}

fn bench_build_matrix(c: &mut Criterion) {
    let assignments = synthetic_assignments(500, 4);

    c.bench_function("build_matrix_500_students", |bench| {
        bench.iter(|| InterestMatrix::from_assignments(black_box(&assignments)));
    });
}

fn bench_reduce(c: &mut Criterion) {
    let assignments = synthetic_assignments(500, 4);
    let matrix = InterestMatrix::from_assignments(&assignments);

    c.bench_function("reduce_500_students", |bench| {
        bench.iter(|| reduce(black_box(&matrix), black_box(5)));
    });
}

fn bench_matching(c: &mut Criterion) {
    let matcher = PeerMatcher::with_default_dimensions();

    let mut group = c.benchmark_group("matching");

    for student_count in [10, 50, 100, 500, 1000].iter() {
        let assignments = synthetic_assignments(*student_count, 4);

        group.bench_with_input(
            BenchmarkId::new("find_peers", student_count),
            student_count,
            |bench, _| {
                bench.iter(|| {
                    matcher.find_peers(black_box(&assignments), black_box(1), black_box(5))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_cosine_similarity,
    bench_build_matrix,
    bench_reduce,
    bench_matching
);

criterion_main!(benches);
