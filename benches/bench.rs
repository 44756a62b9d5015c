// Criterion benchmarks for Mentor Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mentor_match::core::{build_preferences, interest_overlap, time_compatible, DeferredAcceptance, MatchInput};
use mentor_match::models::{EvictionPolicy, MatchPolicy, Mentor, Requirements, Skills, Student};
use std::collections::BTreeMap;

const AREAS: [&str; 8] = [
    "machine learning",
    "nlp",
    "computer vision",
    "databases",
    "networks",
    "security",
    "robotics",
    "theory",
];

fn create_student(id: usize) -> Student {
    let interests = [AREAS[id % 8], AREAS[(id * 3 + 1) % 8], AREAS[(id * 5 + 2) % 8]];
    Student::new(
        format!("s{}", id),
        &interests,
        Skills::new(1 + (id % 5) as u8, 1 + (id % 4) as u8, 2 + (id % 3) as u8),
        id % 17 != 0,
    )
}

fn create_mentor(id: usize) -> Mentor {
    let areas = [AREAS[id % 8], AREAS[(id + 3) % 8]];
    Mentor::new(
        format!("m{}", id),
        &areas,
        Requirements::new(1 + (id % 3) as u8, 1 + (id % 2) as u8, 1),
        1 + (id % 4) as u32,
        true,
    )
}

fn create_roster(students: usize) -> (Vec<Student>, Vec<Mentor>) {
    let mentors = (students / 5).max(1);
    (
        (0..students).map(create_student).collect(),
        (0..mentors).map(create_mentor).collect(),
    )
}

fn bench_interest_overlap(c: &mut Criterion) {
    let student = create_student(7);
    let mentor = create_mentor(3);

    c.bench_function("interest_overlap", |b| {
        b.iter(|| interest_overlap(black_box(&student), black_box(&mentor)));
    });
}

fn bench_build_preferences(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_preferences");

    for student_count in [10, 50, 100, 500].iter() {
        let (students, mentors) = create_roster(*student_count);

        group.bench_with_input(
            BenchmarkId::new("students", student_count),
            student_count,
            |b, _| {
                b.iter(|| build_preferences(black_box(&students), black_box(&mentors), time_compatible));
            },
        );
    }

    group.finish();
}

fn bench_deferred_acceptance(c: &mut Criterion) {
    let mut group = c.benchmark_group("deferred_acceptance");

    for student_count in [10, 50, 100, 500].iter() {
        let (students, mentors) = create_roster(*student_count);
        let lists = build_preferences(&students, &mentors, time_compatible);
        let student_ids: Vec<String> = students.iter().map(|s| s.id.clone()).collect();
        let mentor_ids: Vec<String> = mentors.iter().map(|m| m.id.clone()).collect();
        let capacities: BTreeMap<String, u32> = mentors.iter().map(|m| (m.id.clone(), m.capacity)).collect();

        for eviction in [EvictionPolicy::FirstDisplaceable, EvictionPolicy::WeakestHolder] {
            let matcher = DeferredAcceptance::new(MatchPolicy {
                eviction,
                allow_inactive_mentors: false,
            });

            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", eviction), student_count),
                student_count,
                |b, _| {
                    b.iter(|| {
                        matcher.run(black_box(MatchInput::new(
                            &student_ids,
                            &mentor_ids,
                            &lists.students,
                            &lists.mentors,
                            &capacities,
                        )))
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_interest_overlap,
    bench_build_preferences,
    bench_deferred_acceptance
);

criterion_main!(benches);
