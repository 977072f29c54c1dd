use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quarry::core::{Term, Triple};
use quarry::execution::QueryEngine;
use quarry::query::{Pattern, PatternGroup, Query};
use quarry::sources::{DataSource, Federation, Graph};
use quarry::EngineConfig;

fn ex(name: &str) -> Term {
    Term::resource(format!("http://example.org/{}", name))
}

/// A social graph where person i knows persons i+1 and i+7.
fn social_graph(people: usize) -> Graph {
    let mut graph = Graph::new();
    for i in 0..people {
        let person = ex(&format!("person{}", i));
        graph.add(person.clone(), ex("knows"), ex(&format!("person{}", (i + 1) % people)));
        graph.add(person.clone(), ex("knows"), ex(&format!("person{}", (i + 7) % people)));
        graph.add(person, ex("age"), Term::integer((i % 80) as i64));
    }
    graph
}

fn friend_of_friend() -> Query {
    let mut group = PatternGroup::new("fof");
    group
        .add_pattern(Pattern::new(Term::variable("x"), ex("knows"), Term::variable("y")))
        .add_pattern(Pattern::new(Term::variable("y"), ex("knows"), Term::variable("z")))
        .add_pattern(Pattern::new(Term::variable("z"), ex("age"), Term::variable("age")));
    let mut query = Query::new();
    query.add_group(group);
    query
}

fn bench_group_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_join");
    let query = friend_of_friend();

    for people in [1_000, 10_000] {
        let source = DataSource::from(social_graph(people));
        for parallel in [false, true] {
            let engine = QueryEngine::new(EngineConfig::default().with_parallel(parallel));
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, people), &source, |b, source| {
                b.iter(|| black_box(engine.evaluate(&query, Some(source))));
            });
        }
    }
    group.finish();
}

fn bench_federation(c: &mut Criterion) {
    let query = friend_of_friend();
    let mut federation = Federation::new();
    for _ in 0..4 {
        federation.add_member(social_graph(2_000));
    }
    let source = DataSource::from(federation);
    let engine = QueryEngine::default();

    c.bench_function("federation_4x2000", |b| {
        b.iter(|| black_box(engine.evaluate(&query, Some(&source))));
    });
}

fn bench_pattern_lookup(c: &mut Criterion) {
    let graph = social_graph(10_000);
    let triples: Vec<Triple> = graph.iter().cloned().collect();
    let source = DataSource::from(graph);
    let engine = QueryEngine::default();

    let mut group = PatternGroup::new("lookup");
    group.add_pattern(Pattern::new(ex("person42"), ex("knows"), Term::variable("o")));
    let mut query = Query::new();
    query.add_group(group);

    c.bench_function("bound_subject_lookup", |b| {
        b.iter(|| black_box(engine.evaluate(&query, Some(&source))));
    });
    c.bench_function("graph_build_30000", |b| {
        b.iter(|| black_box(triples.iter().cloned().collect::<Graph>()));
    });
}

criterion_group!(benches, bench_group_join, bench_federation, bench_pattern_lookup);
criterion_main!(benches);
