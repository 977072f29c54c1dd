use quarry::core::term::{XSD_DECIMAL, XSD_INTEGER};
use quarry::core::{BindingTable, Term, Triple};
use quarry::execution::QueryEngine;
use quarry::query::{
    AggregateFunction, Aggregator, Expression, Filter, GroupBy, Modifier, OrderDirection,
    Pattern, PatternGroup, Query,
};
use quarry::sources::{DataSource, Federation, Graph, Store};
use quarry::EngineConfig;

fn ex(name: &str) -> Term {
    Term::resource(format!("http://example.org/{}", name))
}

fn graph(triples: &[(&str, &str, &str)]) -> Graph {
    triples.iter().map(|(s, p, o)| Triple::new(ex(s), ex(p), ex(o))).collect()
}

fn single_group(patterns: Vec<Pattern>) -> Query {
    let mut group = PatternGroup::new("main");
    for pattern in patterns {
        group.add_pattern(pattern);
    }
    let mut query = Query::new();
    query.add_group(group);
    query
}

fn run(query: &Query, source: &DataSource) -> BindingTable {
    QueryEngine::default().evaluate(query, Some(source))
}

fn column(table: &BindingTable, name: &str) -> Vec<Option<Term>> {
    table.column_values(name).into_iter().map(|v| v.cloned()).collect()
}

#[test]
fn test_exact_match_pattern() {
    let source = DataSource::from(graph(&[("a", "p", "b"), ("b", "p", "c")]));

    let present = run(&single_group(vec![Pattern::new(ex("a"), ex("p"), ex("b"))]), &source);
    assert_eq!(present.len(), 1);

    let absent = run(&single_group(vec![Pattern::new(ex("a"), ex("p"), ex("c"))]), &source);
    assert_eq!(absent.len(), 0);
}

#[test]
fn test_self_join_pattern() {
    let source = DataSource::from(graph(&[("a", "p", "a"), ("a", "p", "b")]));
    let query = single_group(vec![Pattern::new(Term::variable("x"), ex("p"), Term::variable("x"))]);
    let table = run(&query, &source);
    assert_eq!(table.columns(), ["x".to_string()]);
    assert_eq!(column(&table, "x"), vec![Some(ex("a"))]);
}

#[test]
fn test_inner_join_within_group() {
    let source =
        DataSource::from(graph(&[("a", "knows", "b"), ("b", "knows", "c"), ("a", "knows", "d")]));
    let query = single_group(vec![
        Pattern::new(Term::variable("x"), ex("knows"), Term::variable("y")),
        Pattern::new(Term::variable("y"), ex("knows"), Term::variable("z")),
    ]);
    let table = run(&query, &source);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "x"), Some(&ex("a")));
    assert_eq!(table.get(0, "y"), Some(&ex("b")));
    assert_eq!(table.get(0, "z"), Some(&ex("c")));
}

#[test]
fn test_schema_union_of_groups() {
    let source = DataSource::from(graph(&[("a", "p", "b"), ("c", "q", "d")]));
    let mut first = PatternGroup::new("A");
    first
        .add_pattern(Pattern::new(Term::variable("x"), ex("p"), ex("b")))
        .set_union_with_next(true);
    let mut second = PatternGroup::new("B");
    second.add_pattern(Pattern::new(Term::variable("y"), ex("q"), ex("d")));
    let mut query = Query::new();
    query.add_group(first).add_group(second);

    let table = run(&query, &source);
    assert_eq!(table.columns(), ["x".to_string(), "y".to_string()]);
    assert_eq!(table.rows(), [vec![Some(ex("a")), None], vec![None, Some(ex("c"))]]);
}

#[test]
fn test_union_flag_does_not_change_results() {
    let source = DataSource::from(graph(&[("a", "p", "b"), ("a", "p", "b2")]));
    let build = |union: bool| {
        let mut first = PatternGroup::new("A");
        first
            .add_pattern(Pattern::new(Term::variable("x"), ex("p"), Term::variable("o")))
            .set_union_with_next(union);
        let mut second = PatternGroup::new("B");
        second.add_pattern(Pattern::new(Term::variable("x"), ex("p"), Term::variable("o")));
        let mut query = Query::new();
        query.add_group(first).add_group(second);
        query
    };
    let with_union = run(&build(true), &source);
    let sequential = run(&build(false), &source);
    assert_eq!(with_union.rows(), sequential.rows());
    assert_eq!(with_union.len(), 4);
    assert_ne!(with_union.name(), sequential.name());
}

#[test]
fn test_federation_is_additive() {
    let mut federation = Federation::new();
    federation
        .add_member(graph(&[("a", "p", "b")]))
        .add_member(graph(&[("a", "p", "b")]));
    let query = single_group(vec![Pattern::new(Term::variable("s"), ex("p"), Term::variable("o"))]);

    for parallel in [false, true] {
        let engine = QueryEngine::new(EngineConfig::default().with_parallel(parallel));
        let table = engine.evaluate(&query, Some(&DataSource::from(federation.clone())));
        assert_eq!(table.len(), 2);
    }
}

#[test]
fn test_modifier_order_is_fixed() {
    let values = [3, 1, 2, 1, 3];
    let source = DataSource::from(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Triple::new(ex(&format!("r{}", i)), ex("v"), Term::integer(*v)))
            .collect::<Graph>(),
    );

    let declarations: [&[Modifier]; 3] = [
        &[
            Modifier::Distinct,
            Modifier::order_by("v", OrderDirection::Ascending),
            Modifier::Offset(1),
            Modifier::Limit(1),
        ],
        &[
            Modifier::Limit(1),
            Modifier::Offset(1),
            Modifier::order_by("v", OrderDirection::Ascending),
            Modifier::Distinct,
        ],
        &[
            Modifier::Offset(1),
            Modifier::Distinct,
            Modifier::Limit(1),
            Modifier::order_by("v", OrderDirection::Ascending),
        ],
    ];

    for modifiers in declarations {
        let mut query =
            single_group(vec![Pattern::new(Term::variable("r"), ex("v"), Term::variable("v"))]);
        query.add_projection("v");
        for modifier in modifiers {
            query.add_modifier(modifier.clone());
        }
        let table = run(&query, &source);
        assert_eq!(column(&table, "v"), vec![Some(Term::integer(2))]);
    }
}

fn grouped_source() -> DataSource {
    let rows = [("r1", 1, 10), ("r2", 1, 20), ("r3", 2, 5)];
    let mut store = Store::new();
    for (row, g, v) in rows {
        store.insert(Triple::new(ex(row), ex("g"), Term::integer(g)));
        store.insert(Triple::new(ex(row), ex("v"), Term::integer(v)));
    }
    DataSource::from(store)
}

fn grouped_query(function: AggregateFunction, output: &str) -> Query {
    let mut query = single_group(vec![
        Pattern::new(Term::variable("r"), ex("g"), Term::variable("g")),
        Pattern::new(Term::variable("r"), ex("v"), Term::variable("v")),
    ]);
    let mut group_by = GroupBy::new(&["g"]);
    group_by.add_aggregator(Aggregator::new(function, "v", output));
    query.add_group_by(group_by).add_order_by("g", OrderDirection::Ascending);
    query
}

#[test]
fn test_group_by_sum() {
    let table = run(&grouped_query(AggregateFunction::Sum, "sum"), &grouped_source());
    assert_eq!(table.columns(), ["g".to_string(), "sum".to_string()]);
    assert_eq!(
        table.rows(),
        [
            vec![Some(Term::integer(1)), Some(Term::integer(30))],
            vec![Some(Term::integer(2)), Some(Term::integer(5))],
        ]
    );
}

#[test]
fn test_group_by_avg() {
    let table = run(&grouped_query(AggregateFunction::Avg, "avg"), &grouped_source());
    assert_eq!(column(&table, "avg"), vec![Some(Term::integer(15)), Some(Term::integer(5))]);
}

#[test]
fn test_group_by_count_min_max_sample() {
    let mut query = single_group(vec![
        Pattern::new(Term::variable("r"), ex("g"), Term::variable("g")),
        Pattern::new(Term::variable("r"), ex("v"), Term::variable("v")),
    ]);
    let mut group_by = GroupBy::new(&["g"]);
    group_by
        .add_aggregator(Aggregator::count_all("n"))
        .add_aggregator(Aggregator::new(AggregateFunction::Min, "v", "low"))
        .add_aggregator(Aggregator::new(AggregateFunction::Max, "v", "high"))
        .add_aggregator(Aggregator::new(AggregateFunction::Sample, "r", "any"));
    query.add_group_by(group_by);

    let table = run(&query, &grouped_source());
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(0, "n"), Some(&Term::integer(2)));
    assert_eq!(table.get(0, "low"), Some(&Term::integer(10)));
    assert_eq!(table.get(0, "high"), Some(&Term::integer(20)));
    assert_eq!(table.get(0, "any"), Some(&ex("r1")));
    assert_eq!(table.get(1, "n"), Some(&Term::integer(1)));
}

#[test]
fn test_aggregate_over_mixed_values() {
    let mut store = Store::new();
    store.insert(Triple::new(ex("a"), ex("v"), Term::typed("1.5", XSD_DECIMAL)));
    store.insert(Triple::new(ex("b"), ex("v"), Term::literal("not a number")));
    store.insert(Triple::new(ex("c"), ex("v"), Term::typed("2", XSD_INTEGER)));

    let mut query = single_group(vec![Pattern::new(Term::variable("s"), ex("v"), Term::variable("v"))]);
    let mut group_by = GroupBy::new::<&str>(&[]);
    group_by
        .add_aggregator(Aggregator::new(AggregateFunction::Sum, "v", "total"))
        .add_aggregator(Aggregator::new(AggregateFunction::Count, "v", "n"));
    query.add_group_by(group_by);

    let table = run(&query, &DataSource::from(store));
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "total"), Some(&Term::typed("3.5", XSD_DECIMAL)));
    assert_eq!(table.get(0, "n"), Some(&Term::integer(3)));
}

#[test]
fn test_filters_and_projection() {
    let mut store = Store::new();
    for (person, age) in [("alice", 30), ("bob", 17), ("carol", 45)] {
        store.insert(Triple::new(ex(person), ex("age"), Term::integer(age)));
    }
    let mut group = PatternGroup::new("adults");
    group
        .add_pattern(Pattern::new(Term::variable("p"), ex("age"), Term::variable("age")))
        .add_filter(Filter::new(Expression::greater_or_equal(
            Expression::var("age"),
            Expression::constant(Term::integer(18)),
        )));
    let mut query = Query::new();
    query
        .add_projection("p")
        .add_group(group)
        .add_order_by("age", OrderDirection::Descending);

    let table = run(&query, &DataSource::from(store));
    assert_eq!(table.columns(), ["p".to_string()]);
    assert_eq!(column(&table, "p"), vec![Some(ex("carol")), Some(ex("alice"))]);
}

#[test]
fn test_projection_of_unknown_variable_is_unbound() {
    let source = DataSource::from(graph(&[("a", "p", "b")]));
    let mut query = single_group(vec![Pattern::new(Term::variable("s"), ex("p"), Term::variable("o"))]);
    query.add_projection("missing").add_projection("s");
    let table = run(&query, &source);
    assert_eq!(table.columns(), ["missing".to_string(), "s".to_string()]);
    assert_eq!(table.rows(), [vec![None, Some(ex("a"))]]);
}

#[test]
fn test_repeated_evaluation_is_identical() {
    let source =
        DataSource::from(graph(&[("a", "knows", "b"), ("b", "knows", "c"), ("c", "knows", "a")]));
    let mut query = single_group(vec![
        Pattern::new(Term::variable("x"), ex("knows"), Term::variable("y")),
        Pattern::new(Term::variable("y"), ex("knows"), Term::variable("z")),
    ]);
    query.add_distinct().add_order_by("z", OrderDirection::Descending);

    let engine = QueryEngine::default();
    let first = engine.evaluate(&query, Some(&source));
    let second = engine.evaluate(&query, Some(&source));
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_named_graph_patterns() {
    let mut store = Store::new();
    store.insert(Triple::new(ex("a"), ex("p"), ex("b")).in_context(ex("g1")));
    store.insert(Triple::new(ex("a"), ex("p"), ex("c")).in_context(ex("g2")));
    store.insert(Triple::new(ex("a"), ex("p"), ex("d")));
    let source = DataSource::from(store);

    let fixed = single_group(vec![
        Pattern::new(ex("a"), ex("p"), Term::variable("o")).with_context(ex("g2")),
    ]);
    assert_eq!(column(&run(&fixed, &source), "o"), vec![Some(ex("c"))]);

    let any_named = single_group(vec![
        Pattern::new(ex("a"), ex("p"), Term::variable("o")).with_context(Term::variable("g")),
    ]);
    assert_eq!(run(&any_named, &source).len(), 2);

    let all = single_group(vec![Pattern::new(ex("a"), ex("p"), Term::variable("o"))]);
    assert_eq!(run(&all, &source).len(), 3);
}

#[test]
fn test_absent_source_yields_empty_table() {
    let query = single_group(vec![Pattern::new(Term::variable("s"), ex("p"), Term::variable("o"))]);
    let table = QueryEngine::default().evaluate(&query, None);
    assert!(table.is_empty());
}
