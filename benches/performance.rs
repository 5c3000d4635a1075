//! Performance benchmarks for fieldrules
//!
//! These benchmarks measure the cost of:
//! - Parsing rule chains against a populated registry
//! - Validating wide records (many ruled fields)
//! - Validating deep records (long chains of nested records)
//! - Validating long lists with element rules
//! - Decoding and validating a JSON document end to end
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench validation_wide
//! ```
//!
//! ## Expected Performance Characteristics
//!
//! - Traversal is linear in the number of visited fields and elements
//! - Passing fields never render a message
//! - Custom messages are only fetched once something fails

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fieldrules::config::Config;
use fieldrules::{FieldShape, RecordRef, RecordShape, RuleRegistry, Shape, Validator, Value};

// ============================================================================
// Helper Functions
// ============================================================================

/// A record with `width` string fields, each `required|min:2|max:64|alpha_dash`
fn wide_record(width: usize) -> (Shape, Value) {
    let mut record = RecordShape::new("Wide");
    for i in 0..width {
        record.push(FieldShape::new(format!("field_{i}"), Shape::Str).rules("required|min:2|max:64|alpha_dash"));
    }
    let handle = RecordRef::pending("Wide");
    handle.define(record);

    let values = (0..width).map(|i| Value::Str(format!("value_{i}"))).collect();
    (Shape::Record(handle), Value::Record(values))
}

/// A self-referential `Node { name, next: optional<Node> }` chain of `depth` nodes
fn deep_chain(depth: usize) -> (Shape, Value) {
    let node = RecordRef::pending("Node");
    node.define(
        RecordShape::new("Node")
            .field(FieldShape::new("name", Shape::Str).rules("required|alpha"))
            .field(FieldShape::new("next", Shape::optional(Shape::Record(node.clone())))),
    );

    let mut value = Value::none();
    for _ in 0..depth {
        value = Value::some(Value::Record(vec![Value::Str("node".into()), value]));
    }
    let root = match value {
        Value::Optional(Some(inner)) => *inner,
        other => other,
    };
    (Shape::Record(node), root)
}

/// A record holding one list of `len` strings with element rules
fn long_list(len: usize) -> (Shape, Value) {
    let record = RecordRef::pending("Tags");
    record.define(RecordShape::new("Tags").field(
        FieldShape::new("tags", Shape::list(Shape::Str))
            .rules("required")
            .inner("filled|max:32|lowercase"),
    ));
    let items = (0..len).map(|i| Value::Str(format!("tag{i}"))).collect();
    (Shape::Record(record), Value::Record(vec![Value::List(items)]))
}

const ORDER_CONFIG: &str = r#"
[fieldrules]
version = "1"
root = "Order"

[[records.Order.fields]]
name = "email"
type = "string"
rules = "required|email"

[[records.Order.fields]]
name = "lines"
type = "list<Line>"
rules = "required|min:1"

[[records.Line.fields]]
name = "sku"
type = "string"
rules = "required|regex:^[A-Z]{3}-[0-9]{4}$"

[[records.Line.fields]]
name = "quantity"
type = "u32"
rules = "required|between:1,99"
"#;

fn order_document(lines: usize) -> serde_json::Value {
    let lines: Vec<serde_json::Value> = (0..lines)
        .map(|i| serde_json::json!({"sku": format!("ABC-{:04}", i % 10_000), "quantity": 1 + i % 50}))
        .collect();
    serde_json::json!({"email": "buyer@example.com", "lines": lines})
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_chain_parsing(c: &mut Criterion) {
    let registry = RuleRegistry::with_builtin_rules();
    let mut group = c.benchmark_group("chain_parsing");

    for chain in [
        "required",
        "bail|required|string|min:3|max:255|alpha_dash",
        "nullable|date|after:2020-01-01|before:tomorrow|date_format:%Y-%m-%d",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(chain.len()), chain, |b, chain| {
            b.iter(|| black_box(registry.parse_chain(black_box(chain))));
        });
    }

    group.finish();
}

fn bench_validation_wide(c: &mut Criterion) {
    let registry = RuleRegistry::with_builtin_rules();
    let validator = Validator::new(&registry);
    let mut group = c.benchmark_group("validation_wide");

    for width in [10, 100, 1000] {
        let (shape, value) = wide_record(width);
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| validator.validate_value(&shape, black_box(&value), Vec::new));
        });
    }

    group.finish();
}

fn bench_validation_deep(c: &mut Criterion) {
    let registry = RuleRegistry::with_builtin_rules();
    let validator = Validator::new(&registry);
    let mut group = c.benchmark_group("validation_deep");

    for depth in [5, 25, 50] {
        let (shape, value) = deep_chain(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| validator.validate_value(&shape, black_box(&value), Vec::new));
        });
    }

    group.finish();
}

fn bench_validation_list(c: &mut Criterion) {
    let registry = RuleRegistry::with_builtin_rules();
    let validator = Validator::new(&registry);
    let mut group = c.benchmark_group("validation_list");

    for len in [100, 1000, 10_000] {
        let (shape, value) = long_list(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| validator.validate_value(&shape, black_box(&value), Vec::new));
        });
    }

    group.finish();
}

fn bench_full_workflow(c: &mut Criterion) {
    let config = Config::parse(ORDER_CONFIG).unwrap();
    let shape = config.root_shape().unwrap();
    let mut registry = RuleRegistry::with_builtin_rules();
    config.register_messages(&mut registry);
    let validator = Validator::new(&registry);

    let mut group = c.benchmark_group("full_workflow");
    group.sample_size(20);

    for lines in [10, 500] {
        let document = order_document(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| {
                let value = Value::from_json(&shape, black_box(&document)).unwrap();
                validator.validate_value(&shape, &value, || config.custom_messages())
            });
        });
    }

    group.finish();
}

criterion_group!(parse_benches, bench_chain_parsing,);

criterion_group!(
    validation_benches,
    bench_validation_wide,
    bench_validation_deep,
    bench_validation_list,
);

criterion_group!(workflow_benches, bench_full_workflow,);

criterion_main!(parse_benches, validation_benches, workflow_benches);
