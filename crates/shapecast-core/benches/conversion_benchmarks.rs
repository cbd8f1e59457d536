//! Benchmarks for the conversion engine
//!
//! Copyright (c) 2025 Shapecast Team
//! Licensed under the Apache-2.0 license

use chrono::{DateTime, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use shapecast_core::{impl_record, Converter, Value};

#[derive(Debug, Default, Clone)]
struct LineItem {
    sku: String,
    price: f64,
    quantity: i32,
}

#[derive(Debug, Default, Clone)]
struct LineCopy {
    sku: String,
    price: f32,
    quantity: u16,
}

#[derive(Debug, Default, Clone)]
struct Invoice {
    number: String,
    issued: DateTime<Utc>,
    lines: Vec<LineItem>,
}

#[derive(Debug, Default, Clone)]
struct InvoiceCopy {
    number: String,
    issued: String,
    lines: Vec<LineCopy>,
}

impl_record!(LineItem { sku: String, price: f64, quantity: i32 });
impl_record!(LineCopy { sku: String, price: f32, quantity: u16 });
impl_record!(Invoice { number: String, issued: DateTime<Utc>, lines: Vec<LineItem> });
impl_record!(InvoiceCopy { number: String, issued: String, lines: Vec<LineCopy> });

fn create_invoice(lines: usize) -> Invoice {
    Invoice {
        number: "INV-2024-001".to_string(),
        issued: Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap(),
        lines: (0..lines)
            .map(|i| LineItem {
                sku: format!("SKU-{:05}", i),
                price: i as f64 * 1.25,
                quantity: (i % 7) as i32,
            })
            .collect(),
    }
}

fn create_document(lines: usize) -> Value {
    let lines: Vec<_> = (0..lines)
        .map(|i| json!({"sku": format!("SKU-{:05}", i), "price": i as f64 * 1.25, "quantity": i % 7}))
        .collect();
    Value::from(json!({
        "number": "INV-2024-001",
        "issued": "2024-02-29 12:00:00",
        "lines": lines,
    }))
}

fn bench_record_to_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_to_record");
    let converter = Converter::new();

    for size in [1usize, 10, 100, 1000] {
        let invoice = create_invoice(size);
        group.bench_with_input(BenchmarkId::new("lines", size), &invoice, |b, invoice| {
            b.iter(|| {
                let mut copy = InvoiceCopy::default();
                converter.convert(black_box(invoice), &mut copy).unwrap();
                copy
            })
        });
    }

    group.finish();
}

fn bench_mapping_to_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapping_to_record");
    let converter = Converter::new();

    for size in [1usize, 10, 100, 1000] {
        let document = create_document(size);
        group.bench_with_input(BenchmarkId::new("lines", size), &document, |b, document| {
            b.iter(|| {
                let mut invoice = Invoice::default();
                converter.convert(black_box(document), &mut invoice).unwrap();
                invoice
            })
        });
    }

    group.finish();
}

fn bench_same_shape_copy(c: &mut Criterion) {
    let converter = Converter::new();
    let invoice = create_invoice(100);

    c.bench_function("same_shape_copy", |b| {
        b.iter(|| {
            let mut copy = Invoice::default();
            converter.convert(black_box(&invoice), &mut copy).unwrap();
            copy
        })
    });
}

criterion_group!(
    benches,
    bench_record_to_record,
    bench_mapping_to_record,
    bench_same_shape_copy
);
criterion_main!(benches);
