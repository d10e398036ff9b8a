use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use xmlpick::{decode, extract, outline, Node, OutlineOptions, SelectionSet};

fn catalog(books: usize) -> String {
    let mut xml = String::from("<catalog>");
    for i in 0..books {
        xml.push_str(&format!(
            "<book id=\"b{i}\"><title>Title {i}</title><price>{i}.50</price></book>"
        ));
    }
    xml.push_str("</catalog>");
    xml
}

fn tree(books: usize) -> Option<Node> {
    decode(&catalog(books)).ok()
}

fn bench_extract_sparse(c: &mut Criterion) {
    let Some(tree) = tree(1000) else {
        return;
    };
    let Ok(selection) = SelectionSet::parse_all(
        (0..1000)
            .step_by(10)
            .map(|i| format!("catalog.book[{i}].title")),
    ) else {
        return;
    };
    c.bench_function("xmlpick_extract_sparse", |b| {
        b.iter(|| extract(black_box(&tree), black_box(&selection)))
    });
}

fn bench_extract_container(c: &mut Criterion) {
    let Some(tree) = tree(1000) else {
        return;
    };
    let Ok(selection) = SelectionSet::parse_all(["catalog.book"]) else {
        return;
    };
    c.bench_function("xmlpick_extract_container", |b| {
        b.iter(|| extract(black_box(&tree), black_box(&selection)))
    });
}

fn bench_outline(c: &mut Criterion) {
    let Some(tree) = tree(1000) else {
        return;
    };
    c.bench_function("xmlpick_outline", |b| {
        b.iter(|| outline(black_box(&tree), &OutlineOptions::unlimited()))
    });
}

criterion_group!(benches, bench_extract_sparse, bench_extract_container, bench_outline);
criterion_main!(benches);
