use criterion::{Criterion, criterion_group, criterion_main};
use dualmark_engine::{markup, parsing};

/// Generates a mixed Markdown document with the given number of sections.
fn generate_markdown(sections: usize) -> String {
    let mut out = String::new();
    for idx in 0..sections {
        out.push_str(&format!("## Section {idx}\n\n"));
        out.push_str("Some **bold** text with *italics* and a [link](https://example.com).\n\n");
        out.push_str("- first item\n- second item\n- third item\n\n");
        out.push_str("> [!#fff9c4]\n> a callout note\n\n");
        out.push_str("| a | b |\n| --- | --- |\n| 1 | 2 |\n\n");
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let content = generate_markdown(100);
    group.bench_function("parse_markdown", |b| {
        b.iter(|| {
            let ast = parsing::parse_document(std::hint::black_box(&content));
            std::hint::black_box(ast);
        });
    });

    let ast = parsing::parse_document(&content);
    group.bench_function("serialize_markdown", |b| {
        b.iter(|| {
            let md = parsing::serialize_markdown(std::hint::black_box(&ast));
            std::hint::black_box(md);
        });
    });

    group.bench_function("serialize_markup", |b| {
        b.iter(|| {
            let html = markup::serialize_markup(std::hint::black_box(&ast));
            std::hint::black_box(html);
        });
    });

    let rendered = markup::serialize_markup(&ast);
    group.bench_function("markup_to_markdown", |b| {
        b.iter(|| {
            let md = markup::markup_to_markdown(std::hint::black_box(&rendered));
            std::hint::black_box(md);
        });
    });

    group.bench_function("sanitize", |b| {
        b.iter(|| {
            let clean = markup::sanitize(std::hint::black_box(&rendered));
            std::hint::black_box(clean);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
