use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use mdstream_core::{Assembler, AssemblerConfig, Tokenizer};

fn synthetic_document(paragraphs: usize) -> String {
    let mut doc = String::new();
    for i in 0..paragraphs {
        doc.push_str(&format!(
            "## Section {i}\n\nThis is paragraph {i} with *emphasis*, a [link](https://example.com/{i}), \
             and some `inline code`. It keeps going so the line is long enough to matter.\n\n\
             | H1 | H2 |\n| :-- | --: |\n| a{i} | b{i} |\n\n\
             ```rust\nfn section_{i}() {{ println!(\"{i}\"); }}\n```\n\n"
        ));
    }
    doc
}

fn feed_whole(content: &str) {
    let mut tokenizer = Tokenizer::new();
    let mut assembler = Assembler::new(AssemblerConfig::default());
    assembler.apply(tokenizer.feed(content));
    assembler.apply(tokenizer.finish());
}

fn feed_chunked(content: &str, chunk_size: usize) {
    let mut tokenizer = Tokenizer::new();
    let mut assembler = Assembler::new(AssemblerConfig::default());
    let bytes = content.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        let mut end = (start + chunk_size).min(bytes.len());
        while !content.is_char_boundary(end) {
            end -= 1;
        }
        assembler.apply(tokenizer.feed(&content[start..end]));
        start = end;
    }
    assembler.apply(tokenizer.finish());
}

fn long_documents(c: &mut Criterion) {
    let content = synthetic_document(200);
    let mut group = c.benchmark_group("long documents");
    group.bench_function("whole document in one feed", |b| {
        b.iter(|| feed_whole(&content));
    });
    for chunk_size in [8usize, 64, 512, 4096] {
        group.bench_with_input(BenchmarkId::new("chunked feed", chunk_size), &chunk_size, |b, &size| {
            b.iter(|| feed_chunked(&content, size));
        });
    }
    group.finish();
}

fn short_inlines(c: &mut Criterion) {
    let content = "*this ***has some* various things* that** [create multiple elements](while/inline) \
                    taking _too_ much content to parse, and should `be a decent` test` ``of ``whether \
                    this works quickly.\n\n";
    let mut group = c.benchmark_group("inlines");
    group.bench_function("mdstream-core", |b| {
        b.iter(|| feed_whole(content));
    });
    group.finish();
}

criterion_group!(benches, long_documents, short_inlines);
criterion_main!(benches);
