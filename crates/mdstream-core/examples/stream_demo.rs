extern crate mdstream_alloc;

use std::io::Read;

use mdstream_core::{Assembler, AssemblerConfig, Tokenizer};

const SAMPLE_DOCUMENT: &str = "# Streaming demo\n\n\
    This paragraph arrives across several small `feed` calls, \
    with *emphasis*, a [link](https://example.com), and inline math $x^2$.\n\n\
    | Col A | Col B |\n| :-- | --: |\n| 1 | 2 |\n\n\
    ```rust\nfn main() {\n    println!(\"hi\");\n}\n```\n\n";

/// Feeds a document through the tokenizer/assembler pair in small chunks,
/// printing each diff as it arrives. Useful for eyeballing the
/// insertion-position algorithm and truncation behavior live, the same role
/// the teacher's `profile_test.rs` plays for its own parser. Reads the
/// document from stdin when piped; falls back to a built-in sample.
fn main() {
    let mut piped = String::new();
    let document = if std::io::stdin().read_to_string(&mut piped).is_ok() && !piped.is_empty() {
        piped
    } else {
        SAMPLE_DOCUMENT.to_string()
    };
    let document = document.as_str();

    let chunk_size = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(12usize);

    let mut tokenizer = Tokenizer::new();
    let mut assembler = Assembler::new(AssemblerConfig::default());

    let bytes = document.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        let mut end = (start + chunk_size).min(bytes.len());
        while !document.is_char_boundary(end) {
            end -= 1;
        }
        let diff = assembler.apply(tokenizer.feed(&document[start..end]));
        if !diff.changes.is_empty() {
            println!("v{}: {:?}", diff.document_version, diff.changes);
        }
        start = end;
    }
    let diff = assembler.apply(tokenizer.finish());
    if !diff.changes.is_empty() {
        println!("v{}: {:?}", diff.document_version, diff.changes);
    }

    println!("\nfinal snapshot:");
    for block in assembler.make_snapshot() {
        println!("  {:?}", block);
    }
}
