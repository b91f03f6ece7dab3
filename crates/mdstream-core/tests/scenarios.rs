//! End-to-end scenarios, run through the real `Tokenizer`→`Assembler`
//! pipeline rather than hand-built events, driven one chunk at a time the
//! way a host actually calls `feed`.

mod common;

use mdstream_core::{Assembler, AssemblerConfig, BlockKind, ChunkResult, Event, Tokenizer};

use common::{drive, drive_with, plain_text_of, snapshot_of};

#[test]
fn paragraph_coalescing_across_chunks() {
    let diffs = drive(&["Hello ", "world", "\n\n"]);
    assert_eq!(diffs.len(), 4);

    assert_eq!(diffs[0].document_version, 1);
    assert_eq!(diffs[1].document_version, 2);
    assert_eq!(diffs[2].document_version, 3);

    let snapshot = snapshot_of("Hello world\n\n");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].kind, BlockKind::Paragraph);
    assert!(snapshot[0].is_closed);
    assert_eq!(plain_text_of(&snapshot), vec!["Hello world".to_string()]);
}

#[test]
fn fenced_code_is_truncated_once_a_later_block_closes() {
    let config = AssemblerConfig::default().with_max_closed_blocks(Some(1));
    let diffs = drive_with(config.clone(), &["```swift\nprint(1)\n```\n\n", "next\n\n"]);

    let discarded = diffs.iter().any(|d| {
        d.changes.iter().any(|c| matches!(c, mdstream_core::Change::BlocksDiscarded { range } if *range == (0..1)))
    });
    assert!(discarded, "expected a blocksDiscarded change once the paragraph closes");

    let mut tokenizer = Tokenizer::new();
    let mut assembler = Assembler::new(config);
    assembler.apply(tokenizer.feed("```swift\nprint(1)\n```\n\n"));
    assembler.apply(tokenizer.feed("next\n\n"));
    assembler.apply(tokenizer.finish());
    assert_eq!(assembler.block_count(), 1);
    assert_eq!(assembler.block(assembler.block_id(0)).kind, BlockKind::Paragraph);
}

#[test]
fn pipe_table_confirms_header_and_accumulates_rows() {
    let snapshot = snapshot_of("| H1 | H2 |\n| :-- | --: |\n| a | b |\n\n");
    assert_eq!(snapshot.len(), 1);
    let table = snapshot[0].table.as_ref().expect("table snapshot");
    assert_eq!(table.header_cells.as_ref().unwrap().len(), 2);
    assert!(table.is_header_confirmed);
    assert_eq!(table.rows.len(), 1);
}

#[test]
fn soft_break_normalizes_to_a_single_space() {
    let text = "Readability, however, is emphasized above all else. A Markdown-formatted\n\
                document should be publishable as-is.\n\n";
    let snapshot = snapshot_of(text);
    assert_eq!(snapshot.len(), 1);
    let combined = plain_text_of(&snapshot).join("");
    assert!(combined.contains("Markdown-formatted document"));
    assert!(!combined.contains("Markdown-formatted\ndocument"));
}

#[test]
fn style_change_prevents_coalesce_through_a_link() {
    let snapshot = snapshot_of("a[b](url)c\n\n");
    let runs = snapshot[0].inline_runs.as_ref().expect("inline runs");
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0].text, "a");
    assert_eq!(runs[1].text, "b");
    assert_eq!(runs[1].link_url.as_deref(), Some("url"));
    assert_eq!(runs[2].text, "c");
}

#[test]
fn orphan_event_is_a_no_op() {
    let mut assembler = Assembler::new(AssemblerConfig::default());
    let diff = assembler.apply(ChunkResult {
        events: vec![Event::BlockAppendInline {
            id: mdstream_core::BlockID::default(),
            runs: vec![mdstream_core::InlineRun::plain("x")],
        }],
        open_blocks: vec![],
    });
    assert!(diff.changes.is_empty());
    assert_eq!(diff.document_version, 0);
    assert_eq!(assembler.block_count(), 0);
}
