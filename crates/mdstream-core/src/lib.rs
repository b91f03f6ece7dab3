//! Streaming Markdown tokenizer, block assembler, and TeX-subset math
//! parser for incrementally rendered documents.
//!
//! The pipeline has two halves, each independently usable:
//!
//! - [`Tokenizer`] consumes arbitrary byte chunks (`feed`) and emits
//!   [`Event`]s plus the current open-block stack (`ChunkResult`), without
//!   ever re-scanning already-processed bytes.
//! - [`Assembler`] folds a sequence of `ChunkResult`s into a persistent,
//!   addressable block list and emits a versioned [`AssemblerDiff`] per
//!   call, suitable for driving an incremental renderer.
//!
//! A typical host drives both together:
//!
//! ```
//! use mdstream_core::{Assembler, AssemblerConfig, Tokenizer};
//!
//! let mut tokenizer = Tokenizer::new();
//! let mut assembler = Assembler::new(AssemblerConfig::default());
//!
//! let diff = assembler.apply(tokenizer.feed("# Hello, "));
//! assert!(diff.changes.iter().any(|_| true) || diff.changes.is_empty());
//! let _diff = assembler.apply(tokenizer.feed("world\n\n"));
//! let _final_diff = assembler.apply(tokenizer.finish());
//!
//! assert_eq!(assembler.block_count(), 1);
//! ```

mod assembler;
mod block;
mod byte_lookup;
mod event;
mod inline;
mod lookbehind;
mod math;
mod text;
mod tokenizer;

pub use assembler::{Assembler, AssemblerConfig, AssemblerDiff, Change};
pub use block::{
    Alignment, BlockID, BlockKind, BlockSnapshot, OpenBlockState, TableSnapshot, TaskState,
};
pub use event::{ChunkResult, Event};
pub use inline::{ImageRef, InlineRun, InlineStyle, MathPayload};
pub use math::{AccentKind, DelimiterGlyph, MathNode, MathStyle, MatrixStyle, SpacingWidth};
pub use tokenizer::Tokenizer;
