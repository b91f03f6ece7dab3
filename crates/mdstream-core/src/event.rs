use serde::{Deserialize, Serialize};

use crate::block::{Alignment, BlockID, BlockKind, OpenBlockState};
use crate::inline::InlineRun;

/// One unit of tokenizer output (`spec.md` §4.4). A single `feed`/`finish`
/// call can emit any number of these, in the order the underlying bytes
/// were recognized — not necessarily document order, since a nested
/// construct can close before its ancestor. The assembler (`crate::assembler`)
/// is responsible for placing each event's block at its correct position
/// using the accompanying open-block stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A new block has been recognized and assigned an id.
    BlockStart { id: BlockID, kind: BlockKind },
    /// Appends inline runs to a block that holds inline content.
    BlockAppendInline { id: BlockID, runs: Vec<InlineRun> },
    /// Appends raw text to a block that holds `codeText` (fenced code, or
    /// display/block math accumulating raw TeX).
    BlockAppendFencedCode { id: BlockID, text: String },
    /// A table's first row has been seen but not yet confirmed as a header
    /// — no delimiter row has been observed yet.
    TableHeaderCandidate { id: BlockID, cells: Vec<Vec<InlineRun>> },
    /// The delimiter row has been observed; the candidate header becomes
    /// permanent and column alignments are now known.
    TableHeaderConfirmed { id: BlockID, alignments: Vec<Alignment> },
    /// A data row has been appended to a table.
    TableAppendRow { id: BlockID, cells: Vec<Vec<InlineRun>> },
    /// A block will receive no further events.
    BlockEnd { id: BlockID },
}

/// The result of one `Tokenizer::feed`/`finish` call: the events recognized
/// during this call, plus the full open-block stack as it stands
/// afterwards, innermost last (`spec.md` §4.4). The assembler uses the
/// stack, not event order, to place new blocks in document order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkResult {
    pub events: Vec<Event>,
    pub open_blocks: Vec<OpenBlockState>,
}
