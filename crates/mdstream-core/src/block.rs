use serde::{Deserialize, Serialize};

use crate::inline::InlineRun;

/// Opaque, monotonically increasing block identifier. Unique for the life of
/// an `Assembler`; never reused after truncation discards a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockID(u64);

impl BlockID {
    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BlockID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Allocates fresh, strictly increasing `BlockID`s for the life of a
/// `Tokenizer`.
#[derive(Debug, Default)]
pub(crate) struct BlockIDAllocator {
    next: u64,
}

impl BlockIDAllocator {
    pub(crate) fn next(&mut self) -> BlockID {
        let id = BlockID::new(self.next);
        self.next += 1;
        id
    }
}

/// A task-list checkbox state, for `listItem(task: ...)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    pub checked: bool,
}

/// Column alignment declared by a table's delimiter row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// The tagged variant of top-level document constructs recognized by the
/// tokenizer (`spec.md` §3, §6).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BlockKind {
    Paragraph,
    Heading { level: u8 },
    Blockquote,
    ListItem {
        ordered: bool,
        index: Option<u64>,
        task: Option<TaskState>,
    },
    FencedCode {
        language: Option<String>,
    },
    Math {
        display: bool,
    },
    Table,
    HorizontalRule,
    Unknown,
}

impl BlockKind {
    /// Blocks whose content is a sequence of inline runs (paragraph,
    /// heading, blockquote, list item).
    pub fn holds_inline_runs(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph | BlockKind::Heading { .. } | BlockKind::Blockquote | BlockKind::ListItem { .. }
        )
    }

    /// Blocks whose content is raw accumulated text (fenced code, and
    /// display math, which retains its raw TeX as `codeText` per
    /// `spec.md` §3).
    pub fn holds_code_text(&self) -> bool {
        matches!(self, BlockKind::FencedCode { .. } | BlockKind::Math { .. })
    }

    pub fn holds_table(&self) -> bool {
        matches!(self, BlockKind::Table)
    }
}

/// A pipe-table's accumulated content. The header enters as a *candidate*
/// and becomes confirmed only once the delimiter row is observed
/// (`spec.md` §3).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub header_cells: Option<Vec<Vec<InlineRun>>>,
    pub alignments: Option<Vec<Alignment>>,
    pub rows: Vec<Vec<Vec<InlineRun>>>,
    pub is_header_confirmed: bool,
}

/// A point-in-time, read-only view of one block, as returned by
/// `Assembler::block` and `Assembler::make_snapshot`.
///
/// Exactly one of `inline_runs`, `code_text`, `table` is populated,
/// according to `kind` (`spec.md` §3).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub id: BlockID,
    pub kind: BlockKind,
    pub inline_runs: Option<Vec<InlineRun>>,
    pub code_text: Option<String>,
    pub table: Option<TableSnapshot>,
    pub is_closed: bool,
    pub parent_id: Option<BlockID>,
    pub depth: u32,
    pub child_ids: Vec<BlockID>,
}

/// One entry of the tokenizer's open-block stack, reported after every
/// `feed`/`finish` call (`spec.md` §4.4).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpenBlockState {
    pub id: BlockID,
    pub kind: BlockKind,
}
