use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::block::{Alignment, BlockID, BlockKind, BlockSnapshot, TableSnapshot};
use crate::event::{ChunkResult, Event};
use crate::inline::{append_coalescing, InlineRun};

/// Tunables for an [`Assembler`], mirroring the builder shape the teacher
/// uses for its own parse-time configuration (`spec.md` §6).
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblerConfig {
    pub max_closed_blocks: Option<u32>,
    pub max_bytes_approx: Option<u64>,
    pub coalesce_plain_runs: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self { max_closed_blocks: Some(1000), max_bytes_approx: None, coalesce_plain_runs: true }
    }
}

impl AssemblerConfig {
    pub fn with_max_closed_blocks(mut self, max: Option<u32>) -> Self {
        self.max_closed_blocks = max;
        self
    }

    pub fn with_max_bytes_approx(mut self, max: Option<u64>) -> Self {
        self.max_bytes_approx = max;
        self
    }

    pub fn with_coalesce_plain_runs(mut self, enabled: bool) -> Self {
        self.coalesce_plain_runs = enabled;
        self
    }
}

/// One entry of an [`AssemblerDiff`] (`spec.md` §4.5).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Change {
    BlockStarted { id: BlockID, kind: BlockKind, position: usize },
    RunsAppended { id: BlockID, added: usize },
    CodeAppended { id: BlockID, added_bytes: usize },
    TableHeaderConfirmed { id: BlockID },
    TableRowAppended { id: BlockID, row_index: usize },
    BlockEnded { id: BlockID },
    BlocksDiscarded { range: Range<usize> },
}

/// A versioned, ordered change list produced by one [`Assembler::apply`]
/// call. `document_version` increases by one exactly when `changes` is
/// non-empty (`spec.md` §3, property law 3).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssemblerDiff {
    pub document_version: u64,
    pub changes: Vec<Change>,
}

/// The mutable record backing one block. Never exposed directly; queries
/// return a [`BlockSnapshot`] copy instead, the same pattern the teacher
/// uses to keep its CST nodes private behind a cheap, cloneable view type.
struct BlockEntry {
    id: BlockID,
    kind: BlockKind,
    inline_runs: Option<Vec<InlineRun>>,
    code_text: Option<String>,
    table: Option<TableSnapshot>,
    is_closed: bool,
    parent_id: Option<BlockID>,
    approx_bytes: u64,
}

impl BlockEntry {
    fn new(id: BlockID, kind: BlockKind, parent_id: Option<BlockID>) -> Self {
        Self { id, kind, inline_runs: None, code_text: None, table: None, is_closed: false, parent_id, approx_bytes: 0 }
    }
}

/// Folds tokenizer [`ChunkResult`]s into a persistent, addressable block
/// list and emits versioned [`AssemblerDiff`]s (`spec.md` §4.5). Blocks are
/// stored in an indexed `Vec` with an id→index side map rather than a
/// pointer graph, so truncation is a plain range removal — the same
/// arena-plus-index shape the teacher uses for its syntax tree.
pub struct Assembler {
    config: AssemblerConfig,
    entries: Vec<BlockEntry>,
    index_by_id: HashMap<BlockID, usize>,
    closed_block_count: usize,
    approx_bytes: u64,
    document_version: u64,
    /// Ids of blocks that have started but not yet ended, innermost last.
    /// Tracks real nesting as events are applied, independent of whether a
    /// block happens to still be open by the end of the chunk — a one-shot
    /// leaf (a heading, a horizontal rule, a `\[...\]` math block that
    /// closes on its own opening line) starts and ends within a single
    /// `apply` call and never appears in that chunk's `open_blocks`, but
    /// still needs its immediate container as `parent_id`.
    open_stack: Vec<BlockID>,
}

impl Assembler {
    pub fn new(config: AssemblerConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            index_by_id: HashMap::new(),
            closed_block_count: 0,
            approx_bytes: 0,
            document_version: 0,
            open_stack: Vec::new(),
        }
    }

    pub fn apply(&mut self, chunk: ChunkResult) -> AssemblerDiff {
        let final_open_ids: Vec<BlockID> = chunk.open_blocks.iter().map(|b| b.id).collect();
        let mut changes = Vec::new();
        for event in chunk.events {
            match event {
                Event::BlockStart { id, kind } => self.apply_block_start(id, kind, &final_open_ids, &mut changes),
                Event::BlockAppendInline { id, runs } => self.apply_append_inline(id, runs, &mut changes),
                Event::BlockAppendFencedCode { id, text } => self.apply_append_fenced_code(id, text, &mut changes),
                Event::TableHeaderCandidate { id, cells } => self.apply_table_header_candidate(id, cells),
                Event::TableHeaderConfirmed { id, alignments } => {
                    self.apply_table_header_confirmed(id, alignments, &mut changes)
                }
                Event::TableAppendRow { id, cells } => self.apply_table_append_row(id, cells, &mut changes),
                Event::BlockEnd { id } => self.apply_block_end(id, &mut changes),
            }
        }
        self.maybe_truncate(&mut changes);
        if !changes.is_empty() {
            self.document_version = self.document_version.wrapping_add(1);
        }
        AssemblerDiff { document_version: self.document_version, changes }
    }

    /// Implements `spec.md` §4.5's insertion-position algorithm: a new
    /// block is placed next to whichever still-open neighbor (forward,
    /// then backward) already has a known position, so document order is
    /// preserved even though events arrive in close-order, not open-order.
    fn insertion_position(&self, new_id: BlockID, final_open_ids: &[BlockID]) -> usize {
        if final_open_ids.is_empty() {
            return self.entries.len();
        }
        let Some(k) = final_open_ids.iter().position(|&id| id == new_id) else {
            return self.entries.len();
        };
        for &candidate in &final_open_ids[k + 1..] {
            if let Some(&p) = self.index_by_id.get(&candidate) {
                return p;
            }
        }
        for &candidate in final_open_ids[..k].iter().rev() {
            if let Some(&p) = self.index_by_id.get(&candidate) {
                return p + 1;
            }
        }
        self.entries.len()
    }

    fn apply_block_start(
        &mut self,
        id: BlockID,
        kind: BlockKind,
        final_open_ids: &[BlockID],
        changes: &mut Vec<Change>,
    ) {
        if self.index_by_id.contains_key(&id) {
            return;
        }
        let position = self.insertion_position(id, final_open_ids);
        let parent_id = self.open_stack.last().copied();
        self.entries.insert(position, BlockEntry::new(id, kind.clone(), parent_id));
        for i in position..self.entries.len() {
            self.index_by_id.insert(self.entries[i].id, i);
        }
        self.open_stack.push(id);
        changes.push(Change::BlockStarted { id, kind, position });
    }

    fn apply_append_inline(&mut self, id: BlockID, runs: Vec<InlineRun>, changes: &mut Vec<Change>) {
        let Some(&idx) = self.index_by_id.get(&id) else { return };
        let entry = &mut self.entries[idx];
        if entry.is_closed || !entry.kind.holds_inline_runs() {
            return;
        }
        let added_bytes: u64 = runs.iter().map(|r| r.byte_len() as u64).sum();
        let inline_runs = entry.inline_runs.get_or_insert_with(Vec::new);
        let added = append_coalescing(inline_runs, runs, self.config.coalesce_plain_runs);
        entry.approx_bytes += added_bytes;
        self.approx_bytes += added_bytes;
        changes.push(Change::RunsAppended { id, added });
    }

    fn apply_append_fenced_code(&mut self, id: BlockID, text: String, changes: &mut Vec<Change>) {
        if text.is_empty() {
            return;
        }
        let Some(&idx) = self.index_by_id.get(&id) else { return };
        let entry = &mut self.entries[idx];
        if entry.is_closed || !entry.kind.holds_code_text() {
            return;
        }
        let added_bytes = text.len();
        entry.code_text.get_or_insert_with(String::new).push_str(&text);
        entry.approx_bytes += added_bytes as u64;
        self.approx_bytes += added_bytes as u64;
        changes.push(Change::CodeAppended { id, added_bytes });
    }

    /// No diff change is emitted for a header candidate (`spec.md` §4.5);
    /// the byte delta is clamped to zero on shrink per the open question
    /// in `spec.md` §9.
    fn apply_table_header_candidate(&mut self, id: BlockID, cells: Vec<Vec<InlineRun>>) {
        let Some(&idx) = self.index_by_id.get(&id) else { return };
        let entry = &mut self.entries[idx];
        if entry.is_closed || !entry.kind.holds_table() {
            return;
        }
        let new_bytes: u64 = cells.iter().flatten().map(|r| r.byte_len() as u64).sum();
        let old_bytes: u64 = entry
            .table
            .as_ref()
            .and_then(|t| t.header_cells.as_ref())
            .map(|hc| hc.iter().flatten().map(|r| r.byte_len() as u64).sum())
            .unwrap_or(0);
        let table = entry.table.get_or_insert_with(TableSnapshot::default);
        table.header_cells = Some(cells);
        if new_bytes >= old_bytes {
            let delta = new_bytes - old_bytes;
            entry.approx_bytes += delta;
            self.approx_bytes += delta;
        } else {
            let delta = old_bytes - new_bytes;
            entry.approx_bytes = entry.approx_bytes.saturating_sub(delta);
            self.approx_bytes = self.approx_bytes.saturating_sub(delta);
        }
    }

    fn apply_table_header_confirmed(&mut self, id: BlockID, alignments: Vec<Alignment>, changes: &mut Vec<Change>) {
        let Some(&idx) = self.index_by_id.get(&id) else { return };
        let entry = &mut self.entries[idx];
        if entry.is_closed || !entry.kind.holds_table() {
            return;
        }
        let table = entry.table.get_or_insert_with(TableSnapshot::default);
        table.alignments = Some(alignments);
        table.is_header_confirmed = true;
        changes.push(Change::TableHeaderConfirmed { id });
    }

    fn apply_table_append_row(&mut self, id: BlockID, cells: Vec<Vec<InlineRun>>, changes: &mut Vec<Change>) {
        let Some(&idx) = self.index_by_id.get(&id) else { return };
        let entry = &mut self.entries[idx];
        if entry.is_closed || !entry.kind.holds_table() {
            return;
        }
        let added_bytes: u64 = cells.iter().flatten().map(|r| r.byte_len() as u64).sum();
        let table = entry.table.get_or_insert_with(TableSnapshot::default);
        table.rows.push(cells);
        let row_index = table.rows.len() - 1;
        entry.approx_bytes += added_bytes;
        self.approx_bytes += added_bytes;
        changes.push(Change::TableRowAppended { id, row_index });
    }

    fn apply_block_end(&mut self, id: BlockID, changes: &mut Vec<Change>) {
        let Some(&idx) = self.index_by_id.get(&id) else { return };
        let entry = &mut self.entries[idx];
        if entry.is_closed {
            return;
        }
        entry.is_closed = true;
        self.closed_block_count += 1;
        if let Some(pos) = self.open_stack.iter().rposition(|&open_id| open_id == id) {
            self.open_stack.remove(pos);
        }
        changes.push(Change::BlockEnded { id });
    }

    /// Removes the earliest closed blocks while `maxClosedBlocks` or
    /// `maxBytesApprox` is exceeded. Restricted to a contiguous prefix
    /// starting at position 0, resolving the non-contiguous-truncation
    /// open question in `spec.md` §9 option (a).
    fn maybe_truncate(&mut self, changes: &mut Vec<Change>) {
        let mut removed = 0usize;
        loop {
            let over_count = self.config.max_closed_blocks.is_some_and(|max| self.closed_block_count > max as usize);
            let over_bytes = self.config.max_bytes_approx.is_some_and(|max| self.approx_bytes > max)
                && self.closed_block_count > 0;
            if !(over_count || over_bytes) {
                break;
            }
            let Some(first) = self.entries.first() else { break };
            if !first.is_closed {
                break;
            }
            let removed_entry = self.entries.remove(0);
            self.index_by_id.remove(&removed_entry.id);
            self.approx_bytes = self.approx_bytes.saturating_sub(removed_entry.approx_bytes);
            self.closed_block_count -= 1;
            removed += 1;
        }
        if removed > 0 {
            for (i, entry) in self.entries.iter().enumerate() {
                self.index_by_id.insert(entry.id, i);
            }
            changes.push(Change::BlocksDiscarded { range: 0..removed });
        }
    }

    pub fn block_count(&self) -> usize {
        self.entries.len()
    }

    pub fn block_id(&self, position: usize) -> BlockID {
        assert!(
            position < self.entries.len(),
            "block_id: position {position} out of bounds (block_count={})",
            self.entries.len()
        );
        self.entries[position].id
    }

    pub fn block(&self, id: BlockID) -> BlockSnapshot {
        let idx = *self.index_by_id.get(&id).unwrap_or_else(|| panic!("block: unknown block id {id}"));
        self.make_entry_snapshot(idx)
    }

    pub fn make_snapshot(&self) -> Vec<BlockSnapshot> {
        (0..self.entries.len()).map(|i| self.make_entry_snapshot(i)).collect()
    }

    fn depth_of(&self, mut parent_id: Option<BlockID>) -> u32 {
        let mut depth = 0;
        while let Some(pid) = parent_id {
            depth += 1;
            parent_id = self.index_by_id.get(&pid).and_then(|&i| self.entries[i].parent_id);
        }
        depth
    }

    fn make_entry_snapshot(&self, idx: usize) -> BlockSnapshot {
        let entry = &self.entries[idx];
        let child_ids =
            self.entries.iter().filter(|e| e.parent_id == Some(entry.id)).map(|e| e.id).collect();
        BlockSnapshot {
            id: entry.id,
            kind: entry.kind.clone(),
            inline_runs: entry.inline_runs.clone(),
            code_text: entry.code_text.clone(),
            table: entry.table.clone(),
            is_closed: entry.is_closed,
            parent_id: entry.parent_id,
            depth: self.depth_of(entry.parent_id),
            child_ids,
        }
    }
}
