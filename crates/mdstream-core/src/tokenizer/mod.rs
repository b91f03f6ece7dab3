//! Block-level scanner and inline dispatcher (`spec.md` §4.4). Operates
//! line-by-line over the growing [`StreamingTextBuffer`]: block constructs
//! in the accepted subset (§6) are inherently line-anchored (a fence
//! opens on its own line, a list marker starts a line, a blank line always
//! terminates a paragraph), so a line-buffered scanner covers the whole
//! grammar without needing byte-level suspension inside a single line.
//! Suspension across chunks (`spec.md`'s "suspension boundary") still
//! applies at two finer grains: a line that hasn't arrived yet (buffered
//! by [`StreamingTextBuffer`] itself), and an inline construct left
//! unresolved mid-line (carried in [`inline_scan::InlineScanState`]).

mod inline_scan;
mod table;

use crate::block::{BlockID, BlockIDAllocator, BlockKind, OpenBlockState, TaskState};
use crate::event::{ChunkResult, Event};
use crate::inline::InlineRun;
use crate::lookbehind::CircularLookbehind;
use crate::text::StreamingTextBuffer;
use inline_scan::InlineScanState;

#[derive(Debug, Clone, PartialEq)]
enum ContainerKind {
    Blockquote,
    ListItem { ordered: bool, index: Option<u64>, task: Option<TaskState> },
}

struct ContainerFrame {
    id: BlockID,
    kind: ContainerKind,
    /// Leading columns this container's own marker consumes on a
    /// continuation line. Meaningful only for `ListItem`; blockquote
    /// continuation is re-derived from the marker shape every line.
    marker_width: usize,
}

enum LeafKind {
    Paragraph,
    FencedCode { fence_char: u8, fence_len: usize, language: Option<String> },
    /// `display_dollar` distinguishes the `$$…$$` fence form from the
    /// `\[…\]` form, which may also close on the opening line.
    Math { display_dollar: bool },
    Table { awaiting_delimiter: bool },
}

struct LeafFrame {
    id: BlockID,
    kind: LeafKind,
    inline_state: InlineScanState,
    /// Whether at least one content line has already been appended —
    /// used to decide whether the next paragraph line needs a
    /// soft-break space joined in front of it.
    started_line: bool,
    /// Set when the previous paragraph line ended with a hard-break
    /// marker (trailing two spaces, or a trailing backslash): the next
    /// line joins with an embedded `\n` instead of the usual soft-break
    /// space (`spec.md` §4.4).
    hard_break_pending: bool,
}

enum LineAction {
    CloseLeaf,
    AppendCode(String),
    CloseMath(Option<String>),
    TableRow,
    ParagraphLine,
    CloseThenRestart,
}

/// Converts a growing byte stream into [`Event`]s and a current open-block
/// stack (`spec.md` §4.4). Owns no tree state of its own — see
/// [`crate::assembler::Assembler`] for that.
pub struct Tokenizer {
    text: StreamingTextBuffer,
    lookbehind: CircularLookbehind,
    ids: BlockIDAllocator,
    next_scan_pos: usize,
    containers: Vec<ContainerFrame>,
    leaf: Option<LeafFrame>,
    events: Vec<Event>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            text: StreamingTextBuffer::new(),
            lookbehind: CircularLookbehind::default(),
            ids: BlockIDAllocator::default(),
            next_scan_pos: 0,
            containers: Vec::new(),
            leaf: None,
            events: Vec::new(),
        }
    }

    pub fn feed(&mut self, chunk: &str) -> ChunkResult {
        self.text.append(chunk);
        self.events.clear();
        self.drain_complete_lines();
        self.make_result()
    }

    /// Closes any still-open blocks and flushes a final, newline-less
    /// trailing line, if any (`spec.md` §4.4).
    pub fn finish(&mut self) -> ChunkResult {
        self.events.clear();
        self.drain_complete_lines();
        if self.next_scan_pos < self.text.len() {
            let line = self.text.as_str()[self.next_scan_pos..].to_string();
            self.next_scan_pos = self.text.len();
            self.process_line(&line);
            self.advance_lookbehind(&line, false);
        }
        self.close_leaf();
        while let Some(frame) = self.containers.pop() {
            self.events.push(Event::BlockEnd { id: frame.id });
        }
        self.make_result()
    }

    #[cfg(feature = "debug-tracing")]
    pub fn debug_open_blocks(&self) -> Vec<BlockID> {
        self.containers
            .iter()
            .map(|c| c.id)
            .chain(self.leaf.as_ref().map(|l| l.id))
            .collect()
    }

    #[cfg(feature = "debug-tracing")]
    pub fn debug_recent_chars(&self, k: usize) -> String {
        (0..k).rev().filter_map(|i| self.lookbehind.recent(i)).collect()
    }

    fn drain_complete_lines(&mut self) {
        loop {
            let haystack = &self.text.as_str()[self.next_scan_pos..];
            match haystack.find('\n') {
                Some(rel) => {
                    let line = haystack[..rel].to_string();
                    self.next_scan_pos += rel + 1;
                    self.process_line(&line);
                    self.advance_lookbehind(&line, true);
                }
                None => break,
            }
        }
    }

    /// Feeds `line`'s characters into the lookbehind ring *after*
    /// `process_line` has already consulted it, so a block-opening
    /// decision on the next line sees only genuinely preceding context
    /// (`spec.md` §4.2) rather than its own still-unprocessed content.
    fn advance_lookbehind(&mut self, line: &str, had_newline: bool) {
        for c in line.chars() {
            self.lookbehind.append(c);
        }
        if had_newline {
            self.lookbehind.append('\n');
        }
    }

    /// True when the line about to be scanned is either the first line of
    /// the document or directly follows a blank line — the context
    /// `spec.md` §4.2 names for deciding whether a pipe row opens a table
    /// candidate, as opposed to being a stray `|` inside running prose.
    fn preceded_by_blank_line_or_start(&self) -> bool {
        self.lookbehind.is_empty()
            || matches!((self.lookbehind.recent(0), self.lookbehind.recent(1)), (Some('\n'), Some('\n')))
    }

    fn make_result(&self) -> ChunkResult {
        let mut open_blocks = Vec::with_capacity(self.containers.len() + 1);
        for c in &self.containers {
            open_blocks.push(OpenBlockState { id: c.id, kind: container_block_kind(&c.kind) });
        }
        if let Some(leaf) = &self.leaf {
            open_blocks.push(OpenBlockState { id: leaf.id, kind: leaf_block_kind(&leaf.kind) });
        }
        ChunkResult { events: self.events.clone(), open_blocks }
    }

    fn process_line(&mut self, raw_line: &str) {
        let (matched, rest) = self.strip_containers(raw_line);
        self.close_containers_beyond(matched);

        let mut rest = rest;
        loop {
            if let Some(after) = strip_blockquote_marker(rest) {
                self.close_leaf();
                self.open_container(ContainerKind::Blockquote, 0);
                rest = after;
                continue;
            }
            if !is_horizontal_rule(rest) {
                if let Some((kind, width)) = try_list_marker(rest) {
                    self.close_leaf();
                    self.open_container(kind, width);
                    rest = &rest[width..];
                    continue;
                }
            }
            break;
        }
        self.dispatch_leaf(rest);
    }

    fn strip_containers<'a>(&self, mut line: &'a str) -> (usize, &'a str) {
        let mut matched = 0;
        for frame in &self.containers {
            match &frame.kind {
                ContainerKind::Blockquote => match strip_blockquote_marker(line) {
                    Some(after) => {
                        line = after;
                        matched += 1;
                    }
                    None => break,
                },
                ContainerKind::ListItem { .. } => match strip_indent(line, frame.marker_width) {
                    Some(after) => {
                        line = after;
                        matched += 1;
                    }
                    None if line.trim().is_empty() => matched += 1,
                    None => break,
                },
            }
        }
        (matched, line)
    }

    fn close_containers_beyond(&mut self, matched: usize) {
        if matched < self.containers.len() {
            self.close_leaf();
        }
        while self.containers.len() > matched {
            let frame = self.containers.pop().expect("len() > matched implies a frame exists");
            self.events.push(Event::BlockEnd { id: frame.id });
        }
    }

    fn open_container(&mut self, kind: ContainerKind, marker_width: usize) {
        let id = self.ids.next();
        let block_kind = container_block_kind(&kind);
        self.events.push(Event::BlockStart { id, kind: block_kind });
        self.containers.push(ContainerFrame { id, kind, marker_width });
    }

    fn dispatch_leaf(&mut self, rest: &str) {
        if rest.trim().is_empty() {
            self.close_leaf();
            return;
        }

        let action = match self.leaf.as_ref().map(|l| &l.kind) {
            Some(LeafKind::FencedCode { fence_char, fence_len, .. }) => {
                if is_closing_fence(rest, *fence_char, *fence_len) {
                    LineAction::CloseLeaf
                } else {
                    LineAction::AppendCode(format!("{rest}\n"))
                }
            }
            Some(LeafKind::Math { display_dollar }) => {
                let closes = if *display_dollar { rest.trim() == "$$" } else { rest.contains("\\]") };
                if closes {
                    let prefix = if *display_dollar {
                        None
                    } else {
                        rest.find("\\]").map(|pos| rest[..pos].to_string()).filter(|s| !s.is_empty())
                    };
                    LineAction::CloseMath(prefix)
                } else {
                    LineAction::AppendCode(format!("{rest}\n"))
                }
            }
            Some(LeafKind::Table { .. }) => {
                if rest.contains('|') {
                    LineAction::TableRow
                } else {
                    LineAction::CloseThenRestart
                }
            }
            Some(LeafKind::Paragraph) => {
                if starts_new_block(rest) {
                    LineAction::CloseThenRestart
                } else {
                    LineAction::ParagraphLine
                }
            }
            None => LineAction::CloseThenRestart,
        };

        match action {
            LineAction::CloseLeaf => self.close_leaf(),
            LineAction::AppendCode(text) => self.append_code(text),
            LineAction::CloseMath(prefix) => {
                if let Some(prefix) = prefix {
                    self.append_code(prefix);
                }
                self.close_leaf();
            }
            LineAction::TableRow => self.append_table_row(rest),
            LineAction::ParagraphLine => self.append_paragraph_line(rest),
            LineAction::CloseThenRestart => {
                self.close_leaf();
                self.start_new_leaf(rest);
            }
        }
    }

    fn append_code(&mut self, text: String) {
        let id = self.leaf.as_ref().expect("append_code requires an open leaf").id;
        self.events.push(Event::BlockAppendFencedCode { id, text });
    }

    fn append_paragraph_line(&mut self, rest: &str) {
        let (content, ends_hard_break) = strip_hard_break_marker(rest);
        let leaf = self.leaf.as_mut().expect("append_paragraph_line requires an open leaf");
        let id = leaf.id;
        let joined = if leaf.started_line {
            if leaf.hard_break_pending { format!("\n{content}") } else { format!(" {content}") }
        } else {
            content.to_string()
        };
        leaf.started_line = true;
        leaf.hard_break_pending = ends_hard_break;
        let runs = inline_scan::scan_inline(&mut leaf.inline_state, &joined, false);
        if !runs.is_empty() {
            self.events.push(Event::BlockAppendInline { id, runs });
        }
    }

    fn append_table_row(&mut self, rest: &str) {
        let leaf = self.leaf.as_ref().expect("append_table_row requires an open leaf");
        let id = leaf.id;
        let awaiting = matches!(leaf.kind, LeafKind::Table { awaiting_delimiter: true });
        if awaiting {
            if let Some(alignments) = table::parse_delimiter_row(rest) {
                if let Some(LeafKind::Table { awaiting_delimiter }) = self.leaf.as_mut().map(|l| &mut l.kind) {
                    *awaiting_delimiter = false;
                }
                self.events.push(Event::TableHeaderConfirmed { id, alignments });
                return;
            }
            if let Some(LeafKind::Table { awaiting_delimiter }) = self.leaf.as_mut().map(|l| &mut l.kind) {
                *awaiting_delimiter = false;
            }
        }
        let cells: Vec<Vec<InlineRun>> = table::split_row_cells(rest).into_iter().map(|c| scan_cell(&c)).collect();
        self.events.push(Event::TableAppendRow { id, cells });
    }

    fn start_new_leaf(&mut self, rest: &str) {
        if rest.trim().is_empty() {
            return;
        }
        if let Some(level) = atx_heading_level(rest) {
            let id = self.ids.next();
            self.events.push(Event::BlockStart { id, kind: BlockKind::Heading { level } });
            let content = atx_heading_content(rest, level);
            let runs = scan_cell(content);
            if !runs.is_empty() {
                self.events.push(Event::BlockAppendInline { id, runs });
            }
            self.events.push(Event::BlockEnd { id });
            return;
        }
        if is_horizontal_rule(rest) {
            let id = self.ids.next();
            self.events.push(Event::BlockStart { id, kind: BlockKind::HorizontalRule });
            self.events.push(Event::BlockEnd { id });
            return;
        }
        if let Some((fence_char, fence_len, language)) = fence_opener(rest) {
            let id = self.ids.next();
            self.events.push(Event::BlockStart { id, kind: BlockKind::FencedCode { language: language.clone() } });
            self.leaf = Some(LeafFrame {
                id,
                kind: LeafKind::FencedCode { fence_char, fence_len, language },
                inline_state: InlineScanState::default(),
                started_line: true,
                hard_break_pending: false,
            });
            return;
        }
        if rest.trim() == "$$" {
            let id = self.ids.next();
            self.events.push(Event::BlockStart { id, kind: BlockKind::Math { display: true } });
            self.leaf = Some(LeafFrame {
                id,
                kind: LeafKind::Math { display_dollar: true },
                inline_state: InlineScanState::default(),
                started_line: true,
                hard_break_pending: false,
            });
            return;
        }
        if let Some(after) = rest.strip_prefix("\\[") {
            let id = self.ids.next();
            self.events.push(Event::BlockStart { id, kind: BlockKind::Math { display: true } });
            if let Some(pos) = after.find("\\]") {
                if pos > 0 {
                    self.events.push(Event::BlockAppendFencedCode { id, text: after[..pos].to_string() });
                }
                self.events.push(Event::BlockEnd { id });
            } else {
                if !after.is_empty() {
                    self.events.push(Event::BlockAppendFencedCode { id, text: format!("{after}\n") });
                }
                self.leaf = Some(LeafFrame {
                    id,
                    kind: LeafKind::Math { display_dollar: false },
                    inline_state: InlineScanState::default(),
                    started_line: true,
                    hard_break_pending: false,
                });
            }
            return;
        }
        if rest.contains('|') && self.preceded_by_blank_line_or_start() {
            let id = self.ids.next();
            self.events.push(Event::BlockStart { id, kind: BlockKind::Table });
            let cells: Vec<Vec<InlineRun>> =
                table::split_row_cells(rest).into_iter().map(|c| scan_cell(&c)).collect();
            self.events.push(Event::TableHeaderCandidate { id, cells });
            self.leaf = Some(LeafFrame {
                id,
                kind: LeafKind::Table { awaiting_delimiter: true },
                inline_state: InlineScanState::default(),
                started_line: true,
                hard_break_pending: false,
            });
            return;
        }

        let id = self.ids.next();
        self.events.push(Event::BlockStart { id, kind: BlockKind::Paragraph });
        self.leaf = Some(LeafFrame {
            id,
            kind: LeafKind::Paragraph,
            inline_state: InlineScanState::default(),
            started_line: false,
            hard_break_pending: false,
        });
        self.append_paragraph_line(rest);
    }

    fn close_leaf(&mut self) {
        if let Some(mut leaf) = self.leaf.take() {
            if matches!(leaf.kind, LeafKind::Paragraph) {
                let trailing = inline_scan::scan_inline(&mut leaf.inline_state, "", true);
                if !trailing.is_empty() {
                    self.events.push(Event::BlockAppendInline { id: leaf.id, runs: trailing });
                }
            }
            self.events.push(Event::BlockEnd { id: leaf.id });
        }
    }
}

fn scan_cell(text: &str) -> Vec<InlineRun> {
    let mut state = InlineScanState::default();
    inline_scan::scan_inline(&mut state, text, true)
}

fn leaf_block_kind(kind: &LeafKind) -> BlockKind {
    match kind {
        LeafKind::Paragraph => BlockKind::Paragraph,
        LeafKind::FencedCode { language, .. } => BlockKind::FencedCode { language: language.clone() },
        LeafKind::Math { .. } => BlockKind::Math { display: true },
        LeafKind::Table { .. } => BlockKind::Table,
    }
}

fn container_block_kind(kind: &ContainerKind) -> BlockKind {
    match kind {
        ContainerKind::Blockquote => BlockKind::Blockquote,
        ContainerKind::ListItem { ordered, index, task } => {
            BlockKind::ListItem { ordered: *ordered, index: *index, task: *task }
        }
    }
}

/// Strips a trailing hard-break marker (`spec.md` §4.4: two or more
/// trailing spaces, or a trailing backslash) from a paragraph line,
/// reporting whether one was found.
fn strip_hard_break_marker(rest: &str) -> (&str, bool) {
    if let Some(stripped) = rest.strip_suffix('\\') {
        return (stripped, true);
    }
    let trimmed = rest.trim_end_matches(' ');
    if rest.len() - trimmed.len() >= 2 {
        return (trimmed, true);
    }
    (rest, false)
}

fn strip_blockquote_marker(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    let mut idx = 0;
    let mut spaces = 0;
    while spaces < 3 && bytes.get(idx) == Some(&b' ') {
        idx += 1;
        spaces += 1;
    }
    if bytes.get(idx) != Some(&b'>') {
        return None;
    }
    idx += 1;
    if bytes.get(idx) == Some(&b' ') {
        idx += 1;
    }
    Some(&line[idx..])
}

fn strip_indent(line: &str, width: usize) -> Option<&str> {
    let leading = line.bytes().take_while(|&b| b == b' ').count();
    if leading >= width {
        Some(&line[width..])
    } else {
        None
    }
}

fn try_list_marker(rest: &str) -> Option<(ContainerKind, usize)> {
    let bytes = rest.as_bytes();
    if let Some(&first) = bytes.first() {
        if matches!(first, b'-' | b'*' | b'+') && matches!(bytes.get(1), Some(b' ') | None) {
            let mut width = if bytes.get(1) == Some(&b' ') { 2 } else { 1 };
            let task = read_task_marker(rest, &mut width);
            return Some((ContainerKind::ListItem { ordered: false, index: None, task }, width));
        }
    }
    let digit_len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digit_len > 0 && digit_len <= 9 {
        if let Some(&sep) = bytes.get(digit_len) {
            if (sep == b'.' || sep == b')') && matches!(bytes.get(digit_len + 1), Some(b' ') | None) {
                let index: u64 = rest[..digit_len].parse().ok()?;
                let mut width = digit_len + if bytes.get(digit_len + 1) == Some(&b' ') { 2 } else { 1 };
                let task = read_task_marker(rest, &mut width);
                return Some((ContainerKind::ListItem { ordered: true, index: Some(index), task }, width));
            }
        }
    }
    None
}

fn read_task_marker(rest: &str, width: &mut usize) -> Option<TaskState> {
    let tail = rest.get(*width..)?;
    if tail.starts_with("[ ] ") {
        *width += 4;
        Some(TaskState { checked: false })
    } else if tail.starts_with("[x] ") || tail.starts_with("[X] ") {
        *width += 4;
        Some(TaskState { checked: true })
    } else {
        None
    }
}

fn atx_heading_level(rest: &str) -> Option<u8> {
    let hashes = rest.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match rest.as_bytes().get(hashes) {
        Some(b' ') | None => Some(hashes as u8),
        _ => None,
    }
}

fn atx_heading_content(rest: &str, level: u8) -> &str {
    rest[level as usize..].trim_start_matches(' ').trim_end()
}

fn is_horizontal_rule(rest: &str) -> bool {
    let trimmed: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
    if trimmed.len() < 3 {
        return false;
    }
    let first = trimmed.chars().next().unwrap();
    matches!(first, '*' | '-' | '_') && trimmed.chars().all(|c| c == first)
}

fn fence_opener(rest: &str) -> Option<(u8, usize, Option<String>)> {
    let bytes = rest.as_bytes();
    let first = *bytes.first()?;
    if first != b'`' && first != b'~' {
        return None;
    }
    let len = bytes.iter().take_while(|&&b| b == first).count();
    if len < 3 {
        return None;
    }
    let language = rest[len..].trim();
    Some((first, len, if language.is_empty() { None } else { Some(language.to_string()) }))
}

fn is_closing_fence(rest: &str, fence_char: u8, fence_len: usize) -> bool {
    let trimmed = rest.trim();
    let bytes = trimmed.as_bytes();
    !bytes.is_empty() && bytes.len() >= fence_len && bytes.iter().all(|&b| b == fence_char)
}

fn starts_new_block(rest: &str) -> bool {
    atx_heading_level(rest).is_some()
        || is_horizontal_rule(rest)
        || fence_opener(rest).is_some()
        || rest.trim() == "$$"
        || rest.starts_with("\\[")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(chunks: &[&str]) -> Vec<ChunkResult> {
        let mut tokenizer = Tokenizer::new();
        let mut results: Vec<ChunkResult> = chunks.iter().map(|c| tokenizer.feed(c)).collect();
        results.push(tokenizer.finish());
        results
    }

    #[test]
    fn paragraph_closes_on_blank_line() {
        let results = run(&["Hello ", "world", "\n\n"]);
        let events: Vec<&Event> = results.iter().flat_map(|r| &r.events).collect();
        assert!(events.iter().any(|e| matches!(e, Event::BlockStart { kind: BlockKind::Paragraph, .. })));
        assert!(events.iter().any(|e| matches!(e, Event::BlockEnd { .. })));
    }

    #[test]
    fn soft_break_becomes_a_single_space() {
        let mut tokenizer = Tokenizer::new();
        let mut events = Vec::new();
        events.extend(
            tokenizer
                .feed("Readability, however, is emphasized above all else. A Markdown-formatted\ndocument should be publishable as-is.\n\n")
                .events,
        );
        events.extend(tokenizer.finish().events);
        let mut combined = String::new();
        for event in &events {
            if let Event::BlockAppendInline { runs, .. } = event {
                for run in runs {
                    combined.push_str(&run.text);
                }
            }
        }
        assert!(combined.contains("Markdown-formatted document"));
    }

    #[test]
    fn trailing_two_spaces_become_an_embedded_newline() {
        let results = run(&["line one  \n", "line two\n", "\n"]);
        let events: Vec<&Event> = results.iter().flat_map(|r| &r.events).collect();
        let mut combined = String::new();
        for event in &events {
            if let Event::BlockAppendInline { runs, .. } = event {
                for run in runs {
                    combined.push_str(&run.text);
                }
            }
        }
        assert_eq!(combined, "line one\nline two");
    }

    #[test]
    fn fenced_code_accumulates_raw_text() {
        let results = run(&["```swift\n", "print(1)\n", "```\n"]);
        let events: Vec<&Event> = results.iter().flat_map(|r| &r.events).collect();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::BlockStart { kind: BlockKind::FencedCode { language: Some(l) }, .. } if l == "swift"
        )));
        let code: String = events
            .iter()
            .filter_map(|e| match e {
                Event::BlockAppendFencedCode { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(code, "print(1)\n");
    }

    #[test]
    fn pipe_table_confirms_header_from_delimiter_row() {
        let results = run(&["| H1 | H2 |\n", "| :-- | --: |\n", "| a | b |\n", "\n"]);
        let events: Vec<&Event> = results.iter().flat_map(|r| &r.events).collect();
        assert!(events.iter().any(|e| matches!(e, Event::TableHeaderCandidate { .. })));
        assert!(events.iter().any(|e| matches!(e, Event::TableHeaderConfirmed { .. })));
        assert!(events.iter().any(|e| matches!(e, Event::TableAppendRow { .. })));
    }

    #[test]
    fn pipe_row_without_a_preceding_blank_line_is_not_a_table() {
        let results = run(&["# Heading\n", "| a | b |\n", "\n"]);
        let events: Vec<&Event> = results.iter().flat_map(|r| &r.events).collect();
        assert!(!events.iter().any(|e| matches!(e, Event::BlockStart { kind: BlockKind::Table, .. })));
        assert!(events.iter().any(|e| matches!(e, Event::BlockStart { kind: BlockKind::Paragraph, .. })));
    }

    #[test]
    fn blockquote_wraps_a_nested_paragraph() {
        let results = run(&["> quoted text\n", "\n"]);
        let events: Vec<&Event> = results.iter().flat_map(|r| &r.events).collect();
        assert!(events.iter().any(|e| matches!(e, Event::BlockStart { kind: BlockKind::Blockquote, .. })));
        assert!(events.iter().any(|e| matches!(e, Event::BlockStart { kind: BlockKind::Paragraph, .. })));
    }
}
