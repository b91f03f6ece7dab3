use std::ops::Range;

/// An append-only buffer of the document text seen so far.
///
/// Unlike the teacher's `TextPointer` (a flyweight `Rc<str>` slice over text
/// that is already complete at parse time), this buffer is still growing, so
/// it owns a single `String` and hands out byte ranges rather than cheap
/// sub-slices of a shared allocation. Callers that need to retain text
/// beyond the buffer's lifetime (an `InlineRun`'s text, a code block's
/// accumulated bytes) copy it out; the buffer itself is only ever read
/// forward from the last position the tokenizer has committed.
#[derive(Debug, Default)]
pub struct StreamingTextBuffer {
    text: String,
}

impl StreamingTextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and returns the byte range it now occupies in the
    /// buffer.
    pub fn append(&mut self, chunk: &str) -> Range<usize> {
        let start = self.text.len();
        self.text.push_str(chunk);
        start..self.text.len()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The largest index `<= idx` that is a *stable boundary*: a position
    /// before which the tokenizer's state may be safely discarded, because
    /// no construct starting before that position can still be open at
    /// `idx`. See `spec.md` §4.1 for the precedence of the four rules.
    pub fn last_stable_boundary(&self, before: usize) -> usize {
        let before = before.min(self.text.len());
        let head = &self.text.as_bytes()[..before];

        if let Some(pos) = rfind_fence_start(head) {
            return pos;
        }
        if let Some(pos) = rfind_blank_line_end(head) {
            return pos;
        }
        rfind_line_start(head)
    }
}

/// Finds the start of the last `\n```` or `\n~~~` occurring strictly before
/// `head.len()`, returning the index of the `\n`.
fn rfind_fence_start(head: &[u8]) -> Option<usize> {
    let mut search_end = head.len();
    loop {
        let nl = memchr::memrchr(b'\n', &head[..search_end])?;
        let rest = &head[nl + 1..];
        if rest.starts_with(b"```") || rest.starts_with(b"~~~") {
            return Some(nl);
        }
        search_end = nl;
        if search_end == 0 {
            return None;
        }
    }
}

/// Finds the index immediately after the last `\n\n` occurring before
/// `head.len()`.
fn rfind_blank_line_end(head: &[u8]) -> Option<usize> {
    let mut i = head.len();
    while i >= 2 {
        if head[i - 2] == b'\n' && head[i - 1] == b'\n' {
            return Some(i);
        }
        i -= 1;
    }
    None
}

/// Finds the start of the line containing `head.len()` (or the buffer
/// start, if there is no preceding newline).
fn rfind_line_start(head: &[u8]) -> usize {
    match memchr::memrchr(b'\n', head) {
        Some(pos) => pos + 1,
        None => 0,
    }
}
