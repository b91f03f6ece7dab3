use crate::inline::{InlineRun, InlineStyle};
use crate::math;

/// Per-leaf inline scanning state carried across `feed` calls so a
/// construct opened in one chunk (an unterminated code span, an
/// unresolved `[link](`, an open bold run) can be completed by a later
/// one without re-scanning anything already emitted (`spec.md` §4.4,
/// suspension boundary).
#[derive(Default, Clone)]
pub(super) struct InlineScanState {
    /// Raw source bytes that could not yet be resolved into a run and are
    /// held back, prepended to the next call's input.
    pending_raw: String,
    active_style: InlineStyle,
    active_link: Option<String>,
}

/// A deliberately simple (non-CommonMark-flanking) single-pass inline
/// scanner: emphasis/strong/strikethrough markers toggle a style bit
/// on/off in source order rather than being paired by a lookaround rule.
/// This trades exact CommonMark conformance (already a non-goal,
/// `spec.md` §1) for an implementation that stays incremental without a
/// second backtracking pass.
pub(super) fn scan_inline(state: &mut InlineScanState, incoming: &str, is_final: bool) -> Vec<InlineRun> {
    let mut text = std::mem::take(&mut state.pending_raw);
    text.push_str(incoming);
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut i = 0usize;
    let mut runs = Vec::new();
    let mut buf = String::new();

    macro_rules! flush_plain {
        () => {
            if !buf.is_empty() {
                runs.push(make_run(&buf, state.active_style, &state.active_link));
                buf.clear();
            }
        };
    }

    while i < len {
        match bytes[i] {
            b'*' if bytes[i..].starts_with(b"**") => {
                flush_plain!();
                state.active_style.toggle(InlineStyle::BOLD);
                i += 2;
            }
            b'*' => {
                flush_plain!();
                state.active_style.toggle(InlineStyle::ITALIC);
                i += 1;
            }
            b'_' if bytes[i..].starts_with(b"__") => {
                flush_plain!();
                state.active_style.toggle(InlineStyle::BOLD);
                i += 2;
            }
            b'_' => {
                flush_plain!();
                state.active_style.toggle(InlineStyle::ITALIC);
                i += 1;
            }
            b'~' if bytes[i..].starts_with(b"~~") => {
                flush_plain!();
                state.active_style.toggle(InlineStyle::STRIKETHROUGH);
                i += 2;
            }
            b'`' => {
                let tick_len = bytes[i..].iter().take_while(|&&b| b == b'`').count();
                match find_closing_run(&text, i + tick_len, b'`', tick_len) {
                    Some(end) => {
                        flush_plain!();
                        runs.push(InlineRun::styled(&text[i + tick_len..end], InlineStyle::CODE));
                        i = end + tick_len;
                    }
                    None => {
                        if suspend_or_flush(&text[i..], is_final, &mut state.pending_raw, &mut buf) {
                            break;
                        }
                        i = len;
                    }
                }
            }
            b'!' if bytes[i..].len() > 1 && bytes[i + 1] == b'[' => {
                match parse_link_like(&text, i + 1) {
                    Some((alt, src, end)) => {
                        flush_plain!();
                        runs.push(InlineRun::image(alt, src));
                        i = end;
                    }
                    None => {
                        if suspend_or_flush(&text[i..], is_final, &mut state.pending_raw, &mut buf) {
                            break;
                        }
                        i = len;
                    }
                }
            }
            b'[' => match parse_link_like(&text, i) {
                Some((label, url, end)) => {
                    flush_plain!();
                    runs.push(InlineRun::link(label, url));
                    i = end;
                }
                None => {
                    if suspend_or_flush(&text[i..], is_final, &mut state.pending_raw, &mut buf) {
                        break;
                    }
                    i = len;
                }
            },
            b'<' => match text[i + 1..].find('>') {
                Some(rel_end) if looks_like_autolink(&text[i + 1..i + 1 + rel_end]) => {
                    flush_plain!();
                    let url = text[i + 1..i + 1 + rel_end].to_string();
                    runs.push(InlineRun::link(url.clone(), url));
                    i = i + 1 + rel_end + 1;
                }
                _ => {
                    buf.push('<');
                    i += 1;
                }
            },
            b'$' => match find_closing_run(&text, i + 1, b'$', 1) {
                Some(end) => {
                    flush_plain!();
                    let tex = text[i + 1..end].to_string();
                    let node = math::parse(&tex);
                    runs.push(InlineRun::math(tex, false, node));
                    i = end + 1;
                }
                None => {
                    if suspend_or_flush(&text[i..], is_final, &mut state.pending_raw, &mut buf) {
                        break;
                    }
                    i = len;
                }
            },
            b'\\' if bytes[i..].starts_with(b"\\(") => match text[i + 2..].find("\\)") {
                Some(rel_end) => {
                    flush_plain!();
                    let tex = text[i + 2..i + 2 + rel_end].to_string();
                    let node = math::parse(&tex);
                    runs.push(InlineRun::math(tex, false, node));
                    i = i + 2 + rel_end + 2;
                }
                None => {
                    if suspend_or_flush(&text[i..], is_final, &mut state.pending_raw, &mut buf) {
                        break;
                    }
                    i = len;
                }
            },
            b'\\' if i + 1 < len => {
                let escaped_len = utf8_char_len(bytes, i + 1);
                buf.push_str(&text[i + 1..i + 1 + escaped_len]);
                i += 1 + escaped_len;
            }
            c => {
                let ch_len = utf8_char_len(bytes, i);
                buf.push_str(&text[i..i + ch_len]);
                i += ch_len;
                let _ = c;
            }
        }
    }
    flush_plain!();
    runs
}

fn utf8_char_len(bytes: &[u8], i: usize) -> usize {
    let b = bytes[i];
    if b < 0x80 {
        1
    } else if b >> 5 == 0b110 {
        2
    } else if b >> 4 == 0b1110 {
        3
    } else {
        4
    }
}

/// Either suspends `rest` as pending raw text (returns `true`, caller
/// should stop the loop) or, at end-of-block, flushes it literally into
/// `buf` (returns `false`, caller should finish the loop on this pass).
fn suspend_or_flush(rest: &str, is_final: bool, pending_raw: &mut String, buf: &mut String) -> bool {
    if is_final {
        buf.push_str(rest);
        false
    } else {
        pending_raw.push_str(rest);
        true
    }
}

fn make_run(text: &str, style: InlineStyle, link: &Option<String>) -> InlineRun {
    match link {
        Some(url) => InlineRun::link(text, url.clone()),
        None if style.is_empty() => InlineRun::plain(text),
        None => InlineRun::styled(text, style),
    }
}

/// Finds the end (exclusive, start of the closing run) of a run of
/// `run_len` consecutive `marker` bytes starting at or after `from`.
fn find_closing_run(text: &str, from: usize, marker: u8, run_len: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == marker {
            let count = bytes[i..].iter().take_while(|&&b| b == marker).count();
            if count == run_len {
                return Some(i);
            }
            i += count;
        } else {
            i += 1;
        }
    }
    None
}

/// Parses `[label](url)` (or, when `start` points at the `[` of
/// `![alt](src)`, the same shape with an `alt` in place of `label`).
/// Returns `(text, url, index just past the closing paren)`.
fn parse_link_like(text: &str, start: usize) -> Option<(String, String, usize)> {
    debug_assert_eq!(text.as_bytes().get(start), Some(&b'['));
    let after_bracket = start + 1;
    let close_bracket = text[after_bracket..].find(']')? + after_bracket;
    if text.as_bytes().get(close_bracket + 1) != Some(&b'(') {
        return None;
    }
    let url_start = close_bracket + 2;
    let close_paren = text[url_start..].find(')')? + url_start;
    let label = text[after_bracket..close_bracket].to_string();
    let url = text[url_start..close_paren].to_string();
    Some((label, url, close_paren + 1))
}

fn looks_like_autolink(candidate: &str) -> bool {
    !candidate.is_empty() && !candidate.contains(char::is_whitespace) && candidate.contains(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(input: &str) -> Vec<InlineRun> {
        let mut state = InlineScanState::default();
        scan_inline(&mut state, input, true)
    }

    #[test]
    fn plain_text_yields_one_run() {
        assert_eq!(scan_all("hello world"), vec![InlineRun::plain("hello world")]);
    }

    #[test]
    fn emphasis_markers_toggle_style() {
        let runs = scan_all("a *b* c");
        assert_eq!(
            runs,
            vec![
                InlineRun::plain("a "),
                InlineRun::styled("b", InlineStyle::ITALIC),
                InlineRun::plain(" c"),
            ]
        );
    }

    #[test]
    fn code_span_is_not_interpreted() {
        let runs = scan_all("`*a*`");
        assert_eq!(runs, vec![InlineRun::styled("*a*", InlineStyle::CODE)]);
    }

    #[test]
    fn link_is_parsed() {
        let runs = scan_all("see [docs](https://example.com)");
        assert_eq!(runs, vec![InlineRun::plain("see "), InlineRun::link("docs", "https://example.com")]);
    }

    #[test]
    fn unterminated_code_span_suspends_across_calls() {
        let mut state = InlineScanState::default();
        let first = scan_inline(&mut state, "a `b", false);
        assert_eq!(first, vec![InlineRun::plain("a ")]);
        let second = scan_inline(&mut state, "c`", false);
        assert_eq!(second, vec![InlineRun::styled("bc", InlineStyle::CODE)]);
    }

    #[test]
    fn inline_math_is_parsed() {
        let runs = scan_all("E = $x^2$ done");
        match &runs[1] {
            InlineRun { math: Some(payload), .. } => assert_eq!(payload.tex, "x^2"),
            other => panic!("expected math run, got {other:?}"),
        }
    }
}
