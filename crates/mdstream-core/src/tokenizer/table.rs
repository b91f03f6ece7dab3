use crate::block::Alignment;

/// Splits one pipe-table row into raw cell text, trimming a leading and
/// trailing empty cell produced by optional outer pipes (`| a | b |` and
/// `a | b` both yield `["a", "b"]`). Does not understand escaped pipes;
/// that's outside this subset (`spec.md` §6 lists no escape rule for
/// tables).
pub(super) fn split_row_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let mut cells: Vec<String> = trimmed.split('|').map(|c| c.trim().to_string()).collect();
    if cells.first().is_some_and(|c| c.is_empty()) && trimmed.starts_with('|') {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) && trimmed.ends_with('|') {
        cells.pop();
    }
    cells
}

/// A delimiter cell matches `:?-+:?`. Returns the alignment it declares.
fn parse_delimiter_cell(cell: &str) -> Option<Alignment> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    let left_colon = cell.starts_with(':');
    let right_colon = cell.ends_with(':');
    let dashes = cell.trim_start_matches(':').trim_end_matches(':');
    if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
        return None;
    }
    Some(match (left_colon, right_colon) {
        (true, true) => Alignment::Center,
        (false, true) => Alignment::Right,
        _ => Alignment::Left,
    })
}

/// Recognizes a table delimiter row (`spec.md` §6: `| :?-+:? | … |`) and
/// returns its column alignments, or `None` if the line isn't one.
pub(super) fn parse_delimiter_row(line: &str) -> Option<Vec<Alignment>> {
    let cells = split_row_cells(line);
    if cells.is_empty() {
        return None;
    }
    cells.iter().map(|c| parse_delimiter_cell(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_piped_row() {
        assert_eq!(split_row_cells("| H1 | H2 |"), vec!["H1", "H2"]);
        assert_eq!(split_row_cells("a | b"), vec!["a", "b"]);
    }

    #[test]
    fn recognizes_delimiter_row_alignments() {
        assert_eq!(parse_delimiter_row("| :--- | :-: | ---: |"), Some(vec![Alignment::Left, Alignment::Center, Alignment::Right]));
    }

    #[test]
    fn rejects_non_delimiter_row() {
        assert_eq!(parse_delimiter_row("| a | b |"), None);
    }
}
