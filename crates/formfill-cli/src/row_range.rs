/// Parse a row range string like "1,3-5" into sorted 1-based row ordinals.
///
/// Rows are counted from the first data row (the header is not a row).
/// Returns an error for row 0, reversed or malformed ranges, and rows past
/// the end of the data.
pub fn parse_row_range(input: &str, row_count: usize) -> Result<Vec<usize>, String> {
    let mut rows = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_row(start, row_count)?, parse_row(end, row_count)?),
            None => {
                let row = parse_row(part, row_count)?;
                (row, row)
            }
        };
        if start > end {
            return Err(format!("invalid row range: '{part}' (start is after end)"));
        }
        rows.extend(start..=end);
    }

    rows.sort_unstable();
    rows.dedup();
    Ok(rows)
}

fn parse_row(text: &str, row_count: usize) -> Result<usize, String> {
    let text = text.trim();
    let row: usize = text
        .parse()
        .map_err(|_| format!("invalid row number: '{text}'"))?;
    if row == 0 {
        return Err("row 0 is invalid (rows start at 1)".to_string());
    }
    if row > row_count {
        return Err(format!("row {row} exceeds data row count ({row_count})"));
    }
    Ok(row)
}
