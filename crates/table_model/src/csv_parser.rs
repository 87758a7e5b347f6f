//! CSV and manual-entry parsing

use crate::error::ParseResult;

/// Parse delimited text into raw rows.
///
/// Blank lines are skipped; ragged rows are kept so that table validation
/// can report the offending row.
pub(crate) fn parse_csv(text: &str, delimiter: u8) -> ParseResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Parse hand-typed text: one row per line, cells separated by commas.
pub(crate) fn parse_manual(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

/// Detect the delimiter used on the header line
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");

    let mut best = b',';
    let mut best_count = 0;
    for delim in [b',', b';', b'\t', b'|'] {
        let count = first_line.bytes().filter(|&b| b == delim).count();
        if count > best_count {
            best_count = count;
            best = delim;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let rows = parse_csv("Month,Sales\nJan,10\nFeb,20\n", b',').unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], vec!["Feb", "20"]);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let rows = parse_csv("Region,\"Sales, net\"\n\"North, East\",5", b',').unwrap();
        assert_eq!(rows[0][1], "Sales, net");
        assert_eq!(rows[1][0], "North, East");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let rows = parse_csv("A,B\n\nx,1\n,\n", b',').unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_ragged_rows_kept() {
        let rows = parse_csv("A,B\nx,1,2", b',').unwrap();
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_parse_manual_trims_and_skips_blank() {
        let rows = parse_manual("Month, Sales\r\n\n Jan , 10 \r\nFeb,20");
        assert_eq!(rows, vec![
            vec!["Month", "Sales"],
            vec!["Jan", "10"],
            vec!["Feb", "20"],
        ]);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), b',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), b';');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
        assert_eq!(detect_delimiter("single"), b',');
    }
}
