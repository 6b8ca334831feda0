use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::types::Order;

/// A line the loader could not turn into an order. Recorded instead of
/// aborting the run; the caller decides how to surface it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_number: usize,
    pub content: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Valid orders in order of appearance, duplicates allowed.
    pub orders: Vec<Order>,
    /// Malformed lines, for diagnostics.
    pub skipped: Vec<SkippedLine>,
}

/// Parses one order line. The last five whitespace-separated tokens are
/// `blank_type width length material count`; everything before them,
/// space-joined, is the order name.
fn parse_line(line: &str) -> Result<Order, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 6 {
        return Err(format!("expected at least 6 tokens, got {}", tokens.len()));
    }
    let (name_tokens, tail) = tokens.split_at(tokens.len() - 5);
    let width = tail[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{}'", tail[1]))?;
    let length = tail[2]
        .parse::<u32>()
        .map_err(|_| format!("invalid length '{}'", tail[2]))?;
    let count = tail[4]
        .parse::<u32>()
        .map_err(|_| format!("invalid count '{}'", tail[4]))?;
    if width == 0 || length == 0 {
        return Err("width and length must be non-zero".to_string());
    }
    Ok(Order {
        name: name_tokens.join(" "),
        blank_type: tail[0].to_string(),
        width,
        length,
        material: tail[3].to_string(),
        count,
    })
}

/// Loads orders from a line-oriented reader. Malformed lines become
/// `SkippedLine` diagnostics; orders below `min_order_count` are dropped
/// silently. Empty lines are ignored.
pub fn load_orders<R: BufRead>(reader: R, min_order_count: u32) -> std::io::Result<LoadOutcome> {
    let mut outcome = LoadOutcome::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Ok(order) => {
                if order.count >= min_order_count {
                    outcome.orders.push(order);
                }
            }
            Err(reason) => outcome.skipped.push(SkippedLine {
                line_number,
                content: line.trim().to_string(),
                reason,
            }),
        }
    }
    Ok(outcome)
}

/// Convenience wrapper for the binaries: opens `path` and loads it.
pub fn load_orders_from_path(
    path: &Path,
    min_order_count: u32,
) -> std::io::Result<LoadOutcome> {
    let file = File::open(path)?;
    load_orders(BufReader::new(file), min_order_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;

    fn load(text: &str, min_count: u32) -> LoadOutcome {
        load_orders(Cursor::new(text), min_count).unwrap()
    }

    #[test]
    fn test_parses_name_with_spaces() {
        let outcome = load("Order 42 rework box 500 1000 T22(1) 1500\n", 100);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.orders.len(), 1);
        let o = &outcome.orders[0];
        assert_eq!(o.name, "Order 42 rework");
        assert_eq!(o.blank_type, "box");
        assert_eq!(o.width, 500);
        assert_eq!(o.length, 1000);
        assert_eq!(o.material, "T22(1)");
        assert_eq!(o.count, 1500);
    }

    #[test]
    fn test_skips_short_lines() {
        let outcome = load("box 500 1000 T22 200\n", 100);
        assert!(outcome.orders.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].line_number, 1);
    }

    #[test]
    fn test_skips_unparseable_numbers_and_continues() {
        let text = "\
bad A box five 1000 T22 200
good B box 500 1000 T22 200
";
        let outcome = load(text, 100);
        assert_eq!(outcome.orders.len(), 1);
        assert_eq!(outcome.orders[0].name, "good B");
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].reason.contains("invalid width"));
    }

    #[test]
    fn test_negative_count_never_reaches_the_search() {
        let outcome = load("A box 500 1000 T22 -50\n", 100);
        assert!(outcome.orders.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].reason.contains("invalid count"));
    }

    #[test]
    fn test_drops_sub_minimum_counts_silently() {
        let text = "\
small A box 500 1000 T22 99
large B box 500 1000 T22 100
";
        let outcome = load(text, 100);
        assert_eq!(outcome.orders.len(), 1);
        assert_eq!(outcome.orders[0].name, "large B");
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        let text = "\
A box 500 1000 T22 200
A box 500 1000 T22 200
B box 600 900 T22 300
";
        let outcome = load(text, 100);
        let names: Vec<&str> = outcome.orders.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["A", "A", "B"]);
    }

    #[test]
    fn test_ignores_blank_lines() {
        let outcome = load("\n\nA box 500 1000 T22 200\n\n", 100);
        assert_eq!(outcome.orders.len(), 1);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "A box 500 1000 T22 200").unwrap();
        let outcome = load_orders_from_path(file.path(), 100).unwrap();
        assert_eq!(outcome.orders.len(), 1);
    }
}
