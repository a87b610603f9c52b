//! Linear scan with trimmed equality. The baseline every other strategy
//! must agree with.

/// Scan every line and collect those equal to the query.
pub fn find_matches(lines: &[String], query: &str) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| *line == query)
        .map(|line| line.to_string())
        .collect()
}
