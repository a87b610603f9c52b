//! Z-algorithm scan over one concatenated buffer.
//!
//! The query, a separator, and every dataset line are laid out in a single
//! buffer and the Z-array is computed once for the whole thing. A line
//! matches when the Z-value at its start equals the query length and the
//! line is exactly that long. Lines are delimited by NUL, which cannot
//! survive query validation or line trimming, so the separator can never
//! alias content.

const SEPARATOR: u8 = 0;

/// Z-array: z[i] is the length of the longest common prefix of `s` and
/// `s[i..]`. z[0] is left at 0.
fn z_array(s: &[u8]) -> Vec<usize> {
    let n = s.len();
    let mut z = vec![0; n];
    let (mut l, mut r) = (0usize, 0usize);

    for i in 1..n {
        let mut zi = 0;
        if i < r {
            zi = z[i - l].min(r - i);
        }
        while i + zi < n && s[zi] == s[i + zi] {
            zi += 1;
        }
        z[i] = zi;
        if i + zi > r {
            l = i;
            r = i + zi;
        }
    }

    z
}

/// One pass over `query + SEP + line1 + SEP + line2 + ...`; collect the
/// lines whose start position carries a full-length Z-value.
pub fn find_matches(lines: &[String], query: &str) -> Vec<String> {
    let pattern = query.as_bytes();
    if pattern.is_empty() || lines.is_empty() {
        return Vec::new();
    }

    let trimmed: Vec<&str> = lines.iter().map(|line| line.trim()).collect();
    let lines_len: usize = trimmed.iter().map(|line| line.len() + 1).sum();

    let mut buffer = Vec::with_capacity(pattern.len() + 1 + lines_len);
    buffer.extend_from_slice(pattern);
    buffer.push(SEPARATOR);

    let mut starts = Vec::with_capacity(trimmed.len());
    for line in &trimmed {
        starts.push(buffer.len());
        buffer.extend_from_slice(line.as_bytes());
        buffer.push(SEPARATOR);
    }

    let z = z_array(&buffer);

    trimmed
        .iter()
        .zip(starts)
        .filter(|(line, start)| line.len() == pattern.len() && z[*start] == pattern.len())
        .map(|(line, _)| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_z_array_values() {
        // classic example: "aabxaab"
        assert_eq!(z_array(b"aabxaab"), vec![0, 1, 0, 0, 3, 1, 0]);
        assert_eq!(z_array(b"aaaa"), vec![0, 3, 2, 1]);
        assert_eq!(z_array(b"abcd"), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_exact_line_matches() {
        let data = lines(&["alpha", "beta", "gamma"]);
        assert_eq!(find_matches(&data, "beta"), vec!["beta"]);
    }

    #[test]
    fn test_miss() {
        let data = lines(&["alpha", "beta"]);
        assert!(find_matches(&data, "delta").is_empty());
    }

    #[test]
    fn test_prefix_of_longer_line_is_rejected() {
        let data = lines(&["alphabet"]);
        assert!(find_matches(&data, "alpha").is_empty());
    }

    #[test]
    fn test_match_cannot_span_adjacent_lines() {
        // "be" + "ta" adjacent in the buffer must not assemble into "beta"
        let data = lines(&["be", "ta"]);
        assert!(find_matches(&data, "beta").is_empty());
    }

    #[test]
    fn test_duplicates_all_collected() {
        let data = lines(&["beta", "alpha", "beta"]);
        assert_eq!(find_matches(&data, "beta").len(), 2);
    }

    #[test]
    fn test_dollar_in_content_is_inert() {
        // content may legitimately contain '$'; the NUL separator keeps it
        // ordinary data
        let data = lines(&["pri$e", "price"]);
        assert_eq!(find_matches(&data, "pri$e"), vec!["pri$e"]);
    }
}
