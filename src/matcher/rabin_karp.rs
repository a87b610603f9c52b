//! Rabin-Karp rolling-hash scan.
//!
//! Polynomial hash with base 256 modulo the prime 101. A hash hit is only
//! a candidate: it must be confirmed with a direct byte comparison, since
//! distinct windows can share a hash. The exact-match contract then adds
//! the usual length guard after a confirmed positional hit.

const BASE: u64 = 256;
const MODULUS: u64 = 101;

/// Polynomial hash of the whole slice.
pub(crate) fn hash(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0, |acc, &b| (acc * BASE + u64::from(b)) % MODULUS)
}

/// Scan all length-m windows of `text`, rolling the hash; confirm hits
/// byte-for-byte.
fn contains(text: &[u8], pattern: &[u8], pattern_hash: u64, high_order: u64) -> bool {
    let m = pattern.len();
    let n = text.len();
    if n < m {
        return false;
    }

    let mut window_hash = hash(&text[..m]);

    for i in 0..=(n - m) {
        if window_hash == pattern_hash && &text[i..i + m] == pattern {
            return true;
        }
        if i < n - m {
            let outgoing = u64::from(text[i]) * high_order % MODULUS;
            // + MODULUS keeps the subtraction from wrapping below zero
            window_hash = ((window_hash + MODULUS - outgoing) * BASE + u64::from(text[i + m]))
                % MODULUS;
        }
    }

    false
}

/// Scan every line; collect those where a confirmed hash hit spans the
/// full line.
pub fn find_matches(lines: &[String], query: &str) -> Vec<String> {
    let pattern = query.as_bytes();
    if pattern.is_empty() {
        return Vec::new();
    }

    let pattern_hash = hash(pattern);
    // BASE^(m-1) mod MODULUS, the weight of the outgoing byte
    let high_order = (0..pattern.len() - 1).fold(1, |acc, _| acc * BASE % MODULUS);

    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| {
            contains(line.as_bytes(), pattern, pattern_hash, high_order)
                && line.len() == pattern.len()
        })
        .map(|line| line.to_string())
        .collect()
}
