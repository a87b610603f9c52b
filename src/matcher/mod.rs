//! Exact-match strategies over a dataset of lines.
//!
//! Every strategy implements the same contract: given the dataset lines and
//! a query, return the lines equal to the query after trimming. Existence
//! is a non-empty result. The strategies differ only in how they get there,
//! which is what the benchmark harness measures; they must never disagree
//! on existence for the same inputs.
//!
//! ## Strategies
//! - `linear`: trimmed-equality scan, the baseline oracle
//! - `binary`: sort then binary search, plus a reusable sorted index
//! - `kmp`: Knuth-Morris-Pratt substring scan with a full-line guard
//! - `boyer_moore`: bad-character/good-suffix scan with the same guard
//! - `rabin_karp`: rolling-hash scan, hash hits confirmed byte-for-byte
//! - `z_algorithm`: one Z-array pass over a single concatenated buffer

pub mod binary;
pub mod boyer_moore;
pub mod kmp;
pub mod linear;
pub mod rabin_karp;
pub mod z_algorithm;

pub use binary::SortedIndex;

/// A matching strategy, selectable by configuration or by the benchmark
/// driver. The connection handler only ever sees this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Linear,
    SortedBinary,
    Kmp,
    BoyerMoore,
    RabinKarp,
    ZAlgorithm,
}

impl Algorithm {
    /// All strategies, in benchmark order.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Linear,
        Algorithm::SortedBinary,
        Algorithm::Kmp,
        Algorithm::BoyerMoore,
        Algorithm::RabinKarp,
        Algorithm::ZAlgorithm,
    ];

    /// All dataset lines equal to `query` after trimming.
    pub fn find_matches(&self, lines: &[String], query: &str) -> Vec<String> {
        match self {
            Algorithm::Linear => linear::find_matches(lines, query),
            Algorithm::SortedBinary => binary::find_matches(lines, query),
            Algorithm::Kmp => kmp::find_matches(lines, query),
            Algorithm::BoyerMoore => boyer_moore::find_matches(lines, query),
            Algorithm::RabinKarp => rabin_karp::find_matches(lines, query),
            Algorithm::ZAlgorithm => z_algorithm::find_matches(lines, query),
        }
    }

    /// Whether an exact copy of `query` exists among `lines`.
    pub fn exists(&self, lines: &[String], query: &str) -> bool {
        !self.find_matches(lines, query).is_empty()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Linear => "linear",
            Algorithm::SortedBinary => "sorted-binary",
            Algorithm::Kmp => "kmp",
            Algorithm::BoyerMoore => "boyer-moore",
            Algorithm::RabinKarp => "rabin-karp",
            Algorithm::ZAlgorithm => "z-algorithm",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "naive" => Ok(Algorithm::Linear),
            "sorted-binary" | "binary" => Ok(Algorithm::SortedBinary),
            "kmp" => Ok(Algorithm::Kmp),
            "boyer-moore" | "boyer_moore" => Ok(Algorithm::BoyerMoore),
            "rabin-karp" | "rabin_karp" => Ok(Algorithm::RabinKarp),
            "z-algorithm" | "z_algorithm" => Ok(Algorithm::ZAlgorithm),
            other => Err(UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Returned when a configured algorithm name matches no strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl std::fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown algorithm '{}'", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}
