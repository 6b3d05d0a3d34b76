//! Fingerprints and the `hash  path` listings notebooks print to record their data.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::{fmt, path::Path, str::FromStr};

use crate::error::MetafieldError;

/// Length of a full fingerprint in hex characters.
pub const FINGERPRINT_LEN: usize = 40;

/// Length of the fingerprint prefix used as an artifact node identifier.
pub const SHORT_LEN: usize = 7;

static FINGERPRINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-f0-9]{40}").expect("fingerprint pattern is valid"));

/// A 40-character lowercase hex SHA-1 digest of an artifact's bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Fingerprint(hex::encode(Sha1::digest(bytes)))
    }

    /// Hash a file's full contents. The file is read whole and closed before returning.
    pub fn of_file<P: AsRef<Path>>(path: P) -> Result<Self, MetafieldError> {
        let bytes = std::fs::read(path)?;
        Ok(Fingerprint::of_bytes(&bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The display form, also used as the artifact node identifier.
    pub fn short(&self) -> &str {
        &self.0[..SHORT_LEN]
    }
}

impl FromStr for Fingerprint {
    type Err = MetafieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == FINGERPRINT_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            Ok(Fingerprint(s.to_string()))
        } else {
            Err(MetafieldError::Codec(format!(
                "expected {FINGERPRINT_LEN} lowercase hex characters, got {s:?}"
            )))
        }
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = MetafieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One artifact mention: the fingerprint and the path text that accompanied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub fingerprint: Fingerprint,
    pub path: String,
}

impl Reference {
    /// Parse a single line. Lines without a fingerprint token yield `None`.
    ///
    /// Only the first token on the line is taken as the fingerprint. The path is whatever
    /// remains once that token's text is removed, trimmed; a line carrying several tokens
    /// therefore produces a path that still contains the others.
    pub fn from_line(line: &str) -> Option<Reference> {
        let token = FINGERPRINT_RE.find(line)?.as_str();
        let path = line.replace(token, "").trim().to_string();
        Some(Reference {
            fingerprint: Fingerprint(token.to_string()),
            path,
        })
    }
}

/// Extract every reference from a text block, in line order.
pub fn parse_references(text: &str) -> Vec<Reference> {
    text.split('\n').filter_map(Reference::from_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const A40: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    #[test]
    fn text_without_tokens_yields_nothing() {
        assert!(parse_references("").is_empty());
        assert!(parse_references("hello\nworld\n").is_empty());
        // 39 hex characters, uppercase hex, and non-hex letters are not fingerprints
        assert!(parse_references(&"a".repeat(39)).is_empty());
        assert!(parse_references(&"A".repeat(40)).is_empty());
        assert!(parse_references(&"g".repeat(40)).is_empty());
    }

    #[test]
    fn canonical_line_parses() {
        let refs = parse_references(&format!("{A40} path/to/file.csv"));
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].fingerprint.as_str(), A40);
        assert_eq!(refs[0].path, "path/to/file.csv");
    }

    #[test]
    fn sha1sum_listing_keeps_line_order_and_skips_noise() {
        let b40 = "b".repeat(40);
        let text = format!("computing hashes...\n{A40}  data/x.csv\n\n{b40}  ../raw/y.parquet\ndone");
        let refs = parse_references(&text);
        let paths: Vec<&str> = refs.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["data/x.csv", "../raw/y.parquet"]);
        assert_eq!(refs[1].fingerprint.short(), "bbbbbbb");
    }

    #[test]
    fn first_token_wins_when_line_has_several() {
        let c40 = "c".repeat(40);
        let refs = parse_references(&format!("{A40} {c40} a.csv"));
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].fingerprint.as_str(), A40);
        assert_eq!(refs[0].path, format!("{c40} a.csv"));
    }

    #[test]
    fn longer_hex_runs_match_their_first_forty() {
        let refs = parse_references(&format!("{}  x.bin", "1".repeat(64)));
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].fingerprint.as_str(), "1".repeat(40));
    }

    #[test]
    fn fingerprint_of_bytes_is_sha1() {
        // sha1("hello\n")
        assert_eq!(
            Fingerprint::of_bytes(b"hello\n").as_str(),
            "f572d396fae9206628714fb2ce00f72e94f2258f"
        );
    }

    #[test]
    fn fingerprint_parse_rejects_short_input() {
        assert!("abc".parse::<Fingerprint>().is_err());
        assert!(A40.parse::<Fingerprint>().is_ok());
    }
}
