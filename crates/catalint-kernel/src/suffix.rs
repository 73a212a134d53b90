//! MAD suffix semantics.
//!
//! Identifiers of the form `HV-NNNNNN` / `SD-NNNNNN` encode a spring
//! application in their last digit, via a fixed lookup table. The digit is
//! the *rightmost digit anywhere in the string*, not the final character:
//! trailing non-digit suffixes (revision letters and the like) must not
//! defeat the lookup.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Strict MAD-style pattern. Looser/legacy identifiers are exempt from the
/// L10x rules so historical data does not produce false positives.
static MAD_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(hv|sd)-\d{6}$").expect("MAD pattern is valid"));

/// Digit → spring application lookup table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuffixMap(BTreeMap<char, String>);

impl SuffixMap {
    pub fn new(entries: BTreeMap<char, String>) -> Self {
        Self(entries)
    }

    pub fn application(&self, digit: char) -> Option<&str> {
        self.0.get(&digit).map(String::as_str)
    }

    pub fn digits(&self) -> impl Iterator<Item = char> + '_ {
        self.0.keys().copied()
    }
}

/// The rightmost digit occurring anywhere in the identifier.
pub fn rightmost_digit(code: &str) -> Option<char> {
    code.chars().rev().find(char::is_ascii_digit)
}

pub fn is_mad_style(code: &str) -> bool {
    MAD_STYLE.is_match(code)
}

// `get` rather than slicing: byte 3 need not be a char boundary, and codes
// are arbitrary catalog text.
pub fn has_sd_prefix(code: &str) -> bool {
    code.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("sd-"))
}

pub fn has_hv_prefix(code: &str) -> bool {
    code.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("hv-"))
}

/// Rightmost digit plus its table entry, with no prefix requirement.
///
/// This looser lookup feeds the L100/L101 rules (which gate on the strict
/// pattern themselves) and the suffix statistics, which deliberately count
/// legacy codes too.
pub fn mapped_application<'a>(code: &str, map: &'a SuffixMap) -> Option<(char, &'a str)> {
    let digit = rightmost_digit(code)?;
    map.application(digit).map(|app| (digit, app))
}

/// Everything the suffix implies for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuffixDerivation {
    pub application: String,
    pub digit: char,
    pub includes_fsd: bool,
    pub solution_level: String,
}

/// Full derivation for an `HV-`/`SD-` family identifier.
///
/// Deterministic and total over codes with a mapped digit; `None` for other
/// families, digitless codes, and unmapped digits.
pub fn derive_from_suffix(code: &str, map: &SuffixMap) -> Option<SuffixDerivation> {
    if !has_hv_prefix(code) && !has_sd_prefix(code) {
        return None;
    }
    let (digit, application) = mapped_application(code, map)?;
    let includes_fsd = has_sd_prefix(code);
    Some(SuffixDerivation {
        application: application.to_string(),
        digit,
        includes_fsd,
        solution_level: if includes_fsd {
            "special_duty".to_string()
        } else {
            "standard".to_string()
        },
    })
}

/// Per-run suffix statistics, folded through the logic pass and merged if
/// the pass is ever split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixStats {
    pub total: u64,
    pub hv: u64,
    pub sd: u64,
    pub counts: BTreeMap<char, u64>,
}

impl SuffixStats {
    /// Zeroed counters for every digit the table knows, so the report shows
    /// unobserved digits explicitly.
    pub fn for_map(map: &SuffixMap) -> Self {
        Self {
            counts: map.digits().map(|d| (d, 0)).collect(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, code: &str, digit: char) {
        *self.counts.entry(digit).or_insert(0) += 1;
        self.total += 1;
        if has_sd_prefix(code) {
            self.sd += 1;
        }
        if has_hv_prefix(code) {
            self.hv += 1;
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.total += other.total;
        self.hv += other.hv;
        self.sd += other.sd;
        for (digit, count) in other.counts {
            *self.counts.entry(digit).or_insert(0) += count;
        }
    }
}
