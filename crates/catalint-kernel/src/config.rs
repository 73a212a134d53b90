//! Rule configuration: the MAD suffix table and per-field enum allow-lists.
//!
//! Both are collaborator-owned JSON documents. Embedded defaults ship with
//! the binary; a config directory can override either file independently.
//! Fields with no configured allow-list are open-world: the enum rule skips
//! them rather than guessing.

use crate::suffix::SuffixMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const DEFAULT_SUFFIX_MAP: &str = include_str!("../config/mad-suffix-map.json");
const DEFAULT_ENUMS: &str = include_str!("../config/enums.json");

pub const SUFFIX_MAP_FILE: &str = "mad-suffix-map.json";
pub const ENUMS_FILE: &str = "enums.json";

/// The fields the enum rule inspects, on records and on set references.
pub const ENUM_FIELDS: &[&str] = &[
    "axleConfig",
    "axle",
    "solutionLevel",
    "springApplication",
    "vehicleType",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {file}: {source}")]
    Read {
        file: String,
        source: std::io::Error,
    },
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        source: serde_json::Error,
    },
    #[error("suffix table key {key:?} in {file} is not a single digit")]
    InvalidDigit { file: String, key: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuffixEntry {
    spring_application: String,
}

#[derive(Debug, Clone)]
pub struct RuleConfig {
    pub suffix_map: SuffixMap,
    pub enums: BTreeMap<String, Vec<String>>,
}

impl RuleConfig {
    /// The embedded defaults. Parsing cannot fail for shipped assets.
    pub fn embedded() -> Self {
        Self {
            suffix_map: parse_suffix_map(DEFAULT_SUFFIX_MAP, "<embedded>")
                .expect("embedded suffix map is valid"),
            enums: parse_enums(DEFAULT_ENUMS, "<embedded>").expect("embedded enums are valid"),
        }
    }

    /// Embedded defaults with per-file overrides from `dir`. A missing file
    /// keeps the default; a present-but-broken file is an error.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::embedded();
        let suffix_path = dir.join(SUFFIX_MAP_FILE);
        if suffix_path.is_file() {
            let raw = read_file(&suffix_path)?;
            config.suffix_map = parse_suffix_map(&raw, &suffix_path.display().to_string())?;
        }
        let enums_path = dir.join(ENUMS_FILE);
        if enums_path.is_file() {
            let raw = read_file(&enums_path)?;
            config.enums = parse_enums(&raw, &enums_path.display().to_string())?;
        }
        Ok(config)
    }

    /// The allow-list for a field, or `None` when the field is open-world.
    pub fn allowed_values(&self, field: &str) -> Option<&[String]> {
        self.enums
            .get(field)
            .map(Vec::as_slice)
            .filter(|list| !list.is_empty())
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        file: path.display().to_string(),
        source,
    })
}

fn parse_suffix_map(raw: &str, file: &str) -> Result<SuffixMap, ConfigError> {
    let entries: BTreeMap<String, SuffixEntry> =
        serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            file: file.to_string(),
            source,
        })?;
    let mut map = BTreeMap::new();
    for (key, entry) in entries {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(digit), None) if digit.is_ascii_digit() => {
                map.insert(digit, entry.spring_application);
            }
            _ => {
                return Err(ConfigError::InvalidDigit {
                    file: file.to_string(),
                    key,
                });
            }
        }
    }
    Ok(SuffixMap::new(map))
}

fn parse_enums(raw: &str, file: &str) -> Result<BTreeMap<String, Vec<String>>, ConfigError> {
    serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
        file: file.to_string(),
        source,
    })
}
