//! Chemical entities, aliases, and identifier handling.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a chemical plays in a cryopreservation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChemicalRole {
    Cpa,
    Adjuvant,
    Carrier,
}

impl ChemicalRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChemicalRole::Cpa => "CPA",
            ChemicalRole::Adjuvant => "ADJUVANT",
            ChemicalRole::Carrier => "CARRIER",
        }
    }

    /// Whether components in this role name a chemical participant that
    /// should go through identity resolution. Carriers are treated as
    /// structural and only ever get placeholder entities.
    pub fn resolves_chemically(&self) -> bool {
        matches!(self, ChemicalRole::Cpa | ChemicalRole::Adjuvant)
    }
}

impl std::fmt::Display for ChemicalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a chemical label for embedding and comparison.
///
/// Trimmed + lowercased text is the only form ever embedded, so that
/// "Glycerol" and "glycerol " hash and compare identically.
pub fn canonicalize(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Check InChIKey syntax: two fixed-length uppercase alphanumeric blocks
/// (14 and 10 characters) and a single trailing uppercase letter,
/// hyphen-separated. Extraction passes are known to hallucinate keys, so
/// anything failing this check is never used for exact lookup.
pub fn is_valid_inchikey(key: &str) -> bool {
    let bytes = key.as_bytes();
    if bytes.len() != 27 || bytes[14] != b'-' || bytes[25] != b'-' {
        return false;
    }
    let block = |range: std::ops::Range<usize>| {
        bytes[range]
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    };
    block(0..14) && block(15..25) && bytes[26].is_ascii_uppercase()
}

/// Outcome of resolving one chemical mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub chemical_id: Uuid,
    /// Alias row for the canonicalized input label, when alias
    /// maintenance ran.
    pub alias_id: Option<Uuid>,
    /// True when the mention caused a new chemical row to be created.
    pub created: bool,
    /// True when a supplied identifier went unused and was quarantined.
    pub identifier_quarantined: bool,
}

/// Nearest-neighbor hit from the alias registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AliasMatch {
    pub alias_id: Uuid,
    pub chemical_id: Uuid,
    pub distance: f32,
}
