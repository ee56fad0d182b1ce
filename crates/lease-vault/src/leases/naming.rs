//! Completed-lease file names: `<FARM><YEAR>V<NN><SFX4>.md`.
//!
//! Fields are located by fixed offsets (4 + 4 + 3 + 4), never by searching for `V`, so a
//! prefix or suffix that itself contains `V` parses correctly.

use std::fmt;

use uuid::Uuid;

pub const FARM_PREFIX_LEN: usize = 4;
pub const SUFFIX_LEN: usize = 4;
pub const MAX_VERSION: u8 = 99;
pub const EXTENSION: &str = ".md";

const DEFAULT_FARM_PREFIX: &str = "FARM";
const PREFIX_PAD: char = 'X';
const STEM_LEN: usize = FARM_PREFIX_LEN + 4 + 3 + SUFFIX_LEN;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeaseFileName {
    farm_prefix: String,
    year: u16,
    version: u8,
    suffix: String,
}

impl LeaseFileName {
    /// Build a name from already-normalized parts. Returns `None` when a part is out of range.
    pub fn new(farm_prefix: &str, year: i32, version: u8, suffix: &str) -> Option<Self> {
        let year = u16::try_from(year).ok().filter(|year| *year <= 9999)?;
        let valid = farm_prefix.len() == FARM_PREFIX_LEN
            && farm_prefix.bytes().all(|b| b.is_ascii_uppercase())
            && (1..=MAX_VERSION).contains(&version)
            && suffix.len() == SUFFIX_LEN
            && suffix
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        valid.then(|| Self {
            farm_prefix: farm_prefix.to_string(),
            year,
            version,
            suffix: suffix.to_string(),
        })
    }

    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(EXTENSION)?;
        if stem.len() != STEM_LEN || !stem.is_ascii() {
            return None;
        }

        let (prefix, rest) = stem.split_at(FARM_PREFIX_LEN);
        let (year, rest) = rest.split_at(4);
        let (token, suffix) = rest.split_at(3);

        if !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let version = token.strip_prefix('V')?;
        if !version.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Self::new(prefix, year.parse().ok()?, version.parse().ok()?, suffix)
    }

    pub fn farm_prefix(&self) -> &str {
        &self.farm_prefix
    }

    pub fn year(&self) -> i32 {
        i32::from(self.year)
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Same farm, year, and suffix with a different version token.
    pub fn with_version(&self, version: u8) -> Option<Self> {
        (1..=MAX_VERSION).contains(&version).then(|| Self {
            version,
            ..self.clone()
        })
    }

    /// True when `other` names the same farm and year, whatever its suffix.
    pub fn same_series(&self, other: &Self) -> bool {
        self.farm_prefix == other.farm_prefix && self.year == other.year
    }
}

impl fmt::Display for LeaseFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:04}V{:02}{}{}",
            self.farm_prefix, self.year, self.version, self.suffix, EXTENSION
        )
    }
}

/// Four uppercase letters derived from the property name.
///
/// Non-letters are skipped, short names are padded with `X`, and a missing or letterless
/// name falls back to `FARM`.
pub fn farm_prefix(property_name: Option<&str>) -> String {
    let letters: String = property_name
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(FARM_PREFIX_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if letters.is_empty() {
        return DEFAULT_FARM_PREFIX.to_string();
    }

    let mut prefix = letters;
    while prefix.len() < FARM_PREFIX_LEN {
        prefix.push(PREFIX_PAD);
    }
    prefix
}

/// Source of the four-character unique suffix.
pub trait SuffixSource: Send + Sync {
    fn next_suffix(&self) -> String;
}

/// Takes the leading hex digits of a fresh v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSuffixSource;

impl SuffixSource for UuidSuffixSource {
    fn next_suffix(&self) -> String {
        suffix_from_uuid(Uuid::new_v4())
    }
}

pub(crate) fn suffix_from_uuid(id: Uuid) -> String {
    id.simple().to_string()[..SUFFIX_LEN].to_ascii_uppercase()
}
