//! Shift catalog: user-configured shift types, their keyword rules and alarm templates.
//!
//! Catalog order is significant: the classifier walks shifts in order and the first
//! keyword hit wins, so every mutation here preserves position.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::settings::AlarmDefaults;
use crate::time::parse_hhmm;

/// Literal name the rest (non-working) shift carries.
pub const REST_SHIFT_NAME: &str = "休";

/// Which shift boundary an alarm template is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmAnchor {
    #[default]
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmTemplate {
    pub label: String,
    #[serde(default)]
    pub anchor: AlarmAnchor,
    /// Signed minutes relative to the anchor.
    pub offset_minutes: i64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl AlarmTemplate {
    pub fn new(label: impl Into<String>, anchor: AlarmAnchor, offset_minutes: i64) -> Self {
        Self {
            label: label.into(),
            anchor,
            offset_minutes,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftType {
    pub name: String,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// `end <= start` means the shift crosses midnight.
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Marks a non-working shift that never produces alarms.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub rest: bool,
    #[serde(default)]
    pub templates: Vec<AlarmTemplate>,
}

impl ShiftType {
    /// Build a shift from editor-style input: `HH:MM` times and a comma-separated keyword list.
    pub fn new(name: &str, start: &str, end: &str, keywords: &str) -> Result<Self, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            start: parse_hhmm(start)?,
            end: parse_hhmm(end)?,
            keywords: parse_keywords(keywords),
            rest: false,
            templates: Vec::new(),
        })
    }

    pub fn as_rest(mut self) -> Self {
        self.rest = true;
        self
    }

    /// Attach independent copies of `templates`.
    pub fn with_templates(mut self, templates: &[AlarmTemplate]) -> Self {
        self.templates = templates.to_vec();
        self
    }

    pub fn is_rest(&self) -> bool {
        self.rest || self.name == REST_SHIFT_NAME
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }
}

/// Split a comma-separated keyword list, trimming entries and dropping empties.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split([',', '，'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered, name-unique list of shift types.
///
/// Readers take `&ShiftCatalog`, so classification and derivation always see one
/// consistent snapshot for the duration of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct ShiftCatalog {
    #[serde(rename = "shift")]
    shifts: Vec<ShiftType>,
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default, rename = "shift")]
    shifts: Vec<ShiftType>,
}

impl TryFrom<RawCatalog> for ShiftCatalog {
    type Error = CatalogError;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        Self::new(raw.shifts)
    }
}

impl ShiftCatalog {
    pub fn new(shifts: Vec<ShiftType>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for s in shifts {
            catalog.push(s)?;
        }
        Ok(catalog)
    }

    pub fn shifts(&self) -> &[ShiftType] {
        &self.shifts
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn first(&self) -> Option<&ShiftType> {
        self.shifts.first()
    }

    pub fn get(&self, name: &str) -> Option<&ShiftType> {
        self.shifts.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shifts.iter().map(|s| s.name.as_str())
    }

    /// Append a shift at the end of the catalog.
    pub fn push(&mut self, shift: ShiftType) -> Result<(), CatalogError> {
        validate_name(&shift.name)?;
        if self.get(&shift.name).is_some() {
            return Err(CatalogError::DuplicateName(shift.name));
        }
        self.shifts.push(shift);
        Ok(())
    }

    /// Replace the shift named `name` in place, or append when it does not exist.
    /// Renaming onto another existing shift's name is rejected.
    pub fn upsert(&mut self, name: &str, shift: ShiftType) -> Result<(), CatalogError> {
        validate_name(&shift.name)?;
        if shift.name != name && self.get(&shift.name).is_some() {
            return Err(CatalogError::DuplicateName(shift.name));
        }
        match self.shifts.iter_mut().find(|s| s.name == name) {
            Some(slot) => *slot = shift,
            None => self.shifts.push(shift),
        }
        Ok(())
    }

    /// Remove a shift together with its templates.
    pub fn remove(&mut self, name: &str) -> Option<ShiftType> {
        let idx = self.shifts.iter().position(|s| s.name == name)?;
        Some(self.shifts.remove(idx))
    }

    /// Move a shift to `index` (clamped to the end).
    pub fn reorder(&mut self, name: &str, index: usize) -> Result<(), CatalogError> {
        let idx = self
            .shifts
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| CatalogError::UnknownShift(name.to_string()))?;
        let shift = self.shifts.remove(idx);
        let index = index.min(self.shifts.len());
        self.shifts.insert(index, shift);
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        Err(CatalogError::EmptyName)
    } else {
        Ok(())
    }
}

/// The catalog a fresh install starts with: day, long-day, night and rest shifts.
pub fn default_catalog(defaults: &AlarmDefaults) -> ShiftCatalog {
    let templates = defaults.templates();
    let shifts = [
        ("A", "09:00", "18:00", "A班,A"),
        ("C", "08:00", "20:00", "C班,C"),
        ("D", "20:00", "08:00", "D班,D"),
    ];

    let mut catalog = ShiftCatalog::default();
    for (name, start, end, keywords) in shifts {
        // Constant inputs: parsing cannot fail and names are distinct.
        if let Ok(s) = ShiftType::new(name, start, end, keywords) {
            catalog.shifts.push(s.with_templates(&templates));
        }
    }
    if let Ok(rest) = ShiftType::new(REST_SHIFT_NAME, "00:00", "00:00", "公休,节假日,休") {
        catalog.shifts.push(rest.as_rest());
    }
    catalog
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&crate::time::format_hhmm(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        crate::time::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}
