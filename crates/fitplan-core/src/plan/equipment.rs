//! The equipment a user reported, and the fixed equipment allowlists.

use std::collections::BTreeSet;

pub use fitplan_db::queries::exercises::BODY_WEIGHT;

/// Equipment that qualifies an exercise for a cardio day on its own.
pub const CARDIO_EQUIPMENT: &[&str] = &[
    "elliptical machine",
    "stationary bike",
    "stepmill machine",
    "skierg machine",
    "rope",
    BODY_WEIGHT,
];

/// Equipment suited to flexibility days.
pub const FLEXIBILITY_EQUIPMENT: &[&str] = &[
    "resistance band",
    "bosu ball",
    "medicine ball",
    "roller",
    "stability ball",
    "wheel roller",
    BODY_WEIGHT,
];

/// The set of equipment names parsed from a survey's comma-joined list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentSet(BTreeSet<String>);

impl EquipmentSet {
    /// Split on commas, trim, and drop empty entries. Never fails: a
    /// missing or malformed list is just an empty set.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Equipment names the candidate pool is drawn from: the set itself,
    /// or only body weight when the set is empty.
    pub fn pool_equipment(&self) -> Vec<String> {
        if self.is_empty() {
            vec![BODY_WEIGHT.to_owned()]
        } else {
            self.0.iter().cloned().collect()
        }
    }

    /// Members of the set that also appear in `allowlist`.
    pub fn intersect(&self, allowlist: &[&str]) -> Vec<String> {
        self.0
            .iter()
            .filter(|name| allowlist.contains(&name.as_str()))
            .cloned()
            .collect()
    }

    /// Comma-joined form, as stored on a survey.
    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(",")
    }
}

impl<S: Into<String>> FromIterator<S> for EquipmentSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::parse(
            &iter
                .into_iter()
                .map(Into::into)
                .collect::<Vec<String>>()
                .join(","),
        )
    }
}
