use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::core::hours::{is_open_with, DaytimeHours};
use crate::models::{GenderPolicy, ShelterRecord};

/// A named predicate a caller can use to narrow the shelter list
///
/// Tags the service does not know are kept as `Other` and always pass, so
/// newer clients can send filters older servers have never heard of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterTag {
    OpenNow,
    Family,
    Accessibility,
    PetFriendly,
    Other(String),
}

impl FilterTag {
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "open_now" => FilterTag::OpenNow,
            "family" => FilterTag::Family,
            "accessibility" => FilterTag::Accessibility,
            "pet_friendly" | "pets" => FilterTag::PetFriendly,
            other => FilterTag::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterTag::OpenNow => "open_now",
            FilterTag::Family => "family",
            FilterTag::Accessibility => "accessibility",
            FilterTag::PetFriendly => "pet_friendly",
            FilterTag::Other(tag) => tag,
        }
    }
}

impl From<String> for FilterTag {
    fn from(tag: String) -> Self {
        FilterTag::parse(&tag)
    }
}

impl From<FilterTag> for String {
    fn from(tag: FilterTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for FilterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of filter tags; duplicates collapse and order is irrelevant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FilterTag>", into = "Vec<FilterTag>")]
pub struct FilterSpec {
    tags: BTreeSet<FilterTag>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma separated list such as `open_now,family`
    pub fn parse_list(list: &str) -> Self {
        list.split(',')
            .filter(|tag| !tag.trim().is_empty())
            .map(FilterTag::parse)
            .collect()
    }

    pub fn with(mut self, tag: FilterTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn insert(&mut self, tag: FilterTag) -> bool {
        self.tags.insert(tag)
    }

    pub fn contains(&self, tag: &FilterTag) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterTag> {
        self.tags.iter()
    }
}

impl FromIterator<FilterTag> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = FilterTag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<FilterTag>> for FilterSpec {
    fn from(tags: Vec<FilterTag>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<FilterSpec> for Vec<FilterTag> {
    fn from(spec: FilterSpec) -> Self {
        spec.tags.into_iter().collect()
    }
}

/// Check a single tag against a shelter
#[inline]
pub fn matches_tag(shelter: &ShelterRecord, tag: &FilterTag, current_hour: u8, daytime: DaytimeHours) -> bool {
    match tag {
        FilterTag::OpenNow => is_open_with(shelter.hours, current_hour, daytime),
        FilterTag::Family => shelter.gender_policy == GenderPolicy::Family,
        FilterTag::Accessibility => shelter.wheelchair_accessible,
        FilterTag::PetFriendly => shelter.pet_friendly,
        FilterTag::Other(_) => true,
    }
}

/// Conjunction of every tag in `filters`; an empty set matches everything
#[inline]
pub fn matches_filters(shelter: &ShelterRecord, filters: &FilterSpec, current_hour: u8) -> bool {
    matches_filters_with(shelter, filters, current_hour, DaytimeHours::AssumeOpen)
}

#[inline]
pub fn matches_filters_with(
    shelter: &ShelterRecord,
    filters: &FilterSpec,
    current_hour: u8,
    daytime: DaytimeHours,
) -> bool {
    filters
        .iter()
        .all(|tag| matches_tag(shelter, tag, current_hour, daytime))
}
