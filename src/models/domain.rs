use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Who a shelter admits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderPolicy {
    #[default]
    All,
    Men,
    Women,
    Family,
}

impl GenderPolicy {
    /// Map a listing label onto a policy. Unknown labels admit everyone.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "men" | "male" => GenderPolicy::Men,
            "women" | "female" => GenderPolicy::Women,
            "family" | "families" => GenderPolicy::Family,
            _ => GenderPolicy::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenderPolicy::All => "all",
            GenderPolicy::Men => "men",
            GenderPolicy::Women => "women",
            GenderPolicy::Family => "family",
        }
    }
}

/// Errors produced while parsing an opening-hours label
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoursParseError {
    #[error("unrecognized hours format: {0:?}")]
    Unrecognized(String),

    #[error("invalid time of day: {0:?}")]
    InvalidTime(String),
}

/// Opening hours of a shelter
///
/// Hours are on a 24-hour local clock. A window whose `close_hour` is
/// earlier than its `open_hour` wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursSpec {
    AlwaysOpen,
    Window { open_hour: u8, close_hour: u8 },
}

impl HoursSpec {
    pub fn window(open_hour: u8, close_hour: u8) -> Self {
        HoursSpec::Window { open_hour, close_hour }
    }
}

const ALWAYS_OPEN_LABELS: &[&str] = &["24 hours", "24/7", "24x7", "always open", "open 24 hours"];

impl FromStr for HoursSpec {
    type Err = HoursParseError;

    /// Accepts "24 hours", "6 PM - 8 AM", "9:30 AM - 5 PM" or "18:00 - 08:00"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if ALWAYS_OPEN_LABELS.contains(&normalized.as_str()) {
            return Ok(HoursSpec::AlwaysOpen);
        }

        let (open, close) = s
            .split_once('-')
            .or_else(|| s.split_once('\u{2013}'))
            .ok_or_else(|| HoursParseError::Unrecognized(s.to_string()))?;

        let open_hour = parse_clock(open).ok_or_else(|| HoursParseError::InvalidTime(open.trim().to_string()))?;
        let close_hour = parse_clock(close).ok_or_else(|| HoursParseError::InvalidTime(close.trim().to_string()))?;

        Ok(HoursSpec::Window { open_hour, close_hour })
    }
}

/// Parse a single time of day ("6 PM", "9:30am", "18:00") into its hour
fn parse_clock(token: &str) -> Option<u8> {
    let token = token.trim().to_ascii_uppercase();

    let (digits, pm) = if let Some(rest) = token.strip_suffix("AM") {
        (rest.trim(), Some(false))
    } else if let Some(rest) = token.strip_suffix("PM") {
        (rest.trim(), Some(true))
    } else {
        (token.as_str(), None)
    };

    let mut parts = digits.splitn(2, ':');
    let hour: u8 = parts.next()?.trim().parse().ok()?;
    if let Some(minutes) = parts.next() {
        let minutes: u8 = minutes.trim().parse().ok()?;
        if minutes >= 60 {
            return None;
        }
    }

    match pm {
        Some(pm) => {
            if hour == 0 || hour > 12 {
                return None;
            }
            let hour = hour % 12;
            Some(if pm { hour + 12 } else { hour })
        }
        None => (hour < 24).then_some(hour),
    }
}

impl fmt::Display for HoursSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoursSpec::AlwaysOpen => f.write_str("24 hours"),
            HoursSpec::Window { open_hour, close_hour } => {
                write!(f, "{:02}:00 - {:02}:00", open_hour, close_hour)
            }
        }
    }
}

impl Serialize for HoursSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Canonical shelter listing
///
/// Built only through the listing adapter (`models::listing`), which enforces
/// `capacity_available <= capacity_total` and finite coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelterRecord {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub location: GeoPoint,
    #[serde(rename = "capacityTotal")]
    pub capacity_total: u32,
    #[serde(rename = "capacityAvailable")]
    pub capacity_available: u32,
    #[serde(rename = "genderPolicy")]
    pub gender_policy: GenderPolicy,
    #[serde(rename = "petFriendly")]
    pub pet_friendly: bool,
    #[serde(rename = "wheelchairAccessible")]
    pub wheelchair_accessible: bool,
    pub hours: HoursSpec,
}

/// A shelter paired with its distance from the reference point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedShelter<'a> {
    pub shelter: &'a ShelterRecord,
    pub distance_km: f64,
}

/// Coarse bed availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityTier {
    High,
    Low,
    None,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_always_open() {
        assert_eq!("24 hours".parse::<HoursSpec>(), Ok(HoursSpec::AlwaysOpen));
        assert_eq!(" 24/7 ".parse::<HoursSpec>(), Ok(HoursSpec::AlwaysOpen));
        assert_eq!("Always Open".parse::<HoursSpec>(), Ok(HoursSpec::AlwaysOpen));
    }

    #[test]
    fn test_parse_overnight_window() {
        assert_eq!("6 PM - 8 AM".parse::<HoursSpec>(), Ok(HoursSpec::window(18, 8)));
        assert_eq!("5 PM - 9 AM".parse::<HoursSpec>(), Ok(HoursSpec::window(17, 9)));
        assert_eq!("18:00 - 08:00".parse::<HoursSpec>(), Ok(HoursSpec::window(18, 8)));
    }

    #[test]
    fn test_parse_daytime_window() {
        assert_eq!("9:30 AM - 5 PM".parse::<HoursSpec>(), Ok(HoursSpec::window(9, 17)));
        assert_eq!("12 AM - 12 PM".parse::<HoursSpec>(), Ok(HoursSpec::window(0, 12)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!("whenever".parse::<HoursSpec>(), Err(HoursParseError::Unrecognized(_))));
        assert!(matches!("13 PM - 8 AM".parse::<HoursSpec>(), Err(HoursParseError::InvalidTime(_))));
        assert!(matches!("25:00 - 08:00".parse::<HoursSpec>(), Err(HoursParseError::InvalidTime(_))));
        assert!(matches!("6:75 PM - 8 AM".parse::<HoursSpec>(), Err(HoursParseError::InvalidTime(_))));
    }

    #[test]
    fn test_hours_display() {
        assert_eq!(HoursSpec::AlwaysOpen.to_string(), "24 hours");
        assert_eq!(HoursSpec::window(18, 8).to_string(), "18:00 - 08:00");
    }

    #[test]
    fn test_gender_from_label() {
        assert_eq!(GenderPolicy::from_label("Family"), GenderPolicy::Family);
        assert_eq!(GenderPolicy::from_label("women"), GenderPolicy::Women);
        assert_eq!(GenderPolicy::from_label("mixed"), GenderPolicy::All);
    }
}
