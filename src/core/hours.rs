use serde::{Deserialize, Serialize};

use crate::models::{HoursSpec, ShelterRecord};

/// Windows opening at or after this hour are treated as overnight windows
pub const OVERNIGHT_OPEN_HOUR: u8 = 12;

/// How a daytime window (opening before noon) is evaluated
///
/// `AssumeOpen` reports such shelters as open at every hour, which is how the
/// listing UI has always behaved. `Strict` checks `open <= hour < close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaytimeHours {
    #[default]
    AssumeOpen,
    Strict,
}

/// Whether `shelter` is open at `current_hour` (0-23, viewer local time)
#[inline]
pub fn is_open(shelter: &ShelterRecord, current_hour: u8) -> bool {
    is_open_with(shelter.hours, current_hour, DaytimeHours::AssumeOpen)
}

pub fn is_open_with(hours: HoursSpec, current_hour: u8, daytime: DaytimeHours) -> bool {
    match hours {
        HoursSpec::AlwaysOpen => true,
        HoursSpec::Window { open_hour, close_hour } => match daytime {
            DaytimeHours::AssumeOpen if open_hour < OVERNIGHT_OPEN_HOUR => true,
            DaytimeHours::Strict if open_hour < close_hour => {
                current_hour >= open_hour && current_hour < close_hour
            }
            _ => current_hour >= open_hour || current_hour < close_hour,
        },
    }
}
