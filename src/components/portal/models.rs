use serde::{Deserialize, Serialize};

/// One parsed row of the portal timetable
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Cell 0, e.g. `01/05/2024`
    pub date: String,
    /// Cell 1, e.g. `07:00`
    pub time: String,
    /// Cell 2
    pub subject: String,
    /// Cell 3
    pub location: String,
}
