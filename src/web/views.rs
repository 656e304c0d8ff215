use crate::components::portal::ScheduleEntry;
use askama::Template;

fn current_lang() -> String {
    rust_i18n::locale().to_string()
}

/// Login page
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub lang: String,
    pub title: String,
    pub heading: String,
    pub google_label: String,
    /// Shown only when Microsoft sign-in is configured
    pub microsoft_label: Option<String>,
}

impl LoginTemplate {
    pub fn new(microsoft_enabled: bool) -> Self {
        Self {
            lang: current_lang(),
            title: t!("login.title").to_string(),
            heading: t!("login.heading").to_string(),
            google_label: t!("login.google").to_string(),
            microsoft_label: microsoft_enabled.then(|| t!("login.microsoft").to_string()),
        }
    }
}

/// Column headers and fixed text of the schedule page
pub struct ScheduleLabels {
    pub date: String,
    pub time: String,
    pub subject: String,
    pub location: String,
    pub empty: String,
    pub logout: String,
}

impl ScheduleLabels {
    fn localized() -> Self {
        Self {
            date: t!("schedule.date").to_string(),
            time: t!("schedule.time").to_string(),
            subject: t!("schedule.subject").to_string(),
            location: t!("schedule.location").to_string(),
            empty: t!("schedule.empty").to_string(),
            logout: t!("schedule.logout").to_string(),
        }
    }
}

/// Schedule page listing the scraped rows
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub lang: String,
    pub title: String,
    pub signed_in_as: Option<String>,
    /// Result line of the calendar sync
    pub synced: Option<String>,
    pub notice: Option<String>,
    pub schedule_data: Vec<ScheduleEntry>,
    pub labels: ScheduleLabels,
}

impl IndexTemplate {
    pub fn new(
        schedule_data: Vec<ScheduleEntry>,
        synced_count: Option<usize>,
        notice: Option<String>,
        user: Option<&str>,
    ) -> Self {
        Self {
            lang: current_lang(),
            title: t!("schedule.title").to_string(),
            signed_in_as: user.map(|name| t!("schedule.signed_in_as", name = name).to_string()),
            synced: synced_count.map(|count| t!("schedule.synced", count = count).to_string()),
            notice,
            schedule_data,
            labels: ScheduleLabels::localized(),
        }
    }
}
