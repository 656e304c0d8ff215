use super::models::ScheduleEntry;
use crate::error::{portal_error, AppResult};
use scraper::{ElementRef, Html, Selector};

/// Rows of the timetable table. The container is an id on the live portal; the class
/// form is accepted too.
pub const SCHEDULE_ROW_SELECTOR: &str = "#divThoiKhoaBieu .MainTb tr, .divThoiKhoaBieu .MainTb tr";
const CELL_SELECTOR: &str = "td";

fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css).map_err(|e| portal_error(&format!("Invalid selector {}: {:?}", css, e)))
}

/// Text of the cell at `index`, or an empty string when the row is shorter
fn cell_text(cells: &[ElementRef<'_>], index: usize) -> String {
    cells
        .get(index)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Extract the schedule rows from a portal page.
///
/// Rows without any `<td>` (header rows, separators) are skipped. Every other row
/// produces one entry built from its first four cells, in document order.
pub fn parse_schedule(html: &str) -> AppResult<Vec<ScheduleEntry>> {
    let document = Html::parse_document(html);
    let rows = selector(SCHEDULE_ROW_SELECTOR)?;
    let cell = selector(CELL_SELECTOR)?;

    let entries = document
        .select(&rows)
        .filter_map(|row| {
            let cells: Vec<ElementRef<'_>> = row.select(&cell).collect();
            if cells.is_empty() {
                return None;
            }
            Some(ScheduleEntry {
                date: cell_text(&cells, 0),
                time: cell_text(&cells, 1),
                subject: cell_text(&cells, 2),
                location: cell_text(&cells, 3),
            })
        })
        .collect();

    Ok(entries)
}
