use itertools::Itertools;
use log::debug;
use scraper::{ElementRef, Html};

use crate::{
    chrono_util::parse_date,
    schema::{FestivalRecord, Month},
};

/// Finds the first table whose header row reads (at least) "date", "day", "festival",
/// compared case-insensitively by substring.
pub fn find_festival_table(html: &Html) -> Option<ElementRef> {
    html.select(selector!("table")).find(|table| {
        let Some(header_row) = table.select(selector!("tr")).next() else {
            return false;
        };
        let headers = header_row
            .select(selector!("th, td"))
            .map(|cell| cell.text().map(str::trim).collect::<String>().to_lowercase())
            .collect_vec();
        matches!(
            &headers[..],
            [date, day, festival, ..]
                if date.contains("date") && day.contains("day") && festival.contains("festival")
        )
    })
}

/// Text of a cell, with every text node trimmed and the non-empty ones joined by a space.
pub fn cell_text(cell: ElementRef) -> String {
    cell.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .join(" ")
}

/// Extracts the festival records from the body rows of `table`.
///
/// Rows with fewer than three data cells, or with an empty festival cell, are skipped.
pub fn parse_festival_rows(
    table: ElementRef,
    month: Month,
    source_url: &str,
) -> Vec<FestivalRecord> {
    table
        .select(selector!("tr"))
        .skip(1)
        .filter_map(|row| {
            let cells = row.select(selector!("td")).map(cell_text).collect_vec();
            let [date_label, day, festival, ..] = &cells[..] else {
                return None;
            };
            if festival.trim().is_empty() {
                return None;
            }
            let date = parse_date(date_label);
            if date.is_none() {
                debug!("Unable to parse date {date_label:?} (month: {month})");
            }
            Some(
                FestivalRecord::builder()
                    .date(date)
                    .date_label(date_label.clone())
                    .day(day.clone())
                    .festival(festival.clone())
                    .month(month)
                    .source_url(source_url.to_owned())
                    .build(),
            )
        })
        .collect()
}

/// Parses a month page.  A page without a festival table yields no records.
pub fn parse(html: &Html, month: Month, source_url: &str) -> Option<Vec<FestivalRecord>> {
    let table = find_festival_table(html)?;
    Some(parse_festival_rows(table, month, source_url))
}
