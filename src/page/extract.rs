//! CSS-selector extraction over the results markup.
//!
//! Page structure contract (test fixtures mirror this):
//! - a no-results placeholder renders as `div#errorContainer`
//! - the meeting header line is a `span` under `div.race_tab p`, with the
//!   date embedded as `DD/MM/YYYY`
//! - the results header table lives under `div.race_tab table`; its
//!   `thead` first cell reads "RACE <n> (...)" and its `tbody` cells hold
//!   the scalar fields at fixed positions
//! - the same-day race card is `table.js_racecard`; every cell in a card
//!   row links to a race except the trailing one
//! - runner rows are `tbody.f_fs12 tr`, twelve cells each, with the horse
//!   profile link in the third cell
//! - the result image is `div.race_photo a img`, pointing at the small
//!   variant; the full-size variant differs only in one size marker byte

use crate::model::{RaceFields, RaceHeader, RunnerTable};
use crate::page::ExtractionError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

fn selector(css: &'static str, url: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|_| ExtractionError {
        url: url.to_string(),
        what: css,
    })
}

fn missing(url: &str, what: &'static str) -> ExtractionError {
    ExtractionError {
        url: url.to_string(),
        what,
    }
}

fn cell_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Whether the page rendered the site's explicit no-results placeholder.
pub(crate) fn has_error_container(html: &str) -> bool {
    let document = Html::parse_document(html);
    match Selector::parse("div#errorContainer") {
        Ok(sel) => document.select(&sel).next().is_some(),
        Err(_) => false,
    }
}

/// Meeting date and race number from the page header.
///
/// The header line reads like "Race Meeting:  12/02/2022  Sha Tin"; the
/// date token is the one shaped like DD/MM/YYYY, normalized to dashes so
/// it can serve as an id segment. The race number comes from the results
/// table head, "RACE 7 (507)".
pub(crate) fn race_header(html: &str, page_url: &str) -> Result<RaceHeader, ExtractionError> {
    let document = Html::parse_document(html);

    let span_sel = selector("div.race_tab p span", page_url)?;
    let date = document
        .select(&span_sel)
        .flat_map(|span| {
            cell_text(span)
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .find(|token| token.matches('/').count() == 2)
        .map(|token| token.replace('/', "-"))
        .ok_or_else(|| missing(page_url, "meeting date"))?;

    let head_sel = selector("div.race_tab table thead td", page_url)?;
    let race_number = document
        .select(&head_sel)
        .next()
        .map(cell_text)
        .and_then(|text| text.split_whitespace().nth(1).map(str::to_string))
        .and_then(|token| token.parse::<u32>().ok())
        .ok_or_else(|| missing(page_url, "race number"))?;

    Ok(RaceHeader { date, race_number })
}

/// Scalar race fields from the results header table.
///
/// Cell positions are fixed on the site: class and distance share cell 3
/// ("Class 4 - 1200M"), going is cell 5, course cell 8, prize cell 9, and
/// the last three cells are the sectional pace figures.
pub(crate) fn race_fields(html: &str, page_url: &str) -> Result<RaceFields, ExtractionError> {
    let document = Html::parse_document(html);

    let cell_sel = selector("div.race_tab table tbody td", page_url)?;
    let cells: Vec<String> = document.select(&cell_sel).map(cell_text).collect();
    if cells.len() < 13 {
        return Err(missing(page_url, "race header cells"));
    }

    let (race_class, distance) = cells[3]
        .split_once(" - ")
        .map(|(class, distance)| (class.trim().to_string(), distance.trim().to_string()))
        .ok_or_else(|| missing(page_url, "class and distance"))?;

    let pace = format!(
        "{}/{}/{}",
        cells[cells.len() - 3],
        cells[cells.len() - 2],
        cells[cells.len() - 1]
    );

    Ok(RaceFields {
        race_class,
        distance,
        going: cells[5].clone(),
        course: cells[8].clone(),
        prize: cells[9].clone(),
        pace,
    })
}

/// Addresses of the day's races from the race card, in card order.
///
/// Every cell in a card row is a race link except the trailing one (the
/// card's summary cell). Relative links are resolved against the page
/// address.
pub(crate) fn race_links(html: &str, base: &Url) -> Result<Vec<String>, ExtractionError> {
    let page_url = base.as_str();
    let document = Html::parse_document(html);

    let row_sel = selector("table.js_racecard tbody tr", page_url)?;
    let cell_sel = selector("td", page_url)?;
    let anchor_sel = selector("a", page_url)?;

    let mut links = Vec::new();
    for row in document.select(&row_sel) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.is_empty() {
            continue;
        }
        for cell in &cells[..cells.len() - 1] {
            for anchor in cell.select(&anchor_sel) {
                if let Some(href) = anchor.value().attr("href") {
                    if let Ok(resolved) = base.join(href) {
                        links.push(resolved.to_string());
                    }
                }
            }
        }
    }

    Ok(links)
}

/// The runner table, transposed into one column per field.
///
/// Rows with fewer than twelve cells are rejected rather than skipped:
/// a short row means the table shape changed and per-row attribution
/// can no longer be trusted.
pub(crate) fn runner_table(html: &str, page_url: &str) -> Result<RunnerTable, ExtractionError> {
    let document = Html::parse_document(html);

    let row_sel = selector("tbody.f_fs12 tr", page_url)?;
    let cell_sel = selector("td", page_url)?;
    let anchor_sel = selector("a", page_url)?;

    let mut table = RunnerTable::default();
    for row in document.select(&row_sel) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() < 12 {
            return Err(missing(page_url, "runner row cells"));
        }

        let horse_url = cells[2]
            .select(&anchor_sel)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
            .map(str::to_string)
            .unwrap_or_default();

        table.place.push(cell_text(cells[0]));
        table.number.push(cell_text(cells[1]));
        table.name.push(cell_text(cells[2]));
        table.jockey.push(cell_text(cells[3]));
        table.trainer.push(cell_text(cells[4]));
        table.actual_weight.push(cell_text(cells[5]));
        table.declared_weight.push(cell_text(cells[6]));
        table.draw.push(cell_text(cells[7]));
        table.length_behind_winner.push(cell_text(cells[8]));
        table.running_positions.push(cell_text(cells[9]));
        table.finish_time.push(cell_text(cells[10]));
        table.win_odds.push(cell_text(cells[11]));
        table.horse_urls.push(horse_url);
    }

    Ok(table)
}

/// Address of the full-size result image, resolved against the page
/// address.
pub(crate) fn image_url(html: &str, base: &Url) -> Result<String, ExtractionError> {
    let page_url = base.as_str();
    let document = Html::parse_document(html);

    let img_sel = selector("div.race_photo a img", page_url)?;
    document
        .select(&img_sel)
        .next()
        .and_then(|img| img.value().attr("src"))
        .and_then(|src| base.join(src).ok())
        .map(|resolved| full_size_image_url(resolved.as_str()))
        .ok_or_else(|| missing(page_url, "result image"))
}

/// Rewrites a thumbnail image address to its full-size variant.
///
/// The site encodes the size in the character before the file extension:
/// `…abc_s.jpg` is the thumbnail, `…abc_L.jpg` the full image.
pub(crate) fn full_size_image_url(url: &str) -> String {
    let mut chars: Vec<char> = url.chars().collect();
    if chars.len() >= 5 {
        let index = chars.len() - 5;
        chars[index] = 'L';
    }
    chars.into_iter().collect()
}
