use std::sync::Arc;

use anyhow::Result;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use meridian_components::calendar_picker::{Calendar, MonthGeometry, YearMonth};
use meridian_ui::{Rect, Size};
use serde::Serialize;

use super::{PickerOptions, ensure_supported};
use crate::output;

pub struct GridOptions {
    pub year: i32,
    pub month: i32,
    pub picker: PickerOptions,
    pub json: bool,
}

#[derive(Serialize)]
struct GridReport {
    month: String,
    week_count: u32,
    days_per_week: u32,
    first_weekday_offset: u32,
    cell_size: Size,
    header_frame: Rect,
    background_frame: Rect,
    preferred_height: f32,
    cells: Vec<CellReport>,
}

#[derive(Serialize)]
struct CellReport {
    index: usize,
    date: String,
    in_month: bool,
    frame: Rect,
}

pub fn execute(options: GridOptions) -> Result<()> {
    options.picker.validate_width()?;
    let month = ensure_supported(YearMonth::normalized(options.year, options.month))?;
    let calendar: Arc<dyn Calendar> = Arc::new(options.picker.calendar());
    let style = options.picker.style()?;
    let geometry = MonthGeometry::for_month(month, &calendar, options.picker.width, &style);

    if options.json {
        let report = GridReport {
            month: output::month_key(geometry.year(), geometry.month()),
            week_count: geometry.week_count(),
            days_per_week: geometry.days_per_week(),
            first_weekday_offset: geometry.first_weekday_offset(),
            cell_size: geometry.cell_size(),
            header_frame: geometry.header_frame(),
            background_frame: geometry.background_frame(),
            preferred_height: geometry.preferred_height(),
            cells: (0..geometry.cell_count())
                .map(|index| CellReport {
                    index,
                    date: geometry.date_for_cell(index).to_string(),
                    in_month: geometry.is_in_month(index),
                    frame: geometry.frame_for_cell(index),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::status("Geometry", geometry.year_month().to_string());
    output::step(format!(
        "{} weeks, cell {:.1} x {:.1}, preferred height {:.1}",
        geometry.week_count(),
        geometry.cell_size().width,
        geometry.cell_size().height,
        geometry.preferred_height()
    ));
    if geometry.week_count() < calendar.weeks_in_month(geometry.year_month()) {
        output::warn("grid has fewer rows than the month spans");
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            calendar
                .weekday_symbols()
                .into_iter()
                .map(|symbol| Cell::new(symbol).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );

    let days_per_week = geometry.days_per_week() as usize;
    for row in 0..geometry.week_count() as usize {
        let cells = (0..days_per_week).map(|column| {
            let index = row * days_per_week + column;
            let day = calendar.day_of_month(geometry.date_for_cell(index));
            if geometry.is_in_month(index) {
                Cell::new(day).add_attribute(Attribute::Bold)
            } else {
                Cell::new(day).fg(Color::DarkGrey)
            }
        });
        table.add_row(cells.collect::<Vec<_>>());
    }

    println!("{table}");
    Ok(())
}
