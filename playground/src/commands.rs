pub mod grid;
pub mod navigate;

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate, Weekday};
use meridian_components::calendar_picker::{
    CalendarHeightMode, CalendarPickerStyle, GregorianCalendar, YearMonth,
};

/// Picker configuration shared by every command.
pub struct PickerOptions {
    pub width: f32,
    pub dynamic_height: bool,
    pub first_weekday: Weekday,
    pub header_height: Option<f32>,
}

impl PickerOptions {
    pub fn calendar(&self) -> GregorianCalendar {
        GregorianCalendar::new(self.first_weekday)
    }

    pub fn style(&self) -> Result<CalendarPickerStyle> {
        let mode = if self.dynamic_height {
            CalendarHeightMode::Dynamic
        } else {
            CalendarHeightMode::Fixed
        };
        let mut style = CalendarPickerStyle::default().calendar_height_mode(mode);
        if let Some(height) = self.header_height {
            style = style.month_header_height(height);
        }
        style.validate().context("invalid picker style")?;
        Ok(style)
    }

    pub fn validate_width(&self) -> Result<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(anyhow!("width must be a positive number, got {}", self.width));
        }
        Ok(())
    }
}

/// Parses a `YYYY-MM` month.
pub fn parse_month(value: &str) -> Result<YearMonth> {
    let (year, month) = value
        .split_once('-')
        .ok_or_else(|| anyhow!("expected YYYY-MM, got '{value}'"))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("invalid year in '{value}'"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("invalid month in '{value}'"))?;
    let month =
        YearMonth::new(year, month).with_context(|| format!("invalid month '{value}'"))?;
    ensure_supported(month)
}

/// Rejects months whose grid would reach past the dates chrono can represent.
pub fn ensure_supported(month: YearMonth) -> Result<YearMonth> {
    let first = NaiveDate::MIN.year() + 1;
    let last = NaiveDate::MAX.year() - 1;
    if !(first..=last).contains(&month.year()) {
        return Err(anyhow!(
            "year {} is outside the supported range {first}..={last}",
            month.year()
        ));
    }
    Ok(month)
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("expected YYYY-MM-DD, got '{value}'"))
}
