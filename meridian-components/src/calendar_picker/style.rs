//! Layout style of the calendar picker grid.
use derive_setters::Setters;
use meridian_ui::EdgeInsets;
use thiserror::Error;

const DEFAULT_CELL_SPACING: f32 = 2.0;
const DEFAULT_CELL_HEIGHT: f32 = 40.0;

/// How many rows a month grid reserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarHeightMode {
    /// Every month reserves the calendar's maximum row count, so all months
    /// share one height.
    #[default]
    Fixed,
    /// Each month reserves exactly the rows it spans.
    Dynamic,
}

/// How a cell's height is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellHeightMode {
    /// Constant height in points.
    Fixed(f32),
    /// Height is `cell_width * ratio`.
    AspectRatio(f32),
}

impl Default for CellHeightMode {
    fn default() -> Self {
        CellHeightMode::Fixed(DEFAULT_CELL_HEIGHT)
    }
}

/// Rejected style values.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum StyleError {
    /// An inset was negative or not finite.
    #[error("content insets must be finite and non-negative, got {0:?}")]
    InvalidInsets(EdgeInsets),
    /// A cell spacing was negative or not finite.
    #[error("cell spacing must be finite and non-negative, got {0}")]
    InvalidSpacing(f32),
    /// A fixed cell height was not positive.
    #[error("fixed cell height must be finite and positive, got {0}")]
    InvalidCellHeight(f32),
    /// An aspect ratio was not positive.
    #[error("cell aspect ratio must be finite and positive, got {0}")]
    InvalidAspectRatio(f32),
    /// The month header height was negative.
    #[error("month header height must be finite and non-negative, got {0}")]
    InvalidHeaderHeight(f32),
}

/// Immutable style configuration of the picker.
///
/// Replace the whole value to change it; the picker revalidates and relays out
/// on every replacement.
#[derive(Debug, Clone, Copy, PartialEq, Setters)]
pub struct CalendarPickerStyle {
    /// Row reservation policy.
    pub calendar_height_mode: CalendarHeightMode,
    /// Cell height policy.
    pub cell_height_mode: CellHeightMode,
    /// Insets around the header and grid of each month page.
    pub content_insets: EdgeInsets,
    /// Horizontal spacing before, between and after cells.
    pub cell_spacing_x: f32,
    /// Vertical spacing above, between and below rows.
    pub cell_spacing_y: f32,
    /// Height reserved for the month header, if any.
    #[setters(strip_option)]
    pub month_header_height: Option<f32>,
}

impl Default for CalendarPickerStyle {
    fn default() -> Self {
        Self {
            calendar_height_mode: CalendarHeightMode::Fixed,
            cell_height_mode: CellHeightMode::default(),
            content_insets: EdgeInsets::ZERO,
            cell_spacing_x: DEFAULT_CELL_SPACING,
            cell_spacing_y: DEFAULT_CELL_SPACING,
            month_header_height: None,
        }
    }
}

impl CalendarPickerStyle {
    /// Checks every numeric field.
    pub fn validate(&self) -> Result<(), StyleError> {
        if !self.content_insets.is_non_negative() {
            return Err(StyleError::InvalidInsets(self.content_insets));
        }
        for spacing in [self.cell_spacing_x, self.cell_spacing_y] {
            if !spacing.is_finite() || spacing < 0.0 {
                return Err(StyleError::InvalidSpacing(spacing));
            }
        }
        match self.cell_height_mode {
            CellHeightMode::Fixed(height) if !height.is_finite() || height <= 0.0 => {
                return Err(StyleError::InvalidCellHeight(height));
            }
            CellHeightMode::AspectRatio(ratio) if !ratio.is_finite() || ratio <= 0.0 => {
                return Err(StyleError::InvalidAspectRatio(ratio));
            }
            _ => {}
        }
        if let Some(height) = self.month_header_height
            && (!height.is_finite() || height < 0.0)
        {
            return Err(StyleError::InvalidHeaderHeight(height));
        }
        Ok(())
    }

    /// Header height, zero when no header is configured.
    pub fn header_height(&self) -> f32 {
        self.month_header_height.unwrap_or(0.0)
    }

    /// Width of one cell when `days_per_week` columns share `layout_width`.
    ///
    /// Spacing is applied before the first column, between columns and after
    /// the last one. Never negative.
    pub fn cell_width(&self, layout_width: f32, days_per_week: u32) -> f32 {
        let columns = days_per_week as f32;
        let available = layout_width
            - self.content_insets.horizontal()
            - (columns + 1.0) * self.cell_spacing_x;
        (available / columns).max(0.0)
    }

    /// Height of one cell for the given cell width.
    pub fn cell_height(&self, cell_width: f32) -> f32 {
        match self.cell_height_mode {
            CellHeightMode::Fixed(height) => height,
            CellHeightMode::AspectRatio(ratio) => cell_width * ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_is_valid() {
        assert_eq!(CalendarPickerStyle::default().validate(), Ok(()));
    }

    #[test]
    fn setters_build_a_new_style() {
        let style = CalendarPickerStyle::default()
            .calendar_height_mode(CalendarHeightMode::Dynamic)
            .cell_spacing_x(4.0)
            .month_header_height(32.0);
        assert_eq!(style.calendar_height_mode, CalendarHeightMode::Dynamic);
        assert_eq!(style.cell_spacing_x, 4.0);
        assert_eq!(style.header_height(), 32.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let style = CalendarPickerStyle::default();
        assert_eq!(
            style.cell_spacing_y(-1.0).validate(),
            Err(StyleError::InvalidSpacing(-1.0))
        );
        assert_eq!(
            style
                .cell_height_mode(CellHeightMode::Fixed(0.0))
                .validate(),
            Err(StyleError::InvalidCellHeight(0.0))
        );
        assert_eq!(
            style
                .cell_height_mode(CellHeightMode::AspectRatio(-0.5))
                .validate(),
            Err(StyleError::InvalidAspectRatio(-0.5))
        );
        assert_eq!(
            style.month_header_height(-4.0).validate(),
            Err(StyleError::InvalidHeaderHeight(-4.0))
        );
        let insets = EdgeInsets::new(0.0, -2.0, 0.0, 0.0);
        assert_eq!(
            style.content_insets(insets).validate(),
            Err(StyleError::InvalidInsets(insets))
        );
    }

    #[test]
    fn cell_width_distributes_remaining_space() {
        let style = CalendarPickerStyle::default()
            .content_insets(EdgeInsets::new(0.0, 8.0, 0.0, 8.0))
            .cell_spacing_x(2.0);
        // 320 - 16 - 8 * 2 = 288, / 7
        assert!((style.cell_width(320.0, 7) - 288.0 / 7.0).abs() < 1e-4);
        assert_eq!(style.cell_width(10.0, 7), 0.0);
    }

    #[test]
    fn cell_height_follows_mode() {
        let fixed = CalendarPickerStyle::default().cell_height_mode(CellHeightMode::Fixed(44.0));
        assert_eq!(fixed.cell_height(30.0), 44.0);
        let ratio =
            CalendarPickerStyle::default().cell_height_mode(CellHeightMode::AspectRatio(1.5));
        assert_eq!(ratio.cell_height(30.0), 45.0);
    }
}
