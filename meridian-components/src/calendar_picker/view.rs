//! Mediator wiring headers, navigation buttons and content to the controller.
use std::sync::Arc;

use chrono::NaiveDate;
use meridian_ui::{PagingSurface, Point, Rect};
use parking_lot::Mutex;

use super::{
    calendar::YearMonth,
    controller::{CalendarPickerArgs, CalendarPickerController, CalendarPickerDelegate},
    layout::Slot,
    style::StyleError,
};

/// Everything a content provider needs to know about one day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayDescriptor {
    /// Day the cell shows.
    pub date: NaiveDate,
    /// Day-of-month number as the calendar counts it.
    pub day: u32,
    /// Month of the page the cell is on.
    pub month: YearMonth,
    /// Whether the day belongs to `month` rather than a neighbouring month.
    pub is_in_visible_month: bool,
    /// Whether the day is selected.
    pub is_selected: bool,
    /// Whether the day is the picker's today.
    pub is_today: bool,
}

/// Supplies the content drawn in cells and month headers.
///
/// The picker only decides where things go and which day they show.
pub trait CalendarContentProvider {
    /// Content of a day cell.
    type Cell;
    /// Content of a month header.
    type Header;

    /// Builds the content of a day cell.
    fn cell_content(&self, day: &DayDescriptor) -> Self::Cell;

    /// Builds the content of a month header.
    fn header_content(&self, month: YearMonth) -> Self::Header;
}

/// A day cell ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell<C> {
    /// Frame in content coordinates.
    pub frame: Rect,
    /// The day shown.
    pub day: DayDescriptor,
    /// Provider content.
    pub content: C,
}

/// A month page ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMonth<C, H> {
    /// Slot of the page.
    pub slot: Slot,
    /// Month shown on the page.
    pub month: YearMonth,
    /// Header frame in content coordinates.
    pub header_frame: Rect,
    /// Header content.
    pub header: H,
    /// Grid background frame in content coordinates.
    pub background_frame: Rect,
    /// Cells in index order.
    pub cells: Vec<RenderedCell<C>>,
}

/// Keeps the title in sync and forwards every event to the user's delegate.
struct TitleTracker {
    title: Arc<Mutex<YearMonth>>,
    inner: Option<Arc<dyn CalendarPickerDelegate>>,
}

impl CalendarPickerDelegate for TitleTracker {
    fn will_change_height(&self, old_height: f32, new_height: f32) {
        if let Some(inner) = &self.inner {
            inner.will_change_height(old_height, new_height);
        }
    }

    fn did_change_height(&self, new_height: f32) {
        if let Some(inner) = &self.inner {
            inner.did_change_height(new_height);
        }
    }

    fn did_scroll_to_month(&self, month: YearMonth) {
        *self.title.lock() = month;
        if let Some(inner) = &self.inner {
            inner.did_scroll_to_month(month);
        }
    }

    fn should_select(&self, date: NaiveDate) -> bool {
        self.inner
            .as_ref()
            .is_none_or(|inner| inner.should_select(date))
    }

    fn did_select(&self, date: NaiveDate) {
        if let Some(inner) = &self.inner {
            inner.did_select(date);
        }
    }

    fn should_deselect(&self, date: NaiveDate) -> bool {
        self.inner
            .as_ref()
            .is_none_or(|inner| inner.should_deselect(date))
    }

    fn did_deselect(&self, date: NaiveDate) {
        if let Some(inner) = &self.inner {
            inner.did_deselect(date);
        }
    }
}

/// Calendar picker with its weekday row, title and navigation buttons.
pub struct CalendarPickerView<S, P>
where
    S: PagingSurface,
    P: CalendarContentProvider,
{
    controller: CalendarPickerController<S>,
    provider: P,
    title: Arc<Mutex<YearMonth>>,
}

impl<S, P> CalendarPickerView<S, P>
where
    S: PagingSurface,
    P: CalendarContentProvider,
{
    /// Builds the view and its controller.
    pub fn new(
        mut args: CalendarPickerArgs,
        surface: S,
        provider: P,
    ) -> Result<Self, StyleError> {
        let inner = args.delegate.take();
        let mut controller = CalendarPickerController::new(args, surface)?;
        let title = Arc::new(Mutex::new(controller.visible_month()));
        controller.set_delegate(Some(Arc::new(TitleTracker {
            title: Arc::clone(&title),
            inner,
        })));
        Ok(Self {
            controller,
            provider,
            title,
        })
    }

    /// Replaces the user's delegate. The title keeps tracking.
    pub fn set_delegate(&mut self, delegate: Option<Arc<dyn CalendarPickerDelegate>>) {
        self.controller.set_delegate(Some(Arc::new(TitleTracker {
            title: Arc::clone(&self.title),
            inner: delegate,
        })));
    }

    /// The underlying controller.
    pub fn controller(&self) -> &CalendarPickerController<S> {
        &self.controller
    }

    /// Mutable access to the underlying controller.
    pub fn controller_mut(&mut self) -> &mut CalendarPickerController<S> {
        &mut self.controller
    }

    /// The content provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Labels of the weekday row, in column order.
    pub fn weekday_symbols(&self) -> Vec<String> {
        self.controller.calendar().weekday_symbols()
    }

    /// Month named by the title header.
    pub fn title_month(&self) -> YearMonth {
        *self.title.lock()
    }

    /// Text of the title header, for example "March 2024".
    pub fn title(&self) -> String {
        self.title_month().to_string()
    }

    /// Whether the "previous" button is enabled.
    pub fn previous_enabled(&self) -> bool {
        self.controller.is_interaction_enabled() && self.controller.can_scroll_backwards()
    }

    /// Whether the "next" button is enabled.
    pub fn next_enabled(&self) -> bool {
        self.controller.is_interaction_enabled() && self.controller.can_scroll_forwards()
    }

    /// Handles a press of the "previous" button.
    pub fn tap_previous(&mut self) -> bool {
        self.controller.scroll_to_previous(true)
    }

    /// Handles a press of the "next" button.
    pub fn tap_next(&mut self) -> bool {
        self.controller.scroll_to_next(true)
    }

    /// Handles a tap at `point`, given in viewport coordinates.
    ///
    /// Returns whether the selection changed.
    pub fn tap_at(&mut self, point: Point) -> bool {
        let content_point = point + self.controller.surface().content_offset();
        let hit = self
            .controller
            .layout_pass()
            .and_then(|layout| layout.cell_at(content_point))
            .map(|(slot, cell)| (slot, cell.index));
        match hit {
            Some((slot, index)) => self.controller.tap_cell(slot, index),
            None => false,
        }
    }

    /// Runs a layout pass and pairs every placed frame with provider content.
    ///
    /// Empty while the viewport has no width.
    pub fn render(&mut self) -> Vec<RenderedMonth<P::Cell, P::Header>> {
        let Some(layout) = self.controller.layout_pass().cloned() else {
            return Vec::new();
        };
        let calendar = Arc::clone(self.controller.calendar());
        let today = self.controller.today();

        layout
            .months
            .iter()
            .map(|month| RenderedMonth {
                slot: month.slot,
                month: month.year_month,
                header_frame: month.header_frame,
                header: self.provider.header_content(month.year_month),
                background_frame: month.background_frame,
                cells: month
                    .cells
                    .iter()
                    .map(|cell| {
                        let day = DayDescriptor {
                            date: cell.date,
                            day: calendar.day_of_month(cell.date),
                            month: month.year_month,
                            is_in_visible_month: cell.is_in_month,
                            is_selected: self.controller.is_selected(cell.date),
                            is_today: cell.date == today,
                        };
                        RenderedCell {
                            frame: cell.frame,
                            content: self.provider.cell_content(&day),
                            day,
                        }
                    })
                    .collect(),
            })
            .collect()
    }
}
