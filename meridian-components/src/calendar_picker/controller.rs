//! Paging state machine of the calendar picker.
//!
//! ## Usage
//!
//! The controller keeps three months materialized on a three-page scroll
//! surface and recenters after every settle, so the user can page through an
//! unbounded range of months. Feed every [`ScrollSignal`] the host delivers to
//! [`CalendarPickerController::handle_scroll_signal`] and call
//! [`CalendarPickerController::layout_pass`] whenever the host lays out.
use std::{collections::BTreeSet, sync::Arc};

use chrono::NaiveDate;
use derive_setters::Setters;
use meridian_ui::{PagingSurface, Point, ScrollSignal, Size};
use tracing::{debug, trace, warn};

use super::{
    cache::MonthGeometryCache,
    calendar::{Calendar, GregorianCalendar, IntoCalendarDay, YearMonth, local_today},
    geometry::MonthGeometry,
    layout::{PagedLayout, PagingLayoutEngine, Slot},
    selection::{DateSelection, TapAction},
    style::{CalendarPickerStyle, StyleError},
};

/// Observer of picker events.
///
/// Every hook has a default body, so implementors only override what they
/// need. The `should_*` hooks can veto a selection change.
pub trait CalendarPickerDelegate: Send + Sync {
    /// The preferred height is about to change from `old_height` to
    /// `new_height`.
    fn will_change_height(&self, _old_height: f32, _new_height: f32) {}

    /// The preferred height changed.
    fn did_change_height(&self, _new_height: f32) {}

    /// A different month became visible.
    fn did_scroll_to_month(&self, _month: YearMonth) {}

    /// Whether `date` may be selected.
    fn should_select(&self, _date: NaiveDate) -> bool {
        true
    }

    /// `date` was selected.
    fn did_select(&self, _date: NaiveDate) {}

    /// Whether `date` may be deselected.
    fn should_deselect(&self, _date: NaiveDate) -> bool {
        true
    }

    /// `date` was deselected.
    fn did_deselect(&self, _date: NaiveDate) {}
}

/// Construction options for [`CalendarPickerController`].
#[derive(Clone, Setters)]
pub struct CalendarPickerArgs {
    /// Calendrical rules used for every month.
    #[setters(skip)]
    pub calendar: Arc<dyn Calendar>,
    /// Month shown first. Defaults to the month containing `today`.
    #[setters(strip_option)]
    pub initial_month: Option<YearMonth>,
    /// Day used by [`CalendarPickerController::scroll_to_today`]. Defaults to
    /// the local date.
    #[setters(strip_option)]
    pub today: Option<NaiveDate>,
    /// How many months before the initial one can be reached.
    #[setters(strip_option)]
    pub previous_month_count: Option<u32>,
    /// How many months after the initial one can be reached.
    #[setters(strip_option)]
    pub additional_month_count: Option<u32>,
    /// Grid style.
    pub style: CalendarPickerStyle,
    /// Whether taps select days.
    pub allows_selection: bool,
    /// Whether several days can be selected at once.
    pub allows_multiple_selection: bool,
    /// Observer of picker events.
    #[setters(skip)]
    pub delegate: Option<Arc<dyn CalendarPickerDelegate>>,
}

impl Default for CalendarPickerArgs {
    fn default() -> Self {
        Self {
            calendar: Arc::new(GregorianCalendar::default()),
            initial_month: None,
            today: None,
            previous_month_count: None,
            additional_month_count: None,
            style: CalendarPickerStyle::default(),
            allows_selection: true,
            allows_multiple_selection: false,
            delegate: None,
        }
    }
}

impl CalendarPickerArgs {
    /// Sets the calendar.
    pub fn calendar<C>(mut self, calendar: C) -> Self
    where
        C: Calendar + 'static,
    {
        self.calendar = Arc::new(calendar);
        self
    }

    /// Sets the calendar using a shared handle.
    pub fn calendar_shared(mut self, calendar: Arc<dyn Calendar>) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the delegate.
    pub fn delegate<D>(mut self, delegate: D) -> Self
    where
        D: CalendarPickerDelegate + 'static,
    {
        self.delegate = Some(Arc::new(delegate));
        self
    }

    /// Sets the delegate using a shared handle.
    pub fn delegate_shared(mut self, delegate: Arc<dyn CalendarPickerDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }
}

/// Gesture and animation state of the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPhase {
    /// Nothing in flight.
    Idle,
    /// The user is dragging the surface.
    UserDragging,
    /// Deceleration, a single-month animation or a spring-back is in flight.
    Settling,
    /// A multi-month jump is animating. Interaction is disabled.
    ProgrammaticJump,
}

/// Drives month paging, selection and layout of a calendar picker.
pub struct CalendarPickerController<S: PagingSurface> {
    surface: S,
    calendar: Arc<dyn Calendar>,
    initial_month: YearMonth,
    today: NaiveDate,
    engine: PagingLayoutEngine,
    month_offset: i32,
    target_month_offset_delta: Option<i32>,
    previous_month_count: Option<u32>,
    additional_month_count: Option<u32>,
    selection: DateSelection,
    delegate: Option<Arc<dyn CalendarPickerDelegate>>,
    phase: PickerPhase,
    interaction_enabled: bool,
    preferred_height: f32,
}

impl<S: PagingSurface> CalendarPickerController<S> {
    /// Creates a controller driving `surface`.
    ///
    /// Fails when the style in `args` is invalid.
    pub fn new(args: CalendarPickerArgs, surface: S) -> Result<Self, StyleError> {
        args.style.validate()?;

        let today = args.today.unwrap_or_else(local_today);
        let initial_month = args
            .initial_month
            .unwrap_or_else(|| args.calendar.year_month_of(today));
        let width = surface.viewport_size().width;
        let mut engine =
            PagingLayoutEngine::new(initial_month, Arc::clone(&args.calendar), width, args.style);
        let preferred_height = engine.geometry(0).preferred_height();

        let mut controller = Self {
            surface,
            calendar: args.calendar,
            initial_month,
            today,
            engine,
            month_offset: 0,
            target_month_offset_delta: None,
            previous_month_count: args.previous_month_count,
            additional_month_count: args.additional_month_count,
            selection: DateSelection::new(args.allows_selection, args.allows_multiple_selection),
            delegate: args.delegate,
            phase: PickerPhase::Idle,
            interaction_enabled: true,
            preferred_height,
        };
        controller.surface.set_user_interaction_enabled(true);
        if width > 0.0 {
            controller
                .surface
                .set_content_offset(Point::new(width, 0.0), false);
        }
        controller.layout_pass();
        Ok(controller)
    }

    /// The driven surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the driven surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Calendar used for every month.
    pub fn calendar(&self) -> &Arc<dyn Calendar> {
        &self.calendar
    }

    /// Month shown at offset 0.
    pub fn initial_month(&self) -> YearMonth {
        self.initial_month
    }

    /// Day [`scroll_to_today`](Self::scroll_to_today) navigates to.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Updates the day considered today, for example after midnight.
    pub fn set_today(&mut self, today: impl IntoCalendarDay) {
        self.today = today.into_calendar_day();
    }

    /// Signed months between the initial and the visible month.
    pub fn month_offset(&self) -> i32 {
        self.month_offset
    }

    /// Month currently centered on the surface.
    pub fn visible_month(&self) -> YearMonth {
        self.initial_month.add_months(self.month_offset)
    }

    /// Current gesture/animation phase.
    pub fn phase(&self) -> PickerPhase {
        self.phase
    }

    /// Whether user gestures are currently accepted.
    pub fn is_interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    /// Height the visible month needs.
    pub fn preferred_height(&self) -> f32 {
        self.preferred_height
    }

    /// Current style.
    pub fn style(&self) -> &CalendarPickerStyle {
        self.engine.style()
    }

    /// Read access to the month geometry cache.
    pub fn geometry_cache(&self) -> &MonthGeometryCache {
        self.engine.cache()
    }

    /// Geometry of the month shown in `slot`.
    pub fn month_geometry(&mut self, slot: Slot) -> &MonthGeometry {
        self.engine.geometry(self.month_offset + slot.delta())
    }

    /// Whether a reload is waiting for the current drag to end.
    pub fn has_pending_reload(&self) -> bool {
        self.engine.has_pending_reload()
    }

    /// Replaces the delegate.
    pub fn set_delegate(&mut self, delegate: Option<Arc<dyn CalendarPickerDelegate>>) {
        self.delegate = delegate;
    }

    /// Backward navigation bound.
    pub fn previous_month_count(&self) -> Option<u32> {
        self.previous_month_count
    }

    /// Limits how far back the user can page. `None` removes the limit.
    ///
    /// An offset already beyond the new bound stays where it is; only
    /// further navigation is blocked.
    pub fn set_previous_month_count(&mut self, count: Option<u32>) {
        self.previous_month_count = count;
        self.invalidate_for_bounds();
    }

    /// Forward navigation bound.
    pub fn additional_month_count(&self) -> Option<u32> {
        self.additional_month_count
    }

    /// Limits how far forward the user can page. `None` removes the limit.
    pub fn set_additional_month_count(&mut self, count: Option<u32>) {
        self.additional_month_count = count;
        self.invalidate_for_bounds();
    }

    fn invalidate_for_bounds(&mut self) {
        self.engine.invalidate();
        self.surface.request_layout();
    }

    /// Whether the previous month is reachable.
    pub fn can_scroll_backwards(&self) -> bool {
        self.previous_month_count
            .is_none_or(|count| -i64::from(self.month_offset) < i64::from(count))
    }

    /// Whether the next month is reachable.
    pub fn can_scroll_forwards(&self) -> bool {
        self.additional_month_count
            .is_none_or(|count| i64::from(self.month_offset) < i64::from(count))
    }

    fn offset_within_bounds(&self, offset: i32) -> bool {
        let offset = i64::from(offset);
        self.previous_month_count
            .is_none_or(|count| -offset <= i64::from(count))
            && self
                .additional_month_count
                .is_none_or(|count| offset <= i64::from(count))
    }

    /// Replaces the style, invalidating every cached geometry.
    ///
    /// An invalid style is rejected and the current one stays active.
    pub fn set_style(&mut self, style: CalendarPickerStyle) -> Result<(), StyleError> {
        if let Err(err) = style.validate() {
            warn!(%err, "rejected calendar picker style");
            return Err(err);
        }
        if self.engine.set_style(style) {
            self.update_preferred_height();
            self.surface.request_layout();
        }
        Ok(())
    }

    /// Pages to the next month. Returns whether navigation started.
    ///
    /// Ignored while another navigation or gesture is in flight and at the
    /// forward bound.
    pub fn scroll_to_next(&mut self, animated: bool) -> bool {
        if self.navigation_blocked("scroll_to_next") {
            return false;
        }
        if !self.can_scroll_forwards() {
            debug!(month_offset = self.month_offset, "forward bound reached");
            return false;
        }
        self.navigate(1, animated);
        true
    }

    /// Pages to the previous month. Returns whether navigation started.
    pub fn scroll_to_previous(&mut self, animated: bool) -> bool {
        if self.navigation_blocked("scroll_to_previous") {
            return false;
        }
        if !self.can_scroll_backwards() {
            debug!(month_offset = self.month_offset, "backward bound reached");
            return false;
        }
        self.navigate(-1, animated);
        true
    }

    /// Navigates to `month` in a single jump, however far away it is.
    ///
    /// The animation moves one page toward the target and the whole distance
    /// is applied when it completes, so exactly one month change is reported.
    /// Months outside the navigation bounds and the visible month itself are
    /// ignored.
    pub fn scroll_to(&mut self, month: YearMonth, animated: bool) -> bool {
        if self.navigation_blocked("scroll_to") {
            return false;
        }
        let target = self.initial_month.months_until(month);
        let delta = target - self.month_offset;
        if delta == 0 {
            trace!(%month, "already showing requested month");
            return false;
        }
        if !self.offset_within_bounds(target) {
            debug!(%month, target, "requested month is outside the navigation bounds");
            return false;
        }
        self.navigate(delta, animated);
        true
    }

    /// Navigates to the month containing today.
    pub fn scroll_to_today(&mut self, animated: bool) -> bool {
        let month = self.calendar.year_month_of(self.today);
        self.scroll_to(month, animated)
    }

    fn navigation_blocked(&self, action: &str) -> bool {
        if self.phase == PickerPhase::Idle && self.interaction_enabled {
            return false;
        }
        debug!(action, phase = ?self.phase, "navigation ignored while busy");
        true
    }

    fn navigate(&mut self, delta: i32, animated: bool) {
        self.target_month_offset_delta = Some(delta);
        self.set_interaction_enabled(false);

        if !animated {
            self.phase = PickerPhase::Settling;
            self.reconcile();
            return;
        }

        self.phase = if delta.abs() > 1 {
            PickerPhase::ProgrammaticJump
        } else {
            PickerPhase::Settling
        };
        let slot = if delta > 0 { Slot::Next } else { Slot::Previous };
        let width = self.engine.viewport_width();
        let y = self.surface.content_offset().y;
        debug!(delta, ?slot, "animating month navigation");
        self.surface
            .set_content_offset(Point::new(width * slot.page_index() as f32, y), true);
    }

    /// Reacts to a gesture or animation notification from the surface.
    pub fn handle_scroll_signal(&mut self, signal: ScrollSignal) {
        trace!(?signal, phase = ?self.phase, "scroll signal");
        match signal {
            ScrollSignal::DidBeginDrag => {
                if matches!(self.phase, PickerPhase::Idle | PickerPhase::Settling)
                    && self.interaction_enabled
                {
                    self.phase = PickerPhase::UserDragging;
                } else {
                    debug!(phase = ?self.phase, "drag ignored");
                }
            }
            ScrollSignal::DidEndDrag { will_decelerate } => {
                if self.phase != PickerPhase::UserDragging {
                    debug!(phase = ?self.phase, "drag end without drag");
                } else if will_decelerate {
                    self.phase = PickerPhase::Settling;
                } else {
                    self.reconcile();
                }
            }
            ScrollSignal::DidEndDecelerating => {
                if matches!(
                    self.phase,
                    PickerPhase::UserDragging | PickerPhase::Settling
                ) {
                    self.reconcile();
                }
            }
            ScrollSignal::DidEndProgrammaticScroll => {
                if matches!(
                    self.phase,
                    PickerPhase::Settling | PickerPhase::ProgrammaticJump
                ) {
                    self.reconcile();
                }
            }
        }
    }

    /// Scroll-stop reconciliation. Runs once per settle.
    fn reconcile(&mut self) {
        let previous_month = self.visible_month();
        let previous_offset = self.month_offset;
        let mut spring_back = false;

        if let Some(delta) = self.target_month_offset_delta.take() {
            self.month_offset += delta;
        } else {
            match self.settled_slot() {
                Slot::Previous if self.can_scroll_backwards() => self.month_offset -= 1,
                Slot::Next if self.can_scroll_forwards() => self.month_offset += 1,
                Slot::Previous | Slot::Next => spring_back = true,
                Slot::Current => {}
            }
        }

        let center = Point::new(
            self.engine.viewport_width(),
            self.surface.content_offset().y,
        );
        if spring_back {
            debug!(
                month_offset = self.month_offset,
                "navigation bound reached, springing back"
            );
        }
        self.surface.set_content_offset(center, spring_back);

        self.engine.take_pending_reload();
        self.engine.invalidate();
        self.surface.request_layout();
        self.update_preferred_height();

        debug!(
            from = previous_offset,
            to = self.month_offset,
            "scroll settled"
        );
        let visible = self.visible_month();
        if visible != previous_month
            && let Some(delegate) = &self.delegate
        {
            delegate.did_scroll_to_month(visible);
        }

        self.phase = if spring_back {
            PickerPhase::Settling
        } else {
            PickerPhase::Idle
        };
        self.set_interaction_enabled(true);
    }

    fn settled_slot(&self) -> Slot {
        let width = self.engine.viewport_width();
        if width <= 0.0 {
            return Slot::Current;
        }
        let page = (self.surface.content_offset().x / width).round().clamp(0.0, 2.0);
        Slot::from_page_index(page as usize).unwrap_or(Slot::Current)
    }

    fn set_interaction_enabled(&mut self, enabled: bool) {
        self.interaction_enabled = enabled;
        self.surface.set_user_interaction_enabled(enabled);
    }

    fn update_preferred_height(&mut self) {
        let height = self.engine.geometry(self.month_offset).preferred_height();
        if height == self.preferred_height {
            return;
        }
        let old_height = self.preferred_height;
        if let Some(delegate) = &self.delegate {
            delegate.will_change_height(old_height, height);
        }
        self.preferred_height = height;
        let width = self.engine.viewport_width();
        if width > 0.0 {
            self.surface
                .set_content_size(Size::new(width * Slot::ALL.len() as f32, height));
        }
        trace!(old_height, height, "preferred height changed");
        if let Some(delegate) = &self.delegate {
            delegate.did_change_height(height);
        }
    }

    /// Requests fresh geometry for the visible months.
    ///
    /// During a drag the reload is deferred until the drag ends.
    pub fn reload_data(&mut self) {
        if self.phase == PickerPhase::UserDragging {
            self.engine.mark_needs_reload();
            return;
        }
        self.engine.invalidate();
        self.surface.request_layout();
    }

    /// Runs a layout pass against the surface's current viewport.
    ///
    /// Picks up viewport width changes, applies a deferred reload when no
    /// drag is in progress, and returns the placed months. Returns `None`
    /// while the viewport has no width.
    pub fn layout_pass(&mut self) -> Option<&PagedLayout> {
        let width = self.surface.viewport_size().width;
        if width <= 0.0 {
            trace!("layout pass skipped, viewport has no width");
            return None;
        }

        if self.engine.set_viewport_width(width) {
            if self.phase == PickerPhase::Idle {
                let y = self.surface.content_offset().y;
                self.surface.set_content_offset(Point::new(width, y), false);
            }
            self.update_preferred_height();
        }
        if self.phase != PickerPhase::UserDragging && self.engine.take_pending_reload() {
            debug!("applying deferred reload");
            self.engine.invalidate();
        }

        let layout = self.engine.layout(self.month_offset);
        self.surface.set_content_size(layout.content_size);
        Some(layout)
    }

    /// Selected days in ascending order.
    pub fn selected_dates(&self) -> &BTreeSet<NaiveDate> {
        self.selection.dates()
    }

    /// Whether the day of `date` is selected.
    pub fn is_selected(&self, date: impl IntoCalendarDay) -> bool {
        self.selection.contains(date.into_calendar_day())
    }

    /// Whether taps select days.
    pub fn allows_selection(&self) -> bool {
        self.selection.allows_selection()
    }

    /// Enables or disables tap selection.
    pub fn set_allows_selection(&mut self, allows: bool) {
        self.selection.set_allows_selection(allows);
    }

    /// Whether several days can be selected at once.
    pub fn allows_multiple_selection(&self) -> bool {
        self.selection.allows_multiple_selection()
    }

    /// Switches between single and multiple selection.
    pub fn set_allows_multiple_selection(&mut self, allows: bool) {
        self.selection.set_allows_multiple_selection(allows);
    }

    /// Selects the day of `date`, replacing the current selection unless
    /// multiple selection is enabled.
    ///
    /// Returns whether the selection changed. The delegate may veto.
    pub fn select_date(&mut self, date: impl IntoCalendarDay) -> bool {
        let day = date.into_calendar_day();
        if !self.selection.would_select(day) {
            trace!(%day, "selection unchanged");
            return false;
        }
        if let Some(delegate) = &self.delegate
            && !delegate.should_select(day)
        {
            debug!(%day, "selection vetoed");
            return false;
        }
        self.selection.insert(day);
        if let Some(delegate) = &self.delegate {
            delegate.did_select(day);
        }
        self.surface.request_layout();
        true
    }

    /// Deselects the day of `date`. Returns whether it was selected and the
    /// delegate allowed the change.
    pub fn deselect_date(&mut self, date: impl IntoCalendarDay) -> bool {
        let day = date.into_calendar_day();
        if !self.selection.contains(day) {
            return false;
        }
        if let Some(delegate) = &self.delegate
            && !delegate.should_deselect(day)
        {
            debug!(%day, "deselection vetoed");
            return false;
        }
        self.selection.remove(day);
        if let Some(delegate) = &self.delegate {
            delegate.did_deselect(day);
        }
        self.surface.request_layout();
        true
    }

    /// Handles a tap on the cell at `index` of the month in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the month grid.
    pub fn tap_cell(&mut self, slot: Slot, index: usize) -> bool {
        let date = self.month_geometry(slot).date_for_cell(index);
        match self.selection.tap_action(date) {
            TapAction::Select => self.select_date(date),
            TapAction::Deselect => self.deselect_date(date),
            TapAction::Ignore => false,
        }
    }

    /// Replaces the selection without consulting or notifying the delegate.
    pub fn set_selected_dates<I, D>(&mut self, dates: I)
    where
        I: IntoIterator<Item = D>,
        D: IntoCalendarDay,
    {
        self.selection
            .set_dates(dates.into_iter().map(IntoCalendarDay::into_calendar_day));
        self.surface.request_layout();
    }

    /// Clears the selection without notifying the delegate.
    pub fn deselect_all(&mut self) {
        self.selection.clear();
        self.surface.request_layout();
    }
}
