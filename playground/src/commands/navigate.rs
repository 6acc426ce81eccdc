use std::sync::Arc;

use anyhow::{Result, anyhow};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use meridian_components::calendar_picker::{
    CalendarPickerArgs, CalendarPickerController, CalendarPickerDelegate, YearMonth,
};
use meridian_ui::{HeadlessSurface, PagingSurface, Size};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use super::{PickerOptions, parse_date, parse_month};
use crate::output;

const VIEWPORT_HEIGHT: f32 = 400.0;

pub struct NavigateOptions {
    pub start: String,
    pub today: Option<String>,
    pub previous_months: Option<u32>,
    pub additional_months: Option<u32>,
    pub animated: bool,
    pub picker: PickerOptions,
    pub json: bool,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Next,
    Previous,
    Today,
    Month(YearMonth),
    DragNext,
    DragPrevious,
}

impl Action {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "next" => Ok(Action::Next),
            "prev" | "previous" => Ok(Action::Previous),
            "today" => Ok(Action::Today),
            "drag-next" => Ok(Action::DragNext),
            "drag-prev" | "drag-previous" => Ok(Action::DragPrevious),
            other => parse_month(other)
                .map(Action::Month)
                .map_err(|err| anyhow!("unknown action '{other}': {err:#}")),
        }
    }
}

/// Collects month changes reported while an action runs.
#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<String>>,
}

impl EventLog {
    fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl CalendarPickerDelegate for EventLog {
    fn will_change_height(&self, old_height: f32, new_height: f32) {
        self.events
            .lock()
            .push(format!("height {old_height:.1} -> {new_height:.1}"));
    }

    fn did_scroll_to_month(&self, month: YearMonth) {
        self.events.lock().push(format!("scrolled to {month}"));
    }
}

#[derive(Serialize)]
struct StepReport {
    action: String,
    accepted: bool,
    month: String,
    offset: i32,
    preferred_height: f32,
    events: Vec<String>,
}

type Picker = CalendarPickerController<HeadlessSurface>;

pub fn execute(options: NavigateOptions) -> Result<()> {
    options.picker.validate_width()?;
    let actions = options
        .actions
        .iter()
        .map(|action| Action::parse(action))
        .collect::<Result<Vec<_>>>()?;

    let log = Arc::new(EventLog::default());
    let mut args = CalendarPickerArgs::default()
        .calendar(options.picker.calendar())
        .initial_month(parse_month(&options.start)?)
        .style(options.picker.style()?)
        .delegate_shared(log.clone());
    if let Some(today) = &options.today {
        args = args.today(parse_date(today)?);
    }
    if let Some(count) = options.previous_months {
        args = args.previous_month_count(count);
    }
    if let Some(count) = options.additional_months {
        args = args.additional_month_count(count);
    }

    let surface = HeadlessSurface::new(Size::new(options.picker.width, VIEWPORT_HEIGHT));
    let mut picker = CalendarPickerController::new(args, surface)?;
    if !options.json {
        output::status("Start", picker.visible_month().to_string());
    }

    let mut reports = Vec::with_capacity(actions.len());
    for (raw, action) in options.actions.iter().zip(actions) {
        let accepted = run(&mut picker, action, options.animated);
        let report = StepReport {
            action: raw.clone(),
            accepted,
            month: output::month_key(picker.visible_month().year(), picker.visible_month().month()),
            offset: picker.month_offset(),
            preferred_height: picker.preferred_height(),
            events: log.drain(),
        };
        if !options.json {
            print_step(&report, &picker);
        }
        reports.push(report);
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_summary(&reports);
    }
    Ok(())
}

fn run(picker: &mut Picker, action: Action, animated: bool) -> bool {
    debug!(?action, "running action");
    let accepted = match action {
        Action::Next => picker.scroll_to_next(animated),
        Action::Previous => picker.scroll_to_previous(animated),
        Action::Today => picker.scroll_to_today(animated),
        Action::Month(month) => picker.scroll_to(month, animated),
        Action::DragNext => drag(picker, 2),
        Action::DragPrevious => drag(picker, 0),
    };
    settle(picker);
    accepted
}

/// Drags to `page` and lets deceleration land there.
fn drag(picker: &mut Picker, page: i32) -> bool {
    let Some(signal) = picker.surface_mut().begin_drag() else {
        return false;
    };
    picker.handle_scroll_signal(signal);
    let width = picker.surface().viewport_size().width;
    picker.surface_mut().drag_to(width * page as f32);
    let signal = picker.surface_mut().end_drag(true);
    picker.handle_scroll_signal(signal);
    let signal = picker.surface_mut().finish_deceleration(page);
    picker.handle_scroll_signal(signal);
    true
}

fn settle(picker: &mut Picker) {
    while let Some(signal) = picker.surface_mut().finish_animation() {
        picker.handle_scroll_signal(signal);
    }
}

fn print_step(report: &StepReport, picker: &Picker) {
    if report.accepted {
        output::status("Navigated", format!("{} -> {}", report.action, picker.visible_month()));
    } else {
        output::warn(format!(
            "'{}' ignored at {}",
            report.action,
            picker.visible_month()
        ));
    }
    for event in &report.events {
        output::step(event);
    }
    if !picker.can_scroll_backwards() || !picker.can_scroll_forwards() {
        output::note("a navigation bound is active");
    }
}

fn print_summary(reports: &[StepReport]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Action").fg(Color::Cyan),
            Cell::new("Accepted").fg(Color::Cyan),
            Cell::new("Month").fg(Color::Cyan),
            Cell::new("Offset").fg(Color::Cyan),
            Cell::new("Height").fg(Color::Cyan),
        ]);

    for report in reports {
        let accepted = if report.accepted {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&report.action),
            accepted,
            Cell::new(&report.month),
            Cell::new(report.offset),
            Cell::new(format!("{:.1}", report.preferred_height)),
        ]);
    }

    println!("{table}");
}
