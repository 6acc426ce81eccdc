//! Selected days of the picker.
use std::collections::BTreeSet;

use chrono::NaiveDate;

/// What a tap on a day should do under the current selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    /// Select the day.
    Select,
    /// Deselect the day.
    Deselect,
    /// Leave the selection untouched.
    Ignore,
}

/// Set of selected calendar days plus the policy that governs it.
///
/// Days are stored as [`NaiveDate`]s, so two instants on the same local day
/// are one entry. The selection is independent of paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSelection {
    dates: BTreeSet<NaiveDate>,
    allows_selection: bool,
    allows_multiple_selection: bool,
}

impl Default for DateSelection {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl DateSelection {
    /// Creates an empty selection with the given policy.
    pub fn new(allows_selection: bool, allows_multiple_selection: bool) -> Self {
        Self {
            dates: BTreeSet::new(),
            allows_selection,
            allows_multiple_selection,
        }
    }

    /// Whether taps may change the selection.
    pub fn allows_selection(&self) -> bool {
        self.allows_selection
    }

    /// Enables or disables tap selection. Existing dates are kept.
    pub fn set_allows_selection(&mut self, allows: bool) {
        self.allows_selection = allows;
    }

    /// Whether several days can be selected at once.
    pub fn allows_multiple_selection(&self) -> bool {
        self.allows_multiple_selection
    }

    /// Switches between single and multiple selection. Existing dates are
    /// kept.
    pub fn set_allows_multiple_selection(&mut self, allows: bool) {
        self.allows_multiple_selection = allows;
    }

    /// Whether `date` is selected.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Selected days in ascending order.
    pub fn dates(&self) -> &BTreeSet<NaiveDate> {
        &self.dates
    }

    /// Number of selected days.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Whether selecting `date` would change anything.
    pub fn would_select(&self, date: NaiveDate) -> bool {
        if !self.allows_selection {
            return false;
        }
        if self.allows_multiple_selection {
            !self.contains(date)
        } else {
            !(self.len() == 1 && self.contains(date))
        }
    }

    /// Decides what tapping `date` does.
    ///
    /// With multiple selection a tap toggles the day; otherwise tapping the
    /// already selected day does nothing.
    pub fn tap_action(&self, date: NaiveDate) -> TapAction {
        if !self.allows_selection {
            TapAction::Ignore
        } else if self.allows_multiple_selection && self.contains(date) {
            TapAction::Deselect
        } else if self.would_select(date) {
            TapAction::Select
        } else {
            TapAction::Ignore
        }
    }

    /// Adds `date`, replacing every other day in single selection mode.
    /// Returns whether the selection changed.
    ///
    /// The policy flag `allows_selection` gates taps, not this call.
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        if self.allows_multiple_selection {
            return self.dates.insert(date);
        }
        if self.len() == 1 && self.contains(date) {
            return false;
        }
        self.dates.clear();
        self.dates.insert(date)
    }

    /// Removes `date`. Returns whether it was selected.
    pub fn remove(&mut self, date: NaiveDate) -> bool {
        self.dates.remove(&date)
    }

    /// Replaces the whole selection. In single selection mode only the latest
    /// date is kept.
    pub fn set_dates<I>(&mut self, dates: I)
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();
        self.dates = if self.allows_multiple_selection {
            dates
        } else {
            dates.last().copied().into_iter().collect()
        };
    }

    /// Removes every day.
    pub fn clear(&mut self) {
        self.dates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date")
    }

    #[test]
    fn single_selection_replaces_previous_day() {
        let mut selection = DateSelection::default();
        assert!(selection.insert(day(1)));
        assert!(selection.insert(day(2)));
        assert_eq!(selection.dates().iter().copied().collect::<Vec<_>>(), [day(2)]);
        assert!(!selection.insert(day(2)));
    }

    #[test]
    fn multiple_selection_accumulates_and_deduplicates() {
        let mut selection = DateSelection::new(true, true);
        assert!(selection.insert(day(1)));
        assert!(selection.insert(day(3)));
        assert!(!selection.insert(day(1)));
        assert_eq!(selection.len(), 2);
        assert!(selection.remove(day(1)));
        assert!(!selection.remove(day(1)));
    }

    #[test]
    fn tap_actions_follow_policy() {
        let mut single = DateSelection::default();
        single.insert(day(4));
        assert_eq!(single.tap_action(day(4)), TapAction::Ignore);
        assert_eq!(single.tap_action(day(5)), TapAction::Select);

        let mut multiple = DateSelection::new(true, true);
        multiple.insert(day(4));
        assert_eq!(multiple.tap_action(day(4)), TapAction::Deselect);
        assert_eq!(multiple.tap_action(day(5)), TapAction::Select);

        let disabled = DateSelection::new(false, true);
        assert_eq!(disabled.tap_action(day(5)), TapAction::Ignore);
    }

    #[test]
    fn set_dates_respects_single_selection() {
        let mut selection = DateSelection::default();
        selection.set_dates([day(9), day(2), day(5)]);
        assert_eq!(selection.dates().iter().copied().collect::<Vec<_>>(), [day(9)]);

        selection.set_allows_multiple_selection(true);
        selection.set_dates([day(9), day(2), day(2)]);
        assert_eq!(
            selection.dates().iter().copied().collect::<Vec<_>>(),
            [day(2), day(9)]
        );
        selection.clear();
        assert!(selection.is_empty());
    }
}
