//! Month calendar model: grid layout, highlights, bounds and hit-testing.
//!
//! Rendering lives in `ui::calendar`; everything here is pure.

use chrono::{Datelike, Days, Months, NaiveDate};

/// One day cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
  pub date:        NaiveDate,
  pub highlighted: bool,
  pub selected:    bool,
}

/// A Sunday-first week; `None` marks padding or out-of-bounds days.
pub type Week = [Option<DayCell>; 7];

/// Calendar state: the displayed month and the selected date.
#[derive(Debug, Clone)]
pub struct Calendar {
  /// Always the first day of the displayed month.
  month:        NaiveDate,
  pub selected: Option<NaiveDate>,
  start:        Option<NaiveDate>,
  end:          Option<NaiveDate>,
}

fn first_of_month(date: NaiveDate) -> NaiveDate { date.with_day(1).unwrap_or(date) }

impl Calendar {
  pub fn new(reference: NaiveDate) -> Self {
    Self {
      month:    first_of_month(reference),
      selected: None,
      start:    None,
      end:      None,
    }
  }

  /// Restrict the selectable range. Days outside it render as empty cells.
  pub fn with_bounds(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
    self.start = start;
    self.end = end;
    self
  }

  pub fn title(&self) -> String { self.month.format("%B %Y").to_string() }

  fn in_bounds(&self, date: NaiveDate) -> bool {
    self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
  }

  /// The displayed month as whole weeks.
  pub fn weeks(&self, highlights: &[NaiveDate]) -> Vec<Week> {
    let lead = self.month.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(self.month);

    let mut weeks = Vec::new();
    let mut week: Week = [None; 7];
    for slot in 0..(lead + days).div_ceil(7) * 7 {
      let cell = slot
        .checked_sub(lead)
        .filter(|&offset| offset < days)
        .and_then(|offset| self.month.checked_add_days(Days::new(offset as u64)))
        .filter(|&date| self.in_bounds(date))
        .map(|date| DayCell {
          date,
          highlighted: highlights.contains(&date),
          selected: self.selected == Some(date),
        });
      week[slot % 7] = cell;
      if slot % 7 == 6 {
        weeks.push(week);
        week = [None; 7];
      }
    }
    weeks
  }

  /// The date at `(week, weekday)`, or `None` for padding and positions
  /// outside the grid.
  pub fn date_at(&self, week: usize, weekday: usize) -> Option<NaiveDate> {
    if weekday >= 7 {
      return None;
    }
    self
      .weeks(&[])
      .get(week)
      .and_then(|w| w[weekday])
      .map(|cell| cell.date)
  }

  /// Handle a click on a grid position: select and return the date under
  /// it. Clicking an empty cell or outside the grid leaves the selection
  /// alone and returns `None`.
  pub fn click(&mut self, week: usize, weekday: usize) -> Option<NaiveDate> {
    let date = self.date_at(week, weekday)?;
    self.selected = Some(date);
    Some(date)
  }

  pub fn can_prev(&self) -> bool {
    self.start.is_none_or(|s| self.month > first_of_month(s))
  }

  pub fn can_next(&self) -> bool { self.end.is_none_or(|e| self.month < first_of_month(e)) }

  pub fn prev_month(&mut self) -> bool {
    if !self.can_prev() {
      return false;
    }
    if let Some(m) = self.month.checked_sub_months(Months::new(1)) {
      self.month = m;
    }
    true
  }

  pub fn next_month(&mut self) -> bool {
    if !self.can_next() {
      return false;
    }
    if let Some(m) = self.month.checked_add_months(Months::new(1)) {
      self.month = m;
    }
    true
  }

  /// Move the selection by `days`, following it into another month when
  /// needed. Starts from the first of the month when nothing is selected.
  pub fn move_selection(&mut self, days: i64) {
    let from = self.selected.unwrap_or(self.month);
    let to = if days >= 0 {
      from.checked_add_days(Days::new(days as u64))
    } else {
      from.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    let Some(to) = to.filter(|&d| self.in_bounds(d)) else { return };
    self.selected = Some(to);
    self.month = first_of_month(to);
  }
}

fn days_in_month(first: NaiveDate) -> usize {
  first
    .checked_add_months(Months::new(1))
    .map(|next| next.signed_duration_since(first).num_days() as usize)
    .unwrap_or(31)
}

// ─── Screen geometry ──────────────────────────────────────────────────────────

/// Where the grid was last drawn, in terminal cells, for mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
  pub x:      u16,
  pub y:      u16,
  pub cell_w: u16,
  pub weeks:  u16,
}

impl GridGeometry {
  /// Map a terminal position to `(week, weekday)`.
  pub fn hit(&self, column: u16, row: u16) -> Option<(usize, usize)> {
    if column < self.x || row < self.y || self.cell_w == 0 {
      return None;
    }
    let weekday = (column - self.x) / self.cell_w;
    let week = row - self.y;
    (weekday < 7 && week < self.weeks).then_some((week as usize, weekday as usize))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn april() -> Calendar { Calendar::new(date(2025, 4, 17)) }

  #[test]
  fn april_2025_is_five_sunday_first_weeks() {
    let weeks = april().weeks(&[]);
    assert_eq!(weeks.len(), 5);
    // 1 April 2025 is a Tuesday.
    assert_eq!(weeks[0][0], None);
    assert_eq!(weeks[0][1], None);
    assert_eq!(weeks[0][2].unwrap().date, date(2025, 4, 1));
    assert_eq!(weeks[4][3].unwrap().date, date(2025, 4, 30));
    assert!(weeks[4][4..].iter().all(Option::is_none));
    let days = weeks.iter().flatten().flatten().count();
    assert_eq!(days, 30);
  }

  #[test]
  fn highlights_mark_exactly_the_listed_dates() {
    let highlights = [date(2025, 4, 1), date(2025, 4, 3), date(2025, 5, 1)];
    let marked: Vec<_> = april()
      .weeks(&highlights)
      .iter()
      .flatten()
      .flatten()
      .filter(|c| c.highlighted)
      .map(|c| c.date)
      .collect();
    assert_eq!(marked, [date(2025, 4, 1), date(2025, 4, 3)]);
  }

  #[test]
  fn clicks_report_dates_or_none() {
    let mut cal = april();
    assert_eq!(cal.click(1, 0), Some(date(2025, 4, 6)));
    assert_eq!(cal.selected, Some(date(2025, 4, 6)));

    // Leading padding, past the last week, past Saturday.
    assert_eq!(cal.click(0, 0), None);
    assert_eq!(cal.click(5, 0), None);
    assert_eq!(cal.click(2, 7), None);
    assert_eq!(cal.selected, Some(date(2025, 4, 6)));

    let weeks = cal.weeks(&[]);
    assert!(weeks[1][0].unwrap().selected);
  }

  #[test]
  fn bounds_blank_cells_and_stop_navigation() {
    let mut cal = april().with_bounds(Some(date(2025, 4, 10)), Some(date(2025, 5, 20)));
    let weeks = cal.weeks(&[]);
    assert_eq!(weeks.iter().flatten().flatten().count(), 21);
    assert_eq!(cal.click(1, 3), None); // 9 April
    assert_eq!(cal.click(1, 4), Some(date(2025, 4, 10)));

    assert!(!cal.can_prev());
    assert!(!cal.prev_month());
    assert!(cal.next_month());
    assert!(!cal.can_next());
    assert!(!cal.next_month());
    assert_eq!(cal.title(), "May 2025");
  }

  #[test]
  fn moving_the_selection_crosses_months() {
    let mut cal = april();
    cal.selected = Some(date(2025, 4, 29));
    cal.move_selection(7);
    assert_eq!(cal.selected, Some(date(2025, 5, 6)));
    assert_eq!(cal.title(), "May 2025");
    cal.move_selection(-7);
    assert_eq!(cal.title(), "April 2025");
  }

  #[test]
  fn geometry_hit_testing() {
    let geo = GridGeometry {
      x:      10,
      y:      5,
      cell_w: 3,
      weeks:  5,
    };
    assert_eq!(geo.hit(10, 5), Some((0, 0)));
    assert_eq!(geo.hit(22, 6), Some((1, 4)));
    assert_eq!(geo.hit(9, 5), None);
    assert_eq!(geo.hit(31, 5), None);
    assert_eq!(geo.hit(10, 10), None);
  }
}
