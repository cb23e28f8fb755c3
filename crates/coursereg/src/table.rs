//! Course listing view: title filter, column sorting and row selection.
//!
//! Filtering and selection are independent of the priority ranking; the
//! ranking only supplies the comparator for the priority column.

use crate::priority::{compare_by_priority, Course};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

/// Column a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    Abbr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A sort request such as `priority`, `-priority`, `abbr` or `-abbr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown sort column: {0}")]
pub struct UnknownSortColumn(pub String);

impl FromStr for SortSpec {
    type Err = UnknownSortColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (direction, column) = match s.strip_prefix('-') {
            Some(rest) => (SortDirection::Desc, rest),
            None => (SortDirection::Asc, s),
        };

        let key = match column {
            "priority" => SortKey::Priority,
            "abbr" => SortKey::Abbr,
            _ => return Err(UnknownSortColumn(s.to_string())),
        };

        Ok(SortSpec { key, direction })
    }
}

impl SortSpec {
    fn compare(&self, a: &Course, b: &Course) -> Ordering {
        let ord = match self.key {
            SortKey::Priority => compare_by_priority(a, b),
            SortKey::Abbr => a.abbr.to_lowercase().cmp(&b.abbr.to_lowercase()),
        };

        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// A listing of (already reduced) courses.
#[derive(Debug, Clone, Default)]
pub struct CourseTable {
    rows: Vec<Course>,
    title_filter: Option<String>,
    sort: Option<SortSpec>,
    selected: HashSet<String>,
}

impl CourseTable {
    pub fn new(rows: Vec<Course>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// Number of rows before filtering.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps only rows whose title contains `filter`, ignoring case.
    /// An empty filter clears it.
    pub fn set_title_filter(&mut self, filter: Option<&str>) {
        self.title_filter = filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Marks a row as selected. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) {
        if self.rows.iter().any(|c| c.id == id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Selects or clears every row that passes the current filter.
    pub fn set_all_selected(&mut self, selected: bool) {
        let ids: Vec<String> = self.filtered().map(|c| c.id.clone()).collect();
        for id in ids {
            if selected {
                self.selected.insert(id);
            } else {
                self.selected.remove(&id);
            }
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    fn passes_filter(&self, course: &Course) -> bool {
        match self.title_filter {
            Some(ref needle) => course.title.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }

    fn filtered(&self) -> impl Iterator<Item = &Course> {
        self.rows.iter().filter(|c| self.passes_filter(c))
    }

    /// Number of rows passing the filter.
    pub fn filtered_len(&self) -> usize {
        self.filtered().count()
    }

    /// Rows passing the filter, in sort order.
    pub fn visible_rows(&self) -> Vec<&Course> {
        let mut rows: Vec<&Course> = self.filtered().collect();
        if let Some(sort) = self.sort {
            rows.sort_by(|a, b| sort.compare(a, b));
        }
        rows
    }

    /// Selected rows that pass the filter, in sort order.
    pub fn selected_rows(&self) -> Vec<&Course> {
        self.visible_rows()
            .into_iter()
            .filter(|c| self.selected.contains(&c.id))
            .collect()
    }

    /// `"2 of 14 course(s) selected"`, or `None` when nothing is selected.
    pub fn selection_summary(&self) -> Option<String> {
        let selected = self.selected_rows().len();
        (selected > 0).then(|| format!("{} of {} course(s) selected", selected, self.filtered_len()))
    }
}
