/// Display labels for priority entries
use super::types::{EligibilityGroup, PriorityEntry};
use serde::Serialize;

/// Colour tier for a priority badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Green,
    Blue,
    Amber,
    Gray,
}

impl BadgeColor {
    pub fn for_priority(priority: u32) -> Self {
        match priority {
            1 => BadgeColor::Green,
            2 => BadgeColor::Blue,
            3 => BadgeColor::Amber,
            _ => BadgeColor::Gray,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            BadgeColor::Green => "bg-green-600",
            BadgeColor::Blue => "bg-blue-600",
            BadgeColor::Amber => "bg-amber-600",
            BadgeColor::Gray => "bg-gray-600",
        }
    }
}

/// A rendered priority entry, e.g. `1st` + `SEDS/COMSCI/UG2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityBadge {
    pub rank: String,
    pub color: BadgeColor,
    /// Stylesheet class for `color`
    pub class: &'static str,
    pub group: String,
}

impl From<&PriorityEntry> for PriorityBadge {
    fn from(entry: &PriorityEntry) -> Self {
        let color = BadgeColor::for_priority(entry.priority);

        Self {
            rank: ordinal(entry.priority),
            color,
            class: color.css_class(),
            group: group_label(&entry.group),
        }
    }
}

/// `1st`, `2nd`, `3rd`, then `Nth` for everything else.
pub fn ordinal(priority: u32) -> String {
    match priority {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{n}th"),
    }
}

/// Upper-cased `school/major/levelYEAR/notes` path for a group.
///
/// A group without a year (or with year 0) reads `ALL` in the year position.
/// Missing school, major and notes are left out.
pub fn group_label(group: &EligibilityGroup) -> String {
    let mut label = String::new();

    if let Some(ref school) = group.school {
        label.push_str(school);
        label.push('/');
    }
    if let Some(ref major) = group.major {
        label.push_str(major);
        label.push('/');
    }
    match group.year {
        Some(year) if year > 0 => {
            label.push_str(group.level.as_deref().unwrap_or_default());
            label.push_str(&year.to_string());
            label.push('/');
        }
        _ => label.push_str("ALL/"),
    }
    if let Some(ref notes) = group.notes {
        label.push_str(&notes.replacen("pending graduation", "pending", 1));
    }

    label.trim_end_matches('/').to_uppercase()
}
