/// Types for course offerings and the priority groups attached to them
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// Leading integer, same leniency as a browser `parseInt` ("2", " 3rd", "+4")
static LEADING_INT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());

/// The student a course listing is ranked for.
///
/// `None` in any field means the student did not specify it. The level is
/// always undergraduate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCriteria {
    pub year: Option<u32>,
    pub school: Option<String>,
    pub major: Option<String>,
}

impl StudentCriteria {
    pub fn new(year: Option<u32>, school: Option<&str>, major: Option<&str>) -> Self {
        Self {
            year,
            school: school.map(str::to_string),
            major: major.map(str::to_string),
        }
    }

    /// Builds criteria from raw request parameters.
    ///
    /// Missing or empty parameters become `None`. The year is read as a leading
    /// integer; anything that does not yield a positive number is treated as
    /// unspecified.
    pub fn from_params(year: Option<&str>, school: Option<&str>, major: Option<&str>) -> Self {
        let non_empty = |s: Option<&str>| s.filter(|v| !v.is_empty()).map(str::to_string);

        Self {
            year: year.and_then(parse_year),
            school: non_empty(school),
            major: non_empty(major),
        }
    }

    /// Returns true if no field was specified.
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.school.is_none() && self.major.is_none()
    }

    /// Renders the specified fields as a `year=..&school=..&major=..` query string.
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(year) = self.year {
            parts.push(format!("year={year}"));
        }
        if let Some(ref school) = self.school {
            parts.push(format!("school={school}"));
        }
        if let Some(ref major) = self.major {
            parts.push(format!("major={major}"));
        }
        parts.join("&")
    }
}

fn parse_year(raw: &str) -> Option<u32> {
    let caps = LEADING_INT_REGEX.captures(raw)?;
    let year: i64 = caps.get(1)?.as_str().parse().ok()?;
    u32::try_from(year).ok().filter(|y| *y > 0)
}

/// One audience segment a course is open to.
///
/// A `None` field is stored literally and stands for "any value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityGroup {
    pub year: Option<u32>,
    pub level: Option<String>,
    pub school: Option<String>,
    pub major: Option<String>,
    pub notes: Option<String>,
}

/// A registration tier for one group. `1` is the best slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityEntry {
    pub group: EligibilityGroup,
    pub priority: u32,
}

/// Section metadata, carried through for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    pub section: String,
    pub days: Vec<String>,
    pub course_cap: String,
    pub faculty: String,
    pub room: String,
    pub room_cap: String,
    pub distant: bool,
    pub start_time_info: [u32; 2], // [hour, minute]
    pub end_time_info: [u32; 2],
}

/// A course offering as stored in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub abbr: String,
    pub title: String,
    pub cr_ects: String,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    /// Every group this course declares a tier for. May be empty.
    #[serde(rename = "prioritiies", default)]
    pub priorities: Vec<PriorityEntry>,
}
