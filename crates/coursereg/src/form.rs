//! Student form: the major catalogue and resolution of a submitted
//! year/major into listing criteria.

use crate::priority::StudentCriteria;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A major offered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Major {
    pub label: &'static str,
    pub name: &'static str,
    pub school: &'static str,
}

const fn major(label: &'static str, name: &'static str, school: &'static str) -> Major {
    Major {
        label,
        name,
        school,
    }
}

/// Every selectable major, grouped by school in display order.
pub const MAJORS: &[Major] = &[
    major("anth", "Anthropology", "SSH"),
    major("biosci", "Biological Sciences", "SSH"),
    major("chem", "Chemistry", "SSH"),
    major("econ", "Economics", "SSH"),
    major("hist", "History", "SSH"),
    major("math", "Mathematics", "SSH"),
    major("phys", "Physics", "SSH"),
    major("psir", "Political Science and International Relations", "SSH"),
    major("soci", "Sociology", "SSH"),
    major("wllc", "World Languages, Literatures and Cultures", "SSH"),
    major("busadm", "Business Administration", "GSB"),
    major("cme", "Chemical and Materials Engineering", "SEDS"),
    major("comsci", "Computer Science", "SEDS"),
    major("cee", "Civil and Environmental Engineering", "SEDS"),
    major("ece", "Electrical and Computer Engineering", "SEDS"),
    major("mae", "Mechanical and Aerospace Engineering", "SEDS"),
    major("robeng", "Robotics Engineering", "SEDS"),
    major("robmec", "Robotics Engineering", "SEDS"),
    major("geol", "Geology", "SMG"),
    major("mineng", "Mining Engineering", "SMG"),
    major("peteng", "Petroleum Engineering", "SMG"),
    major("6yrm", "Six-year Medical Program", "SOM"),
    major("medsci", "Medical Sciences", "SOM"),
    major("nurs", "Nursing", "SOM"),
];

/// Display names for years 1 through 6.
pub const YEAR_NAMES: [&str; 6] = ["Freshman", "Sophomore", "Junior", "Senior", "5th", "6th"];

pub fn find_major(label: &str) -> Option<&'static Major> {
    MAJORS.iter().find(|m| m.label == label)
}

pub fn year_name(year: u32) -> Option<&'static str> {
    let idx = usize::try_from(year).ok()?.checked_sub(1)?;
    YEAR_NAMES.get(idx).copied()
}

/// Majors offered by one school.
#[derive(Debug, Clone, Serialize)]
pub struct SchoolMajors {
    pub school: &'static str,
    pub majors: Vec<Major>,
}

/// The major catalogue grouped by school, schools in first-seen order.
pub fn majors_by_school() -> Vec<SchoolMajors> {
    let mut groups: Vec<SchoolMajors> = Vec::new();
    for m in MAJORS {
        match groups.iter_mut().find(|g| g.school == m.school) {
            Some(group) => group.majors.push(*m),
            None => groups.push(SchoolMajors {
                school: m.school,
                majors: vec![*m],
            }),
        }
    }
    groups
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Year must be between 1 and {max}, got {year}")]
    YearOutOfRange { year: u32, max: usize },

    #[error("Major not found: {label}")]
    UnknownMajor { label: String },
}

/// A submitted student form.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentForm {
    pub year: u32,
    pub major: String,
}

impl StudentForm {
    /// Validates the form and derives the listing criteria. The school comes
    /// from the selected major; both are lower-cased.
    pub fn resolve(&self) -> Result<StudentCriteria, FormError> {
        if year_name(self.year).is_none() {
            return Err(FormError::YearOutOfRange {
                year: self.year,
                max: YEAR_NAMES.len(),
            });
        }

        let major = find_major(&self.major).ok_or_else(|| FormError::UnknownMajor {
            label: self.major.clone(),
        })?;

        Ok(StudentCriteria {
            year: Some(self.year),
            school: Some(major.school.to_lowercase()),
            major: Some(major.label.to_lowercase()),
        })
    }
}
