//! The specificity levels used to match a student against eligibility groups.
//!
//! Levels are declared once in [`SPECIFICITY_RULES`]. Binding a rule to a
//! student's criteria yields a [`GroupPattern`], which is used both as an
//! in-memory predicate and as the source of the catalogue's query filter.

use super::types::{EligibilityGroup, StudentCriteria};

/// The only level this form matches against.
pub const UNDERGRAD_LEVEL: &str = "ug";

/// What a single group field must hold for a pattern to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRequirement<T> {
    /// Any value, including null.
    Any,
    /// The stored value must be null (the group's "any value" marker).
    MustBeNull,
    /// The stored value must equal this exactly.
    MustEqual(T),
}

impl<T> FieldRequirement<T> {
    /// Maps the required value, keeping the requirement's state.
    pub fn map_value<U>(self, f: impl FnOnce(T) -> U) -> FieldRequirement<U> {
        match self {
            FieldRequirement::Any => FieldRequirement::Any,
            FieldRequirement::MustBeNull => FieldRequirement::MustBeNull,
            FieldRequirement::MustEqual(v) => FieldRequirement::MustEqual(f(v)),
        }
    }
}

impl<T: PartialEq + Copy> FieldRequirement<T> {
    pub fn accepts(&self, value: Option<T>) -> bool {
        match self {
            FieldRequirement::Any => true,
            FieldRequirement::MustBeNull => value.is_none(),
            FieldRequirement::MustEqual(expected) => value == Some(*expected),
        }
    }
}

/// How a rule treats one dimension of the student's criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The group must carry the student's own value.
    Student,
    /// The group must hold a literal null here.
    Null,
}

impl Slot {
    fn bind<T>(self, value: Option<T>) -> Option<FieldRequirement<T>> {
        match self {
            Slot::Student => value.map(FieldRequirement::MustEqual),
            Slot::Null => Some(FieldRequirement::MustBeNull),
        }
    }

    /// Like `bind`, but an unspecified student value must meet a null field.
    fn bind_exact<T>(self, value: Option<T>) -> FieldRequirement<T> {
        match (self, value) {
            (Slot::Student, Some(v)) => FieldRequirement::MustEqual(v),
            _ => FieldRequirement::MustBeNull,
        }
    }
}

/// One specificity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecificityRule {
    /// 1 is the most specific.
    pub level: u8,
    pub year: Slot,
    pub school: Slot,
    pub major: Slot,
}

/// Specificity levels, most specific first.
pub static SPECIFICITY_RULES: [SpecificityRule; 4] = [
    // year + school + major
    SpecificityRule {
        level: 1,
        year: Slot::Student,
        school: Slot::Student,
        major: Slot::Student,
    },
    // year + school, any major
    SpecificityRule {
        level: 2,
        year: Slot::Student,
        school: Slot::Student,
        major: Slot::Null,
    },
    // school + major, any year
    SpecificityRule {
        level: 3,
        year: Slot::Null,
        school: Slot::Student,
        major: Slot::Student,
    },
    // school only
    SpecificityRule {
        level: 4,
        year: Slot::Null,
        school: Slot::Student,
        major: Slot::Null,
    },
];

impl SpecificityRule {
    /// Binds this rule to a student, or returns `None` if the student is
    /// missing a field the rule needs.
    pub fn bind<'a>(&self, criteria: &'a StudentCriteria) -> Option<GroupPattern<'a>> {
        Some(GroupPattern {
            level: self.level,
            year: self.year.bind(criteria.year)?,
            group_level: FieldRequirement::MustEqual(UNDERGRAD_LEVEL),
            school: self.school.bind(criteria.school.as_deref())?,
            major: self.major.bind(criteria.major.as_deref())?,
            notes: FieldRequirement::Any,
        })
    }

    /// Binds this rule for ranking. Every rule binds; a field the student
    /// left unspecified only matches a group that also leaves it null.
    pub fn bind_exact<'a>(&self, criteria: &'a StudentCriteria) -> GroupPattern<'a> {
        GroupPattern {
            level: self.level,
            year: self.year.bind_exact(criteria.year),
            group_level: FieldRequirement::MustEqual(UNDERGRAD_LEVEL),
            school: self.school.bind_exact(criteria.school.as_deref()),
            major: self.major.bind_exact(criteria.major.as_deref()),
            notes: FieldRequirement::Any,
        }
    }
}

/// A specificity rule bound to one student's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPattern<'a> {
    /// Specificity level this pattern came from.
    pub level: u8,
    pub year: FieldRequirement<u32>,
    pub group_level: FieldRequirement<&'a str>,
    pub school: FieldRequirement<&'a str>,
    pub major: FieldRequirement<&'a str>,
    pub notes: FieldRequirement<&'a str>,
}

impl GroupPattern<'_> {
    pub fn matches(&self, group: &EligibilityGroup) -> bool {
        self.year.accepts(group.year)
            && self.group_level.accepts(group.level.as_deref())
            && self.school.accepts(group.school.as_deref())
            && self.major.accepts(group.major.as_deref())
            && self.notes.accepts(group.notes.as_deref())
    }
}

/// Patterns for every level that applies to the student, most specific first.
pub fn applicable_patterns(criteria: &StudentCriteria) -> impl Iterator<Item = GroupPattern<'_>> {
    SPECIFICITY_RULES
        .iter()
        .filter_map(move |rule| rule.bind(criteria))
}

/// Patterns for all four levels, most specific first, as used to pick a
/// course's tier.
pub fn ranking_patterns(criteria: &StudentCriteria) -> impl Iterator<Item = GroupPattern<'_>> {
    SPECIFICITY_RULES
        .iter()
        .map(move |rule| rule.bind_exact(criteria))
}
