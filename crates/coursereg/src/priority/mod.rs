/// Priority matching: which registration tier of a course applies to a student
mod badge;
mod query;
mod ranking;
mod reducer;
mod rules;
mod types;

pub use badge::{group_label, ordinal, BadgeColor, PriorityBadge};
pub use query::{build_priority_query, FilterExpression};
pub use ranking::{compare_by_priority, highest_priority, sort_by_priority};
pub use reducer::{best_matching_entry, reduce_priorities};
pub use rules::{
    applicable_patterns, ranking_patterns, FieldRequirement, GroupPattern, Slot, SpecificityRule,
    SPECIFICITY_RULES, UNDERGRAD_LEVEL,
};
pub use types::*;
