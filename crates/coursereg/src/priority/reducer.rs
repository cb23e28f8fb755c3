/// Reduction of a course's priority list to the single entry for one student
use super::rules::ranking_patterns;
use super::types::{Course, PriorityEntry, StudentCriteria};

/// Finds the entry that applies to the student.
///
/// Levels are tried most specific first. Within a level the first matching
/// entry wins, and the first level with any match ends the search. A field
/// the student left unspecified matches only a group that leaves it null.
pub fn best_matching_entry<'c>(
    entries: &'c [PriorityEntry],
    criteria: &StudentCriteria,
) -> Option<&'c PriorityEntry> {
    ranking_patterns(criteria)
        .find_map(|pattern| entries.iter().find(|entry| pattern.matches(&entry.group)))
}

/// Replaces the course's priorities with at most one entry: the one that
/// applies to the student, or nothing if no level matches.
///
/// Every other field of the course is returned unchanged.
pub fn reduce_priorities(mut course: Course, criteria: &StudentCriteria) -> Course {
    let best = best_matching_entry(&course.priorities, criteria).cloned();
    course.priorities = best.into_iter().collect();
    course
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::types::{EligibilityGroup, Schedule};

    fn ug(year: Option<u32>, school: Option<&str>, major: Option<&str>) -> EligibilityGroup {
        EligibilityGroup {
            year,
            level: Some("ug".to_string()),
            school: school.map(str::to_string),
            major: major.map(str::to_string),
            notes: None,
        }
    }

    fn course(entries: Vec<(EligibilityGroup, u32)>) -> Course {
        Course {
            id: "665f1".to_string(),
            abbr: "csci 152".to_string(),
            title: "Performance and Data Structures".to_string(),
            cr_ects: "8".to_string(),
            schedules: vec![Schedule {
                section: "1L".to_string(),
                days: vec!["M".to_string(), "W".to_string()],
                faculty: "Smith".to_string(),
                start_time_info: [9, 0],
                end_time_info: [10, 15],
                ..Default::default()
            }],
            priorities: entries
                .into_iter()
                .map(|(group, priority)| PriorityEntry { group, priority })
                .collect(),
        }
    }

    #[test]
    fn test_exact_match_beats_school_wide() {
        let criteria = StudentCriteria::new(Some(2), Some("seds"), Some("comsci"));
        let c = course(vec![
            (ug(Some(2), Some("seds"), Some("comsci")), 1),
            (ug(None, Some("seds"), None), 2),
        ]);

        let reduced = reduce_priorities(c, &criteria);
        assert_eq!(reduced.priorities.len(), 1);
        assert_eq!(reduced.priorities[0].priority, 1);
        assert_eq!(reduced.priorities[0].group.major.as_deref(), Some("comsci"));
    }

    #[test]
    fn test_no_rule_for_school_only_student() {
        let criteria = StudentCriteria::new(None, Some("seds"), None);
        let c = course(vec![(ug(Some(1), Some("seds"), Some("comsci")), 1)]);

        let reduced = reduce_priorities(c, &criteria);
        assert!(reduced.priorities.is_empty());
    }

    #[test]
    fn test_level_order_wins_over_list_order() {
        let criteria = StudentCriteria::new(Some(3), Some("seds"), None);
        // school-wide entry listed first, year-specific entry second
        let c = course(vec![
            (ug(None, Some("seds"), None), 3),
            (ug(Some(3), Some("seds"), None), 2),
        ]);

        let reduced = reduce_priorities(c, &criteria);
        assert_eq!(reduced.priorities.len(), 1);
        assert_eq!(reduced.priorities[0].priority, 2);
    }

    #[test]
    fn test_first_entry_wins_within_a_level() {
        let criteria = StudentCriteria::new(None, Some("ssh"), None);
        let c = course(vec![
            (ug(None, Some("ssh"), None), 4),
            (ug(None, Some("ssh"), None), 1),
        ]);

        let reduced = reduce_priorities(c, &criteria);
        assert_eq!(reduced.priorities[0].priority, 4);
    }

    #[test]
    fn test_named_major_does_not_match_wildcard_major_student() {
        let criteria = StudentCriteria::new(Some(2), Some("seds"), None);
        let c = course(vec![(ug(Some(2), Some("seds"), Some("ece")), 1)]);

        assert!(reduce_priorities(c, &criteria).priorities.is_empty());
    }

    #[test]
    fn test_graduate_groups_are_skipped() {
        let criteria = StudentCriteria::new(Some(1), Some("seds"), Some("comsci"));
        let mut grad = ug(Some(1), Some("seds"), Some("comsci"));
        grad.level = Some("gr".to_string());
        let c = course(vec![(grad, 1), (ug(None, Some("seds"), None), 3)]);

        let reduced = reduce_priorities(c, &criteria);
        assert_eq!(reduced.priorities.len(), 1);
        assert_eq!(reduced.priorities[0].priority, 3);
    }

    #[test]
    fn test_other_fields_pass_through() {
        let criteria = StudentCriteria::new(Some(2), Some("seds"), Some("comsci"));
        let c = course(vec![(ug(None, Some("sms"), None), 1)]);
        let expected_schedules = c.schedules.clone();

        let reduced = reduce_priorities(c, &criteria);
        assert_eq!(reduced.id, "665f1");
        assert_eq!(reduced.abbr, "csci 152");
        assert_eq!(reduced.cr_ects, "8");
        assert_eq!(reduced.schedules, expected_schedules);
        assert!(reduced.priorities.is_empty());
    }

    #[test]
    fn test_reducing_twice_is_stable() {
        let criteria = StudentCriteria::new(Some(2), Some("seds"), Some("comsci"));
        let c = course(vec![
            (ug(None, Some("seds"), Some("comsci")), 2),
            (ug(Some(2), Some("seds"), None), 1),
            (ug(None, Some("seds"), None), 3),
        ]);

        let once = reduce_priorities(c, &criteria);
        let twice = reduce_priorities(once.clone(), &criteria);
        assert_eq!(once, twice);
        assert_eq!(twice.priorities[0].priority, 1);
    }

    #[test]
    fn test_empty_criteria_leave_school_groups_unranked() {
        let c = course(vec![(ug(None, Some("seds"), None), 1)]);
        assert!(reduce_priorities(c, &StudentCriteria::default())
            .priorities
            .is_empty());
    }

    #[test]
    fn test_empty_criteria_match_group_open_to_all_undergraduates() {
        let c = course(vec![
            (ug(None, Some("seds"), None), 1),
            (ug(None, None, None), 3),
        ]);

        let reduced = reduce_priorities(c, &StudentCriteria::default());
        assert_eq!(reduced.priorities.len(), 1);
        assert_eq!(reduced.priorities[0].priority, 3);
    }

    #[test]
    fn test_year_only_student() {
        let criteria = StudentCriteria::new(Some(2), None, None);
        let c = course(vec![
            (ug(Some(2), Some("seds"), None), 1),
            (ug(Some(2), None, None), 2),
        ]);

        let reduced = reduce_priorities(c, &criteria);
        assert_eq!(reduced.priorities.len(), 1);
        assert_eq!(reduced.priorities[0].priority, 2);
        assert_eq!(reduced.priorities[0].group.year, Some(2));

        let other_year = course(vec![(ug(Some(3), None, None), 1)]);
        assert!(reduce_priorities(other_year, &criteria).priorities.is_empty());
    }

    #[test]
    fn test_year_and_major_without_school() {
        let criteria = StudentCriteria::new(Some(1), None, Some("comsci"));
        let c = course(vec![
            (ug(Some(1), Some("seds"), Some("comsci")), 1),
            (ug(None, None, Some("comsci")), 4),
        ]);

        // level 3: major matches, year and school both null
        let reduced = reduce_priorities(c, &criteria);
        assert_eq!(reduced.priorities.len(), 1);
        assert_eq!(reduced.priorities[0].priority, 4);
    }
}
