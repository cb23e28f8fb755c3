/// Course catalogue backed by SQLite
mod error;

pub use error::CatalogError;

use crate::priority::{
    build_priority_query, reduce_priorities, Course, EligibilityGroup, FieldRequirement,
    FilterExpression, GroupPattern, PriorityEntry, Schedule, StudentCriteria,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_courses.sql");

/// Course documents grouped by term.
///
/// No connection is held between calls: every operation opens its own and
/// closes it when the operation returns, whether it succeeded or not.
pub struct CourseCatalog {
    db_path: PathBuf,
}

impl CourseCatalog {
    /// Creates the catalogue and initializes the database schema
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let catalog = Self {
            db_path: db_path.into(),
        };

        let conn = catalog.connect()?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(catalog)
    }

    fn connect(&self) -> Result<Connection, CatalogError> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Checks if a term already has courses
    pub fn term_has_data(&self, term: &str) -> Result<bool, CatalogError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM courses WHERE term = ?1",
            [term],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Inserts course documents for a term in a single transaction.
    ///
    /// Courses without an `_id` are given their row number as id.
    pub fn import_courses(&self, term: &str, courses: &[Course]) -> Result<usize, CatalogError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        for course in courses {
            insert_course(&tx, term, course)?;
        }

        tx.commit()?;
        Ok(courses.len())
    }

    /// Gets the term's courses that satisfy `filter`, in insertion order,
    /// with their full priority lists.
    pub fn fetch_courses(
        &self,
        term: &str,
        filter: &FilterExpression<'_>,
    ) -> Result<Vec<Course>, CatalogError> {
        let conn = self.connect()?;

        let (clause, filter_values) = filter_to_sql(filter);
        let sql = format!(
            "SELECT c.course_pk, COALESCE(c.course_id, CAST(c.course_pk AS TEXT)),
                    c.abbr, c.title, c.cr_ects
             FROM courses c
             WHERE c.term = ?{}
             ORDER BY c.course_pk",
            clause.map(|c| format!(" AND ({c})")).unwrap_or_default()
        );

        let mut values = vec![Value::Text(term.to_string())];
        values.extend(filter_values);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    Course {
                        id: row.get(1)?,
                        abbr: row.get(2)?,
                        title: row.get(3)?,
                        cr_ects: row.get(4)?,
                        schedules: Vec::new(),
                        priorities: Vec::new(),
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let course_pks: Vec<i64> = rows.iter().map(|(pk, _)| *pk).collect();
        let mut schedules = load_schedules(&conn, &course_pks)?;
        let mut priorities = load_priorities(&conn, &course_pks)?;

        Ok(rows
            .into_iter()
            .map(|(course_pk, mut course)| {
                course.schedules = schedules.remove(&course_pk).unwrap_or_default();
                course.priorities = priorities.remove(&course_pk).unwrap_or_default();
                course
            })
            .collect())
    }

    /// Gets the term's courses for a student, each reduced to the one tier
    /// that applies to them (or none).
    pub fn fetch_ranked_courses(
        &self,
        term: &str,
        criteria: &StudentCriteria,
    ) -> Result<Vec<Course>, CatalogError> {
        let filter = build_priority_query(criteria);
        debug!("Course query for {}: {}", term, filter.to_document());

        let courses = self.fetch_courses(term, &filter)?;

        Ok(courses
            .into_iter()
            .map(|course| reduce_priorities(course, criteria))
            .collect())
    }
}

/// Reads a JSON array of course documents.
pub fn load_course_documents(path: &Path) -> Result<Vec<Course>, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;

    Ok(serde_json::from_str(&content)?)
}

/// Translates a filter into an SQL condition on `courses c`.
///
/// Each branch becomes an `EXISTS` over the course's priorities; a literal
/// null requirement becomes `IS NULL`. Returns `None` for an empty filter.
fn filter_to_sql(filter: &FilterExpression<'_>) -> (Option<String>, Vec<Value>) {
    if filter.is_empty() {
        return (None, Vec::new());
    }

    let mut values = Vec::new();
    let branches: Vec<String> = filter
        .branches()
        .iter()
        .map(|pattern| branch_to_sql(pattern, &mut values))
        .collect();

    (Some(branches.join(" OR ")), values)
}

fn branch_to_sql(pattern: &GroupPattern<'_>, values: &mut Vec<Value>) -> String {
    let text = |s: &str| Value::Text(s.to_string());
    let mut conditions = vec!["p.course_pk = c.course_pk".to_string()];

    push_condition(
        &mut conditions,
        values,
        "p.grp_year",
        pattern.year.map_value(|y| Value::Integer(i64::from(y))),
    );
    push_condition(&mut conditions, values, "p.grp_level", pattern.group_level.map_value(text));
    push_condition(&mut conditions, values, "p.grp_school", pattern.school.map_value(text));
    push_condition(&mut conditions, values, "p.grp_major", pattern.major.map_value(text));
    push_condition(&mut conditions, values, "p.grp_notes", pattern.notes.map_value(text));

    format!(
        "EXISTS (SELECT 1 FROM priorities p WHERE {})",
        conditions.join(" AND ")
    )
}

fn push_condition(
    conditions: &mut Vec<String>,
    values: &mut Vec<Value>,
    column: &str,
    requirement: FieldRequirement<Value>,
) {
    match requirement {
        FieldRequirement::Any => {}
        FieldRequirement::MustBeNull => conditions.push(format!("{column} IS NULL")),
        FieldRequirement::MustEqual(value) => {
            conditions.push(format!("{column} = ?"));
            values.push(value);
        }
    }
}

fn insert_course(conn: &Connection, term: &str, course: &Course) -> Result<(), CatalogError> {
    let course_id = (!course.id.is_empty()).then_some(course.id.as_str());

    conn.execute(
        "INSERT INTO courses (term, course_id, abbr, title, cr_ects, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))",
        params![term, course_id, course.abbr, course.title, course.cr_ects],
    )?;
    let course_pk = conn.last_insert_rowid();

    for (position, schedule) in course.schedules.iter().enumerate() {
        let days_json = serde_json::to_string(&schedule.days)?;

        conn.execute(
            "INSERT INTO schedules (
                course_pk, position, section, days, course_cap, faculty, room, room_cap,
                distant, start_hr, start_min, end_hr, end_min
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                course_pk,
                position as i64,
                schedule.section,
                days_json,
                schedule.course_cap,
                schedule.faculty,
                schedule.room,
                schedule.room_cap,
                schedule.distant,
                schedule.start_time_info[0],
                schedule.start_time_info[1],
                schedule.end_time_info[0],
                schedule.end_time_info[1],
            ],
        )?;
    }

    for (position, entry) in course.priorities.iter().enumerate() {
        let group = &entry.group;

        conn.execute(
            "INSERT INTO priorities (
                course_pk, position, priority, grp_year, grp_level, grp_school, grp_major, grp_notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                course_pk,
                position as i64,
                entry.priority,
                group.year,
                group.level,
                group.school,
                group.major,
                group.notes,
            ],
        )?;
    }

    Ok(())
}

/// `?, ?, ..` with one placeholder per key
fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Loads the schedules of every listed course in one query, keyed by course.
fn load_schedules(
    conn: &Connection,
    course_pks: &[i64],
) -> Result<HashMap<i64, Vec<Schedule>>, CatalogError> {
    let mut by_course: HashMap<i64, Vec<Schedule>> = HashMap::new();
    if course_pks.is_empty() {
        return Ok(by_course);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT course_pk, section, days, course_cap, faculty, room, room_cap, distant,
                start_hr, start_min, end_hr, end_min
         FROM schedules
         WHERE course_pk IN ({})
         ORDER BY course_pk, position",
        placeholders(course_pks.len())
    ))?;

    let rows = stmt.query_map(params_from_iter(course_pks.iter()), |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(2)?,
            Schedule {
                section: row.get(1)?,
                days: Vec::new(),
                course_cap: row.get(3)?,
                faculty: row.get(4)?,
                room: row.get(5)?,
                room_cap: row.get(6)?,
                distant: row.get(7)?,
                start_time_info: [row.get(8)?, row.get(9)?],
                end_time_info: [row.get(10)?, row.get(11)?],
            },
        ))
    })?;

    for row in rows {
        let (course_pk, days_json, mut schedule) = row?;
        schedule.days = serde_json::from_str(&days_json)?;
        by_course.entry(course_pk).or_default().push(schedule);
    }

    Ok(by_course)
}

/// Loads the priority lists of every listed course in one query, keyed by
/// course. Each list keeps its stored order.
fn load_priorities(
    conn: &Connection,
    course_pks: &[i64],
) -> Result<HashMap<i64, Vec<PriorityEntry>>, CatalogError> {
    let mut by_course: HashMap<i64, Vec<PriorityEntry>> = HashMap::new();
    if course_pks.is_empty() {
        return Ok(by_course);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT course_pk, priority, grp_year, grp_level, grp_school, grp_major, grp_notes
         FROM priorities
         WHERE course_pk IN ({})
         ORDER BY course_pk, position",
        placeholders(course_pks.len())
    ))?;

    let rows = stmt.query_map(params_from_iter(course_pks.iter()), |row| {
        Ok((
            row.get::<_, i64>(0)?,
            PriorityEntry {
                priority: row.get(1)?,
                group: EligibilityGroup {
                    year: row.get(2)?,
                    level: row.get(3)?,
                    school: row.get(4)?,
                    major: row.get(5)?,
                    notes: row.get(6)?,
                },
            },
        ))
    })?;

    for row in rows {
        let (course_pk, entry) = row?;
        by_course.entry(course_pk).or_default().push(entry);
    }

    Ok(by_course)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn group(year: Option<u32>, level: &str, school: &str, major: Option<&str>) -> EligibilityGroup {
        EligibilityGroup {
            year,
            level: Some(level.to_string()),
            school: Some(school.to_string()),
            major: major.map(str::to_string),
            notes: None,
        }
    }

    fn course(id: &str, abbr: &str, priorities: Vec<(EligibilityGroup, u32)>) -> Course {
        Course {
            id: id.to_string(),
            abbr: abbr.to_string(),
            title: format!("{abbr} title"),
            cr_ects: "6".to_string(),
            schedules: vec![Schedule {
                section: "1L".to_string(),
                days: vec!["T".to_string(), "R".to_string()],
                course_cap: "40".to_string(),
                faculty: "Nurlan Y.".to_string(),
                room: "7.210".to_string(),
                room_cap: "50".to_string(),
                distant: false,
                start_time_info: [10, 30],
                end_time_info: [11, 45],
            }],
            priorities: priorities
                .into_iter()
                .map(|(group, priority)| PriorityEntry { group, priority })
                .collect(),
        }
    }

    fn sample_courses() -> Vec<Course> {
        vec![
            course(
                "a",
                "CSCI 235",
                vec![
                    (group(Some(2), "ug", "seds", Some("comsci")), 1),
                    (group(None, "ug", "seds", None), 2),
                ],
            ),
            course("b", "HST 100", vec![]),
            course("c", "MATH 273", vec![(group(Some(1), "ug", "seds", Some("comsci")), 1)]),
            course("d", "CSCI 501", vec![(group(None, "gr", "seds", None), 1)]),
            course("e", "ECON 101", vec![(group(None, "ug", "ssh", None), 1)]),
        ]
    }

    fn catalog_with(courses: &[Course]) -> (TempDir, CourseCatalog) {
        let dir = TempDir::new().unwrap();
        let catalog = CourseCatalog::new(dir.path().join("courses.db")).unwrap();
        catalog.import_courses("fall2025", courses).unwrap();
        (dir, catalog)
    }

    fn ids(courses: &[Course]) -> Vec<&str> {
        courses.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_import_then_fetch_all() {
        let courses = sample_courses();
        let (_dir, catalog) = catalog_with(&courses);

        assert!(catalog.term_has_data("fall2025").unwrap());
        assert!(!catalog.term_has_data("spring2026").unwrap());

        let fetched = catalog
            .fetch_courses("fall2025", &FilterExpression::default())
            .unwrap();
        assert_eq!(fetched, courses);
    }

    #[test]
    fn test_sql_filter_agrees_with_in_memory_filter() {
        let courses = sample_courses();
        let (_dir, catalog) = catalog_with(&courses);

        let criteria_set = [
            StudentCriteria::new(Some(2), Some("seds"), Some("comsci")),
            StudentCriteria::new(Some(1), Some("seds"), Some("comsci")),
            StudentCriteria::new(None, Some("seds"), None),
            StudentCriteria::new(Some(2), Some("seds"), None),
            StudentCriteria::new(None, Some("ssh"), None),
            StudentCriteria::new(Some(2), None, Some("comsci")),
        ];

        for criteria in &criteria_set {
            let filter = build_priority_query(criteria);
            let from_db = catalog.fetch_courses("fall2025", &filter).unwrap();
            let in_memory: Vec<Course> = courses
                .iter()
                .filter(|c| filter.matches(c))
                .cloned()
                .collect();
            assert_eq!(from_db, in_memory, "criteria: {criteria:?}");
        }
    }

    #[test]
    fn test_fetch_ranked_courses() {
        let (_dir, catalog) = catalog_with(&sample_courses());

        let criteria = StudentCriteria::new(Some(2), Some("seds"), Some("comsci"));
        let ranked = catalog.fetch_ranked_courses("fall2025", &criteria).unwrap();

        assert_eq!(ids(&ranked), vec!["a"]);
        assert_eq!(ranked[0].priorities.len(), 1);
        assert_eq!(ranked[0].priorities[0].priority, 1);

        // school-only student: only the school-wide undergraduate rule matches
        let criteria = StudentCriteria::new(None, Some("seds"), None);
        let ranked = catalog.fetch_ranked_courses("fall2025", &criteria).unwrap();
        assert_eq!(ids(&ranked), vec!["a"]);
        assert_eq!(ranked[0].priorities[0].priority, 2);
    }

    #[test]
    fn test_no_criteria_lists_everything_unranked() {
        let (_dir, catalog) = catalog_with(&sample_courses());

        let ranked = catalog
            .fetch_ranked_courses("fall2025", &StudentCriteria::default())
            .unwrap();
        assert_eq!(ids(&ranked), vec!["a", "b", "c", "d", "e"]);
        assert!(ranked.iter().all(|c| c.priorities.is_empty()));
    }

    #[test]
    fn test_no_criteria_ranks_courses_open_to_all_undergraduates() {
        let mut courses = sample_courses();
        let open_to_all = EligibilityGroup {
            level: Some("ug".to_string()),
            ..Default::default()
        };
        courses.push(course("f", "WCS 150", vec![(open_to_all, 2)]));
        let (_dir, catalog) = catalog_with(&courses);

        let ranked = catalog
            .fetch_ranked_courses("fall2025", &StudentCriteria::default())
            .unwrap();
        assert_eq!(ids(&ranked), vec!["a", "b", "c", "d", "e", "f"]);
        assert!(ranked[..5].iter().all(|c| c.priorities.is_empty()));
        assert_eq!(ranked[5].priorities.len(), 1);
        assert_eq!(ranked[5].priorities[0].priority, 2);
    }

    #[test]
    fn test_filtered_fetch_keeps_child_rows_with_their_course() {
        let (_dir, catalog) = catalog_with(&sample_courses());

        let criteria = StudentCriteria::new(Some(1), Some("seds"), Some("comsci"));
        let fetched = catalog
            .fetch_courses("fall2025", &build_priority_query(&criteria))
            .unwrap();
        let expected: Vec<Course> = sample_courses()
            .into_iter()
            .filter(|c| c.id == "a" || c.id == "c")
            .collect();
        assert_eq!(fetched, expected);
    }

    #[test]
    fn test_missing_id_uses_row_number() {
        let mut c = course("", "PHYS 161", vec![]);
        c.schedules.clear();
        let (_dir, catalog) = catalog_with(&[c]);

        let fetched = catalog
            .fetch_courses("fall2025", &FilterExpression::default())
            .unwrap();
        assert_eq!(fetched[0].id, "1");
    }

    #[test]
    fn test_duplicate_ids_roll_back_import() {
        let dir = TempDir::new().unwrap();
        let catalog = CourseCatalog::new(dir.path().join("courses.db")).unwrap();

        let dupes = vec![course("x", "A 1", vec![]), course("x", "A 2", vec![])];
        let err = catalog.import_courses("fall2025", &dupes).unwrap_err();
        assert!(matches!(err, CatalogError::Database(_)));
        assert!(!catalog.term_has_data("fall2025").unwrap());
    }

    #[test]
    fn test_missing_table_is_a_database_error() {
        let (dir, catalog) = catalog_with(&sample_courses());
        Connection::open(dir.path().join("courses.db"))
            .unwrap()
            .execute_batch("DROP TABLE priorities; DROP TABLE schedules; DROP TABLE courses;")
            .unwrap();

        let err = catalog
            .fetch_ranked_courses("fall2025", &StudentCriteria::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::Database(_)));
    }

    #[test]
    fn test_load_course_documents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(&path, serde_json::to_string(&sample_courses()).unwrap()).unwrap();

        let loaded = load_course_documents(&path).unwrap();
        assert_eq!(loaded, sample_courses());

        let err = load_course_documents(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_sample_seed_file() {
        let seed = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/sample_courses.json");
        let courses = load_course_documents(&seed).unwrap();
        let (_dir, catalog) = catalog_with(&courses);

        let criteria = StudentCriteria::new(Some(4), Some("ssh"), Some("econ"));
        let ranked = catalog.fetch_ranked_courses("fall2025", &criteria).unwrap();
        assert_eq!(ids(&ranked), vec!["econ101-f25"]);
        // year + school outranks school + major
        assert_eq!(ranked[0].priorities[0].priority, 2);
    }
}
