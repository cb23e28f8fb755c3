/// Priority query construction
use super::rules::{applicable_patterns, FieldRequirement, GroupPattern};
use super::types::{Course, StudentCriteria};
use serde_json::{json, Map, Value};

/// A set of alternative conditions on a course's priority list.
///
/// A course satisfies the filter if any one of its priority entries matches
/// any branch. A filter with no branches matches every course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpression<'a> {
    branches: Vec<GroupPattern<'a>>,
}

impl<'a> FilterExpression<'a> {
    /// Branches in specificity order.
    pub fn branches(&self) -> &[GroupPattern<'a>] {
        &self.branches
    }

    /// Returns true if the filter places no restriction on courses.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Evaluates the filter against a course in memory.
    pub fn matches(&self, course: &Course) -> bool {
        self.is_empty()
            || self.branches.iter().any(|pattern| {
                course
                    .priorities
                    .iter()
                    .any(|entry| pattern.matches(&entry.group))
            })
    }

    /// Renders the filter as a document-store query, used for logging.
    ///
    /// `{}` when empty, otherwise
    /// `{"$or": [{"prioritiies": {"$elemMatch": {"group.year": .., ..}}}, ..]}`.
    pub fn to_document(&self) -> Value {
        if self.is_empty() {
            return json!({});
        }

        let branches: Vec<Value> = self
            .branches
            .iter()
            .map(|pattern| {
                let mut elem = Map::new();
                put_field(&mut elem, "group.year", pattern.year.map_value(Value::from));
                put_field(&mut elem, "group.school", pattern.school.map_value(Value::from));
                put_field(&mut elem, "group.major", pattern.major.map_value(Value::from));
                put_field(&mut elem, "group.level", pattern.group_level.map_value(Value::from));
                put_field(&mut elem, "group.notes", pattern.notes.map_value(Value::from));
                json!({ "prioritiies": { "$elemMatch": elem } })
            })
            .collect();

        json!({ "$or": branches })
    }
}

fn put_field(doc: &mut Map<String, Value>, key: &str, requirement: FieldRequirement<Value>) {
    match requirement {
        FieldRequirement::Any => {}
        FieldRequirement::MustBeNull => {
            doc.insert(key.to_string(), Value::Null);
        }
        FieldRequirement::MustEqual(v) => {
            doc.insert(key.to_string(), v);
        }
    }
}

/// Builds the filter selecting courses that declare any tier for the student.
///
/// One branch is added per specificity level whose required fields the
/// student specified, most specific first. At most four branches are
/// produced, and each requires an undergraduate group.
pub fn build_priority_query(criteria: &StudentCriteria) -> FilterExpression<'_> {
    FilterExpression {
        branches: applicable_patterns(criteria).collect(),
    }
}
