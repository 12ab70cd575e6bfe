use serde::{Deserialize, Serialize};

/// A single student as stored in every backend and returned by the lookup routes.
///
/// `student_no` is the lookup key; `name` and `department` are payload. The
/// serialized field names are the wire format, so they must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_no: String,
    pub name: String,
    pub department: String,
}

impl StudentRecord {
    pub fn new(
        student_no: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            student_no: student_no.into(),
            name: name.into(),
            department: department.into(),
        }
    }
}
