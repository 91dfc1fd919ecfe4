use serde::{Deserialize, Serialize};

use super::roster_error::{clean_field, RosterError, PATH_SEPARATORS};

pub const STUDENT_HEADERS: &[&str] = &["ID", "Name"];

/// A registered student. The id is also the label the recogniser learns,
/// and is encoded into every face sample filename.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl Student {
    /// Validated constructor. Ids may not contain `_` since it delimits
    /// the fields of a sample filename.
    pub fn new(id: &str, name: &str) -> Result<Self, RosterError> {
        let id = clean_field("Student ID", id, &["_", "/", "\\"])?;
        let name = clean_field("Name", name, PATH_SEPARATORS)?;
        Ok(Self { id, name })
    }
}
