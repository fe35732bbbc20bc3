use crate::types::{Gender, Person};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One entry of a person records file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub born: Option<NaiveDate>,
    #[serde(default)]
    pub died: Option<NaiveDate>,
    /// Record ids of this person's parents
    #[serde(default)]
    pub parents: Vec<String>,
}

/// On-disk shape of a records file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsFile {
    /// Free-form provenance note, e.g. the register the data came from
    #[serde(default)]
    pub source: Option<String>,
    pub persons: Vec<PersonEntry>,
}

impl PersonEntry {
    pub fn has_parents(&self) -> bool {
        !self.parents.is_empty()
    }

    pub fn into_person(self) -> Person {
        Person {
            id: self.id,
            name: self.name,
            gender: self.gender,
            born: self.born,
            died: self.died,
            label: None,
        }
    }
}

impl RecordsFile {
    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    pub fn link_count(&self) -> usize {
        self.persons.iter().map(|p| p.parents.len()).sum()
    }
}
