use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Core types for the kintree genealogy engine

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// External record id, unique within one records file
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub born: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub died: Option<NaiveDate>,
    /// Filled by the extraction post-processing hook, empty before that
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Unknown,
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Unknown
    }
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gender: None,
            born: None,
            died: None,
            label: None,
        }
    }

    /// Birth-death span as shown in record listings, e.g. "1902-1985"
    pub fn lifespan(&self) -> String {
        match (self.born, self.died) {
            (Some(b), Some(d)) => format!("{}-{}", b.format("%Y"), d.format("%Y")),
            (Some(b), None) => format!("{}-", b.format("%Y")),
            (None, Some(d)) => format!("-{}", d.format("%Y")),
            (None, None) => String::new(),
        }
    }
}

/// One node of a detached tree produced by the extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub person: Person,
    pub parents: Vec<TreeNode>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(person: Person) -> Self {
        Self {
            person,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.parents.is_empty() && self.children.is_empty()
    }

    /// Total persons in this subtree, the node itself included
    pub fn person_count(&self) -> usize {
        1 + self
            .parents
            .iter()
            .chain(self.children.iter())
            .map(|n| n.person_count())
            .sum::<usize>()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub root_id: String,
    pub depth: usize,
    pub person_count: usize,
    pub tree: TreeNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub query: QueryKind,
    pub subject: String,
    pub other: String,
    pub depth: usize,
    pub outcome: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Ancestor,
    Relative,
}

impl QueryReport {
    pub fn new(query: QueryKind, subject: &str, other: &str, depth: usize, outcome: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            query,
            subject: subject.to_string(),
            other: other.to_string(),
            depth,
            outcome,
        }
    }
}
