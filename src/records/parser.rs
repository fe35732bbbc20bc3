use crate::kinship::PersonGraph;
use crate::records::schema::RecordsFile;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Loads a person records file and resolves it into a [`PersonGraph`]
/// with symmetric parent/child back-references.
#[derive(Debug, Clone)]
pub struct RecordParser {
    records_path: PathBuf,
}

impl RecordParser {
    pub fn new<P: AsRef<Path>>(records_path: P) -> Self {
        Self {
            records_path: records_path.as_ref().to_path_buf(),
        }
    }

    /// Read and resolve the records file
    pub fn load(&self) -> Result<PersonGraph> {
        debug!("Loading person records from: {:?}", self.records_path);

        let content = fs::read_to_string(&self.records_path)
            .with_context(|| format!("Failed to read records file {:?}", self.records_path))?;

        let file: RecordsFile =
            serde_json::from_str(&content).with_context(|| "Failed to parse records file")?;

        if let Some(source) = &file.source {
            debug!("Records source: {}", source);
        }

        Self::build_graph(file)
    }

    /// Resolve an already-parsed records file into a graph.
    ///
    /// Two passes: all persons are added first, then every parent reference
    /// is resolved, so entries may reference persons declared later in the
    /// file. Unknown references, duplicate ids, and a person listed as
    /// their own parent are errors.
    pub fn build_graph(file: RecordsFile) -> Result<PersonGraph> {
        let mut graph = PersonGraph::new();

        for entry in &file.persons {
            graph
                .add_person(entry.clone().into_person())
                .with_context(|| "Invalid records file")?;
        }

        for entry in &file.persons {
            let child = graph.resolve(&entry.id)?;
            for parent_id in &entry.parents {
                if parent_id == &entry.id {
                    anyhow::bail!("person {} lists themselves as a parent", entry.id);
                }
                let parent = graph.resolve(parent_id).with_context(|| {
                    format!("person {} references unknown parent {}", entry.id, parent_id)
                })?;
                graph.link(parent, child);
            }
        }

        info!(
            "Loaded {} persons with {} parent links",
            graph.person_count(),
            graph.link_count()
        );

        Ok(graph)
    }
}
