//! JSON drawing snapshots.
//!
//! A [`DrawingFile`] is the CLI's storage: containers with their references,
//! plus the objects waiting to be committed on the next `apply` run. It
//! loads into a [`MemoryDrawing`] for scanning and interception, and commits
//! are absorbed back into the containers before saving.
//!
//! ```text
//! {
//!   "document": "…uuid…",
//!   "containers": [
//!     { "name": "DOOR",
//!       "references": [ { "attributes": [ { "tag": "ID", "text": "5" } ] } ] }
//!   ],
//!   "pending": [ { "container": "DOOR", "tag": "ID" } ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NumberingError, Result};
use crate::host::memory::{CommittedObject, MemoryDrawing, Reference};
use crate::model::{Attribute, DocumentId, ObjectClass};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub name: String,
    #[serde(default)]
    pub references: Vec<Reference>,
}

/// An object that will be committed on the next apply run: an attribute
/// value being inserted into a container. Flags default to the common case
/// of a fresh, writable insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRecord {
    pub container: String,
    pub tag: String,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_true")]
    pub newly_created: bool,
    #[serde(default = "default_true")]
    pub writable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingFile {
    #[serde(default)]
    pub document: DocumentId,
    pub containers: Vec<ContainerRecord>,
    #[serde(default)]
    pub pending: Vec<PendingRecord>,
}

impl DrawingFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(NumberingError::Io)?;
        let drawing: DrawingFile =
            serde_json::from_str(&content).map_err(NumberingError::Serialization)?;
        Ok(drawing)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(NumberingError::Serialization)?;
        fs::write(path, content).map_err(NumberingError::Io)?;
        Ok(())
    }

    /// Builds the in-memory object graph for scanning and interception.
    pub fn to_memory(&self) -> MemoryDrawing {
        let mut drawing = MemoryDrawing::new(self.document);
        for record in &self.containers {
            let id = drawing.add_container(&record.name);
            for reference in &record.references {
                // add_reference only fails for a stale id; this one is fresh
                let _ = drawing.add_reference(id, reference.clone());
            }
        }
        drawing
    }

    /// The pending records as committed objects, in file order.
    pub fn pending_objects(&self) -> Vec<CommittedObject> {
        self.pending
            .iter()
            .map(|record| CommittedObject {
                document: self.document,
                class: ObjectClass::AttributeValue,
                container: Some(record.container.clone()),
                tag: record.tag.clone(),
                text: record.text.clone(),
                newly_created: record.newly_created,
                writable: record.writable,
            })
            .collect()
    }

    /// Folds a commit round back into the drawing: each committed object
    /// becomes a reference in its container, carrying whatever text it ended
    /// up with. Objects whose container name does not resolve stay pending
    /// (text preserved) and their names are returned for reporting.
    pub fn absorb(&mut self, committed: &[CommittedObject]) -> Vec<String> {
        let mut unresolved = Vec::new();
        let mut still_pending = Vec::new();

        for object in committed {
            let name = object.container.as_deref().unwrap_or("");
            let record = self
                .containers
                .iter_mut()
                .find(|c| c.name.eq_ignore_ascii_case(name));
            match record {
                Some(container) => {
                    container.references.push(Reference::new(vec![Attribute::new(
                        &object.tag,
                        &object.text,
                    )]));
                }
                None => {
                    unresolved.push(name.to_string());
                    still_pending.push(PendingRecord {
                        container: name.to_string(),
                        tag: object.tag.clone(),
                        text: object.text.clone(),
                        newly_created: object.newly_created,
                        writable: object.writable,
                    });
                }
            }
        }

        self.pending = still_pending;
        unresolved
    }
}
