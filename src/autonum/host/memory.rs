use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{NumberingError, Result};
use crate::host::{CommitHandler, NotificationStream, ObjectModel, SubscriptionId, TrackedObject};
use crate::model::{Attribute, ContainerId, DocumentId, ObjectClass};

/// An instanced variant of a reference (dynamic-block analog). Carries its
/// own attribute set, reachable only through the owning reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub attributes: Vec<Attribute>,
}

/// One insertion of a container into the drawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
}

impl Reference {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self {
            attributes,
            variants: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct Container {
    name: String,
    references: Vec<Reference>,
}

/// A committed object as the in-memory stream delivers it.
///
/// `container` is the name of the container the object was inserted into;
/// the commit filter never looks at it, but the drawing uses it to absorb
/// the object after the commit round.
#[derive(Debug, Clone)]
pub struct CommittedObject {
    pub document: DocumentId,
    pub class: ObjectClass,
    pub container: Option<String>,
    pub tag: String,
    pub text: String,
    pub newly_created: bool,
    pub writable: bool,
}

impl CommittedObject {
    /// A freshly inserted, writable attribute value — the case the engine
    /// exists for.
    pub fn new_attribute(document: DocumentId, tag: impl Into<String>) -> Self {
        Self {
            document,
            class: ObjectClass::AttributeValue,
            container: None,
            tag: tag.into(),
            text: String::new(),
            newly_created: true,
            writable: true,
        }
    }

    pub fn with_container(mut self, name: impl Into<String>) -> Self {
        self.container = Some(name.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn pre_existing(mut self) -> Self {
        self.newly_created = false;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }
}

impl TrackedObject for CommittedObject {
    fn document(&self) -> DocumentId {
        self.document
    }

    fn class(&self) -> ObjectClass {
        self.class
    }

    fn is_newly_created(&self) -> bool {
        self.newly_created
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn tag(&self) -> &str {
        &self.tag
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, value: &str) -> Result<()> {
        if !self.writable {
            return Err(NumberingError::WriteBack(format!(
                "object with tag {} is not open for write",
                self.tag
            )));
        }
        self.text = value.to_string();
        Ok(())
    }
}

#[derive(Default)]
struct StreamState {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, ObjectClass, CommitHandler)>,
}

/// In-memory drawing: the object graph plus its commit stream.
///
/// Containers and references are fixed once built; commits flow through
/// [`MemoryDrawing::commit`], which plays the host's role of invoking every
/// subscribed handler in order.
pub struct MemoryDrawing {
    document: DocumentId,
    order: Vec<ContainerId>,
    containers: HashMap<ContainerId, Container>,
    stream: Mutex<StreamState>,
}

impl MemoryDrawing {
    pub fn new(document: DocumentId) -> Self {
        Self {
            document,
            order: Vec::new(),
            containers: HashMap::new(),
            stream: Mutex::new(StreamState::default()),
        }
    }

    pub fn add_container(&mut self, name: impl Into<String>) -> ContainerId {
        let id = ContainerId::new();
        self.order.push(id);
        self.containers.insert(
            id,
            Container {
                name: name.into(),
                references: Vec::new(),
            },
        );
        id
    }

    pub fn add_reference(&mut self, container: ContainerId, reference: Reference) -> Result<()> {
        let entry = self
            .containers
            .get_mut(&container)
            .ok_or_else(|| NumberingError::InvalidReference(format!("{:?}", container)))?;
        entry.references.push(reference);
        Ok(())
    }

    /// Container lookup by name, case-insensitive like block names in most
    /// editors.
    pub fn find_container(&self, name: &str) -> Option<ContainerId> {
        self.order.iter().copied().find(|id| {
            self.containers
                .get(id)
                .is_some_and(|c| c.name.eq_ignore_ascii_case(name))
        })
    }

    pub fn container_names(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|id| self.containers.get(id).map(|c| c.name.clone()))
            .collect()
    }

    /// Publishes one committed object to every subscriber of its class, in
    /// subscription order. Every handler runs even when an earlier one
    /// fails; the first failure is returned so it reaches the host's error
    /// channel instead of being swallowed.
    pub fn commit(&self, object: &mut dyn TrackedObject) -> Result<()> {
        let handlers: Vec<CommitHandler> = {
            let state = self.stream.lock().unwrap();
            state
                .subscribers
                .iter()
                .filter(|(_, class, _)| *class == object.class())
                .map(|(_, _, handler)| handler.clone())
                .collect()
        };

        let mut first_err = None;
        for handler in handlers {
            if let Err(e) = handler(object) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// How many subscriptions are live, across all classes.
    pub fn subscription_count(&self) -> usize {
        self.stream.lock().unwrap().subscribers.len()
    }
}

impl ObjectModel for MemoryDrawing {
    fn document(&self) -> DocumentId {
        self.document
    }

    fn container_name(&self, id: ContainerId) -> Result<String> {
        self.containers
            .get(&id)
            .map(|c| c.name.clone())
            .ok_or_else(|| NumberingError::InvalidReference(format!("{:?}", id)))
    }

    fn references(
        &self,
        id: ContainerId,
    ) -> Result<Box<dyn Iterator<Item = &[Attribute]> + '_>> {
        let container = self
            .containers
            .get(&id)
            .ok_or_else(|| NumberingError::InvalidReference(format!("{:?}", id)))?;

        // Direct insertions first, then their instanced variants. Lazy on
        // both legs; nothing is collected.
        let direct = container
            .references
            .iter()
            .map(|r| r.attributes.as_slice());
        let instanced = container
            .references
            .iter()
            .flat_map(|r| r.variants.iter().map(|v| v.attributes.as_slice()));
        Ok(Box::new(direct.chain(instanced)))
    }
}

impl NotificationStream for MemoryDrawing {
    fn subscribe(&self, class: ObjectClass, handler: CommitHandler) -> SubscriptionId {
        let mut state = self.stream.lock().unwrap();
        state.next_id += 1;
        let id = SubscriptionId(state.next_id);
        state.subscribers.push((id, class, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let mut state = self.stream.lock().unwrap();
        state.subscribers.retain(|(sub, _, _)| *sub != id);
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct DrawingFixture {
        pub drawing: MemoryDrawing,
    }

    impl Default for DrawingFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DrawingFixture {
        pub fn new() -> Self {
            Self {
                drawing: MemoryDrawing::new(DocumentId::new()),
            }
        }

        pub fn with_container(mut self, name: &str) -> Self {
            self.drawing.add_container(name);
            self
        }

        /// One reference per text value, each carrying a single attribute
        /// with the given tag.
        pub fn with_tagged_refs(mut self, container: &str, tag: &str, texts: &[&str]) -> Self {
            let id = self
                .drawing
                .find_container(container)
                .unwrap_or_else(|| self.drawing.add_container(container));
            for text in texts {
                self.drawing
                    .add_reference(id, Reference::new(vec![Attribute::new(tag, *text)]))
                    .unwrap();
            }
            self
        }

        /// One reference whose instanced variants carry the given texts.
        pub fn with_variant_ref(mut self, container: &str, tag: &str, texts: &[&str]) -> Self {
            let id = self
                .drawing
                .find_container(container)
                .unwrap_or_else(|| self.drawing.add_container(container));
            let mut reference = Reference::new(Vec::new());
            for text in texts {
                reference.variants.push(Variant {
                    attributes: vec![Attribute::new(tag, *text)],
                });
            }
            self.drawing.add_reference(id, reference).unwrap();
            self
        }
    }
}
