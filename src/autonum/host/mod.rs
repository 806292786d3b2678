//! # Host Contracts
//!
//! The engine never talks to a drawing editor directly; it talks to the three
//! trait seams defined here. The host (or a test) supplies the
//! implementations.
//!
//! ## The Seams
//!
//! - [`ObjectModel`]: read-only access to the persisted object graph. Every
//!   method call runs against a consistent snapshot, standing in for the
//!   host's transactional read scope.
//!
//! - [`NotificationStream`]: the publish/subscribe facility over object
//!   commits. One event per committed object, delivered synchronously in
//!   commit order. Delivery is additive: every subscriber for a class sees
//!   every event of that class, so the engine's handler never suppresses the
//!   rest of the host's pipeline.
//!
//! - [`TrackedObject`]: one committed object as the stream delivers it. The
//!   engine filters these and writes text into the matching ones; it never
//!   creates or destroys them.
//!
//! ## Implementations
//!
//! - [`memory::MemoryDrawing`]: a complete in-memory drawing implementing
//!   both `ObjectModel` and `NotificationStream`. Backs the CLI and the
//!   test suites.
//! - [`fs::DrawingFile`]: a JSON snapshot on disk that loads into a
//!   `MemoryDrawing`.

use std::sync::Arc;

use crate::error::Result;
use crate::model::{Attribute, ContainerId, DocumentId, ObjectClass};

pub mod fs;
pub mod memory;

/// Identifies one live subscription on a notification stream. Ownership is
/// exclusive: only the subscriber that holds the id may unsubscribe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Read-only view of the host's persisted object graph.
pub trait ObjectModel {
    /// The document this model belongs to.
    fn document(&self) -> DocumentId;

    /// Resolves a container id to its name, failing with `InvalidReference`
    /// when the id does not name a live container.
    fn container_name(&self, id: ContainerId) -> Result<String>;

    /// The attribute sets of all references to the container: direct
    /// insertions first, then any instanced variants reachable through them.
    ///
    /// The sequence is lazy and restartable; callers must not assume the
    /// full set is ever materialized.
    fn references(
        &self,
        id: ContainerId,
    ) -> Result<Box<dyn Iterator<Item = &[Attribute]> + '_>>;
}

/// One committed object as delivered by the notification stream.
pub trait TrackedObject {
    fn document(&self) -> DocumentId;
    fn class(&self) -> ObjectClass;
    fn is_newly_created(&self) -> bool;
    fn is_writable(&self) -> bool;
    fn tag(&self) -> &str;
    fn text(&self) -> &str;
    fn set_text(&mut self, value: &str) -> Result<()>;
}

/// Handler invoked once per committed object, synchronously, in commit order.
pub type CommitHandler = Arc<dyn Fn(&mut dyn TrackedObject) -> Result<()> + Send + Sync>;

/// Publish/subscribe facility over object commits, keyed by object class.
///
/// Subscribing takes `&self`; implementations use interior mutability so the
/// handle can be shared between the host and the engine.
pub trait NotificationStream {
    fn subscribe(&self, class: ObjectClass, handler: CommitHandler) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}
