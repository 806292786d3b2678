use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{NumberingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub Uuid);

impl ContainerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Class tag for committed objects. Resolved when the host model is built,
/// so the commit filter is a plain enum comparison rather than a runtime
/// type lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectClass {
    /// A tagged text value carried by a reference (the numbering target).
    AttributeValue,
    /// An insertion of a container into the drawing.
    Reference,
    /// Anything else the host commits.
    Other,
}

/// A named, tagged text value carried by a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub tag: String,
    pub text: String,
}

impl Attribute {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
        }
    }
}

/// Identifies what the engine numbers: an attribute tag within one container.
///
/// Both fields are fixed at construction. The tag is stored upper-cased;
/// comparisons against raw host tags stay case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    container: ContainerId,
    tag: String,
}

impl TargetSpec {
    pub fn new(container: ContainerId, tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(NumberingError::InvalidArgument(
                "attribute tag must not be empty".to_string(),
            ));
        }
        Ok(Self {
            container,
            tag: trimmed.to_uppercase(),
        })
    }

    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn matches_tag(&self, other: &str) -> bool {
        self.tag.eq_ignore_ascii_case(other)
    }
}

/// Whether the commit interception is live. There are exactly two states;
/// teardown always lands on `Disabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptionState {
    Disabled,
    Enabled,
}
