//! Media resource types.
//!
//! A [`Resource`] is a declaration that a client holds one unit (or some
//! magnitude) of a scarce media resource. The closed set of kinds lives in
//! [`ResourceKind`]; the arbitration engine routes each kind to the pass
//! that governs it, so a kind that is added here without a pass assignment
//! is inert during reclamation.

use serde::{Deserialize, Serialize};

/// Wire tag for secure codec slots.
pub const TAG_SECURE_CODEC: &str = "secure-codec";

/// Wire tag for non-secure codec slots.
pub const TAG_NON_SECURE_CODEC: &str = "non-secure-codec";

/// Wire tag for graphic memory.
pub const TAG_GRAPHIC_MEMORY: &str = "graphic-memory";

/// Kind of a scarce media resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// A secure (protected-content) codec slot.
    SecureCodec,

    /// A non-secure codec slot.
    NonSecureCodec,

    /// Graphic memory, measured in bytes.
    GraphicMemory,
}

impl ResourceKind {
    /// Returns the wire tag for this kind.
    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::SecureCodec => TAG_SECURE_CODEC,
            Self::NonSecureCodec => TAG_NON_SECURE_CODEC,
            Self::GraphicMemory => TAG_GRAPHIC_MEMORY,
        }
    }

    /// Parses a wire tag into a kind.
    ///
    /// Returns `None` for tags outside the vocabulary.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            TAG_SECURE_CODEC => Some(Self::SecureCodec),
            TAG_NON_SECURE_CODEC => Some(Self::NonSecureCodec),
            TAG_GRAPHIC_MEMORY => Some(Self::GraphicMemory),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// A declared media resource: a kind plus a kind-specific magnitude.
///
/// For codec slots the value is typically 1. A zero value is legal and
/// carries no magnitude, but it still marks presence of the kind for the
/// conflict sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// The resource kind.
    pub kind: ResourceKind,

    /// Kind-specific magnitude (e.g. bytes of graphic memory).
    pub value: u64,
}

impl Resource {
    /// Creates a resource of the given kind and magnitude.
    #[must_use]
    pub const fn new(kind: ResourceKind, value: u64) -> Self {
        Self { kind, value }
    }

    /// One secure codec slot.
    #[must_use]
    pub const fn secure_codec() -> Self {
        Self::new(ResourceKind::SecureCodec, 1)
    }

    /// One non-secure codec slot.
    #[must_use]
    pub const fn non_secure_codec() -> Self {
        Self::new(ResourceKind::NonSecureCodec, 1)
    }

    /// Graphic memory of the given size in bytes.
    #[must_use]
    pub const fn graphic_memory(bytes: u64) -> Self {
        Self::new(ResourceKind::GraphicMemory, bytes)
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}
