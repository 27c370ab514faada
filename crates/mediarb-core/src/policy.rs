//! Hardware capability policy.
//!
//! Two boolean flags describe what the codec hardware tolerates: whether
//! more than one secure codec may be live at once, and whether secure and
//! non-secure codecs may coexist. Both default to permissive. The flags are
//! reconfigured at runtime through ordered [`PolicyDirective`] batches.

use serde::{Deserialize, Serialize};

/// Policy tag controlling [`PolicyFlags::multiple_secure_codecs_supported`].
pub const POLICY_SUPPORTS_MULTIPLE_SECURE_CODECS: &str = "supports-multiple-secure-codecs";

/// Policy tag controlling
/// [`PolicyFlags::secure_with_nonsecure_codec_supported`].
pub const POLICY_SUPPORTS_SECURE_WITH_NONSECURE_CODEC: &str =
    "supports-secure-with-non-secure-codec";

/// A single `(tag, value)` configuration directive.
///
/// A non-zero value sets the named flag, zero clears it. Directives with
/// unrecognized tags are ignored so that newer callers can talk to older
/// services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDirective {
    /// Policy tag.
    pub tag: String,

    /// Flag value; non-zero means enabled.
    pub value: u64,
}

impl PolicyDirective {
    /// Creates a directive for the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>, value: u64) -> Self {
        Self {
            tag: tag.into(),
            value,
        }
    }
}

impl std::fmt::Display for PolicyDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.tag, self.value)
    }
}

/// Hardware capability flags consulted by the arbitration engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyFlags {
    /// Whether more than one secure codec may be live at once.
    pub multiple_secure_codecs_supported: bool,

    /// Whether a secure codec may coexist with non-secure codecs.
    pub secure_with_nonsecure_codec_supported: bool,
}

impl PolicyFlags {
    /// Applies one directive in place.
    ///
    /// Unrecognized tags are ignored.
    pub fn apply(&mut self, directive: &PolicyDirective) {
        let enabled = directive.value != 0;
        match directive.tag.as_str() {
            POLICY_SUPPORTS_MULTIPLE_SECURE_CODECS => {
                self.multiple_secure_codecs_supported = enabled;
            },
            POLICY_SUPPORTS_SECURE_WITH_NONSECURE_CODEC => {
                self.secure_with_nonsecure_codec_supported = enabled;
            },
            _ => {},
        }
    }
}

impl Default for PolicyFlags {
    /// Both capabilities are assumed present until configured otherwise.
    fn default() -> Self {
        Self {
            multiple_secure_codecs_supported: true,
            secure_with_nonsecure_codec_supported: true,
        }
    }
}
