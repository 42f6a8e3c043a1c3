//! Scope claim formatting.
//!
//! The scope names the resource a token grants access to and the permission
//! level: `doc:<docId>:<perm>` or `file:<fileHash>:<docId>:<perm>`, where
//! `<perm>` is `rw` for full access and `r` otherwise. Verifiers match these
//! strings literally.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authorization level resolved by the caller's access-control layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Authorization {
    /// Read and write access.
    Full,
    /// Read access only.
    ReadOnly,
}

impl Authorization {
    /// The level as used in API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Authorization::Full => "full",
            Authorization::ReadOnly => "read-only",
        }
    }

    /// Permission suffix written into the scope.
    pub fn permission(&self) -> &'static str {
        match self {
            Authorization::Full => "rw",
            Authorization::ReadOnly => "r",
        }
    }
}

/// Only the exact text `full` grants full access.
impl From<&str> for Authorization {
    fn from(value: &str) -> Self {
        if value == "full" {
            Authorization::Full
        } else {
            Authorization::ReadOnly
        }
    }
}

impl From<String> for Authorization {
    fn from(value: String) -> Self {
        Authorization::from(value.as_str())
    }
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resource a token is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// A collaborative document.
    Document { doc_id: String },
    /// A file attached to a document, addressed by content hash.
    File { file_hash: String, doc_id: String },
}

impl Resource {
    pub fn document(doc_id: impl Into<String>) -> Self {
        Resource::Document {
            doc_id: doc_id.into(),
        }
    }

    pub fn file(file_hash: impl Into<String>, doc_id: impl Into<String>) -> Self {
        Resource::File {
            file_hash: file_hash.into(),
            doc_id: doc_id.into(),
        }
    }
}

/// Format the scope claim for a resource and authorization level.
pub fn compute_scope(resource: &Resource, authorization: Authorization) -> String {
    let perm = authorization.permission();
    match resource {
        Resource::Document { doc_id } => format!("doc:{doc_id}:{perm}"),
        Resource::File { file_hash, doc_id } => format!("file:{file_hash}:{doc_id}:{perm}"),
    }
}
