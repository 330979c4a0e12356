//! core::context
//!
//! Request-scoped context supplied by the hosting admin.
//!
//! The host owns requests, records and permissions. It hands this crate a
//! [`PageContext`] describing the current request: who is asking, which
//! record is being edited, which fields are read-only for them, and which
//! embedded sub-forms they may see.
//!
//! # Example
//!
//! ```
//! use tabset::core::context::{InlineHandle, PageContext, RequestInfo};
//!
//! let ctx = PageContext::new()
//!     .with_request(RequestInfo::new("alice", "/admin/article/3/"))
//!     .with_object("3")
//!     .with_readonly_fields(["created_at"])
//!     .with_inline(InlineHandle::new("ArticleToUserInline", "admin/edit_inline/stacked.html"));
//!
//! assert!(ctx.inline("ArticleToUserInline").is_some());
//! assert!(ctx.inline("ArticleToCategoryInline").is_none());
//! assert!(ctx.is_readonly("created_at"));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// The active request, as far as rendering needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Authenticated user
    pub user: String,
    /// Request path
    pub path: String,
}

impl RequestInfo {
    pub fn new(user: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            path: path.into(),
        }
    }
}

/// A live embedded sub-form the current user is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineHandle {
    /// Type name fieldsets refer to through their `inline` attribute
    pub type_name: String,
    /// Template the renderer uses for this sub-form
    pub template: String,
}

impl InlineHandle {
    pub fn new(type_name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            template: template.into(),
        }
    }
}

/// Context for one request / edit session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// The active request, if any
    pub request: Option<RequestInfo>,
    /// Identifier of the record being edited (`None` when adding)
    pub object_id: Option<String>,
    readonly_fields: BTreeSet<String>,
    inlines: BTreeMap<String, InlineHandle>,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request(mut self, request: RequestInfo) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_object(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }

    pub fn with_readonly_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.readonly_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Register a sub-form handle, keyed by its type name.
    pub fn with_inline(mut self, handle: InlineHandle) -> Self {
        self.inlines.insert(handle.type_name.clone(), handle);
        self
    }

    /// Look up a sub-form handle by type name.
    pub fn inline(&self, type_name: &str) -> Option<&InlineHandle> {
        self.inlines.get(type_name)
    }

    pub fn is_readonly(&self, field: &str) -> bool {
        self.readonly_fields.contains(field)
    }

    /// The active request.
    pub fn request(&self) -> Option<&RequestInfo> {
        self.request.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context() {
        let ctx = PageContext::new();
        assert!(ctx.request().is_none());
        assert!(ctx.object_id.is_none());
        assert!(!ctx.is_readonly("anything"));
        assert!(ctx.inline("Any").is_none());
    }

    #[test]
    fn later_inline_replaces_earlier() {
        let ctx = PageContext::new()
            .with_inline(InlineHandle::new("Authors", "a.html"))
            .with_inline(InlineHandle::new("Authors", "b.html"));
        assert_eq!(ctx.inline("Authors").unwrap().template, "b.html");
    }

    #[test]
    fn readonly_fields_accumulate() {
        let ctx = PageContext::new()
            .with_readonly_fields(["created_at"])
            .with_readonly_fields(vec!["modified_at".to_string()]);
        assert!(ctx.is_readonly("created_at"));
        assert!(ctx.is_readonly("modified_at"));
    }
}
