//! core::render
//!
//! Rendering plan handed to the external renderer.
//!
//! For every column the renderer emits one form section per fieldset, in
//! order. This module decides what goes into each section: plain
//! fieldsets carry their fields and the subset the current user cannot
//! edit, inlines carry the live handle's template. Markup is not produced
//! here.
//!
//! An active request is required. Rendering without one is a host wiring
//! mistake and is reported as `MissingContext`.

use serde::Serialize;
use tracing::debug;

use super::column::Column;
use super::context::PageContext;
use super::errors::PageError;
use super::fieldset::FieldsetContent;
use super::tab::Tab;

/// One form section of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Fieldset {
        name: String,
        fields: Vec<String>,
        readonly_fields: Vec<String>,
        css_classes: Vec<String>,
        description: Option<String>,
    },
    Inline {
        name: String,
        type_name: String,
        template: String,
    },
}

/// Rendering plan for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnPlan {
    pub name: String,
    pub css_id: Option<String>,
    pub css_classes: Vec<String>,
    pub sections: Vec<Section>,
}

/// Rendering plan for one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabPlan {
    pub name: String,
    pub enabled: bool,
    pub cols: Vec<ColumnPlan>,
}

/// Sections for one column.
///
/// # Errors
///
/// Returns `PageError::MissingContext` if `context` has no active request.
pub fn column_sections(column: &Column, context: &PageContext) -> Result<Vec<Section>, PageError> {
    if context.request().is_none() {
        return Err(PageError::MissingContext("request".to_string()));
    }

    let mut sections = Vec::with_capacity(column.len());
    for fieldset in column.fieldsets() {
        match &fieldset.content {
            FieldsetContent::Fields(fields) => sections.push(Section::Fieldset {
                name: fieldset.name.clone(),
                fields: fields.clone(),
                readonly_fields: fields
                    .iter()
                    .filter(|field| context.is_readonly(field))
                    .cloned()
                    .collect(),
                css_classes: fieldset.css_classes.clone(),
                description: fieldset.description.clone(),
            }),
            FieldsetContent::Inline(type_name) => match context.inline(type_name) {
                Some(handle) => sections.push(Section::Inline {
                    name: fieldset.name.clone(),
                    type_name: handle.type_name.clone(),
                    template: handle.template.clone(),
                }),
                None => {
                    debug!(fieldset = %fieldset.key, inline = %type_name, "no handle for inline, skipping");
                }
            },
        }
    }
    Ok(sections)
}

/// Plan for one column.
pub fn render_column(column: &Column, context: &PageContext) -> Result<ColumnPlan, PageError> {
    Ok(ColumnPlan {
        name: column.name.clone(),
        css_id: column.css_id.clone(),
        css_classes: column.css_classes.clone(),
        sections: column_sections(column, context)?,
    })
}

/// Plan for one tab. Disabled tabs are planned like any other.
pub fn render_tab(tab: &Tab, context: &PageContext) -> Result<TabPlan, PageError> {
    Ok(TabPlan {
        name: tab.name.clone(),
        enabled: tab.enabled,
        cols: tab
            .cols()
            .map(|col| render_column(col, context))
            .collect::<Result<_, _>>()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::{InlineHandle, RequestInfo};
    use crate::core::fieldset::FieldsetDescriptor;
    use crate::core::types::EntryName;
    use std::sync::Arc;

    fn column() -> Column {
        let mut col = Column::new(EntryName::new("misc").unwrap(), "Misc");
        col.add_fieldset(
            Arc::new(FieldsetDescriptor {
                key: EntryName::new("miscdata").unwrap(),
                name: "Dates & State".to_string(),
                content: FieldsetContent::Fields(vec![
                    "modified_at".into(),
                    "created_at".into(),
                    "is_online".into(),
                ]),
                css_classes: vec!["collapse".into()],
                description: Some("Timestamps".into()),
            }),
            None,
        )
        .unwrap();
        col.add_fieldset(
            Arc::new(FieldsetDescriptor {
                key: EntryName::new("authors").unwrap(),
                name: "Authors".to_string(),
                content: FieldsetContent::Inline("ArticleToUserInline".into()),
                css_classes: Vec::new(),
                description: None,
            }),
            None,
        )
        .unwrap();
        col
    }

    fn request() -> RequestInfo {
        RequestInfo::new("alice", "/admin/article/1/")
    }

    #[test]
    fn missing_request_is_an_error() {
        let err = column_sections(&column(), &PageContext::new()).unwrap_err();
        assert_eq!(err, PageError::MissingContext("request".to_string()));
    }

    #[test]
    fn readonly_fields_are_marked() {
        let ctx = PageContext::new()
            .with_request(request())
            .with_readonly_fields(["created_at", "modified_at"]);

        let sections = column_sections(&column(), &ctx).unwrap();
        assert_eq!(sections.len(), 1);
        match &sections[0] {
            Section::Fieldset {
                readonly_fields, ..
            } => assert_eq!(readonly_fields, &vec!["modified_at", "created_at"]),
            other => panic!("unexpected section {other:?}"),
        }
    }

    #[test]
    fn inline_rendered_with_handle() {
        let ctx = PageContext::new()
            .with_request(request())
            .with_inline(InlineHandle::new(
                "ArticleToUserInline",
                "admin/edit_inline/stacked.html",
            ));

        let sections = column_sections(&column(), &ctx).unwrap();
        assert_eq!(
            sections[1],
            Section::Inline {
                name: "Authors".into(),
                type_name: "ArticleToUserInline".into(),
                template: "admin/edit_inline/stacked.html".into(),
            }
        );
    }

    #[test]
    fn tab_plan_keeps_disabled_flag() {
        let mut tab = Tab::new(EntryName::new("rel").unwrap(), "Relations");
        tab.enabled = false;
        tab.add_col(Arc::new(column()), None).unwrap();

        let plan = render_tab(&tab, &PageContext::new().with_request(request())).unwrap();
        assert!(!plan.enabled);
        assert_eq!(plan.cols.len(), 1);
        assert_eq!(plan.cols[0].name, "Misc");
    }

    #[test]
    fn section_wire_shape() {
        let ctx = PageContext::new().with_request(request());
        let sections = column_sections(&column(), &ctx).unwrap();
        let json = serde_json::to_value(&sections).unwrap();
        assert_eq!(json[0]["kind"], "fieldset");
        assert_eq!(json[0]["description"], "Timestamps");
    }
}
