//! core::project
//!
//! Rendering projection.
//!
//! Flattens columns into the `(name, options)` pairs the external renderer
//! consumes: `{fields, css_classes}` for plain fieldsets, `{inline}` for
//! embedded sub-forms.
//!
//! # Inline handling
//!
//! With `include_inline = false` every sub-form is skipped, which is the
//! view a form builder needs. With `include_inline = true` a sub-form is
//! emitted only when the context carries a live handle for it; a missing
//! handle means the user may not see that sub-form and it is skipped
//! silently.

use serde::Serialize;
use tracing::debug;

use super::column::Column;
use super::context::PageContext;
use super::fieldset::FieldsetContent;
use super::page::TabTree;

/// Renderer-facing options for one fieldset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProjectedFieldset {
    Fields {
        fields: Vec<String>,
        css_classes: Vec<String>,
    },
    Inline {
        inline: String,
    },
}

/// Project one column, without consulting any context.
pub fn project_column(column: &Column, include_inline: bool) -> Vec<(String, ProjectedFieldset)> {
    column
        .fieldsets()
        .filter_map(|fieldset| match &fieldset.content {
            FieldsetContent::Fields(fields) => Some((
                fieldset.name.clone(),
                ProjectedFieldset::Fields {
                    fields: fields.clone(),
                    css_classes: fieldset.css_classes.clone(),
                },
            )),
            FieldsetContent::Inline(inline) if include_inline => Some((
                fieldset.name.clone(),
                ProjectedFieldset::Inline {
                    inline: inline.clone(),
                },
            )),
            FieldsetContent::Inline(_) => None,
        })
        .collect()
}

/// Project a whole tab tree, tab by tab and column by column.
///
/// Inlines without a matching handle in `context` are dropped.
pub fn project(
    tree: &TabTree,
    include_inline: bool,
    context: &PageContext,
) -> Vec<(String, ProjectedFieldset)> {
    tree.tabs()
        .flat_map(|tab| tab.cols())
        .flat_map(|col| project_column(col, include_inline))
        .filter(|(name, options)| match options {
            ProjectedFieldset::Inline { inline } => {
                let visible = context.inline(inline).is_some();
                if !visible {
                    debug!(fieldset = %name, inline = %inline, "no handle for inline, skipping");
                }
                visible
            }
            ProjectedFieldset::Fields { .. } => true,
        })
        .collect()
}
