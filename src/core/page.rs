//! core::page
//!
//! Page assembly: turning resolved declarations into a live
//! Tab → Column → Fieldset tree.
//!
//! # Lifecycle
//!
//! Resolved declarations are shared per configuration type. A
//! [`PageConfig`] is created per request (or edit session); it closes over
//! that request's [`PageContext`] and assembles its tree lazily, at most
//! once. Never share a `PageConfig` between requests for different records.
//!
//! # Errors
//!
//! Assembly fails fast on the first structural problem:
//! - a fieldset without exactly one of `fields`/`inline`
//! - a column naming an unknown fieldset, a tab naming an unknown column
//! - an explicit order list naming an entry that did not survive resolution
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use tabset::core::context::PageContext;
//! use tabset::core::entry::Sequencer;
//! use tabset::core::layer::LayerBuilder;
//! use tabset::core::page::PageConfig;
//! use tabset::core::resolve::ResolvedPageConfig;
//!
//! let mut seq = Sequencer::new();
//! let layer = LayerBuilder::new("Article", &mut seq)
//!     .fieldset("content", json!({"name": "Content", "fields": ["content"]}))
//!     .col("main_col", json!({"fieldsets": ["content"]}))
//!     .tab("main", json!({"name": "Main", "cols": ["main_col"]}))
//!     .build()
//!     .unwrap();
//!
//! let resolved = Arc::new(ResolvedPageConfig::resolve(&[&layer]));
//! let page = PageConfig::new("Article", resolved, PageContext::new());
//! let tree = page.tree().unwrap();
//! assert_eq!(tree.tabs().count(), 1);
//! ```

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::column::{Column, ColumnAttrs};
use super::context::PageContext;
use super::errors::PageError;
use super::fieldset::FieldsetDescriptor;
use super::project::{project, ProjectedFieldset};
use super::render::{render_tab, TabPlan};
use super::resolve::{ResolvedDeclarations, ResolvedPageConfig};
use super::tab::{Tab, TabAttrs};
use super::types::{Concern, EntryName};

/// The assembled, read-only page tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TabTree {
    tabs: Vec<Arc<Tab>>,
    cols: BTreeMap<EntryName, Arc<Column>>,
    fieldsets: BTreeMap<EntryName, Arc<FieldsetDescriptor>>,
}

impl TabTree {
    /// Tabs in resolution order.
    pub fn tabs(&self) -> impl Iterator<Item = &Arc<Tab>> {
        self.tabs.iter()
    }

    /// Look up a tab by entry name.
    pub fn tab(&self, key: &str) -> Option<&Arc<Tab>> {
        self.tabs.iter().find(|tab| tab.key.as_str() == key)
    }

    /// Look up a column by entry name.
    pub fn col(&self, key: &str) -> Option<&Arc<Column>> {
        self.cols.get(key)
    }

    /// Look up a fieldset by entry name.
    pub fn fieldset(&self, key: &str) -> Option<&Arc<FieldsetDescriptor>> {
        self.fieldsets.get(key)
    }
}

/// Fail if an explicit order list names an entry that is gone.
fn check_explicit_order(resolved: &ResolvedDeclarations) -> Result<(), PageError> {
    let Some(explicit) = resolved.explicit_order() else {
        return Ok(());
    };
    match explicit.iter().find(|name| !resolved.contains(name.as_str())) {
        Some(missing) => Err(PageError::UnknownEntry {
            concern: resolved.concern,
            name: missing.to_string(),
            referenced_by: resolved.concern.order_key().to_string(),
        }),
        None => Ok(()),
    }
}

/// Assemble a tab tree from resolved declarations.
///
/// # Errors
///
/// See the module documentation.
pub fn assemble(
    fieldsets: &ResolvedDeclarations,
    cols: &ResolvedDeclarations,
    tabs: &ResolvedDeclarations,
) -> Result<TabTree, PageError> {
    for resolved in [fieldsets, cols, tabs] {
        check_explicit_order(resolved)?;
    }

    let mut fieldset_map = BTreeMap::new();
    for entry in fieldsets.entries() {
        let descriptor = FieldsetDescriptor::from_entry(entry)?;
        fieldset_map.insert(entry.name.clone(), Arc::new(descriptor));
    }

    let mut col_map = BTreeMap::new();
    for entry in cols.entries() {
        let attrs = ColumnAttrs::parse(entry)?;
        let mut column = attrs.column(&entry.name);
        for name in &attrs.fieldsets {
            let fieldset =
                fieldset_map
                    .get(name)
                    .cloned()
                    .ok_or_else(|| PageError::UnknownEntry {
                        concern: Concern::Fieldsets,
                        name: name.to_string(),
                        referenced_by: format!("col '{}'", entry.name),
                    })?;
            column.add_fieldset(fieldset, None)?;
        }
        col_map.insert(entry.name.clone(), Arc::new(column));
    }

    let mut tab_list = Vec::with_capacity(tabs.len());
    for entry in tabs.iter() {
        let attrs = TabAttrs::parse(entry)?;
        let mut tab = attrs.tab(&entry.name);
        for name in &attrs.cols {
            let col = col_map
                .get(name)
                .cloned()
                .ok_or_else(|| PageError::UnknownEntry {
                    concern: Concern::Cols,
                    name: name.to_string(),
                    referenced_by: format!("tab '{}'", entry.name),
                })?;
            tab.add_col(col, None)?;
        }
        tab_list.push(Arc::new(tab));
    }

    debug!(
        tabs = tab_list.len(),
        cols = col_map.len(),
        fieldsets = fieldset_map.len(),
        "assembled page tree"
    );

    Ok(TabTree {
        tabs: tab_list,
        cols: col_map,
        fieldsets: fieldset_map,
    })
}

/// A request-scoped page configuration.
#[derive(Debug)]
pub struct PageConfig {
    type_name: String,
    resolved: Arc<ResolvedPageConfig>,
    context: PageContext,
    tree: OnceCell<TabTree>,
}

impl PageConfig {
    /// Bind resolved declarations to one request's context.
    pub fn new(
        type_name: impl Into<String>,
        resolved: Arc<ResolvedPageConfig>,
        context: PageContext,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            resolved,
            context,
            tree: OnceCell::new(),
        }
    }

    /// Name of the configuration type this page was built from.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    pub fn resolved(&self) -> &ResolvedPageConfig {
        &self.resolved
    }

    /// The assembled tree, built on first access.
    ///
    /// # Errors
    ///
    /// Returns the assembly error; a failed assembly is not cached.
    pub fn tree(&self) -> Result<&TabTree, PageError> {
        if let Some(tree) = self.tree.get() {
            return Ok(tree);
        }
        let tree = assemble(
            &self.resolved.fieldsets,
            &self.resolved.cols,
            &self.resolved.tabs,
        )?;
        Ok(self.tree.get_or_init(|| tree))
    }

    /// Tabs in order.
    pub fn tabs(&self) -> Result<impl Iterator<Item = &Arc<Tab>>, PageError> {
        Ok(self.tree()?.tabs())
    }

    /// Every plain fieldset of every column of every tab, in order.
    pub fn form_fieldsets(&self) -> Result<Vec<(String, ProjectedFieldset)>, PageError> {
        Ok(self
            .tree()?
            .tabs()
            .flat_map(|tab| tab.cols())
            .flat_map(|col| col.form_fieldsets())
            .collect())
    }

    /// Project the tree for the renderer, filtering inlines by this
    /// request's handles.
    pub fn project(
        &self,
        include_inline: bool,
    ) -> Result<Vec<(String, ProjectedFieldset)>, PageError> {
        Ok(project(self.tree()?, include_inline, &self.context))
    }

    /// Full rendering plan: every tab with its columns' sections.
    ///
    /// # Errors
    ///
    /// Assembly errors, or `MissingContext` without an active request.
    pub fn render_plan(&self) -> Result<Vec<TabPlan>, PageError> {
        self.tree()?
            .tabs()
            .map(|tab| render_tab(tab, &self.context))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::Sequencer;
    use crate::core::layer::{Layer, LayerBuilder};
    use serde_json::json;

    fn article_layer(seq: &mut Sequencer) -> Layer {
        LayerBuilder::new("Article", seq)
            .fieldset("titles", json!({"name": "Title & Subtitle", "fields": ["title", "subtitle"]}))
            .fieldset("content", json!({"name": "Content", "fields": ["content"]}))
            .fieldset("authors", json!({"name": "Authors", "inline": "ArticleToUserInline"}))
            .col("content_col", json!({"name": "Contenu", "fieldsets": ["content"], "css_classes": ["col1"]}))
            .col("titles_col", json!({"name": "Titles", "fieldsets": ["titles"], "css_id": "titles"}))
            .col("authors_col", json!({"fieldsets": ["authors"]}))
            .tab("main_tab", json!({"name": "Main", "cols": ["content_col", "titles_col"]}))
            .tab("secondary_tab", json!({"name": "Relations", "cols": ["authors_col"]}))
            .build()
            .unwrap()
    }

    fn page(layers: &[&Layer]) -> PageConfig {
        PageConfig::new(
            "Article",
            Arc::new(ResolvedPageConfig::resolve(layers)),
            PageContext::new(),
        )
    }

    #[test]
    fn assembles_tree_in_order() {
        let mut seq = Sequencer::new();
        let layer = article_layer(&mut seq);
        let page = page(&[&layer]);

        let tree = page.tree().unwrap();
        let tabs: Vec<&str> = tree.tabs().map(|t| t.name.as_str()).collect();
        assert_eq!(tabs, vec!["Main", "Relations"]);

        let main = tree.tab("main_tab").unwrap();
        let cols: Vec<&str> = main.cols().map(|c| c.name.as_str()).collect();
        assert_eq!(cols, vec!["Contenu", "Titles"]);

        let titles_col = tree.col("titles_col").unwrap();
        assert_eq!(titles_col.css_id.as_deref(), Some("titles"));
        assert!(titles_col.contains("titles"));

        assert_eq!(tree.col("authors_col").unwrap().name, "authors_col");
    }

    #[test]
    fn columns_share_fieldset_objects() {
        let mut seq = Sequencer::new();
        let layer = LayerBuilder::new("A", &mut seq)
            .fieldset("f", json!({"fields": ["x"]}))
            .col("c1", json!({"fieldsets": ["f"]}))
            .col("c2", json!({"fieldsets": ["f"]}))
            .build()
            .unwrap();
        let page = page(&[&layer]);
        let tree = page.tree().unwrap();

        let a = tree.col("c1").unwrap().fieldsets().next().unwrap();
        let b = tree.col("c2").unwrap().fieldsets().next().unwrap();
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn tree_is_cached_per_page() {
        let mut seq = Sequencer::new();
        let layer = article_layer(&mut seq);
        let page = page(&[&layer]);

        let first = page.tree().unwrap() as *const TabTree;
        let second = page.tree().unwrap() as *const TabTree;
        assert_eq!(first, second);
    }

    #[test]
    fn pages_do_not_share_trees() {
        let mut seq = Sequencer::new();
        let layer = article_layer(&mut seq);
        let resolved = Arc::new(ResolvedPageConfig::resolve(&[&layer]));

        let one = PageConfig::new("Article", Arc::clone(&resolved), PageContext::new());
        let two = PageConfig::new("Article", resolved, PageContext::new());

        assert!(!std::ptr::eq(one.tree().unwrap(), two.tree().unwrap()));
        assert_eq!(one.tree().unwrap(), two.tree().unwrap());
    }

    #[test]
    fn unknown_fieldset_in_column() {
        let mut seq = Sequencer::new();
        let layer = LayerBuilder::new("A", &mut seq)
            .col("c", json!({"fieldsets": ["ghost"]}))
            .build()
            .unwrap();

        let err = page(&[&layer]).tree().unwrap_err();
        assert_eq!(
            err,
            PageError::UnknownEntry {
                concern: Concern::Fieldsets,
                name: "ghost".to_string(),
                referenced_by: "col 'c'".to_string(),
            }
        );
    }

    #[test]
    fn unknown_col_in_tab() {
        let mut seq = Sequencer::new();
        let layer = LayerBuilder::new("A", &mut seq)
            .tab("t", json!({"cols": ["ghost"]}))
            .build()
            .unwrap();

        assert!(matches!(
            page(&[&layer]).tree(),
            Err(PageError::UnknownEntry {
                concern: Concern::Cols,
                ..
            })
        ));
    }

    #[test]
    fn removed_fieldset_still_referenced_fails() {
        let mut seq = Sequencer::new();
        let base = article_layer(&mut seq);
        let derived = LayerBuilder::new("NoTitles", &mut seq)
            .remove_fieldset("titles")
            .build()
            .unwrap();

        let err = page(&[&base, &derived]).tree().unwrap_err();
        assert!(matches!(err, PageError::UnknownEntry { ref name, .. } if name == "titles"));
    }

    #[test]
    fn explicit_order_naming_removed_tab_fails_at_assembly() {
        let mut seq = Sequencer::new();
        let base = LayerBuilder::new("A", &mut seq)
            .tab("a", json!({}))
            .tab("b", json!({}))
            .order(Concern::Tabs, &["b", "a"])
            .build()
            .unwrap();
        let derived = LayerBuilder::new("AB", &mut seq)
            .remove_tab("b")
            .build()
            .unwrap();

        let err = page(&[&base, &derived]).tree().unwrap_err();
        assert_eq!(
            err,
            PageError::UnknownEntry {
                concern: Concern::Tabs,
                name: "b".to_string(),
                referenced_by: "tabs_order".to_string(),
            }
        );
    }

    #[test]
    fn fieldset_left_out_of_order_list_is_still_built() {
        let mut seq = Sequencer::new();
        let layer = LayerBuilder::new("A", &mut seq)
            .fieldset("a", json!({"fields": ["x"]}))
            .fieldset("b", json!({"fields": ["y"]}))
            .order(Concern::Fieldsets, &["a"])
            .col("c", json!({"fieldsets": ["a", "b"]}))
            .col("d", json!({"fieldsets": ["b"]}))
            .order(Concern::Cols, &["c"])
            .tab("t", json!({"cols": ["c", "d"]}))
            .build()
            .unwrap();
        let page = page(&[&layer]);
        assert!(page.resolved().fieldsets.contains("b"));

        let tree = page.tree().unwrap();
        assert!(tree.fieldset("b").is_some());
        assert!(tree.col("c").unwrap().contains("b"));
        assert_eq!(tree.col("d").unwrap().len(), 1);
        assert_eq!(tree.tab("t").unwrap().len(), 2);
    }

    #[test]
    fn unlisted_invalid_fieldset_still_fails() {
        let mut seq = Sequencer::new();
        let layer = LayerBuilder::new("A", &mut seq)
            .fieldset("a", json!({"fields": ["x"]}))
            .fieldset("broken", json!({"name": "Broken"}))
            .order(Concern::Fieldsets, &["a"])
            .build()
            .unwrap();
        let page = page(&[&layer]);

        assert!(matches!(
            page.tree(),
            Err(PageError::InvalidFieldset { ref name, .. }) if name == "broken"
        ));
    }

    #[test]
    fn invalid_fieldset_fails() {
        let mut seq = Sequencer::new();
        let layer = LayerBuilder::new("A", &mut seq)
            .fieldset("bad", json!({"name": "Bad"}))
            .build()
            .unwrap();

        assert!(matches!(
            page(&[&layer]).tree(),
            Err(PageError::InvalidFieldset { .. })
        ));
    }

    #[test]
    fn disabled_tab_is_kept() {
        let mut seq = Sequencer::new();
        let layer = LayerBuilder::new("A", &mut seq)
            .tab("on", json!({}))
            .tab("off", json!({"enabled": false}))
            .build()
            .unwrap();

        let page = page(&[&layer]);
        let flags: Vec<bool> = page.tabs().unwrap().map(|t| t.enabled).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn form_fieldsets_skip_inlines() {
        let mut seq = Sequencer::new();
        let layer = article_layer(&mut seq);
        let page = page(&[&layer]);

        let names: Vec<String> = page
            .form_fieldsets()
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["Content", "Title & Subtitle"]);
    }

    #[test]
    fn project_drops_inlines_without_handle() {
        let mut seq = Sequencer::new();
        let layer = article_layer(&mut seq);
        let page = page(&[&layer]);

        let projected = page.project(true).unwrap();
        assert!(projected
            .iter()
            .all(|(_, p)| matches!(p, ProjectedFieldset::Fields { .. })));
    }
}
