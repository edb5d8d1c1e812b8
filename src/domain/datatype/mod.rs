use crate::base::resource_id;

use super::entity::catalog::AuthorId;

/// Criteria to select books from the catalog.
///
/// An empty `author_ids` list and an empty `search` text do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub author_ids: Vec<AuthorId>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

resource_id!(BookFilter, "catalog::BookFilter");

impl BookFilter {
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref().filter(|text| !text.is_empty())
    }
}
