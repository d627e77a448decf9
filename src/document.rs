//! Request documents sent to the query endpoint.

use crate::ast::{Expr, Path};
use crate::select::SelectTree;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One request body: `{"query": "...", "select": {...}}`
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDocument {
    pub query: Expr,
    pub select: Option<SelectTree>,
}

impl QueryDocument {
    /// A scalar or collection query without a selection
    pub fn scalar(query: impl Into<Expr>) -> Self {
        Self {
            query: query.into(),
            select: None,
        }
    }

    pub fn with_select(query: impl Into<Expr>, select: SelectTree) -> Self {
        Self {
            query: query.into(),
            select: Some(select),
        }
    }

    /// Single-entity document addressed by id, e.g. `page("communities/susya")`
    pub fn lookup(id: &str, select: SelectTree) -> Self {
        Self::with_select(Path::lookup(id), select)
    }

    pub fn query_text(&self) -> String {
        self.query.to_string()
    }
}

impl Serialize for QueryDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.select.is_some() { 2 } else { 1 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("query", &self.query_text())?;
        if let Some(select) = &self.select {
            map.serialize_entry("select", select)?;
        }
        map.end()
    }
}
