//! Fluent builders for resource and field-path expressions.

use crate::ast::{CompOp, Expr, Identifier, Literal, Path, Root, SortDirection, Step};

impl Path {
    pub fn new(root: Root) -> Self {
        Self {
            root,
            steps: Vec::new(),
        }
    }

    pub fn site() -> Self {
        Self::new(Root::Site)
    }

    pub fn page() -> Self {
        Self::new(Root::Page)
    }

    pub fn file() -> Self {
        Self::new(Root::File)
    }

    /// Direct lookup of one entity by id or URL path
    pub fn lookup(id: impl Into<String>) -> Self {
        Self::new(Root::Lookup(id.into()))
    }

    fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn field(self, name: &str) -> Self {
        self.step(Step::Field(Identifier::from(name)))
    }

    pub fn template(self, name: &str) -> Self {
        self.step(Step::Template(name.to_string()))
    }

    /// Equality filter: `filterBy('field', 'value')`
    pub fn filter_by(self, field: &str, value: impl Into<Literal>) -> Self {
        self.step(Step::FilterBy {
            field: Identifier::from(field),
            op: None,
            value: value.into(),
        })
    }

    /// Comparison filter: `filterBy('field', '>=', 'value')`
    pub fn filter_cmp(self, field: &str, op: CompOp, value: impl Into<Literal>) -> Self {
        self.step(Step::FilterBy {
            field: Identifier::from(field),
            op: Some(op),
            value: value.into(),
        })
    }

    pub fn sort_by(self, field: &str, direction: SortDirection) -> Self {
        self.step(Step::SortBy {
            field: Identifier::from(field),
            direction,
        })
    }

    pub fn limit(self, n: usize) -> Self {
        self.step(Step::Limit(n))
    }

    pub fn first(self) -> Self {
        self.step(Step::First)
    }

    pub fn to_structure(self) -> Self {
        self.method("toStructure", Vec::new())
    }

    pub fn to_array(self) -> Self {
        self.method("toArray", Vec::new())
    }

    pub fn yaml(self) -> Self {
        self.method("yaml", Vec::new())
    }

    pub fn split(self, separator: &str) -> Self {
        self.method("split", vec![Literal::from(separator)])
    }

    pub fn method(self, name: &'static str, args: Vec<Literal>) -> Self {
        self.step(Step::Method { name, args })
    }

    /// Conditional projection of the first matching record's property
    pub fn first_or(self, property: &str, fallback: impl Into<Literal>) -> Expr {
        Expr::FirstOr {
            source: self,
            property: Identifier::from(property),
            fallback: fallback.into(),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Number(n)
    }
}

/// A filtered view over a collection such as `site.children`.
///
/// Clauses are always emitted template first, then filters in insertion order,
/// then sort, then limit, regardless of the order the builder was called in.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionQuery {
    collection: Path,
    template: Option<String>,
    filters: Vec<Step>,
    sort: Option<(Identifier, SortDirection)>,
    limit: Option<usize>,
}

impl CollectionQuery {
    pub fn new(collection: Path) -> Self {
        Self {
            collection,
            template: None,
            filters: Vec::new(),
            sort: None,
            limit: None,
        }
    }

    /// `site.children`
    pub fn site_children() -> Self {
        Self::new(Path::site().field("children"))
    }

    pub fn template(mut self, name: &str) -> Self {
        self.template = Some(name.to_string());
        self
    }

    pub fn status(self, status: &str) -> Self {
        self.filter_by("status", status)
    }

    pub fn filter_by(mut self, field: &str, value: impl Into<Literal>) -> Self {
        self.filters.push(Step::FilterBy {
            field: Identifier::from(field),
            op: None,
            value: value.into(),
        });
        self
    }

    pub fn filter_cmp(mut self, field: &str, op: CompOp, value: impl Into<Literal>) -> Self {
        self.filters.push(Step::FilterBy {
            field: Identifier::from(field),
            op: Some(op),
            value: value.into(),
        });
        self
    }

    pub fn sort_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = Some((Identifier::from(field), direction));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn build(self) -> Path {
        let mut path = self.collection;
        if let Some(name) = self.template {
            path.steps.push(Step::Template(name));
        }
        path.steps.extend(self.filters);
        if let Some((field, direction)) = self.sort {
            path.steps.push(Step::SortBy { field, direction });
        }
        if let Some(n) = self.limit {
            path.steps.push(Step::Limit(n));
        }
        path
    }
}
