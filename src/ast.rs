//! Typed expression tree for the content repository's query language.

/// The object an expression starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root {
    /// `site`
    Site,
    /// `page`, the entity currently being projected
    Page,
    /// `file`, the file currently being projected in a nested images query
    File,
    /// Direct lookup of a single entity, `page("<id>")`
    Lookup(String),
}

/// A chain of steps applied to a root, e.g. `page.risks.toStructure().limit(3)`
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub root: Root,
    pub steps: Vec<Step>,
}

/// A single link in a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Plain property access: `.title`
    Field(Identifier),
    /// `.template('community')`
    Template(String),
    /// `.filterBy('status', 'listed')` or `.filterBy('alertDate', '>=', '...')`
    FilterBy {
        field: Identifier,
        op: Option<CompOp>,
        value: Literal,
    },
    /// `.sortBy('riskdate', 'desc')`
    SortBy {
        field: Identifier,
        direction: SortDirection,
    },
    /// `.limit(3)`
    Limit(usize),
    /// `.first()`
    First,
    /// Any other method call, e.g. `.toStructure()` or `.split(',')`
    Method { name: &'static str, args: Vec<Literal> },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier(s.to_string())
    }
}

/// Comparison operators accepted by `filterBy`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    Eq,    // ==
    NotEq, // !=
    Gt,    // >
    Lt,    // <
    Gte,   // >=
    Lte,   // <=
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(i64),
}

/// A complete expression as it appears in a query or a select value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Path(Path),
    /// `source.first() ? source.first().property : 'fallback'`
    ///
    /// Both halves are rendered from the same `source`, so the test and the
    /// projection always look at the same record.
    FirstOr {
        source: Path,
        property: Identifier,
        fallback: Literal,
    },
}

impl From<Path> for Expr {
    fn from(path: Path) -> Self {
        Expr::Path(path)
    }
}
