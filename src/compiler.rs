//! Serializer that turns the expression tree into query-language text.

use crate::ast::{CompOp, Expr, Literal, Path, Root, SortDirection, Step};
use std::fmt::{self, Write};

/// Quote style used when rendering a string literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Single,
    Double,
}

impl Quote {
    fn as_char(self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
        }
    }
}

/// Compiles expressions to the textual form the remote repository expects
pub struct QueryCompiler {
    out: String,
}

impl QueryCompiler {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    /// Compile an expression into a fresh string
    pub fn compile(expr: &Expr) -> String {
        let mut compiler = Self::new();
        // Writing into a String cannot fail
        let _ = compiler.write_expr(expr);
        compiler.out
    }

    /// Compile a bare path
    pub fn compile_path(path: &Path) -> String {
        let mut compiler = Self::new();
        let _ = compiler.write_path(path);
        compiler.out
    }

    fn write_expr(&mut self, expr: &Expr) -> fmt::Result {
        match expr {
            Expr::Path(path) => self.write_path(path),
            Expr::FirstOr {
                source,
                property,
                fallback,
            } => {
                self.write_path(source)?;
                self.out.push_str(".first() ? ");
                self.write_path(source)?;
                write!(self.out, ".first().{} : ", property.0)?;
                self.write_literal(fallback, Quote::Single)
            }
        }
    }

    fn write_path(&mut self, path: &Path) -> fmt::Result {
        match &path.root {
            Root::Site => self.out.push_str("site"),
            Root::Page => self.out.push_str("page"),
            Root::File => self.out.push_str("file"),
            Root::Lookup(id) => {
                self.out.push_str("page(");
                self.write_quoted(id, Quote::Double);
                self.out.push(')');
            }
        }
        for step in &path.steps {
            self.out.push('.');
            self.write_step(step)?;
        }
        Ok(())
    }

    fn write_step(&mut self, step: &Step) -> fmt::Result {
        match step {
            Step::Field(name) => self.out.push_str(&name.0),
            Step::Template(name) => {
                self.out.push_str("template(");
                self.write_quoted(name, Quote::Single);
                self.out.push(')');
            }
            Step::FilterBy { field, op, value } => {
                self.out.push_str("filterBy(");
                self.write_quoted(&field.0, Quote::Single);
                if let Some(op) = op {
                    self.out.push_str(", ");
                    self.write_quoted(comp_op_symbol(*op), Quote::Single);
                }
                self.out.push_str(", ");
                self.write_literal(value, Quote::Single)?;
                self.out.push(')');
            }
            Step::SortBy { field, direction } => {
                self.out.push_str("sortBy(");
                self.write_quoted(&field.0, Quote::Single);
                self.out.push_str(", ");
                self.write_quoted(sort_direction_keyword(*direction), Quote::Single);
                self.out.push(')');
            }
            Step::Limit(n) => write!(self.out, "limit({})", n)?,
            Step::First => self.out.push_str("first()"),
            Step::Method { name, args } => {
                self.out.push_str(name);
                self.out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_literal(arg, Quote::Single)?;
                }
                self.out.push(')');
            }
        }
        Ok(())
    }

    fn write_literal(&mut self, literal: &Literal, quote: Quote) -> fmt::Result {
        match literal {
            Literal::String(s) => {
                self.write_quoted(s, quote);
                Ok(())
            }
            Literal::Number(n) => write!(self.out, "{}", n),
        }
    }

    /// Quote a string, escaping backslashes and the enclosing quote character
    fn write_quoted(&mut self, s: &str, quote: Quote) {
        let q = quote.as_char();
        self.out.push(q);
        for c in s.chars() {
            if c == q || c == '\\' {
                self.out.push('\\');
            }
            self.out.push(c);
        }
        self.out.push(q);
    }
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new()
    }
}

fn comp_op_symbol(op: CompOp) -> &'static str {
    match op {
        CompOp::Eq => "==",
        CompOp::NotEq => "!=",
        CompOp::Gt => ">",
        CompOp::Lt => "<",
        CompOp::Gte => ">=",
        CompOp::Lte => "<=",
    }
}

fn sort_direction_keyword(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "asc",
        SortDirection::Desc => "desc",
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&QueryCompiler::compile(self))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&QueryCompiler::compile_path(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Identifier;

    fn path(root: Root, steps: Vec<Step>) -> Path {
        Path { root, steps }
    }

    #[test]
    fn test_field_access() {
        let p = path(Root::Page, vec![Step::Field(Identifier::from("title"))]);
        assert_eq!(QueryCompiler::compile_path(&p), "page.title");
    }

    #[test]
    fn test_lookup_is_not_escaped_for_plain_ids() {
        let p = path(Root::Lookup("abc".to_string()), vec![]);
        assert_eq!(QueryCompiler::compile_path(&p), r#"page("abc")"#);

        let nested = path(Root::Lookup("communities/al-hadidiya".to_string()), vec![]);
        assert_eq!(
            QueryCompiler::compile_path(&nested),
            r#"page("communities/al-hadidiya")"#
        );
    }

    #[test]
    fn test_lookup_escapes_quotes() {
        let p = path(Root::Lookup(r#"a")+site("b"#.to_string()), vec![]);
        assert_eq!(
            QueryCompiler::compile_path(&p),
            r#"page("a\")+site(\"b")"#
        );
    }

    #[test]
    fn test_filter_with_and_without_operator() {
        let p = path(
            Root::Site,
            vec![
                Step::Field(Identifier::from("children")),
                Step::FilterBy {
                    field: Identifier::from("status"),
                    op: None,
                    value: Literal::String("listed".to_string()),
                },
                Step::FilterBy {
                    field: Identifier::from("year"),
                    op: Some(CompOp::Gte),
                    value: Literal::Number(1967),
                },
            ],
        );
        assert_eq!(
            QueryCompiler::compile_path(&p),
            "site.children.filterBy('status', 'listed').filterBy('year', '>=', 1967)"
        );
    }

    #[test]
    fn test_method_arguments() {
        let p = path(
            Root::Page,
            vec![
                Step::Field(Identifier::from("tags")),
                Step::Method {
                    name: "split",
                    args: vec![Literal::String(",".to_string())],
                },
            ],
        );
        assert_eq!(QueryCompiler::compile_path(&p), "page.tags.split(',')");
    }

    #[test]
    fn test_first_or() {
        let source = path(
            Root::Page,
            vec![
                Step::Field(Identifier::from("alerts")),
                Step::SortBy {
                    field: Identifier::from("alertDate"),
                    direction: SortDirection::Desc,
                },
            ],
        );
        let expr = Expr::FirstOr {
            source,
            property: Identifier::from("alertDate"),
            fallback: Literal::String(String::new()),
        };
        assert_eq!(
            expr.to_string(),
            "page.alerts.sortBy('alertDate', 'desc').first() ? \
             page.alerts.sortBy('alertDate', 'desc').first().alertDate : ''"
        );
    }

    #[test]
    fn test_single_quote_in_filter_value_is_escaped() {
        let p = path(
            Root::Site,
            vec![Step::FilterBy {
                field: Identifier::from("title"),
                op: None,
                value: Literal::String("Umm al-Khair's".to_string()),
            }],
        );
        assert_eq!(
            QueryCompiler::compile_path(&p),
            r"site.filterBy('title', 'Umm al-Khair\'s')"
        );
    }
}
