//! Field-selection trees and the per-entity composer.

use crate::ast::{CompOp, Expr, Path, SortDirection};
use crate::config::{HistoryField, ProductProfile, RiskField};
use crate::window::Cutoff;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// What to project for one output key
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// A field-path expression, sent as a string
    Expr(Expr),
    /// `true`: pass the underlying field through unchanged
    PassThrough,
    /// A related collection with its own selection
    Nested { query: Expr, select: SelectTree },
}

/// Ordered mapping from output key to selection. Keys are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectTree {
    entries: Vec<(String, Selection)>,
}

impl SelectTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`. A replaced key keeps its original position.
    pub fn insert(&mut self, key: &str, selection: Selection) {
        match self.entries.iter_mut().find(|(k, _)| k.as_str() == key) {
            Some(entry) => entry.1 = selection,
            None => self.entries.push((key.to_string(), selection)),
        }
    }

    pub fn expr(mut self, key: &str, expr: impl Into<Expr>) -> Self {
        self.insert(key, Selection::Expr(expr.into()));
        self
    }

    pub fn pass_through(mut self, key: &str) -> Self {
        self.insert(key, Selection::PassThrough);
        self
    }

    pub fn nested(mut self, key: &str, query: impl Into<Expr>, select: SelectTree) -> Self {
        self.insert(
            key,
            Selection::Nested {
                query: query.into(),
                select,
            },
        );
        self
    }

    pub fn get(&self, key: &str) -> Option<&Selection> {
        self.entries.iter().find(|(k, _)| k.as_str() == key).map(|(_, s)| s)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Selection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selection::Expr(expr) => serializer.serialize_str(&expr.to_string()),
            Selection::PassThrough => serializer.serialize_bool(true),
            Selection::Nested { query, select } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("query", &query.to_string())?;
                map.serialize_entry("select", select)?;
                map.end()
            }
        }
    }
}

impl Serialize for SelectTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, selection) in &self.entries {
            map.serialize_entry(key, selection)?;
        }
        map.end()
    }
}

/// Builds the select tree for each entity kind under one product profile
#[derive(Debug, Clone)]
pub struct SelectComposer<'a> {
    profile: &'a ProductProfile,
}

impl<'a> SelectComposer<'a> {
    pub fn new(profile: &'a ProductProfile) -> Self {
        Self { profile }
    }

    pub fn community_list(&self, cutoff: &Cutoff) -> SelectTree {
        let mut tree = SelectTree::new()
            .expr("id", Path::page().field("id"))
            .expr("title", Path::page().field("title"));
        if self.profile.alternative_title {
            tree = tree.expr("alternativeTitle", Path::page().field("alternativeTitle"));
        }
        let (risk_key, risk) = self.risk(Some(self.profile.recent_risk_limit));
        let [last_date, last_text] = last_alert(cutoff);
        tree.expr(risk_key, risk)
            .expr("alternativeNames", comma_list("alternativeNames"))
            .expr("coordinates", Path::page().field("coordinates").yaml())
            .expr("lastAlertDate", last_date)
            .expr("lastAlertText", last_text)
    }

    pub fn community_detail(&self) -> SelectTree {
        let mut tree = SelectTree::new()
            .expr("id", Path::page().field("id"))
            .expr("title", Path::page().field("title"));
        if self.profile.alternative_title {
            tree = tree.expr("alternativeTitle", Path::page().field("alternativeTitle"));
        }
        let (risk_key, risk) = self.risk(None);
        let history = self.profile.history_field.as_str();
        tree = tree
            .expr(risk_key, risk)
            .expr("alternativeNames", comma_list("alternativeNames"))
            .expr("coordinates", Path::page().field("coordinates").yaml())
            .expr("tags", comma_list("tags"))
            .expr(history, Path::page().field(history))
            .expr("keyfacts", Path::page().field("keyfacts").to_structure())
            .expr(
                "alerts",
                Path::page()
                    .field("alerts")
                    .to_structure()
                    .sort_by("alertDate", SortDirection::Desc),
            )
            .expr("protection", Path::page().field("protection"))
            .expr("access", Path::page().field("access"))
            .expr("threat", Path::page().field("threat"))
            .expr("safety", Path::page().field("safety"))
            .nested("images", Path::page().field("images"), self.image_select())
            .expr("governmentMoneySpent", Path::page().field("governmentMoneySpent"))
            .expr(
                "donorFunding",
                Path::page()
                    .field("grantsList")
                    .to_structure()
                    .sort_by("fundingDate", SortDirection::Asc),
            );
        if self.profile.extended_facts {
            tree = tree
                .expr("population", Path::page().field("population"))
                .expr("yearEstablished", Path::page().field("yearEstablished"))
                .expr("mainThreat", Path::page().field("mainThreat"))
                .expr("isBedouin", Path::page().field("isBedouin"));
        }
        tree
    }

    pub fn settlement_list(&self) -> SelectTree {
        SelectTree::new()
            .expr("id", Path::page().field("id"))
            .expr("title", Path::page().field("title"))
            .expr("year", Path::page().field("year"))
            .expr("size", Path::page().field("size"))
            .expr("alternativeNames", comma_list("alternativeNames"))
            .expr("coordinates", Path::page().field("coordinates").yaml())
    }

    pub fn settlement_detail(&self) -> SelectTree {
        SelectTree::new()
            .expr("id", Path::page().field("id"))
            .expr("title", Path::page().field("title"))
            .expr("alternativeNames", comma_list("alternativeNames"))
            .expr("coordinates", Path::page().field("coordinates").yaml())
            .expr("tags", comma_list("tags"))
    }

    pub fn custom_page(&self) -> SelectTree {
        SelectTree::new()
            .expr("id", Path::page().field("id"))
            .expr("title", Path::page().field("title"))
            .expr("content", Path::page().field("content"))
    }

    fn image_select(&self) -> SelectTree {
        let tree = SelectTree::new()
            .pass_through("url")
            .expr("alt", Path::file().field("alt"));
        if self.profile.image_metadata {
            tree.expr("caption", Path::file().field("caption"))
                .expr("copyright", Path::file().field("copyright"))
        } else {
            tree
        }
    }

    /// Risk key and expression, newest entries first when structured
    fn risk(&self, limit: Option<usize>) -> (&'static str, Path) {
        match self.profile.risk_field {
            RiskField::Risk => ("risk", Path::page().field("risk")),
            RiskField::Risks => {
                let risks = Path::page()
                    .field("risks")
                    .to_structure()
                    .sort_by("riskdate", SortDirection::Desc);
                match limit {
                    Some(n) => ("risks", risks.limit(n)),
                    None => ("risks", risks),
                }
            }
        }
    }
}

/// `lastAlertDate` and `lastAlertText` for the newest alert on or after `cutoff`.
///
/// Both expressions share one source path so they always describe the same alert.
pub fn last_alert(cutoff: &Cutoff) -> [Expr; 2] {
    let newest = Path::page()
        .field("alerts")
        .to_structure()
        .filter_cmp("alertDate", CompOp::Gte, cutoff.to_string())
        .sort_by("alertDate", SortDirection::Desc);
    [
        newest.clone().first_or("alertDate", ""),
        newest.first_or("alertDescription", ""),
    ]
}

fn comma_list(field: &str) -> Path {
    Path::page().field(field).split(",")
}
