//! One entry point per product view.
//!
//! Every view builds a fresh [`QueryDocument`], sends it through the executor
//! and returns the parsed JSON untouched. `communities` first fetches the
//! alert range, since the "last alert" fields depend on it.

use crate::ast::Path;
use crate::config::ProductProfile;
use crate::dispatcher::QueryExecutor;
use crate::document::QueryDocument;
use crate::error::Result;
use crate::expression::CollectionQuery;
use crate::select::SelectComposer;
use crate::window::{Clock, Cutoff, RollingWindow, SystemClock};
use serde_json::Value;
use tracing::info;

pub fn risk_colors_document() -> QueryDocument {
    QueryDocument::scalar(Path::site().field("riskValues").to_structure().to_array())
}

pub fn alert_range_document() -> QueryDocument {
    QueryDocument::scalar(Path::site().field("alertRange"))
}

pub fn slides_document() -> QueryDocument {
    QueryDocument::scalar(Path::site().field("slides").to_structure())
}

pub fn site_title_document() -> QueryDocument {
    QueryDocument::scalar(Path::site().field("title"))
}

pub fn communities_document(profile: &ProductProfile, cutoff: &Cutoff) -> QueryDocument {
    let query = CollectionQuery::site_children()
        .template("community")
        .status("listed")
        .build();
    QueryDocument::with_select(query, SelectComposer::new(profile).community_list(cutoff))
}

pub fn community_document(profile: &ProductProfile, id: &str) -> QueryDocument {
    QueryDocument::lookup(id, SelectComposer::new(profile).community_detail())
}

pub fn settlements_document(profile: &ProductProfile) -> QueryDocument {
    let query = CollectionQuery::site_children()
        .template("settlement")
        .status("listed")
        .build();
    QueryDocument::with_select(query, SelectComposer::new(profile).settlement_list())
}

pub fn settlement_document(profile: &ProductProfile, id: &str) -> QueryDocument {
    QueryDocument::lookup(id, SelectComposer::new(profile).settlement_detail())
}

pub fn custom_page_document(profile: &ProductProfile, id: &str) -> QueryDocument {
    QueryDocument::lookup(id, SelectComposer::new(profile).custom_page())
}

/// Named views over one executor
pub struct ContentViews<E, C = SystemClock> {
    executor: E,
    profile: ProductProfile,
    clock: C,
}

impl<E: QueryExecutor> ContentViews<E, SystemClock> {
    pub fn new(executor: E, profile: ProductProfile) -> Self {
        Self::with_clock(executor, profile, SystemClock)
    }
}

impl<E: QueryExecutor, C: Clock> ContentViews<E, C> {
    pub fn with_clock(executor: E, profile: ProductProfile, clock: C) -> Self {
        Self {
            executor,
            profile,
            clock,
        }
    }

    pub async fn risk_colors(&self) -> Result<Value> {
        self.executor.execute(&risk_colors_document()).await
    }

    pub async fn alert_range(&self) -> Result<Value> {
        self.executor.execute(&alert_range_document()).await
    }

    pub async fn slides(&self) -> Result<Value> {
        self.executor.execute(&slides_document()).await
    }

    pub async fn site_title(&self) -> Result<Value> {
        self.executor.execute(&site_title_document()).await
    }

    /// Listed communities with their recent risks and last alert in the window
    pub async fn communities(&self) -> Result<Value> {
        let range = self.alert_range().await?;
        let window = RollingWindow::from_response(&range, self.profile.alert_unit);
        let cutoff = window.cutoff(self.clock.now())?;
        info!(
            amount = window.amount,
            unit = window.unit.as_str(),
            %cutoff,
            "alert window resolved"
        );
        let document = communities_document(&self.profile, &cutoff);
        self.executor.execute(&document).await
    }

    pub async fn community(&self, id: &str) -> Result<Value> {
        self.executor
            .execute(&community_document(&self.profile, id))
            .await
    }

    pub async fn settlements(&self) -> Result<Value> {
        self.executor
            .execute(&settlements_document(&self.profile))
            .await
    }

    pub async fn settlement(&self, id: &str) -> Result<Value> {
        self.executor
            .execute(&settlement_document(&self.profile, id))
            .await
    }

    pub async fn custom_page(&self, id: &str) -> Result<Value> {
        self.executor
            .execute(&custom_page_document(&self.profile, id))
            .await
    }
}
