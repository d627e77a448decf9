use anyhow::{bail, Context, Result};
use content_dispatcher::views::{self, ContentViews};
use content_dispatcher::{
    Clock, DispatcherConfig, HttpDispatcher, QueryDocument, RollingWindow, SystemClock,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "content_dispatcher.json";

const HELP: &str = "\
commands:
  show <view> [arg]   print the query document without sending it
  run <view> [arg]    send the query and print the response
  help                this text
  quit                leave

views:
  risk-colors | alert-range | slides | site-title
  communities [months]   (show only: alert range to assume, default 0)
  community <id> | settlements | settlement <id> | page <id>";

fn build_document(config: &DispatcherConfig, view: &str, arg: Option<&str>) -> Result<QueryDocument> {
    let profile = &config.profile;
    let need_id = || arg.context("this view needs an id");
    let doc = match view {
        "risk-colors" => views::risk_colors_document(),
        "alert-range" => views::alert_range_document(),
        "slides" => views::slides_document(),
        "site-title" => views::site_title_document(),
        "communities" => {
            let amount = arg.map(str::parse::<u32>).transpose()?.unwrap_or(0);
            let cutoff = RollingWindow::new(amount, profile.alert_unit).cutoff(SystemClock.now())?;
            views::communities_document(profile, &cutoff)
        }
        "community" => views::community_document(profile, need_id()?),
        "settlements" => views::settlements_document(profile),
        "settlement" => views::settlement_document(profile, need_id()?),
        "page" => views::custom_page_document(profile, need_id()?),
        other => bail!("unknown view `{other}`"),
    };
    Ok(doc)
}

async fn run_view(views: &ContentViews<HttpDispatcher>, view: &str, arg: Option<&str>) -> Result<Value> {
    let need_id = || arg.context("this view needs an id");
    let value = match view {
        "risk-colors" => views.risk_colors().await?,
        "alert-range" => views.alert_range().await?,
        "slides" => views.slides().await?,
        "site-title" => views.site_title().await?,
        "communities" => views.communities().await?,
        "community" => views.community(need_id()?).await?,
        "settlements" => views.settlements().await?,
        "settlement" => views.settlement(need_id()?).await?,
        "page" => views.custom_page(need_id()?).await?,
        other => bail!("unknown view `{other}`"),
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("--- Content Dispatcher ---");
    let config = DispatcherConfig::load_or_default(CONFIG_FILE);
    println!("endpoint: {}", config.endpoint());
    let views = ContentViews::new(HttpDispatcher::new(&config), config.profile.clone());

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("query> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        editor.add_history_entry(line)?;

        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let view = words.next().unwrap_or_default();
        let arg = words.next();

        let outcome = match command {
            "quit" | "exit" => break,
            "help" => {
                println!("{HELP}");
                continue;
            }
            "show" => build_document(&config, view, arg)
                .and_then(|doc| Ok(serde_json::to_string_pretty(&doc)?)),
            "run" => run_view(&views, view, arg)
                .await
                .and_then(|value| Ok(serde_json::to_string_pretty(&value)?)),
            other => Err(anyhow::anyhow!("unknown command `{other}`, try `help`")),
        };

        match outcome {
            Ok(text) => println!("{text}"),
            Err(e) => println!("✗ {e:#}"),
        }
    }
    Ok(())
}
