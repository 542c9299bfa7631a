//! Weekly digest: fetch headlines, render, and fan out to subscribers.
//!
//! One failed recipient never aborts the run; the report counts what went
//! out and what bounced.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    mailer::Mailer,
    news::{Article, NewsClient},
    store::Store,
};

/// How many headlines go into each digest.
pub const DIGEST_ARTICLE_COUNT: usize = 5;

const SUBJECT: &str = "Weekly Newsletter - Latest News Updates!";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
}

pub struct Dispatcher {
    store: Store,
    news: NewsClient,
    mailer: Arc<dyn Mailer>,
    public_base_url: String,
    run_lock: Mutex<()>,
}

impl Dispatcher {
    pub fn new(
        store: Store,
        news: NewsClient,
        mailer: Arc<dyn Mailer>,
        public_base_url: String,
    ) -> Self {
        Self {
            store,
            news,
            mailer,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            run_lock: Mutex::new(()),
        }
    }

    /// One newsletter run. If a previous run is still in flight the tick is
    /// skipped rather than queued behind it.
    pub async fn run_once(&self) -> DispatchReport {
        let Ok(_guard) = self.run_lock.try_lock() else {
            warn!("newsletter run still in flight, skipping this tick");
            return DispatchReport::default();
        };
        self.dispatch().await
    }

    async fn dispatch(&self) -> DispatchReport {
        let subscribers = match self.store.subscribers().await {
            Ok(subscribers) => subscribers,
            Err(e) => {
                error!("could not load subscribers: {e}");
                return DispatchReport::default();
            }
        };
        if subscribers.is_empty() {
            info!("no subscribers, skipping newsletter run");
            return DispatchReport::default();
        }

        let articles = match self.news.top_headlines().await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("headline fetch failed, skipping newsletter run: {e}");
                return DispatchReport::default();
            }
        };
        if articles.is_empty() {
            info!("no headlines available, skipping newsletter run");
            return DispatchReport::default();
        }

        let digest = &articles[..articles.len().min(DIGEST_ARTICLE_COUNT)];
        let text = render_text(digest);

        let mut report = DispatchReport::default();
        for subscriber in &subscribers {
            let html = render_html(digest, &self.public_base_url, &subscriber.email);
            match self
                .mailer
                .send(&subscriber.email, SUBJECT, &text, Some(&html))
                .await
            {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!(recipient = %subscriber.email, "newsletter send failed: {e}");
                    report.failed += 1;
                }
            }
        }

        info!(sent = report.sent, failed = report.failed, "newsletter run complete");
        report
    }
}

/// Run the dispatcher on a fixed interval until shutdown is signalled.
/// The first digest goes out one full interval after boot.
pub fn spawn(
    dispatcher: Arc<Dispatcher>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick of an interval completes immediately; swallow it.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    dispatcher.run_once().await;
                }
                _ = shutdown.changed() => {
                    info!("newsletter scheduler stopping");
                    break;
                }
            }
        }
    })
}

fn render_text(articles: &[Article]) -> String {
    let mut body = String::from("Weekly News Updates\n\nHere's your weekly news update!\n\n");
    for article in articles {
        body.push_str(article.title.as_deref().unwrap_or("Untitled"));
        body.push('\n');
        if let Some(description) = article.description.as_deref() {
            body.push_str(description);
            body.push('\n');
        }
        if let Some(url) = article.url.as_deref() {
            body.push_str(url);
            body.push('\n');
        }
        body.push('\n');
    }
    body
}

fn render_html(articles: &[Article], base_url: &str, recipient: &str) -> String {
    let mut body = String::from("<h1>Weekly News Updates</h1>\n<p>Here's your weekly news update!</p>\n");
    for article in articles {
        body.push_str("<p><strong>");
        body.push_str(article.title.as_deref().unwrap_or("Untitled"));
        body.push_str("</strong><br />");
        if let Some(description) = article.description.as_deref() {
            body.push_str(description);
            body.push_str("<br />");
        }
        if let Some(url) = article.url.as_deref() {
            body.push_str(&format!("<a href=\"{url}\">Read more</a>"));
        }
        body.push_str("</p>\n");
    }
    let unsubscribe = format!(
        "{}/api/newsletter/unsubscribe?email={}",
        base_url,
        urlencode(recipient)
    );
    body.push_str(&format!(
        "<hr />\n<p style=\"font-size: 12px;\">If you no longer wish to receive these emails, \
         <a href=\"{unsubscribe}\">click here to unsubscribe</a>.</p>"
    ));
    body
}

fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
