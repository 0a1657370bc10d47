#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use pharma_news::{DashboardError, PageSource, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Reference time shared by the pipeline tests.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
}

/// Serves feed documents and pages from memory and records every request.
///
/// A feed registered several times answers with each body in turn, then
/// keeps repeating the last one.
#[derive(Default)]
pub struct StaticSource {
    feeds: HashMap<String, Vec<String>>,
    pages: HashMap<String, String>,
    feed_requests: Mutex<Vec<String>>,
    page_requests: Mutex<Vec<String>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, body: impl Into<String>) -> Self {
        self.feeds.entry(url.to_string()).or_default().push(body.into());
        self
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn feed_calls(&self) -> usize {
        self.feed_requests.lock().unwrap().len()
    }

    pub fn page_requests(&self) -> Vec<String> {
        self.page_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for StaticSource {
    async fn fetch_feed(&self, url: &str) -> Result<Vec<u8>> {
        let previous = {
            let mut requests = self.feed_requests.lock().unwrap();
            let previous = requests.iter().filter(|requested| *requested == url).count();
            requests.push(url.to_string());
            previous
        };

        let bodies = self
            .feeds
            .get(url)
            .ok_or_else(|| DashboardError::General(format!("HTTP 404 Not Found: {}", url)))?;
        let body = &bodies[previous.min(bodies.len() - 1)];
        Ok(body.clone().into_bytes())
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.page_requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| DashboardError::General(format!("HTTP 404 Not Found: {}", url)))
    }
}

/// One `<item>` of an RSS 2.0 channel.
pub struct RssItem<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub description: Option<&'a str>,
    pub published: Option<DateTime<Utc>>,
}

impl<'a> RssItem<'a> {
    pub fn new(title: &'a str, link: &'a str) -> Self {
        Self {
            title,
            link,
            description: None,
            published: None,
        }
    }

    pub fn description(mut self, description: &'a str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn published(mut self, published: DateTime<Utc>) -> Self {
        self.published = Some(published);
        self
    }
}

pub fn rss_feed(items: &[RssItem<'_>]) -> String {
    let items: String = items
        .iter()
        .map(|item| {
            let mut xml = format!(
                "<item><title>{}</title><link>{}</link>",
                escape(item.title),
                escape(item.link)
            );
            if let Some(description) = item.description {
                xml.push_str(&format!("<description>{}</description>", escape(description)));
            }
            if let Some(published) = item.published {
                xml.push_str(&format!("<pubDate>{}</pubDate>", published.to_rfc2822()));
            }
            xml.push_str("</item>");
            xml
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
<title>Test Pharma Feed</title>
<link>https://news.example.com</link>
<description>Test feed</description>
{}
</channel>
</rss>"#,
        items
    )
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// How the local test server answers one path.
pub enum Route {
    /// 200 with a Content-Length header.
    Body(&'static str, String),
    /// 200 with a chunked body and no Content-Length.
    Chunked(String),
    /// Accept the request and never answer.
    Hang,
}

/// Minimal HTTP/1.1 server answering GET requests from a route table built
/// from its base URL. Unknown paths get a 404. Returns the base URL.
pub async fn serve<F>(routes: F) -> String
where
    F: FnOnce(&str) -> Vec<(&'static str, Route)>,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let routes = Arc::new(routes(&base));

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(answer(stream, Arc::clone(&routes)));
        }
    });

    base
}

async fn answer(mut stream: TcpStream, routes: Arc<Vec<(&'static str, Route)>>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

    let response = match routes.iter().find(|(route, _)| *route == path) {
        Some((_, Route::Body(content_type, body))) => format!(
            "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            content_type,
            body.len(),
            body
        ),
        Some((_, Route::Chunked(body))) => format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/rss+xml\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n{:x}\r\n{}\r\n0\r\n\r\n",
            body.len(),
            body
        ),
        Some((_, Route::Hang)) => {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            return;
        }
        None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
    };

    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
