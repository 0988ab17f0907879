//! Display-ready view of an analysis result.

use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{AnalyzeResponse, Material, Tool, VideoRef};
use crate::questions::humanize;

/// Thumbnail host convention for YouTube videos.
const THUMBNAIL_URL: &str = "https://img.youtube.com/vi/{id}/mqdefault.jpg";

#[allow(clippy::expect_used)]
static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("youtube id pattern is valid")
});

/// Extract the 11-character video id from a YouTube link.
pub fn youtube_video_id(url: &str) -> Option<&str> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn youtube_thumbnail(url: &str) -> Option<String> {
    youtube_video_id(url).map(|id| THUMBNAIL_URL.replace("{id}", id))
}

/// One bar in the likelihood chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LikelihoodEntry {
    pub label: String,
    /// Whole percent in [0, 100]
    pub value: u8,
}

/// Humanized labels with rounded percentages, highest first.
pub fn format_likelihood(likelihood: &BTreeMap<String, f64>) -> Vec<LikelihoodEntry> {
    let mut entries: Vec<LikelihoodEntry> = likelihood
        .iter()
        .map(|(category, ratio)| {
            let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
            LikelihoodEntry {
                label: humanize(category),
                value: (ratio * 100.0).round() as u8,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries
}

/// `"$12.98 at Home Depot"`, only when both parts are known.
pub fn price_line(price: Option<&str>, store: Option<&str>) -> Option<String> {
    match (price, store) {
        (Some(price), Some(store)) if !price.is_empty() && !store.is_empty() => {
            Some(format!("{} at {}", price, store))
        }
        _ => None,
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialCard {
    pub name: String,
    pub description: Option<String>,
    pub spec: Option<String>,
    pub qty: Option<String>,
    pub alternatives: Vec<String>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
    pub price: Option<String>,
}

impl From<&Material> for MaterialCard {
    fn from(m: &Material) -> Self {
        Self {
            name: m.name.clone(),
            description: non_empty(&m.description),
            spec: non_empty(&m.spec),
            qty: non_empty(&m.qty),
            alternatives: m.alt.clone(),
            image_url: non_empty(&m.image_url),
            product_url: non_empty(&m.product_url),
            price: price_line(m.store_price.as_deref(), m.store_name.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCard {
    pub name: String,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
    pub price: Option<String>,
}

impl From<&Tool> for ToolCard {
    fn from(t: &Tool) -> Self {
        Self {
            name: t.name.clone(),
            description: non_empty(&t.description),
            purpose: non_empty(&t.purpose),
            image_url: non_empty(&t.image_url),
            product_url: non_empty(&t.product_url),
            price: price_line(t.store_price.as_deref(), t.store_name.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoCard {
    pub url: String,
    pub title: String,
    pub channel: Option<String>,
    pub views: Option<String>,
    pub duration: Option<String>,
    /// `None` falls back to a placeholder
    pub thumbnail: Option<String>,
}

impl From<&VideoRef> for VideoCard {
    fn from(v: &VideoRef) -> Self {
        Self {
            url: v.url.clone(),
            title: v.title.clone(),
            channel: non_empty(&v.channel),
            views: non_empty(&v.views),
            duration: non_empty(&v.duration),
            thumbnail: youtube_thumbnail(&v.url),
        }
    }
}

/// Everything the result page shows, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub ticket_id: i64,
    pub materials: Vec<MaterialCard>,
    pub tools: Vec<ToolCard>,
    pub steps: Vec<String>,
    pub likelihood: Vec<LikelihoodEntry>,
    pub safety: Vec<String>,
    pub videos: Vec<VideoCard>,
}

impl ResultView {
    pub fn new(response: &AnalyzeResponse) -> Self {
        let result = &response.result;

        // The video list wins over the legacy single link.
        let videos = match result.youtube_videos.as_deref() {
            Some(list) if !list.is_empty() => list.iter().map(VideoCard::from).collect(),
            _ => result
                .youtube_url
                .iter()
                .filter(|url| !url.trim().is_empty())
                .map(|url| VideoCard {
                    url: url.clone(),
                    title: "Video Tutorial".to_string(),
                    channel: None,
                    views: None,
                    duration: None,
                    thumbnail: youtube_thumbnail(url),
                })
                .collect(),
        };

        Self {
            ticket_id: response.ticket_id,
            materials: result.materials.iter().map(MaterialCard::from).collect(),
            tools: result.tools.iter().map(ToolCard::from).collect(),
            steps: result.steps.clone(),
            likelihood: result
                .likelihood
                .as_ref()
                .map(format_likelihood)
                .unwrap_or_default(),
            safety: result.safety.clone().unwrap_or_default(),
            videos,
        }
    }

    pub fn video_heading(&self) -> &'static str {
        if self.videos.len() > 1 {
            "Video Tutorials"
        } else {
            "Video Tutorial"
        }
    }

    /// Every image the page would display.
    pub fn image_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        urls.extend(self.materials.iter().filter_map(|m| m.image_url.clone()));
        urls.extend(self.tools.iter().filter_map(|t| t.image_url.clone()));
        urls.extend(self.videos.iter().filter_map(|v| v.thumbnail.clone()));
        urls.sort();
        urls.dedup();
        urls
    }

    /// Hide images known to be broken; the rest of each card stays.
    pub fn hide_images(&mut self, broken: &HashSet<String>) {
        let hide = |url: &mut Option<String>| {
            if url.as_ref().is_some_and(|u| broken.contains(u)) {
                *url = None;
            }
        };

        self.materials.iter_mut().for_each(|m| hide(&mut m.image_url));
        self.tools.iter_mut().for_each(|t| hide(&mut t.image_url));
        self.videos.iter_mut().for_each(|v| hide(&mut v.thumbnail));
    }
}
