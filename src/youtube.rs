use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ACTIVITY_PAGE_SIZE;

/// Read-only view of the video platform used by the poll loop.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Looks up a channel by handle and returns the id of the first match.
    async fn search_channel(&self, handle: &str) -> Result<Option<String>>;

    /// Fetches title and description of a channel, `None` if the id is unknown.
    async fn channel_snippet(&self, channel_id: &str) -> Result<Option<ChannelSnippet>>;

    /// Fetches the most recent activity entries of a channel, newest first.
    async fn list_activities(&self, channel_id: &str) -> Result<Vec<ActivityItem>>;
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: SearchResultId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultId {
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelResource {
    snippet: ChannelSnippet,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// One entry of `activities.list` as returned by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub snippet: ActivitySnippet,
    #[serde(default)]
    pub content_details: ContentDetails,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySnippet {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub published_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    pub upload: Option<UploadDetails>,
    pub live_broadcast: Option<LiveBroadcastDetails>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDetails {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBroadcastDetails {
    pub active_live_chat_id: Option<String>,
}

/// YouTube Data API v3 client authenticated with an API key.
pub struct YouTubeClient {
    http: reqwest::Client,
    api_key: String,
    /// Base URL of the API, overridable for local mocks.
    endpoint: String,
}

impl YouTubeClient {
    pub fn new(api_key: &str, endpoint: &str) -> Self {
        YouTubeClient {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.endpoint, resource);
        debug!("GET {} {:?}", url, params);

        let response: ListResponse<T> = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("{} request failed", resource))?
            .error_for_status()
            .with_context(|| format!("{} returned an error status", resource))?
            .json()
            .await
            .with_context(|| format!("{} returned an unexpected body", resource))?;

        Ok(response.items)
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn search_channel(&self, handle: &str) -> Result<Option<String>> {
        let results: Vec<SearchResult> = self
            .list(
                "search",
                &[
                    ("q", handle),
                    ("part", "id"),
                    ("type", "channel"),
                    ("maxResults", "1"),
                ],
            )
            .await?;

        Ok(results.into_iter().next().and_then(|r| r.id.channel_id))
    }

    async fn channel_snippet(&self, channel_id: &str) -> Result<Option<ChannelSnippet>> {
        let channels: Vec<ChannelResource> = self
            .list("channels", &[("part", "snippet"), ("id", channel_id)])
            .await?;

        Ok(channels.into_iter().next().map(|c| c.snippet))
    }

    async fn list_activities(&self, channel_id: &str) -> Result<Vec<ActivityItem>> {
        let max_results = ACTIVITY_PAGE_SIZE.to_string();
        let entries: Vec<serde_json::Value> = self
            .list(
                "activities",
                &[
                    ("part", "snippet,contentDetails"),
                    ("channelId", channel_id),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        // one malformed entry must not hide the rest of the page
        Ok(entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(err) => {
                    debug!("{}: dropping malformed activity: {}", channel_id, err);
                    None
                }
            })
            .collect())
    }
}
