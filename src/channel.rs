use anyhow::Result;
use log::{debug, info};
use std::collections::HashMap;

use crate::language::{detect_or_default, LanguageDetector, DEFAULT_LANGUAGE};
use crate::youtube::VideoPlatform;

const HANDLE_PREFIX: char = '@';
const UNKNOWN_CHANNEL_TITLE: &str = "Unknown Channel";

/// Resolves a configured channel reference to a channel id.
///
/// Raw ids are returned as-is. Handles (`@name`) go through a channel search;
/// `Ok(None)` means the search found nothing.
pub async fn resolve_channel(
    platform: &dyn VideoPlatform,
    reference: &str,
) -> Result<Option<String>> {
    if !reference.starts_with(HANDLE_PREFIX) {
        return Ok(Some(reference.to_string()));
    }

    let resolved = platform.search_channel(reference).await?;
    match &resolved {
        Some(id) => debug!("resolved {} to {}", reference, id),
        None => debug!("no channel found for {}", reference),
    }
    Ok(resolved)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub title: String,
    /// Two-letter language code.
    pub lang: String,
}

/// Per-process cache of channel title and language.
///
/// Entries are never evicted: the first classification of a channel sticks.
#[derive(Debug, Default)]
pub struct ChannelInfoCache {
    entries: HashMap<String, ChannelInfo>,
}

impl ChannelInfoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub async fn get_channel_info(
        &mut self,
        platform: &dyn VideoPlatform,
        detector: &dyn LanguageDetector,
        channel_id: &str,
    ) -> Result<ChannelInfo> {
        if let Some(info) = self.entries.get(channel_id) {
            return Ok(info.clone());
        }

        let snippet = match platform.channel_snippet(channel_id).await? {
            Some(snippet) => snippet,
            // not cached so a later cycle can retry
            None => {
                return Ok(ChannelInfo {
                    title: UNKNOWN_CHANNEL_TITLE.to_string(),
                    lang: DEFAULT_LANGUAGE.to_string(),
                })
            }
        };

        let text = format!("{} {}", snippet.description, snippet.title);
        let info = ChannelInfo {
            lang: detect_or_default(detector, &text),
            title: snippet.title,
        };
        info!("{} is \"{}\" ({})", channel_id, info.title, info.lang);

        self.entries.insert(channel_id.to_string(), info.clone());
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::{ActivityItem, ChannelSnippet};
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubPlatform {
        snippet: Option<ChannelSnippet>,
        search_hit: Option<String>,
        fail_search: bool,
        snippet_calls: AtomicUsize,
    }

    #[async_trait]
    impl VideoPlatform for StubPlatform {
        async fn search_channel(&self, _handle: &str) -> Result<Option<String>> {
            if self.fail_search {
                bail!("quota exceeded");
            }
            Ok(self.search_hit.clone())
        }

        async fn channel_snippet(&self, _channel_id: &str) -> Result<Option<ChannelSnippet>> {
            self.snippet_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.snippet.clone())
        }

        async fn list_activities(&self, _channel_id: &str) -> Result<Vec<ActivityItem>> {
            Ok(Vec::new())
        }
    }

    struct FixedDetector(&'static str);

    impl LanguageDetector for FixedDetector {
        fn detect(&self, _text: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[derive(Default)]
    struct RecordingDetector {
        seen: Mutex<Vec<String>>,
    }

    impl LanguageDetector for RecordingDetector {
        fn detect(&self, text: &str) -> Option<String> {
            self.seen.lock().unwrap().push(text.to_string());
            Some("es".to_string())
        }
    }

    #[tokio::test]
    async fn raw_ids_skip_the_search() {
        let platform = StubPlatform {
            fail_search: true,
            ..Default::default()
        };

        let id = resolve_channel(&platform, "UC123").await.unwrap();

        assert_eq!(id.as_deref(), Some("UC123"));
    }

    #[tokio::test]
    async fn handles_are_searched() {
        let platform = StubPlatform {
            search_hit: Some("UC999".to_string()),
            ..Default::default()
        };

        assert_eq!(
            resolve_channel(&platform, "@someone").await.unwrap().as_deref(),
            Some("UC999")
        );
        assert!(resolve_channel(&StubPlatform::default(), "@nobody")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn search_errors_propagate() {
        let platform = StubPlatform {
            fail_search: true,
            ..Default::default()
        };

        assert!(resolve_channel(&platform, "@someone").await.is_err());
    }

    #[tokio::test]
    async fn info_is_cached_after_first_lookup() {
        let platform = StubPlatform {
            snippet: Some(ChannelSnippet {
                title: "Канал".to_string(),
                description: "описание".to_string(),
            }),
            ..Default::default()
        };
        let mut cache = ChannelInfoCache::new();

        let first = cache
            .get_channel_info(&platform, &FixedDetector("ru"), "UC1")
            .await
            .unwrap();
        let second = cache
            .get_channel_info(&platform, &FixedDetector("es"), "UC1")
            .await
            .unwrap();

        assert_eq!(first.lang, "ru");
        assert_eq!(first, second);
        assert_eq!(platform.snippet_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn detector_sees_description_then_title() {
        let platform = StubPlatform {
            snippet: Some(ChannelSnippet {
                title: "HolaSoyGerman".to_string(),
                description: "Videos de comedia".to_string(),
            }),
            ..Default::default()
        };
        let detector = RecordingDetector::default();
        let mut cache = ChannelInfoCache::new();

        let info = cache
            .get_channel_info(&platform, &detector, "UC1")
            .await
            .unwrap();

        assert_eq!(info.lang, "es");
        assert_eq!(
            detector.seen.lock().unwrap().as_slice(),
            ["Videos de comedia HolaSoyGerman".to_string()]
        );
    }

    #[tokio::test]
    async fn unknown_channel_is_not_cached() {
        let platform = StubPlatform::default();
        let mut cache = ChannelInfoCache::new();

        let info = cache
            .get_channel_info(&platform, &FixedDetector("ru"), "UCgone")
            .await
            .unwrap();

        assert_eq!(info.title, UNKNOWN_CHANNEL_TITLE);
        assert_eq!(info.lang, DEFAULT_LANGUAGE);
        assert_eq!(cache.len(), 0);
    }
}
