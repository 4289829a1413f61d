use log::{debug, error};

use crate::youtube::{ActivityItem, VideoPlatform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Upload,
    Live,
}

impl ActivityKind {
    /// Maps the API's `snippet.type`; every other kind is ignored.
    pub fn from_api(kind: &str) -> Option<Self> {
        match kind {
            "upload" => Some(ActivityKind::Upload),
            "live" => Some(ActivityKind::Live),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Upload => "upload",
            ActivityKind::Live => "live",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub kind: ActivityKind,
    pub title: String,
    /// RFC 3339 timestamp as sent by the API.
    pub published_at: String,
    /// Video id for uploads, live chat id for live sessions.
    pub media_id: Option<String>,
}

impl Activity {
    pub fn from_item(item: ActivityItem) -> Option<Self> {
        let kind = ActivityKind::from_api(&item.snippet.kind)?;

        let video_id = item.content_details.upload.and_then(|u| u.video_id);
        let live_chat_id = item
            .content_details
            .live_broadcast
            .and_then(|l| l.active_live_chat_id);
        let media_id = match kind {
            ActivityKind::Upload => video_id.or(live_chat_id),
            ActivityKind::Live => live_chat_id.or(video_id),
        };

        Some(Activity {
            kind,
            title: item.snippet.title,
            published_at: item.snippet.published_at,
            media_id,
        })
    }
}

/// Fetches the recent uploads and live sessions of a channel.
///
/// A failed request is logged and yields no activities for this cycle.
pub async fn get_activities(platform: &dyn VideoPlatform, channel_id: &str) -> Vec<Activity> {
    match platform.list_activities(channel_id).await {
        Ok(items) => {
            let total = items.len();
            let activities: Vec<Activity> =
                items.into_iter().filter_map(Activity::from_item).collect();
            debug!(
                "{}: kept {} of {} activities",
                channel_id,
                activities.len(),
                total
            );
            activities
        }
        Err(err) => {
            error!("YouTube API error for {}: {:#}", channel_id, err);
            Vec::new()
        }
    }
}
