use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::Serialize;

use crate::activity::{Activity, ActivityKind};
use crate::channel::ChannelInfo;
use crate::language::DEFAULT_LANGUAGE;
use crate::utilities::{escape_html, format_timestamp};

type TemplateSet = &'static [(&'static str, &'static str)];

/// Message templates per language, then per activity kind.
const LANGUAGE_TEMPLATES: &[(&str, TemplateSet)] = &[
    (
        "en",
        &[
            ("upload", "🎥 New video from {channel}!\n\n📌 {title}\n⏰ {time}\n🔗 {url}"),
            ("live", "🔴 {channel} is LIVE!\n\n📌 {title}\n👀 {url}"),
            ("default", "✨ New activity from {channel}!\n\n📌 {title}\n⏰ {time}\n🔗 {url}"),
        ],
    ),
    (
        "es",
        &[
            ("upload", "🎥 ¡Nuevo video de {channel}!\n\n📌 {title}\n⏰ {time}\n🔗 {url}"),
            ("live", "🔴 ¡{channel} está EN VIVO!\n\n📌 {title}\n👀 {url}"),
            ("default", "✨ Nueva actividad de {channel}!\n\n📌 {title}\n⏰ {time}\n🔗 {url}"),
        ],
    ),
    (
        "ru",
        &[
            ("upload", "🎥 Новое видео от {channel}!\n\n📌 {title}\n⏰ {time}\n🔗 {url}"),
            ("live", "🔴 {channel} в ЭФИРЕ!\n\n📌 {title}\n👀 {url}"),
            ("default", "✨ Новая активность от {channel}!\n\n📌 {title}\n⏰ {time}\n🔗 {url}"),
        ],
    ),
];

const DEFAULT_TEMPLATE_KEY: &str = "default";

fn template_set(lang: &str) -> TemplateSet {
    let find = |code: &str| {
        LANGUAGE_TEMPLATES
            .iter()
            .find(|(l, _)| *l == code)
            .map(|(_, set)| *set)
    };
    find(lang).or_else(|| find(DEFAULT_LANGUAGE)).unwrap_or(&[])
}

/// Picks the template for `kind` in `lang`, falling back to the default
/// language and then to the set's generic template.
pub fn lookup_template(lang: &str, kind: &str) -> &'static str {
    let set = template_set(lang);
    let find = |key: &str| set.iter().find(|(k, _)| *k == key).map(|(_, t)| *t);
    find(kind).or_else(|| find(DEFAULT_TEMPLATE_KEY)).unwrap_or("")
}

pub fn activity_url(kind: ActivityKind, media_id: &str) -> String {
    match kind {
        ActivityKind::Upload => format!("https://youtu.be/{}", media_id),
        ActivityKind::Live => format!("https://youtube.com/watch?v={}", media_id),
    }
}

/// Substitutes `{name}` placeholders in one pass; unknown ones are left alone.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let replaced = tail.find('}').and_then(|end| {
            let name = &tail[1..end];
            values
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v, end + 1))
        });
        match replaced {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Builds the localized notification text for an activity.
pub fn format_message(activity: &Activity, channel_info: &ChannelInfo) -> Result<String> {
    let template = lookup_template(&channel_info.lang, activity.kind.as_str());
    let time = format_timestamp(&activity.published_at)?;
    let url = activity_url(activity.kind, activity.media_id.as_deref().unwrap_or_default());
    let channel = escape_html(&channel_info.title);
    let title = escape_html(&activity.title);

    Ok(render(
        template,
        &[
            ("channel", channel.as_str()),
            ("title", title.as_str()),
            ("time", time.as_str()),
            ("url", url.as_str()),
        ],
    ))
}

/// Destination for formatted notifications.
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn send_notification(&self, message: &str) -> Result<()>;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Posts messages to one Telegram chat through the Bot API.
pub struct TelegramNotifier {
    http: reqwest::Client,
    chat_id: String,
    /// Full `sendMessage` URL, token included.
    send_url: String,
}

impl TelegramNotifier {
    pub fn new(token: &str, chat_id: &str, endpoint: &str) -> Self {
        TelegramNotifier {
            http: reqwest::Client::new(),
            chat_id: chat_id.to_string(),
            send_url: format!(
                "{}/bot{}/sendMessage",
                endpoint.trim_end_matches('/'),
                token
            ),
        }
    }
}

#[async_trait]
impl ChatSink for TelegramNotifier {
    async fn send_notification(&self, message: &str) -> Result<()> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text: message,
            parse_mode: "HTML",
        };

        self.http
            .post(&self.send_url)
            .json(&body)
            .send()
            .await
            .context("sendMessage request failed")?
            .error_for_status()
            .context("sendMessage was rejected")?;

        debug!("delivered message to chat {}", self.chat_id);
        Ok(())
    }
}
