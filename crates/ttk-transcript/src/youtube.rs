//! YouTube caption scraping engine (primary tier).
//!
//! Loads the public watch page, reads the `captionTracks` list embedded in
//! the player response, then downloads the timed-text XML of the preferred
//! track. No API key is involved, which also means YouTube may block us;
//! every failure is reported so the service can fall back.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use ttk_models::TranscriptSegment;

use crate::error::{FetchResult, TranscriptError};
use crate::provider::PrimaryTranscriptProvider;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const CAPTION_TRACKS_MARKER: &str = "\"captionTracks\":";

static TEXT_ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<text start="([^"]*)" dur="([^"]*)"[^>]*>(.*?)</text>"#)
        .expect("static timed-text pattern is valid")
});

static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(\d+);").expect("static entity pattern is valid"));

/// One entry of the player response `captionTracks` array.
#[derive(Debug, Clone, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode", default)]
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_english(&self) -> bool {
        self.language_code == "en" || self.language_code.starts_with("en-")
    }

    fn is_auto_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Caption scraping client.
pub struct YoutubeCaptionProvider {
    client: Client,
    base_url: String,
}

impl YoutubeCaptionProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_watch_page(&self, video_id: &str) -> FetchResult<String> {
        let url = format!("{}/watch", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("v", video_id)])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranscriptError::provider(format!(
                "Watch page returned {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }

    async fn fetch_timed_text(&self, track: &CaptionTrack) -> FetchResult<String> {
        let response = self
            .client
            .get(&track.base_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranscriptError::provider(format!(
                "Timed text returned {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PrimaryTranscriptProvider for YoutubeCaptionProvider {
    async fn fetch_by_video_id(&self, video_id: &str) -> FetchResult<Vec<TranscriptSegment>> {
        let html = self.fetch_watch_page(video_id).await?;
        let tracks = parse_caption_tracks(&html)?;
        let track = select_track(&tracks)
            .ok_or_else(|| TranscriptError::provider("No transcripts are available for this video"))?;

        debug!(
            video_id = %video_id,
            language = %track.language_code,
            auto_generated = track.is_auto_generated(),
            "Selected caption track"
        );

        let xml = self.fetch_timed_text(track).await?;
        Ok(parse_timed_text(&xml))
    }

    fn name(&self) -> &'static str {
        "youtube-captions"
    }
}

/// Extract the caption track list from a watch page.
fn parse_caption_tracks(html: &str) -> FetchResult<Vec<CaptionTrack>> {
    let Some(pos) = html.find(CAPTION_TRACKS_MARKER) else {
        if html.contains("class=\"g-recaptcha\"") {
            warn!("YouTube answered with a captcha page");
            return Err(TranscriptError::provider(
                "YouTube is receiving too many requests from this IP",
            ));
        }
        if html.contains("\"playabilityStatus\":{\"status\":\"ERROR\"") {
            return Err(TranscriptError::provider("The video is no longer available"));
        }
        return Err(TranscriptError::provider("Transcript is disabled on this video"));
    };

    let rest = &html[pos + CAPTION_TRACKS_MARKER.len()..];
    let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Vec<CaptionTrack>>();

    match stream.next() {
        Some(Ok(tracks)) => Ok(tracks),
        Some(Err(e)) => Err(TranscriptError::provider(format!(
            "Failed to parse caption tracks: {}",
            e
        ))),
        None => Err(TranscriptError::provider("Caption track list is empty")),
    }
}

/// Prefer manual English captions, then auto-generated English, then anything.
fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.is_english() && !t.is_auto_generated())
        .or_else(|| tracks.iter().find(|t| t.is_english()))
        .or_else(|| tracks.first())
}

/// Parse timed-text XML into ordered segments.
fn parse_timed_text(xml: &str) -> Vec<TranscriptSegment> {
    TEXT_ELEMENT_RE
        .captures_iter(xml)
        .map(|caps| {
            let offset = caps[1].parse().unwrap_or(0.0);
            let duration = caps[2].parse().unwrap_or(0.0);
            TranscriptSegment::new(decode_entities(&caps[3]), offset, duration)
        })
        .collect()
}

/// Decode the XML entities YouTube emits (including double-encoded ones).
fn decode_entities(text: &str) -> String {
    let text = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");

    NUMERIC_ENTITY_RE
        .replace_all(&text, |caps: &regex::Captures| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn watch_page(timedtext_url: &str) -> String {
        format!(
            r#"<html><script>var ytInitialPlayerResponse = {{"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":[{{"baseUrl":"{}","languageCode":"de"}},{{"baseUrl":"{}","languageCode":"en","kind":"asr"}}],"audioTracks":[]}}}}}};</script></html>"#,
            "https://example.invalid/de", timedtext_url
        )
    }

    #[test]
    fn test_parse_timed_text() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="1.2">Hello</text><text start="1.7" dur="2">it&amp;#39;s &lt;me&gt;</text></transcript>"#;
        let segments = parse_timed_text(xml);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], TranscriptSegment::new("Hello", 0.5, 1.2));
        assert_eq!(segments[1].text, "it's <me>");
        assert_eq!(segments[1].offset, 1.7);
    }

    #[test]
    fn test_parse_caption_tracks() {
        let tracks = parse_caption_tracks(&watch_page("https://example.invalid/en")).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].language_code, "en");
        assert!(tracks[1].is_auto_generated());
    }

    #[test]
    fn test_missing_caption_tracks() {
        let err = parse_caption_tracks("<html>no captions</html>").unwrap_err();
        assert!(err.to_string().contains("disabled"));

        let err = parse_caption_tracks(r#"<div class="g-recaptcha"></div>"#).unwrap_err();
        assert!(err.to_string().contains("too many requests"));
    }

    #[test]
    fn test_select_track_prefers_english() {
        let tracks = vec![
            CaptionTrack {
                base_url: "de".into(),
                language_code: "de".into(),
                kind: None,
            },
            CaptionTrack {
                base_url: "en-asr".into(),
                language_code: "en".into(),
                kind: Some("asr".into()),
            },
            CaptionTrack {
                base_url: "en-manual".into(),
                language_code: "en-GB".into(),
                kind: None,
            },
        ];
        assert_eq!(select_track(&tracks).unwrap().base_url, "en-manual");
        assert_eq!(select_track(&tracks[..2]).unwrap().base_url, "en-asr");
        assert_eq!(select_track(&tracks[..1]).unwrap().base_url, "de");
        assert!(select_track(&[]).is_none());
    }

    #[tokio::test]
    async fn test_fetch_by_video_id() {
        let server = MockServer::start().await;
        let timedtext_url = format!("{}/api/timedtext?v=dQw4w9WgXcQ&lang=en", server.uri());

        Mock::given(method("GET"))
            .and(path("/watch"))
            .and(query_param("v", "dQw4w9WgXcQ"))
            .respond_with(ResponseTemplate::new(200).set_body_string(watch_page(&timedtext_url)))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<transcript><text start="0" dur="1">Hello</text><text start="1" dur="1">World</text></transcript>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let provider = YoutubeCaptionProvider::new(Client::new(), server.uri());
        let segments = provider.fetch_by_video_id("dQw4w9WgXcQ").await.unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hello");
        assert_eq!(segments[1].text, "World");
    }

    #[tokio::test]
    async fn test_watch_page_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/watch"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let provider = YoutubeCaptionProvider::new(Client::new(), server.uri());
        let err = provider.fetch_by_video_id("dQw4w9WgXcQ").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }
}
