//! Client for the music-streaming catalog API (Spotify-compatible wire
//! format). Issues client-credentials tokens and caches the result until
//! shortly before expiry; catalog reads are plain bearer-token GETs.

use crate::config::CatalogConfig;
use anyhow::Result;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Safety margin subtracted from `expires_in` so a token is never used in
/// its final moments.
const TOKEN_EXPIRY_SLACK: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogImage {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CatalogAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub duration_ms: i64,
    #[serde(default)]
    pub track_number: i64,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogArtist {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TopTrackAlbum {
    #[serde(default)]
    images: Vec<CatalogImage>,
}

#[derive(Debug, Deserialize)]
struct TopTrackItem {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<CatalogArtist>,
    album: TopTrackAlbum,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct ItemsPage<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TopTracksPage {
    #[serde(default)]
    tracks: Vec<TopTrackItem>,
}

/// A top track flattened for the embedded player.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RadioTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub image: Option<String>,
    pub url: String,
}

pub struct CatalogClient {
    http: reqwest::Client,
    artist_id: String,
    market: String,
    token_url: String,
    api_base: String,
    client_id: String,
    client_secret: String,
    // Replaced wholesale on refresh; a concurrent double-fetch only costs
    // one extra token round trip.
    token: Mutex<Option<CachedToken>>,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            artist_id: config.artist_id.clone(),
            market: config.market.clone(),
            token_url: config.token_url.trim_end_matches('/').to_string(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client_id: config.client_id(),
            client_secret: config.client_secret(),
            token: Mutex::new(None),
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    async fn access_token(&self) -> Result<String> {
        {
            let cached = self.token.lock().await;
            if let Some(tok) = cached.as_ref() {
                if tok.is_fresh() {
                    return Ok(tok.access_token.clone());
                }
            }
        }

        let resp = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("catalog token endpoint returned {}", resp.status());
        }

        let body: TokenResponse = resp.json().await?;
        let expires_at = Instant::now()
            + Duration::from_secs(body.expires_in).saturating_sub(TOKEN_EXPIRY_SLACK);

        *self.token.lock().await = Some(CachedToken {
            access_token: body.access_token.clone(),
            expires_at,
        });

        Ok(body.access_token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let token = self.access_token().await?;
        let resp = self.http.get(url).bearer_auth(&token).send().await?;

        if !resp.status().is_success() {
            anyhow::bail!("catalog request {} returned {}", url, resp.status());
        }

        Ok(resp.json().await?)
    }

    /// Albums and singles of the configured artist, newest first as the
    /// catalog orders them.
    pub async fn artist_albums(&self) -> Result<Vec<CatalogAlbum>> {
        let url = format!(
            "{}/artists/{}/albums?include_groups=album,single&market={}&limit=20",
            self.api_base, self.artist_id, self.market
        );
        let page: ItemsPage<CatalogAlbum> = self.get_json(&url).await?;
        Ok(page.items)
    }

    pub async fn album_tracks(&self, album_id: &str) -> Result<Vec<CatalogTrack>> {
        let url = format!(
            "{}/albums/{}/tracks?limit=50&market={}",
            self.api_base, album_id, self.market
        );
        let page: ItemsPage<CatalogTrack> = self.get_json(&url).await?;
        Ok(page.items)
    }

    pub async fn artist_top_tracks(&self) -> Result<Vec<RadioTrack>> {
        let url = format!(
            "{}/artists/{}/top-tracks?market={}",
            self.api_base, self.artist_id, self.market
        );
        let page: TopTracksPage = self.get_json(&url).await?;

        Ok(page
            .tracks
            .into_iter()
            .map(|t| RadioTrack {
                id: t.id,
                name: t.name,
                artist: t
                    .artists
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                image: t.album.images.first().map(|i| i.url.clone()),
                url: t.external_urls.spotify.unwrap_or_default(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_token_expiry_boundary() {
        let fresh = CachedToken {
            access_token: "t".into(),
            expires_at: Instant::now() + Duration::from_secs(60),
        };
        assert!(fresh.is_fresh());

        let stale = CachedToken {
            access_token: "t".into(),
            expires_at: Instant::now() - Duration::from_secs(1),
        };
        assert!(!stale.is_fresh());
    }

    #[test]
    fn top_track_page_parses_and_flattens() {
        let body = serde_json::json!({
            "tracks": [{
                "id": "abc",
                "name": "Song",
                "artists": [{"name": "A"}, {"name": "B"}],
                "album": {"images": [{"url": "https://img/1"}]},
                "external_urls": {"spotify": "https://open/abc"}
            }]
        });
        let page: TopTracksPage = serde_json::from_value(body).unwrap();
        assert_eq!(page.tracks.len(), 1);
        assert_eq!(page.tracks[0].artists.len(), 2);
    }
}
