//! Reels publishing and post insights.

use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::Rng;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use catclip_models::{
    AccountId, EngagementCounts, GeneratedVideo, InstagramAccount, PerformanceRecord, PostId, VideoId,
};

use crate::config::InstagramConfig;
use crate::error::{InstagramError, InstagramResult};

pub const CAPTIONS: [&str; 8] = [
    "this is fine",
    "pov: you're a cat in 2024",
    "no thoughts, head empty",
    "main character energy",
    "it's giving existential crisis",
    "mood: unbothered",
    "cats really said 'make it make sense'",
    "this but unironically",
];

const INSIGHT_FIELDS: &str = "like_count,comments_count,shares_count,play_count";

/// Pick a caption at random.
pub fn pick_caption() -> &'static str {
    CAPTIONS.choose(&mut rand::rng()).copied().unwrap_or(CAPTIONS[0])
}

/// Placeholder id used when a test-account post fails.
pub fn mock_post_id() -> PostId {
    PostId::from_string(format!("mock_post_{}", Utc::now().timestamp()))
}

/// A video published (or stood in for) on one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    pub post_id: PostId,
    pub account_id: AccountId,
    pub video_id: VideoId,
    /// Placeholder for a failed post; no insights exist for it
    pub mock: bool,
}

#[derive(Debug, Serialize)]
struct MediaContainerRequest<'a> {
    video_url: &'a str,
    media_type: &'static str,
    caption: &'a str,
}

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    creation_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: Option<String>,
}

/// Insight counters for a media object. Absent fields count as zero.
#[derive(Debug, Default, Deserialize)]
struct MediaInsights {
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    comments_count: u64,
    #[serde(default)]
    shares_count: u64,
    #[serde(default)]
    play_count: u64,
}

impl From<MediaInsights> for EngagementCounts {
    fn from(m: MediaInsights) -> Self {
        EngagementCounts::new(m.like_count, m.comments_count, m.shares_count, m.play_count)
    }
}

/// Placeholder record for a post whose insights could not be read.
fn synthetic_record(post_id: &str, account_id: &AccountId) -> PerformanceRecord {
    let mut rng = rand::rng();
    let counts = EngagementCounts::new(
        rng.random_range(0..100),
        rng.random_range(0..20),
        rng.random_range(0..10),
        rng.random_range(0..1000),
    );
    let rate = rng.random::<f64>() * 0.1;

    PerformanceRecord::with_rate(post_id, account_id.clone(), counts, rate, Utc::now()).synthetic()
}

async fn read_id(response: Response, what: &str) -> InstagramResult<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(InstagramError::from_http_status(status.as_u16(), body));
    }

    let parsed: IdResponse = response.json().await?;
    parsed
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| InstagramError::invalid_response(format!("no {} id in response", what)))
}

/// Publishes videos to the configured accounts and reads back their insights.
pub struct InstagramPoster {
    http: Client,
    config: InstagramConfig,
    accounts: Vec<InstagramAccount>,
}

impl InstagramPoster {
    pub fn new(accounts: Vec<InstagramAccount>, config: InstagramConfig) -> InstagramResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(InstagramError::Network)?;

        Ok(Self {
            http,
            config,
            accounts,
        })
    }

    pub fn accounts(&self) -> &[InstagramAccount] {
        &self.accounts
    }

    pub fn account(&self, account_id: &AccountId) -> Option<&InstagramAccount> {
        self.accounts.iter().find(|a| &a.id == account_id)
    }

    /// Create a Reels container for the video and publish it.
    pub async fn post_to_account(&self, video: &GeneratedVideo, account: &InstagramAccount) -> InstagramResult<PostId> {
        info!(video_id = %video.id, "Posting video to @{}", account.username);

        let container = MediaContainerRequest {
            video_url: &video.video_url,
            media_type: "REELS",
            caption: pick_caption(),
        };

        let response = self
            .http
            .post(self.config.endpoint(&format!("{}/media", account.id)))
            .bearer_auth(&account.access_token)
            .json(&container)
            .send()
            .await?;
        let creation_id = read_id(response, "media container").await?;
        debug!(creation_id = %creation_id, account = %account.username, "Media container created");

        let response = self
            .http
            .post(self.config.endpoint(&format!("{}/media_publish", account.id)))
            .bearer_auth(&account.access_token)
            .json(&PublishRequest {
                creation_id: &creation_id,
            })
            .send()
            .await?;
        let post_id = read_id(response, "post").await?;

        info!(post_id = %post_id, "Published to @{}", account.username);
        Ok(PostId::from_string(post_id))
    }

    /// Post the video to every active test account.
    ///
    /// A failed post is logged and replaced by a mock post so the run can
    /// continue with the remaining accounts.
    pub async fn post_to_test_accounts(&self, video: &GeneratedVideo) -> Vec<PublishedPost> {
        let mut posts = Vec::new();

        for account in self.accounts.iter().filter(|a| a.is_test_account()) {
            let post = match self.post_to_account(video, account).await {
                Ok(post_id) => PublishedPost {
                    post_id,
                    account_id: account.id.clone(),
                    video_id: video.id.clone(),
                    mock: false,
                },
                Err(e) => {
                    warn!("Failed to post to @{}: {}", account.username, e);
                    PublishedPost {
                        post_id: mock_post_id(),
                        account_id: account.id.clone(),
                        video_id: video.id.clone(),
                        mock: true,
                    }
                }
            };
            posts.push(post);
        }

        posts
    }

    /// Post the video to the active main account, if there is one.
    pub async fn post_to_main_account(&self, video: &GeneratedVideo) -> InstagramResult<Option<PublishedPost>> {
        let Some(account) = self.accounts.iter().find(|a| a.is_postable_main()) else {
            warn!(video_id = %video.id, "No active main account configured");
            return Ok(None);
        };

        let post_id = self.post_to_account(video, account).await?;
        Ok(Some(PublishedPost {
            post_id,
            account_id: account.id.clone(),
            video_id: video.id.clone(),
            mock: false,
        }))
    }

    /// Read like, comment, share and play counts for a post.
    ///
    /// When the Graph API answers with a non-success status the record is
    /// filled with random placeholder numbers and marked synthetic.
    pub async fn fetch_performance(
        &self,
        post_id: &PostId,
        account_id: &AccountId,
    ) -> InstagramResult<PerformanceRecord> {
        let account = self
            .account(account_id)
            .ok_or_else(|| InstagramError::account_not_found(account_id.as_str()))?;

        let response = self
            .http
            .get(self.config.endpoint(post_id.as_str()))
            .query(&[
                ("fields", INSIGHT_FIELDS),
                ("access_token", account.access_token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                post_id = %post_id,
                status = status.as_u16(),
                "Insights unavailable, using synthetic metrics"
            );
            return Ok(synthetic_record(post_id.as_str(), account_id));
        }

        let insights: MediaInsights = response
            .json()
            .await
            .map_err(|e| InstagramError::invalid_response(format!("failed to decode insights: {}", e)))?;

        let record = PerformanceRecord::new(post_id.clone(), account_id.clone(), insights.into(), Utc::now());
        debug!(
            post_id = %post_id,
            views = record.views,
            rate = record.engagement_rate,
            "Fetched insights"
        );
        Ok(record)
    }
}
