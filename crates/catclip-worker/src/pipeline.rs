//! The content pipeline.
//!
//! One run generates prompts, renders a video per prompt, posts every video
//! to the test accounts, records their performance and promotes the videos
//! that outperform the history to the main account.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;

use catclip_analytics::PerformanceStore;
use catclip_generation::{GenerationConfig, GenerationError, PromptGenerator, VideoGenerator};
use catclip_instagram::{InstagramConfig, InstagramError, InstagramPoster, PublishedPost};
use catclip_models::{GeneratedVideo, PerformanceRecord, VideoPrompt};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::{stage, RunLogger};
use crate::metrics;
use crate::retry::{retry_async_when, RetryResult};

/// What one run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run_id: String,
    pub prompts: Vec<VideoPrompt>,
    pub videos: Vec<GeneratedVideo>,
    /// Test-account posts, mock placeholders included
    pub posts: Vec<PublishedPost>,
    /// Records appended to the store during this run
    pub records: Vec<PerformanceRecord>,
    /// Main-account posts
    pub promoted: Vec<PublishedPost>,
}

pub struct ContentPipeline {
    prompts: PromptGenerator,
    videos: VideoGenerator,
    poster: InstagramPoster,
    store: Arc<PerformanceStore>,
    config: WorkerConfig,
}

impl ContentPipeline {
    pub fn new(
        prompts: PromptGenerator,
        videos: VideoGenerator,
        poster: InstagramPoster,
        store: Arc<PerformanceStore>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            prompts,
            videos,
            poster,
            store,
            config,
        }
    }

    /// Build the vendor clients from configuration.
    pub fn from_config(
        generation: &GenerationConfig,
        instagram: InstagramConfig,
        store: Arc<PerformanceStore>,
        config: WorkerConfig,
    ) -> WorkerResult<Self> {
        if config.prompt_batch_size == 0 {
            return Err(WorkerError::config_error("PROMPT_BATCH_SIZE must be at least 1"));
        }

        let prompts = PromptGenerator::from_config(generation)?;
        let videos = VideoGenerator::from_config(generation)?;
        let poster = InstagramPoster::new(config.accounts.clone(), instagram)?;

        Ok(Self::new(prompts, videos, poster, store, config))
    }

    pub fn store(&self) -> &Arc<PerformanceStore> {
        &self.store
    }

    /// Execute one full run.
    pub async fn run_once(&self) -> PipelineReport {
        let logger = RunLogger::new();
        let span = logger.create_span();
        self.run(&logger).instrument(span).await
    }

    /// Run immediately and then every `interval` until `shutdown` resolves.
    /// A run in progress is allowed to finish.
    pub async fn run_every<F>(&self, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Pipeline loop stopping");
                    return;
                }
                _ = ticker.tick() => {
                    self.run_once().await;
                }
            }
        }
    }

    async fn run(&self, logger: &RunLogger) -> PipelineReport {
        logger.log_start(&format!(
            "batch of {} using {}",
            self.config.prompt_batch_size,
            self.videos.provider()
        ));
        metrics::record_run();

        // 1. Prompts
        let prompts = self.prompts.generate_batch(self.config.prompt_batch_size).await;
        metrics::record_prompts(prompts.len());
        for (i, prompt) in prompts.iter().enumerate() {
            logger.log_stage(stage::PROMPTS, &format!("{}. [{}] {}", i + 1, prompt.theme, prompt.text));
        }

        // 2. Videos
        let videos = self.render_videos(logger, &prompts).await;

        // 3. Test-account posts
        let mut posts = Vec::new();
        for video in &videos {
            let video_posts = self.poster.post_to_test_accounts(video).await;
            for post in &video_posts {
                metrics::record_post(post.mock);
            }
            logger.log_stage(
                stage::POSTING,
                &format!("Posted video {} to {} test accounts", video.id, video_posts.len()),
            );
            posts.extend(video_posts);
        }

        // 4. Insights
        if !self.config.insights_delay.is_zero() {
            logger.log_stage(
                stage::INSIGHTS,
                &format!("Waiting {:?} before reading insights", self.config.insights_delay),
            );
            tokio::time::sleep(self.config.insights_delay).await;
        }
        let tracked = self.collect_performance(logger, &posts).await;

        // 5. Promotion
        let promoted = self.promote(logger, &videos, &tracked).await;

        // 6. Summary
        let summary = self.store.summary();
        match serde_json::to_string(&summary) {
            Ok(json) => tracing::info!(
                run_id = %logger.run_id(),
                stage = stage::SUMMARY,
                summary = %json,
                "Analytics summary"
            ),
            Err(e) => logger.log_warning(stage::SUMMARY, &format!("Failed to serialize summary: {}", e)),
        }

        let records: Vec<PerformanceRecord> = tracked.into_iter().map(|(_, record)| record).collect();
        let report = PipelineReport {
            run_id: logger.run_id().to_string(),
            prompts,
            videos,
            posts,
            records,
            promoted,
        };

        logger.log_completion(&format!(
            "{} prompts, {} videos, {} posts, {} records, {} promoted",
            report.prompts.len(),
            report.videos.len(),
            report.posts.len(),
            report.records.len(),
            report.promoted.len()
        ));

        report
    }

    async fn render_videos(&self, logger: &RunLogger, prompts: &[VideoPrompt]) -> Vec<GeneratedVideo> {
        let provider = self.videos.provider();
        let mut videos = Vec::with_capacity(prompts.len());

        for prompt in prompts {
            let started = Instant::now();
            let result = retry_async_when(&self.config.video_retry, GenerationError::is_retryable, || {
                self.videos.generate_video(prompt)
            })
            .await;

            match result {
                RetryResult::Success(video) => {
                    metrics::record_video_generated(provider.as_str(), started.elapsed().as_secs_f64());
                    videos.push(video);
                }
                RetryResult::Failed { error, attempts } => {
                    metrics::record_video_failed(provider.as_str());
                    logger.log_warning(
                        stage::VIDEOS,
                        &format!(
                            "Skipping prompt {}: video generation failed after {} attempts: {}",
                            prompt.id, attempts, error
                        ),
                    );
                }
            }
        }

        logger.log_stage(stage::VIDEOS, &format!("Generated {} videos", videos.len()));
        videos
    }

    /// Fetch performance for every real post concurrently and append each
    /// record to the store. Returns the appended records with their posts.
    async fn collect_performance<'a>(
        &self,
        logger: &RunLogger,
        posts: &'a [PublishedPost],
    ) -> Vec<(&'a PublishedPost, PerformanceRecord)> {
        let real: Vec<&PublishedPost> = posts.iter().filter(|p| !p.mock).collect();

        let results = join_all(
            real.iter()
                .map(|post| self.poster.fetch_performance(&post.post_id, &post.account_id)),
        )
        .await;

        let mut tracked = Vec::with_capacity(real.len());
        for (post, result) in real.into_iter().zip(results) {
            match result {
                Ok(record) => {
                    metrics::record_appended(record.is_synthetic());
                    self.store.append(record.clone());
                    tracked.push((post, record));
                }
                Err(e) => logger.log_warning(
                    stage::INSIGHTS,
                    &format!("Skipping post {}: failed to fetch performance: {}", post.post_id, e),
                ),
            }
        }

        logger.log_stage(stage::INSIGHTS, &format!("Tracked {} posts", tracked.len()));
        tracked
    }

    /// Post each video whose records qualify to the main account.
    async fn promote(
        &self,
        logger: &RunLogger,
        videos: &[GeneratedVideo],
        tracked: &[(&PublishedPost, PerformanceRecord)],
    ) -> Vec<PublishedPost> {
        let mut promoted = Vec::new();

        for video in videos {
            let qualifies = tracked
                .iter()
                .filter(|(post, _)| post.video_id == video.id)
                .any(|(_, record)| self.store.should_promote(record));
            if !qualifies {
                continue;
            }

            logger.log_stage(stage::PROMOTION, &format!("Promoting video {} to main account", video.id));

            let result = retry_async_when(&self.config.promotion_retry, InstagramError::is_retryable, || {
                self.poster.post_to_main_account(video)
            })
            .await;

            match result {
                RetryResult::Success(Some(post)) => {
                    metrics::record_promotion();
                    promoted.push(post);
                }
                RetryResult::Success(None) => {
                    logger.log_warning(stage::PROMOTION, "No active main account, skipping promotion");
                }
                RetryResult::Failed { error, attempts } => logger.log_error(
                    stage::PROMOTION,
                    &format!("Promotion of {} failed after {} attempts: {}", video.id, attempts, error),
                ),
            }
        }

        promoted
    }
}
