use std::time::Instant;

use catclip_generation::{GenerationConfig, PromptGenerator, VideoGenerator};
use catclip_models::GeneratedVideo;

const CUSTOM_PROMPT: &str = "A sophisticated orange tabby cat wearing tiny reading glasses sits at a miniature \
wooden desk with a tiny laptop. The cat types furiously with one paw while occasionally glancing at the camera \
with a look that says 'I'm handling very important cat business here.' The cat sighs dramatically and adjusts its glasses.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _ = rustls::crypto::ring::default_provider().install_default();
    catclip_worker::init_tracing();

    let config = GenerationConfig::from_env()?;
    config.validate()?;

    println!("video-selfcheck: using video provider {}", config.provider);

    let prompts = PromptGenerator::from_config(&config)?;
    let videos = VideoGenerator::from_config(&config)?;

    let batch = prompts.generate_batch(3).await;
    println!("video-selfcheck: generated {} prompts", batch.len());
    for (i, prompt) in batch.iter().enumerate() {
        println!("  {}. [{}] {}", i + 1, prompt.theme, prompt.text);
    }

    if let Some(first) = batch.first() {
        println!("video-selfcheck: rendering first prompt");
        let started = Instant::now();
        match videos.generate_video(first).await {
            Ok(video) => report(&video, started),
            Err(e) => println!("video-selfcheck: video generation failed: {}", e),
        }
    }

    println!("video-selfcheck: rendering custom prompt");
    let started = Instant::now();
    match videos.test_generation(CUSTOM_PROMPT).await {
        Ok(video) => report(&video, started),
        Err(e) => println!("video-selfcheck: custom video generation failed: {}", e),
    }

    println!("video-selfcheck: done");
    Ok(())
}

fn report(video: &GeneratedVideo, started: Instant) {
    println!("  video id:        {}", video.id);
    println!("  video url:       {}", video.video_url);
    println!("  duration:        {}s", video.duration_secs);
    println!("  generation time: {:?}", started.elapsed());
}
