//! Instagram Graph API client.
//!
//! Publishes generated videos as Reels to test and main accounts and
//! reads post insights back as [`PerformanceRecord`](catclip_models::PerformanceRecord)s.

pub mod config;
pub mod error;
pub mod poster;

pub use config::InstagramConfig;
pub use error::{InstagramError, InstagramResult};
pub use poster::{InstagramPoster, PublishedPost, CAPTIONS};
