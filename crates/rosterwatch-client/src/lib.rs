//! # rosterwatch-client
//!
//! Remote side of rosterwatch:
//!
//! - [`WebApiClient`]: the presence web API over HTTP (vanity resolution,
//!   roster listing, batched presence)
//! - [`HttpAvatarSource`]: avatar image downloads
//! - [`PresenceFetcher`]: splits large id sets into service-sized batches

pub mod avatar;
pub mod client;
pub mod fetcher;
pub mod models;

pub use avatar::HttpAvatarSource;
pub use client::WebApiClient;
pub use fetcher::PresenceFetcher;
