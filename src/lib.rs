//! `figure-eight-http` is an async HTTP client for the Figure Eight
//! crowdsourcing API.
//!
//! The crate wraps the `/v1/jobs` endpoints with ergonomic methods:
//! - job setup: [`FigureEightClient::set_job_title`],
//!   [`FigureEightClient::set_job_price_in_cents_per_page`],
//!   [`FigureEightClient::copy_job`], [`FigureEightClient::add_tag_to_job`]
//! - data: [`FigureEightClient::upload_csv_to_job`],
//!   [`FigureEightClient::job_rows`]
//! - running: [`FigureEightClient::launch_job`] (retried)
//! - results: [`FigureEightClient::judgments`],
//!   [`FigureEightClient::json_results`] (retried)

mod client;
mod decode;
mod error;
mod options;
mod paging;
mod retry;
mod types;
mod wire;

pub use client::{format_endpoint, FigureEightClient, DEFAULT_CHANNEL, DEFAULT_ENDPOINT};
pub use error::FigureEightError;
pub use options::ClientOptions;
pub use types::JobRow;

pub type Result<T> = std::result::Result<T, FigureEightError>;
