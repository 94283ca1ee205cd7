use std::fmt;
use std::ops::RangeInclusive;

use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
    decode::{
        decode_job_rows, decode_json, decode_json_lines_archive, has_support_email, redact_job,
    },
    paging::collect_pages,
    retry::RetryPolicy,
    wire::{
        LaunchOrder, PageQuery, PaymentUpdate, TagQuery, TeamQuery, TitleUpdate, ALL_UNITS,
        FORCE, JSON_EXPORT,
    },
    ClientOptions, FigureEightError, JobRow, Result,
};

/// Production endpoint template.
pub const DEFAULT_ENDPOINT: &str = "https://api.figure-eight.com/v1/{path}?key={api_key}";

/// Channel used by [`FigureEightClient::launch_job`].
pub const DEFAULT_CHANNEL: &str = "on_demand";

const SUCCESS: RangeInclusive<u16> = 200..=299;
const EXPORT_READY: RangeInclusive<u16> = 200..=302;

/// Substitutes `{path}` and `{api_key}` into an endpoint template.
///
/// Example: `("https://h/v1/{path}?key={api_key}", "jobs.json", "k")` →
/// `"https://h/v1/jobs.json?key=k"`
pub fn format_endpoint(template: &str, path: &str, api_key: &str) -> String {
    template
        .replace("{path}", path)
        .replace("{api_key}", api_key)
}

#[derive(Clone)]
/// HTTP client for the Figure Eight jobs API.
pub struct FigureEightClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    options: ClientOptions,
}

impl fmt::Debug for FigureEightClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FigureEightClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl FigureEightClient {
    /// Creates a client for the production endpoint.
    ///
    /// Fails with [`FigureEightError::Configuration`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Creates a client for a custom endpoint template.
    ///
    /// The template must contain `{path}` and `{api_key}` placeholders, e.g.
    /// `"http://localhost:8080/v1/{path}?key={api_key}"`. An empty template
    /// falls back to [`DEFAULT_ENDPOINT`].
    pub fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FigureEightError::Configuration(
                "api_key not valid: must not be empty".to_owned(),
            ));
        }

        let mut endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            endpoint = DEFAULT_ENDPOINT.to_owned();
        }

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
            options: ClientOptions::default(),
        })
    }

    /// Applies retry options used by [`launch_job`](Self::launch_job) and
    /// [`json_results`](Self::json_results).
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Sets the title of a job.
    pub async fn set_job_title(&self, job_id: &str, title: &str) -> Result<Value> {
        let path = format!("jobs/{job_id}.json");
        let request = self
            .request(Method::PUT, &path)
            .form(&TitleUpdate { title });
        self.send_json(request, &path).await
    }

    /// Sets the per-page payment of a job, in cents.
    pub async fn set_job_price_in_cents_per_page(
        &self,
        job_id: &str,
        price_in_cents: u32,
    ) -> Result<Value> {
        let path = format!("jobs/{job_id}.json");
        let request = self.request(Method::PUT, &path).form(&PaymentUpdate {
            payment_cents: price_in_cents,
        });
        self.send_json(request, &path).await
    }

    /// Lists the units of a job, one page at a time, until an empty page.
    ///
    /// `max_pages` caps the number of pages fetched; `None` reads them all.
    pub async fn job_rows(&self, job_id: &str, max_pages: Option<usize>) -> Result<Vec<JobRow>> {
        let path = format!("jobs/{job_id}/units.json");
        let path = path.as_str();
        collect_pages(max_pages, |page| async move {
            self.get_page::<Map<String, Value>>(path, page)
                .await
                .map(decode_job_rows)
        })
        .await
    }

    /// Lists the jobs of the account, one page at a time, until an empty page.
    ///
    /// With `exclude_instructions`, the `css`, `js`, `cml` and `instructions`
    /// fields are stripped from every job.
    pub async fn jobs(
        &self,
        exclude_instructions: bool,
        max_pages: Option<usize>,
    ) -> Result<Vec<Value>> {
        collect_pages(max_pages, |page| async move {
            let jobs = self.get_page::<Vec<Value>>("jobs.json", page).await;
            if exclude_instructions {
                jobs.map(|jobs| jobs.into_iter().map(redact_job).collect::<Vec<_>>())
            } else {
                jobs
            }
        })
        .await
    }

    /// Copies a job, with its units when `all_units` is set.
    pub async fn copy_job(&self, job_id: &str, all_units: bool) -> Result<Value> {
        let path = format!("jobs/{job_id}/copy.json");
        let mut request = self.request(Method::GET, &path);
        if all_units {
            request = request.query(&ALL_UNITS);
        }
        self.send_json(request, &path).await
    }

    /// Copies a job without its units.
    pub async fn copy_job_without_rows(&self, job_id: &str) -> Result<Value> {
        self.copy_job(job_id, false).await
    }

    /// Attaches a tag to a job.
    pub async fn add_tag_to_job(&self, job_id: &str, tag: &str) -> Result<Value> {
        let path = format!("jobs/{job_id}/tags");
        let request = self
            .request(Method::POST, &path)
            .query(&TagQuery { tags: tag });
        self.send_json(request, &path).await
    }

    /// Uploads CSV data to a job, overwriting existing units.
    pub async fn upload_csv_to_job(
        &self,
        job_id: &str,
        csv: impl Into<Vec<u8>>,
    ) -> Result<Value> {
        let path = format!("jobs/{job_id}/upload.json");
        let request = self
            .request(Method::PUT, &path)
            .query(&FORCE)
            .header(header::CONTENT_TYPE, "text/csv")
            .body(csv.into());
        self.send_json(request, &path).await
    }

    /// Orders `units_count` units on the [`DEFAULT_CHANNEL`].
    ///
    /// Retried per [`ClientOptions`].
    pub async fn launch_job(&self, job_id: &str, units_count: u64) -> Result<Value> {
        self.launch_job_on_channel(job_id, units_count, DEFAULT_CHANNEL)
            .await
    }

    /// Orders `units_count` units on the given channel.
    ///
    /// Every failed attempt waits `retry_timeout_ms` before the next one; after
    /// `retry_limit` retries the last error is returned wrapped in
    /// [`FigureEightError::RetryLimitExceeded`].
    pub async fn launch_job_on_channel(
        &self,
        job_id: &str,
        units_count: u64,
        channel: &str,
    ) -> Result<Value> {
        let path = format!("jobs/{job_id}/orders.json");
        let path = path.as_str();
        let order = LaunchOrder {
            channel,
            units_count,
        };
        RetryPolicy::from(&self.options)
            .run("launch job", || {
                let request = self.request(Method::POST, path).form(&order);
                self.send_json(request, path)
            })
            .await
    }

    /// Returns the jobs whose `support_email` equals `support_email`.
    ///
    /// Only the first page of `jobs.json` is inspected; `team_id` scopes the
    /// listing to one team.
    pub async fn find_jobs_by_support_email(
        &self,
        support_email: &str,
        team_id: Option<&str>,
    ) -> Result<Vec<Value>> {
        let path = "jobs.json";
        let mut request = self.request(Method::GET, path);
        if let Some(team_id) = team_id.filter(|team_id| !team_id.is_empty()) {
            request = request.query(&TeamQuery { team_id });
        }

        let jobs: Vec<Value> = self.send_json(request, path).await?;
        Ok(jobs
            .into_iter()
            .filter(|job| has_support_email(job, support_email))
            .collect())
    }

    /// Collects every judgment of a job across all pages.
    pub async fn judgments(&self, job_id: &str) -> Result<Vec<Value>> {
        let path = format!("jobs/{job_id}/judgments.json");
        let path = path.as_str();
        collect_pages(None, |page| async move {
            self.get_page::<Map<String, Value>>(path, page)
                .await
                .map(|judgments| {
                    judgments
                        .into_iter()
                        .map(|(_, judgment)| judgment)
                        .collect::<Vec<_>>()
                })
        })
        .await
    }

    /// Downloads the JSON result export of a job and parses its JSON lines.
    ///
    /// The export is requested twice: a readiness check that also accepts
    /// redirects, then the actual archive. Retried per [`ClientOptions`].
    pub async fn json_results(&self, job_id: &str) -> Result<Vec<Value>> {
        let path = format!("jobs/{job_id}.csv");
        let path = path.as_str();
        RetryPolicy::from(&self.options)
            .run("fetch json results", || self.fetch_json_results(path))
            .await
    }

    async fn fetch_json_results(&self, path: &str) -> Result<Vec<Value>> {
        let check = self.request(Method::GET, path).query(&JSON_EXPORT);
        self.send(check, path, EXPORT_READY).await?;

        let fetch = self.request(Method::GET, path).query(&JSON_EXPORT);
        let response = self.send(fetch, path, SUCCESS).await?;
        let archive = response.bytes().await.map_err(FigureEightError::Transport)?;
        decode_json_lines_archive(&archive)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        #[cfg(feature = "tracing")]
        tracing::debug!("{} {}", method, path);

        self.http
            .request(method, format_endpoint(&self.endpoint, path, &self.api_key))
    }

    async fn get_page<T: DeserializeOwned>(&self, path: &str, page: u32) -> Result<T> {
        let request = self
            .request(Method::GET, path)
            .query(&PageQuery { page });
        self.send_json(request, path).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T> {
        let response = self.send(request, path, SUCCESS).await?;
        let body = response.text().await.map_err(FigureEightError::Transport)?;
        decode_json(&body)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        path: &str,
        accepted: RangeInclusive<u16>,
    ) -> Result<Response> {
        let response = request.send().await.map_err(FigureEightError::Transport)?;
        let status = response.status();
        if !accepted.contains(&status.as_u16()) {
            return Err(FigureEightError::Request {
                status: status.as_u16(),
                path: path.to_owned(),
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }
        Ok(response)
    }
}
