use figure_eight_http::FigureEightClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api_key = std::env::var("FIGURE_EIGHT_API_KEY")?;
    let support_email = std::env::var("FIGURE_EIGHT_SUPPORT_EMAIL")?;
    let team_id = std::env::var("FIGURE_EIGHT_TEAM_ID").ok();

    let client = FigureEightClient::new(api_key)?;

    let jobs = client
        .find_jobs_by_support_email(&support_email, team_id.as_deref())
        .await?;

    for job in jobs {
        let job_id = job["id"].to_string();
        let judgments = client.judgments(&job_id).await?;
        let results = client.json_results(&job_id).await?;
        println!(
            "job {job_id}: {} judgment(s), {} result row(s)",
            judgments.len(),
            results.len()
        );
    }

    Ok(())
}
