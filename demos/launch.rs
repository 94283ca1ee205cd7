use figure_eight_http::{ClientOptions, FigureEightClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api_key = std::env::var("FIGURE_EIGHT_API_KEY")?;
    let job_id = std::env::var("FIGURE_EIGHT_JOB_ID")?;

    let client = FigureEightClient::new(api_key)?.with_options(ClientOptions {
        retry_limit: 3,
        retry_timeout_ms: 10_000,
    });

    let copy = client.copy_job_without_rows(&job_id).await?;
    let copy_id = copy["id"].to_string();
    println!("copied job {job_id} to {copy_id}");

    client.set_job_title(&copy_id, "Sentiment, batch 2").await?;
    client.set_job_price_in_cents_per_page(&copy_id, 12).await?;
    client.add_tag_to_job(&copy_id, "batch-2").await?;
    client
        .upload_csv_to_job(&copy_id, "text\nI love it\nNot for me\n")
        .await?;

    let rows = client.job_rows(&copy_id, None).await?;
    let order = client.launch_job(&copy_id, rows.len() as u64).await?;
    println!("launched {} unit(s): {order}", rows.len());

    Ok(())
}
