use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TitleUpdate<'a> {
    #[serde(rename = "job[title]")]
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PaymentUpdate {
    #[serde(rename = "job[payment_cents]")]
    pub payment_cents: u32,
}

#[derive(Debug, Serialize)]
pub struct LaunchOrder<'a> {
    #[serde(rename = "channels[0]")]
    pub channel: &'a str,
    #[serde(rename = "debit[units_count]")]
    pub units_count: u64,
}

#[derive(Debug, Serialize)]
pub struct PageQuery {
    pub page: u32,
}

#[derive(Debug, Serialize)]
pub struct TagQuery<'a> {
    pub tags: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TeamQuery<'a> {
    pub team_id: &'a str,
}

pub const FORCE: [(&str, &str); 1] = [("force", "true")];
pub const ALL_UNITS: [(&str, &str); 1] = [("all_units", "true")];
pub const JSON_EXPORT: [(&str, &str); 1] = [("type", "json")];
