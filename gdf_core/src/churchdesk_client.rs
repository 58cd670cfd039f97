//! This client fetches events from the ChurchDesk API and converts them into
//! service records.
//!
//! Every configured organization is queried independently; a failing
//! organization is logged and skipped so that the other organizations still
//! contribute their events to the bulletin.

use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::{Europe::Berlin, Tz};
use serde::Deserialize;

use crate::boyens::normalize_ws;
use crate::error::{GdfError, Result};
use crate::event::ServiceRecord;

static BASE_URL: &str = "https://api2.churchdesk.com/api/v3.0.0";
static ORGS_ENV_VAR: &str = "CHURCHDESK_ORGS";
static MAX_ITEMS_PER_PAGE: u32 = 100;

/// One event as delivered by `GET /events`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    /// ISO-8601 in UTC with a `Z` suffix.
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub contributor: Option<String>,
    #[serde(default)]
    pub parishes: Vec<Parish>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parish {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl Event {
    /// Start of the event converted to Europe/Berlin; `None` when the
    /// timestamp is absent or unparseable.
    pub fn start(&self) -> Option<DateTime<Tz>> {
        let raw = self.start_date.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|timestamp| timestamp.with_timezone(&Berlin))
    }

    /// The required fields this event is missing, for logging incomplete
    /// events before they degrade to empty output fields.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let empty = |value: &Option<String>| value.as_deref().unwrap_or("").is_empty();
        if empty(&self.title) {
            missing.push("title");
        }
        if empty(&self.start_date) {
            missing.push("startDate");
        }
        if empty(&self.location) && empty(&self.location_name) {
            missing.push("location");
        }
        if empty(&self.contributor) {
            missing.push("contributor");
        }
        if self.parishes.is_empty() {
            missing.push("parishes");
        }
        missing
    }
}

impl From<&Event> for ServiceRecord {
    fn from(event: &Event) -> Self {
        // locationName is preferred over location, the first parish title is
        // the fallback used when both are empty.
        let location = event
            .location_name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| event.location.clone())
            .unwrap_or_default();
        let parish = event
            .parishes
            .first()
            .map(|parish| parish.title.clone())
            .unwrap_or_default();
        ServiceRecord {
            start: event.start(),
            title: normalize_ws(event.title.as_deref().unwrap_or("")),
            location: normalize_ws(&location),
            contributor: normalize_ws(event.contributor.as_deref().unwrap_or("")),
            parish: normalize_ws(&parish),
        }
    }
}

/// One ChurchDesk organization with its partner token.
#[derive(Debug, Clone)]
pub struct Organization {
    pub id: u32,
    pub name: String,
    token: String,
}

impl Organization {
    pub fn new(id: u32, token: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            token: token.into(),
        }
    }

    /// Read the configured organizations from the `CHURCHDESK_ORGS`
    /// environment variable: comma-separated `id=token[=name]` entries.
    pub fn from_env() -> Result<Vec<Organization>> {
        let raw = std::env::var(ORGS_ENV_VAR).map_err(|_| GdfError::Config {
            message: format!("{ORGS_ENV_VAR} is not set"),
        })?;
        parse_organizations(&raw)
    }
}

fn parse_organizations(raw: &str) -> Result<Vec<Organization>> {
    let mut organizations = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let mut parts = entry.splitn(3, '=');
        let (Some(id), Some(token)) = (parts.next(), parts.next()) else {
            return Err(GdfError::Config {
                message: format!("malformed {ORGS_ENV_VAR} entry: {entry}"),
            });
        };
        let id: u32 = id.trim().parse().map_err(|_| GdfError::Config {
            message: format!("invalid organization id: {id}"),
        })?;
        let name = parts.next().unwrap_or("").trim();
        let name = if name.is_empty() {
            format!("organization {id}")
        } else {
            name.to_string()
        };
        organizations.push(Organization::new(id, token.trim(), name));
    }
    if organizations.is_empty() {
        return Err(GdfError::Config {
            message: format!("{ORGS_ENV_VAR} contains no organizations"),
        });
    }
    Ok(organizations)
}

pub struct ChurchDeskClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ChurchDeskClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ChurchDeskClient {
    pub fn new() -> Self {
        Self::with_base_url(String::from(BASE_URL))
    }

    /// The base URL is overridable for the HTTP tests.
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch the events of one organization in the given date range,
    /// optionally filtered to one event category.
    pub async fn get_events(
        &self,
        organization: &Organization,
        start: NaiveDate,
        end: NaiveDate,
        category_id: Option<i64>,
    ) -> Result<Vec<Event>> {
        let mut query = vec![
            ("partnerToken", organization.token.clone()),
            ("organizationId", organization.id.to_string()),
            ("startDate", format!("{start}T00:00:00")),
            ("endDate", format!("{end}T23:59:59")),
            ("itemsNumber", MAX_ITEMS_PER_PAGE.to_string()),
        ];
        if let Some(category_id) = category_id {
            query.push(("cid", category_id.to_string()));
        }
        let events = self
            .client
            .get(format!("{}/events", self.base_url))
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Event>>()
            .await?;
        Ok(events)
    }

    pub async fn get_categories(&self, organization: &Organization) -> Result<Vec<Category>> {
        let categories = self
            .client
            .get(format!("{}/events/categories", self.base_url))
            .query(&[
                ("partnerToken", organization.token.clone()),
                ("organizationId", organization.id.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Category>>()
            .await?;
        Ok(categories)
    }

    /// Find the organization's "Gottesdienst" event category, if any; without
    /// one all events are fetched unfiltered.
    pub async fn gottesdienst_category_id(
        &self,
        organization: &Organization,
    ) -> Result<Option<i64>> {
        let categories = self.get_categories(organization).await?;
        Ok(categories
            .iter()
            .find(|category| category.name.to_lowercase().contains("gottesdienst"))
            .map(|category| category.id))
    }

    /// Fetch one month of service records from every organization. A failing
    /// organization is logged and skipped; the combined result is sorted by
    /// start date.
    pub async fn get_monthly_records(
        &self,
        organizations: &[Organization],
        year: i32,
        month: u32,
    ) -> Result<Vec<ServiceRecord>> {
        let (start, end) = month_bounds(year, month)?;
        let mut records = Vec::new();
        for organization in organizations {
            let category_id = match self.gottesdienst_category_id(organization).await {
                Ok(category_id) => category_id,
                Err(error) => {
                    tracing::debug!(
                        organization = %organization.name,
                        %error,
                        "category lookup failed, fetching all events"
                    );
                    None
                }
            };
            match self.get_events(organization, start, end, category_id).await {
                Ok(events) => {
                    tracing::info!(
                        organization = %organization.name,
                        count = events.len(),
                        "fetched events"
                    );
                    for event in &events {
                        let missing = event.missing_fields();
                        if !missing.is_empty() {
                            tracing::debug!(id = event.id, ?missing, "incomplete event");
                        }
                    }
                    records.extend(events.iter().map(ServiceRecord::from));
                }
                Err(error) => {
                    tracing::warn!(
                        organization = %organization.name,
                        %error,
                        "skipping organization after fetch failure"
                    );
                }
            }
        }
        records.sort_by(|a, b| a.start.cmp(&b.start));
        Ok(records)
    }
}

/// First and last day of the month.
fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || GdfError::Config {
        message: format!("invalid month: {year}-{month}"),
    };
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let end = next_month.ok_or_else(invalid)? - Duration::days(1);
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, Timelike};
    use httpmock::prelude::*;

    use super::{month_bounds, parse_organizations, ChurchDeskClient, Event, Organization};
    use crate::event::ServiceRecord;

    static EVENTS_JSON: &str = r#"[
        {
            "id": 1,
            "title": "Gottesdienst mit Abendmahl",
            "startDate": "2025-04-05T08:00:00Z",
            "location": "Heide | St.-Jürgen-Kirche",
            "locationName": null,
            "contributor": "Pastorin Müller",
            "parishes": [{"title": "KG Heide"}]
        },
        {
            "id": 2,
            "title": "Andacht",
            "startDate": null,
            "contributor": null,
            "parishes": []
        }
    ]"#;

    fn event(json: &str) -> Event {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_event_start_converts_to_berlin() {
        let event = event(
            r#"{"id": 1, "startDate": "2025-04-05T08:00:00Z", "parishes": []}"#,
        );
        let start = event.start().unwrap();
        // CEST in April: UTC+2.
        assert_eq!(start.hour(), 10);
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2025, 4, 5).unwrap());
    }

    #[test]
    fn test_event_start_unparseable_is_none() {
        let event = event(r#"{"id": 1, "startDate": "morgen", "parishes": []}"#);
        assert!(event.start().is_none());
    }

    #[test]
    fn test_event_missing_fields() {
        let event = event(r#"{"id": 2, "title": "Andacht", "parishes": []}"#);
        assert_eq!(
            event.missing_fields(),
            vec!["startDate", "location", "contributor", "parishes"]
        );
    }

    #[test]
    fn test_record_from_event_prefers_location_name() {
        let event = event(
            r#"{
                "id": 3,
                "title": "Gottesdienst",
                "startDate": "2025-04-05T08:00:00Z",
                "location": "irgendwo",
                "locationName": "Büsum | St. Clemens",
                "parishes": [{"title": "KG Büsum"}]
            }"#,
        );
        let record = ServiceRecord::from(&event);
        assert_eq!(record.location, "Büsum | St. Clemens");
        assert_eq!(record.parish, "KG Büsum");
        assert_eq!(record.contributor, "");
    }

    #[test]
    fn test_parse_organizations() {
        let organizations =
            parse_organizations("2596=token-a=Kirchenkreis Dithmarschen, 6572=token-b").unwrap();
        assert_eq!(organizations.len(), 2);
        assert_eq!(organizations[0].id, 2596);
        assert_eq!(organizations[0].name, "Kirchenkreis Dithmarschen");
        assert_eq!(organizations[1].name, "organization 6572");
    }

    #[test]
    fn test_parse_organizations_rejects_malformed() {
        assert!(parse_organizations("").is_err());
        assert!(parse_organizations("not-a-number=token").is_err());
        assert!(parse_organizations("2596").is_err());
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(2025, 4).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
        let (_, end) = month_bounds(2025, 12).unwrap();
        assert_eq!(end.month(), 12);
        assert_eq!(end.day(), 31);
        assert!(month_bounds(2025, 13).is_err());
    }

    #[tokio::test]
    async fn test_get_events() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/events")
                    .query_param("partnerToken", "token-a")
                    .query_param("organizationId", "2596");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(EVENTS_JSON);
            })
            .await;
        let client = ChurchDeskClient::with_base_url(server.base_url());
        let organization = Organization::new(2596, "token-a", "Kirchenkreis");
        let events = client
            .get_events(
                &organization,
                NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
                None,
            )
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title.as_deref(), Some("Gottesdienst mit Abendmahl"));
    }

    /// One failing organization does not lose the other organizations' events.
    #[tokio::test]
    async fn test_get_monthly_records_partial_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/events/categories")
                    .query_param("partnerToken", "token-a");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"[{"id": 7, "name": "Gottesdienste"}]"#);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/events")
                    .query_param("partnerToken", "token-a")
                    .query_param("cid", "7");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(EVENTS_JSON);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/events")
                    .query_param("partnerToken", "token-b");
                then.status(500).body("internal error");
            })
            .await;
        let client = ChurchDeskClient::with_base_url(server.base_url());
        let organizations = vec![
            Organization::new(2596, "token-a", "Kirchenkreis"),
            Organization::new(6572, "token-b", "KG Heide"),
        ];
        let records = client
            .get_monthly_records(&organizations, 2025, 4)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        // Records without a start date sort first.
        assert!(records[0].start.is_none());
        assert_eq!(records[1].contributor, "Pastorin Müller");
    }
}
