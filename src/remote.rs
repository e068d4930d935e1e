use crate::errors::RemoteError;
use crate::models::{Entry, ExerciseType, Person};
use serde_json::json;
use std::env;

/// CRUD boundary to the hosted table service, one table per exercise type.
/// No retries anywhere; callers own the compensating action on failure.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    async fn query(
        &self,
        exercise: ExerciseType,
        from: &str,
        to: &str,
    ) -> Result<Vec<Entry>, RemoteError>;

    async fn insert(
        &self,
        exercise: ExerciseType,
        date: &str,
        person: Person,
        count: u32,
    ) -> Result<Entry, RemoteError>;

    async fn update(
        &self,
        exercise: ExerciseType,
        id: &str,
        date: &str,
        person: Person,
        count: u32,
    ) -> Result<Entry, RemoteError>;

    async fn delete(&self, exercise: ExerciseType, id: &str) -> Result<(), RemoteError>;

    async fn delete_range(
        &self,
        exercise: ExerciseType,
        from: &str,
        to: &str,
    ) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl RemoteConfig {
    /// Connection settings are externally supplied via the environment.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("REMOTE_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:54321".to_string()),
            api_key: env::var("REMOTE_API_KEY").ok(),
        }
    }
}

/// Client for a PostgREST-style table API: inclusive date-range filters,
/// `order=date.desc,id.desc`, mutations returning the full row.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    config: RemoteConfig,
    http: reqwest::Client,
}

impl HttpRemoteStore {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn table_url(&self, exercise: ExerciseType) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            exercise.slug()
        )
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {key}")),
            None => request,
        }
    }
}

async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(RemoteError::new(format!(
        "remote store returned {status}: {text}"
    )))
}

fn single_row(rows: Vec<Entry>, operation: &str) -> Result<Entry, RemoteError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| RemoteError::new(format!("{operation} returned no row")))
}

impl RemoteStore for HttpRemoteStore {
    async fn query(
        &self,
        exercise: ExerciseType,
        from: &str,
        to: &str,
    ) -> Result<Vec<Entry>, RemoteError> {
        let response = self
            .apply_auth(self.http.get(self.table_url(exercise)))
            .query(&[
                ("select", "id,date,person,count".to_string()),
                ("date", format!("gte.{from}")),
                ("date", format!("lte.{to}")),
                ("order", "date.desc,id.desc".to_string()),
            ])
            .send()
            .await?;
        let rows = expect_success(response).await?.json::<Vec<Entry>>().await?;
        Ok(rows)
    }

    async fn insert(
        &self,
        exercise: ExerciseType,
        date: &str,
        person: Person,
        count: u32,
    ) -> Result<Entry, RemoteError> {
        let response = self
            .apply_auth(self.http.post(self.table_url(exercise)))
            .header("Prefer", "return=representation")
            .json(&json!({ "date": date, "person": person, "count": count }))
            .send()
            .await?;
        let rows = expect_success(response).await?.json::<Vec<Entry>>().await?;
        single_row(rows, "insert")
    }

    async fn update(
        &self,
        exercise: ExerciseType,
        id: &str,
        date: &str,
        person: Person,
        count: u32,
    ) -> Result<Entry, RemoteError> {
        let response = self
            .apply_auth(self.http.patch(self.table_url(exercise)))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&json!({ "date": date, "person": person, "count": count }))
            .send()
            .await?;
        let rows = expect_success(response).await?.json::<Vec<Entry>>().await?;
        single_row(rows, "update")
    }

    async fn delete(&self, exercise: ExerciseType, id: &str) -> Result<(), RemoteError> {
        let response = self
            .apply_auth(self.http.delete(self.table_url(exercise)))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn delete_range(
        &self,
        exercise: ExerciseType,
        from: &str,
        to: &str,
    ) -> Result<(), RemoteError> {
        let response = self
            .apply_auth(self.http.delete(self.table_url(exercise)))
            .query(&[("date", format!("gte.{from}")), ("date", format!("lte.{to}"))])
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }
}
