//! HTTP client for the hosted store's REST API.
//!
//! The store is an opaque hosted collaborator: reads go to
//! `GET /{table}?select=…&order=…&limit=…` and row-level access is scoped
//! server-side by the bearer identity — this client adds no identity filters
//! of its own. A query the store evaluates and refuses comes back as an
//! error *value* (`StoreError::Rejected`); anything below that level
//! (connect, TLS, unreadable rows) is a transport *fault*. Callers treat
//! the two very differently.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Sort direction for an ordered read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn suffix(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Description of one read against a logical table.
#[derive(Debug, Clone)]
pub struct Query {
    table: String,
    columns: String,
    order: Option<(String, Direction)>,
    limit: Option<u32>,
}

impl Query {
    pub fn table(name: &str) -> Self {
        Self {
            table: name.to_string(),
            columns: "*".to_string(),
            order: None,
            limit: None,
        }
    }

    pub fn columns(mut self, projection: &str) -> Self {
        self.columns = projection.to_string();
        self
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("select", self.columns.clone())];
        if let Some((column, direction)) = &self.order {
            params.push(("order", format!("{}.{}", column, direction.suffix())));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Store read failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store evaluated the request and reported an error value.
    #[error("{message}")]
    Rejected { table: String, message: String },

    /// Transport-level fault reaching the store.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected row shape.
    #[error("{table}: unreadable rows: {message}")]
    Decode { table: String, message: String },
}

impl StoreError {
    /// True for error values the store itself reported; false for faults.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Error body shape the store uses for refused requests.
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    /// No request timeout on purpose: the platform's own transport timeout
    /// is the only bound.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Execute a read, returning the rows or the store's error value.
    pub async fn select<T: DeserializeOwned>(
        &self,
        query: &Query,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, StoreError> {
        let url = format!("{}/{}", self.base_url, query.table_name());
        let response = self
            .http
            .get(&url)
            .query(&query.params())
            .header("apikey", &self.api_key)
            .bearer_auth(access_token.unwrap_or(&self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(query.table_name(), response).await);
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode {
            table: query.table_name().to_string(),
            message: e.to_string(),
        })
    }

    /// Insert rows into a table. Write surface for the `seed` developer
    /// binary only; the dashboard core never writes.
    pub async fn insert<T: Serialize>(
        &self,
        table: &str,
        rows: &[T],
        access_token: Option<&str>,
    ) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.base_url, table);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(access_token.unwrap_or(&self.api_key))
            .json(rows)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(table, response).await);
        }
        Ok(())
    }

    /// Reachability check for the readiness probe.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let response = self
            .http
            .get(&self.base_url)
            .header("apikey", &self.api_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::rejection("/", response).await)
        }
    }

    async fn rejection(table: &str, response: reqwest::Response) -> StoreError {
        let status = response.status();
        let message = match response.json::<StoreErrorBody>().await {
            Ok(StoreErrorBody {
                message: Some(message),
            }) => message,
            _ => format!("HTTP {status}"),
        };
        StoreError::Rejected {
            table: table.to_string(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults_to_select_all() {
        let query = Query::table("customers");
        assert_eq!(query.params(), vec![("select", "*".to_string())]);
    }

    #[test]
    fn query_builds_order_and_limit() {
        let query = Query::table("views_data")
            .columns("date, count")
            .order_by("date", Direction::Descending)
            .limit(1);
        assert_eq!(
            query.params(),
            vec![
                ("select", "date, count".to_string()),
                ("order", "date.desc".to_string()),
                ("limit", "1".to_string()),
            ]
        );
    }

    #[test]
    fn rejection_is_not_a_fault() {
        let rejected = StoreError::Rejected {
            table: "sales_data".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(rejected.is_rejection());
        assert_eq!(rejected.to_string(), "permission denied");

        let decode = StoreError::Decode {
            table: "sales_data".to_string(),
            message: "expected a sequence".to_string(),
        };
        assert!(!decode.is_rejection());
    }
}
