use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::domain::{CountyBoundary, FacilityRecord, ScreeningTable};
use shared::error::RetrievalError;
use tracing::debug;
use url::Url;

pub mod parse;
pub mod sql;

/// Names of the census boundary tables on the spatial warehouse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialTables {
    pub county_table: String,
    pub state_table: String,
}

impl Default for SpatialTables {
    fn default() -> Self {
        Self {
            county_table: "tl_2019_us_county".into(),
            state_table: "tl_2019_us_state".into(),
        }
    }
}

/// County and state boundary polygons for one selection. The county list is
/// expected to hold exactly one boundary; emptiness is the caller's
/// `EmptyBoundary` case.
#[derive(Debug, Clone)]
pub struct SpatialData {
    pub counties: Vec<CountyBoundary>,
    pub state_geometry: Option<serde_json::Value>,
}

/// The three upstream data services behind one seam, so orchestration and
/// tests never touch the network directly.
#[async_trait]
pub trait EchoServices: Send + Sync {
    /// Active regulated facilities of one county.
    async fn active_facilities(
        &self,
        state: &str,
        county: &str,
    ) -> Result<Vec<FacilityRecord>, RetrievalError>;

    /// County and state boundary geometry for one selection.
    async fn spatial_data(&self, state: &str, county: &str)
        -> Result<SpatialData, RetrievalError>;

    /// Execute a literal SQL query against the screening warehouse.
    async fn echo_data(&self, sql: &str) -> Result<ScreeningTable, RetrievalError>;
}

/// HTTP client for the ECHO warehouse endpoints. Queries are sent as
/// `?query=<urlencoded sql>&pg`; the data endpoint answers CSV, the spatial
/// endpoint GeoJSON.
#[derive(Clone)]
pub struct EchoClient {
    http: reqwest::Client,
    data_url: Url,
    spatial_url: Url,
    tables: SpatialTables,
}

impl EchoClient {
    pub fn new(data_url: &str, spatial_url: &str) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            data_url: Url::parse(data_url)
                .with_context(|| format!("invalid data endpoint '{data_url}'"))?,
            spatial_url: Url::parse(spatial_url)
                .with_context(|| format!("invalid spatial endpoint '{spatial_url}'"))?,
            tables: SpatialTables::default(),
        })
    }

    pub fn with_tables(mut self, tables: SpatialTables) -> Self {
        self.tables = tables;
        self
    }

    fn query_url(base: &Url, sql: &str) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair("query", sql)
            .append_key_only("pg");
        url
    }

    async fn fetch(&self, base: &Url, sql: &str) -> Result<String, RetrievalError> {
        let url = Self::query_url(base, sql);
        debug!(%url, "warehouse query");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RetrievalError::unavailable(format!("request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::unavailable(format!(
                "warehouse answered {status}"
            )));
        }
        response
            .text()
            .await
            .map_err(|e| RetrievalError::unavailable(format!("failed to read response: {e}")))
    }
}

#[async_trait]
impl EchoServices for EchoClient {
    async fn active_facilities(
        &self,
        state: &str,
        county: &str,
    ) -> Result<Vec<FacilityRecord>, RetrievalError> {
        let sql = sql::active_facilities_sql(state, county);
        let body = self.fetch(&self.data_url, &sql).await?;
        parse::facilities_from_csv(&body)
    }

    async fn spatial_data(
        &self,
        state: &str,
        county: &str,
    ) -> Result<SpatialData, RetrievalError> {
        // A state without a FIPS code has no census geometry at all; this is
        // the non-U.S.-entry path and reads as an empty boundary result.
        let fips = reference::state_fips(state).ok_or_else(|| RetrievalError::EmptyBoundary {
            state: state.to_string(),
            county: county.to_string(),
        })?;

        let county_sql = sql::county_boundary_sql(&self.tables, fips, county);
        let county_body = self.fetch(&self.spatial_url, &county_sql).await?;
        let counties = parse::county_boundaries_from_geojson(&county_body)?;

        let state_sql = sql::state_boundary_sql(&self.tables, state);
        let state_body = self.fetch(&self.spatial_url, &state_sql).await?;
        let state_geometry = parse::first_geometry_from_geojson(&state_body)?;

        Ok(SpatialData {
            counties,
            state_geometry,
        })
    }

    async fn echo_data(&self, sql: &str) -> Result<ScreeningTable, RetrievalError> {
        let body = self.fetch(&self.data_url, sql).await?;
        parse::screening_from_csv(&body)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
