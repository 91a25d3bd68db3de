//! Orchestration for the county dashboard: given a `(state, county)`
//! selection and the injected collaborators, compute the complete derived
//! view. Nothing here knows about HTTP handlers or the page.

use std::sync::Arc;

use echo_client::EchoServices;
use reference::ReferenceTable;
use shared::domain::{BlockGroupRange, ScreeningTable};
use shared::error::{ApiError, ErrorCode, RetrievalError};
use shared::protocol::{facility_table, screening_table, CountySnapshot};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub reference: Arc<ReferenceTable>,
    pub services: Arc<dyn EchoServices>,
}

/// States offered by the state selector.
pub fn list_states(ctx: &ApiContext) -> Vec<String> {
    ctx.reference.states()
}

/// Counties offered by the county selector for one state.
pub fn list_counties(ctx: &ApiContext, state: &str) -> Result<Vec<String>, ApiError> {
    if !ctx.reference.contains_state(state) {
        return Err(ApiError::new(
            ErrorCode::NotFound,
            format!("unknown state '{state}'"),
        ));
    }
    Ok(ctx.reference.counties_in(state))
}

/// Compute the full derived view for one selection: active facilities, the
/// county boundary, the county's screening rows, and the composed map.
/// All-or-nothing; any failed step aborts the whole snapshot.
pub async fn county_snapshot(
    ctx: &ApiContext,
    state: &str,
    county: &str,
) -> Result<CountySnapshot, RetrievalError> {
    let facilities = ctx.services.active_facilities(state, county).await?;
    debug!(state, county, count = facilities.len(), "facilities retrieved");

    let spatial = ctx.services.spatial_data(state, county).await?;
    let boundary = spatial
        .counties
        .first()
        .ok_or_else(|| RetrievalError::EmptyBoundary {
            state: state.to_string(),
            county: county.to_string(),
        })?;
    if spatial.counties.len() > 1 {
        warn!(
            state,
            county,
            returned = spatial.counties.len(),
            "expected exactly one county boundary, using the first"
        );
    }

    let range = boundary.geoid.block_group_range().ok_or_else(|| {
        RetrievalError::malformed(format!("county geoid '{}' is not 5 digits", boundary.geoid))
    })?;

    let sql = echo_client::sql::screening_sql(range);
    let screening = ctx.services.echo_data(&sql).await?;
    let screening = scope_to_county(screening, range);

    let map = map_render::compose(&facilities, boundary);

    Ok(CountySnapshot {
        state: state.to_string(),
        county: county.to_string(),
        facilities: facility_table(&facilities),
        screening: screening_table(&screening),
        map,
    })
}

/// Keep only block groups inside the county's half-open id range. The wire
/// query is inclusive on both ends, so the first block group of the next
/// county can come back; it must never reach the page.
fn scope_to_county(table: ScreeningTable, range: BlockGroupRange) -> ScreeningTable {
    let before = table.rows.len();
    let rows: Vec<_> = table
        .rows
        .into_iter()
        .filter(|row| range.contains(row.id))
        .collect();
    let dropped = before - rows.len();
    if dropped > 0 {
        warn!(
            dropped,
            baseline = range.baseline,
            "discarded screening rows outside the county block group range"
        );
    }
    ScreeningTable {
        columns: table.columns,
        rows,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
