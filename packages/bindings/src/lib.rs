use std::sync::OnceLock;

use napi::Result as NapiResult;
use napi_derive::napi;

use property_sim_core::land_data::table::LandPriceTable;
use property_sim_core::simulation::config::SimulatorConfig;
use property_sim_core::simulation::model::SimulationContext;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

struct Shared {
    table: LandPriceTable,
    similarity_cutoff: f64,
}

static SHARED: OnceLock<Shared> = OnceLock::new();

/// Reference data loaded on first use from `PSIM_LAND_DATA` /
/// `PSIM_SIMILARITY_CUTOFF`, then shared read-only by every call.
fn shared() -> &'static Shared {
    SHARED.get_or_init(|| {
        let config = SimulatorConfig::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "invalid simulator environment; using defaults");
            SimulatorConfig::default()
        });
        Shared {
            table: LandPriceTable::load_or_empty(config.land_data_path.as_deref()),
            similarity_cutoff: config.similarity_cutoff,
        }
    })
}

fn context() -> SimulationContext<'static> {
    let shared = shared();
    SimulationContext::new(&shared.table).with_cutoff(shared.similarity_cutoff)
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Full envelope: result, methodology, assumptions, warnings, metadata.
#[napi]
pub fn simulate_property(input_json: String) -> NapiResult<String> {
    let raw: serde_json::Value = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let input = property_sim_core::input::normalize(&raw).map_err(to_napi_error)?;
    let output =
        property_sim_core::simulation::model::simulate(&input, &context()).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Front-end reply: `{"status": 200|500, "body": {...}}`. Never throws for
/// calculation failures.
#[napi]
pub fn simulate_response(input_json: String) -> NapiResult<String> {
    let reply = property_sim_core::simulation::response::respond_str(&input_json, &context());
    serde_json::to_string(&reply).map_err(to_napi_error)
}

#[napi]
pub fn demo_request() -> NapiResult<String> {
    serde_json::to_string(&property_sim_core::simulation::model::demo_request())
        .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reference land prices
// ---------------------------------------------------------------------------

#[napi]
pub fn lookup_land_price(address: String) -> NapiResult<String> {
    let ctx = context();
    let quote = ctx.table.lookup(&address, ctx.matcher, ctx.similarity_cutoff);
    serde_json::to_string(&quote).map_err(to_napi_error)
}
