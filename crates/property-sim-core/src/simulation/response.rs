use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::PropertySimError;
use crate::input::normalize;
use crate::PropertySimResult;

use super::model::{simulate, SimulationContext};

pub const STATUS_OK: u16 = 200;
pub const STATUS_SERVER_ERROR: u16 = 500;

/// Status code and JSON body returned to the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Normalise a raw request, simulate, and render the reply body.
///
/// Success carries only the simulation result. Any failure becomes a 500
/// with a single `error` message and no partial figures.
pub fn respond(request: &Value, ctx: &SimulationContext<'_>) -> Reply {
    match render(request, ctx) {
        Ok(body) => Reply {
            status: STATUS_OK,
            body,
        },
        Err(e) => failure(&e),
    }
}

/// [`respond`] for a request that has not been parsed yet.
pub fn respond_str(request_json: &str, ctx: &SimulationContext<'_>) -> Reply {
    match serde_json::from_str::<Value>(request_json) {
        Ok(request) => respond(&request, ctx),
        Err(e) => failure(&PropertySimError::from(e)),
    }
}

fn render(request: &Value, ctx: &SimulationContext<'_>) -> PropertySimResult<Value> {
    let input = normalize(request)?;
    let output = simulate(&input, ctx)?;
    for warning in &output.warnings {
        tracing::debug!(warning = %warning, "simulation warning");
    }
    Ok(serde_json::to_value(&output.result)?)
}

fn failure(error: &PropertySimError) -> Reply {
    tracing::error!(error = %error, "simulation failed");
    Reply {
        status: STATUS_SERVER_ERROR,
        body: json!({ "error": format!("Calculation error: {error}") }),
    }
}
