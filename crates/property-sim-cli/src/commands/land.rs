use clap::Args;
use serde_json::{json, Value};

use super::Runtime;

/// Arguments for a reference land price lookup
#[derive(Args)]
pub struct LookupArgs {
    /// Property address to match against the reference locations
    #[arg(long)]
    pub address: String,
}

pub fn run_lookup(args: LookupArgs, runtime: &Runtime) -> Result<Value, Box<dyn std::error::Error>> {
    if runtime.table.is_empty() {
        tracing::warn!("no reference land price table loaded; pass --land-data or set PSIM_LAND_DATA");
    }
    let ctx = runtime.context();
    let quote = runtime
        .table
        .lookup(&args.address, ctx.matcher, ctx.similarity_cutoff);
    Ok(json!({
        "result": quote,
        "methodology": "Closest reference location by sequence similarity",
        "assumptions": {
            "address": args.address,
            "similarity_cutoff": ctx.similarity_cutoff,
            "reference_locations": runtime.table.len(),
        },
        "warnings": [],
    }))
}
