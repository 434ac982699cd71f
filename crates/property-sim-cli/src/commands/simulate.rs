use clap::Args;
use serde_json::Value;

use property_sim_core::input::normalize;
use property_sim_core::simulation::model::{demo_request, simulate};
use property_sim_core::simulation::response::respond;

use super::Runtime;
use crate::input;

/// Arguments for a full property simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to a JSON or YAML request (front-end field names)
    #[arg(long, conflicts_with = "demo")]
    pub input: Option<String>,

    /// Run the built-in demo property
    #[arg(long)]
    pub demo: bool,

    /// Emit only the front-end response body
    #[arg(long)]
    pub raw: bool,
}

pub fn run_simulate(args: SimulateArgs, runtime: &Runtime) -> Result<Value, Box<dyn std::error::Error>> {
    let request: Value = if args.demo {
        demo_request()
    } else if let Some(ref path) = args.input {
        input::file::read_request(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input file, piped JSON or --demo is required".into());
    };

    let ctx = runtime.context();
    if args.raw {
        let reply = respond(&request, &ctx);
        if !reply.is_success() {
            let message = reply.body["error"].as_str().unwrap_or("Calculation error");
            return Err(message.to_string().into());
        }
        return Ok(reply.body);
    }

    let sim_input = normalize(&request)?;
    let result = simulate(&sim_input, &ctx)?;
    Ok(serde_json::to_value(result)?)
}
