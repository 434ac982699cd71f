pub mod credit;
pub mod land;
pub mod simulate;

use std::sync::Arc;

use property_sim_core::land_data::table::LandPriceTable;
use property_sim_core::simulation::config::SimulatorConfig;
use property_sim_core::simulation::model::SimulationContext;

/// Reference data shared by every command in one invocation.
pub struct Runtime {
    pub table: Arc<LandPriceTable>,
    pub similarity_cutoff: f64,
}

impl Runtime {
    pub fn from_config(config: &SimulatorConfig) -> Result<Self, Box<dyn std::error::Error>> {
        config.validate()?;
        Ok(Runtime {
            table: config.load_table(),
            similarity_cutoff: config.similarity_cutoff,
        })
    }

    pub fn context(&self) -> SimulationContext<'_> {
        SimulationContext::new(&self.table).with_cutoff(self.similarity_cutoff)
    }
}
