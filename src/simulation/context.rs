use super::clock::SimulationClock;
use crate::catalog::DebrisCatalog;
use crate::config::ScenarioConfig;
use crate::errors::ConfigurationError;
use crate::models::SpacecraftElements;

/// Everything one sweep owns: the fragments, the spacecraft orbit and the clock.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub(crate) catalog: DebrisCatalog,
    pub(crate) clock: SimulationClock,
    spacecraft: SpacecraftElements,
}

impl SimulationContext {
    pub fn new(
        catalog: DebrisCatalog,
        spacecraft: SpacecraftElements,
        clock: SimulationClock,
    ) -> Self {
        Self {
            catalog,
            clock,
            spacecraft,
        }
    }

    /// Builds the reference context: the spacecraft flies a circular orbit in the mean
    /// fragment plane, `altitude_offset_m` above the collision altitude.
    pub fn from_config(
        config: &ScenarioConfig,
        catalog: DebrisCatalog,
    ) -> Result<Self, ConfigurationError> {
        check_catalog(config, &catalog)?;
        let spacecraft = SpacecraftElements::above_collision(
            catalog.elements(),
            config.collision_altitude_m,
            config.altitude_offset_m,
        )
        .ok_or(ConfigurationError::CatalogSizeMismatch {
            expected: config.catalog_size,
            actual: 0,
        })?;
        Ok(Self::new(catalog, spacecraft, clock_for(config)))
    }

    /// Like [`SimulationContext::from_config`] but with an explicit spacecraft orbit.
    pub fn with_spacecraft(
        config: &ScenarioConfig,
        catalog: DebrisCatalog,
        spacecraft: SpacecraftElements,
    ) -> Result<Self, ConfigurationError> {
        check_catalog(config, &catalog)?;
        Ok(Self::new(catalog, spacecraft, clock_for(config)))
    }

    pub fn catalog(&self) -> &DebrisCatalog {
        &self.catalog
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn spacecraft(&self) -> &SpacecraftElements {
        &self.spacecraft
    }
}

fn check_catalog(config: &ScenarioConfig, catalog: &DebrisCatalog) -> Result<(), ConfigurationError> {
    config.validate()?;
    if catalog.len() != config.catalog_size {
        return Err(ConfigurationError::CatalogSizeMismatch {
            expected: config.catalog_size,
            actual: catalog.len(),
        });
    }
    Ok(())
}

fn clock_for(config: &ScenarioConfig) -> SimulationClock {
    SimulationClock::from_seconds(config.epoch_offset_s, config.step_s)
}
