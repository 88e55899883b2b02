//! Weather rotation.
//!
//! Every `period` seconds a new weather is drawn from the weighted table.
//! The roll may land on the current weather again; the change is still
//! reported so the shell plays its transition sound.

use crate::{
    config::WeatherConfig,
    event::GameEvent,
    rng::SubsystemRng,
    state::{EconomyState, Weather},
    subsystem::{TickContext, TickSubsystem},
};

pub struct WeatherSubsystem {
    config: WeatherConfig,
}

impl WeatherSubsystem {
    pub fn new(config: WeatherConfig) -> Self {
        Self { config }
    }

    fn roll(&self, rng: &mut SubsystemRng) -> (Weather, f64) {
        let weights: Vec<u32> = self.config.table.iter().map(|e| e.weight).collect();
        self.config
            .table
            .get(rng.weighted_index(&weights))
            .map(|e| (e.weather, e.multiplier))
            .unwrap_or((Weather::Normal, 1.0))
    }
}

impl TickSubsystem for WeatherSubsystem {
    fn name(&self) -> &'static str { "weather" }

    fn update(
        &mut self,
        ctx:        TickContext,
        state:      &mut EconomyState,
        _events_in: &[GameEvent],
        rng:        &mut SubsystemRng,
    ) -> Vec<GameEvent> {
        state.weather_timer += ctx.dt;
        if state.weather_timer < self.config.period {
            return vec![];
        }

        let from = state.weather;
        let (to, multiplier) = self.roll(rng);
        state.weather = to;
        state.weather_multiplier = multiplier;
        state.weather_timer = 0.0;

        log::debug!("frame={} weather: {:?} -> {:?} (x{multiplier})", ctx.frame, from, to);
        vec![GameEvent::WeatherChanged { from, to, multiplier }]
    }
}
