//! Simulation module
//!
//! All gameplay logic lives here:
//! - Explicit state passed by reference, no globals
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod pump;
pub mod state;
pub mod tick;
pub mod weather;

pub use pump::{press_pump, release_pump};
pub use state::{GamePhase, GameState, PoolSizes, PumpLever, SimulationState, WeatherState};
pub use tick::{TickEvents, difficulty_multiplier, start_rain, stop_rain, tick};
pub use weather::{Cloud, CloudLobe, Raindrop};
