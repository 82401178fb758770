//! Edge-triggered pumping
//!
//! A stroke fires only on the transition from released to pressed, and only
//! while the pump is armed and the run is live. Holding the input does nothing
//! more until it is released and pressed again.

use super::state::GameState;

/// Pump input went down. Returns true if a stroke was applied.
pub fn press_pump(state: &mut GameState) -> bool {
    let rising_edge = !state.lever.held;
    state.lever.held = true;

    if !rising_edge || !state.sim.can_pump || !state.sim.is_running() {
        return false;
    }

    state.sim.water_level = (state.sim.water_level - state.tuning.pump_power).max(0.0);
    state.sim.can_pump = false;
    state.sim.pump_cooldown = state.tuning.pump_cooldown;
    state.lever.pumping = true;
    true
}

/// Pump input went up
pub fn release_pump(state: &mut GameState) {
    state.lever.held = false;
    state.lever.pumping = false;
}
