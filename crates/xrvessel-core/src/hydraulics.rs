//! Hydraulic pressure arbitration.
//!
//! The APU is the only source of hydraulic pressure. Doors that need it ask
//! here on each button press; the pre-step refreshes availability once per
//! tick for everything that polls.

use xrvessel_logic::door::DoorStatus;

use crate::sound::{files, SoundType};
use crate::vessel::VesselState;

impl VesselState {
    /// Pressure is up exactly while the APU is online.
    pub fn hydraulics_online(&self) -> bool {
        self.apu.status == DoorStatus::Open
    }

    /// Recompute `hydraulics.available` from the APU.
    pub fn refresh_hydraulics(&mut self) -> bool {
        self.hydraulics.available = self.hydraulics_online();
        self.hydraulics.available
    }

    /// Query hydraulic pressure for a control input. When it is down and the
    /// caller opts in, explain why (and beep).
    pub fn check_hydraulic_pressure(&mut self, show_warning: bool, play_error_beep: bool) -> bool {
        if self.refresh_hydraulics() {
            return true;
        }
        if show_warning {
            if play_error_beep {
                self.play_error_beep();
            }
            if self.apu.fuel_qty_kg <= 0.0 {
                self.show_warning(
                    Some(files::APU_FUEL_DEPLETED),
                    SoundType::WarningCallout,
                    "APU fuel tanks depleted:&no hydraulic pressure!",
                    false,
                );
            } else {
                self.show_warning(
                    Some(files::APU_OFFLINE),
                    SoundType::WarningCallout,
                    "WARNING: APU is offline; no hydraulic&pressure.",
                    false,
                );
            }
        }
        false
    }

    /// Something used hydraulic power; resets the APU idle timer.
    pub fn mark_apu_active(&mut self) {
        let simt = self.simt;
        self.hydraulics.mark_active(simt);
    }
}
