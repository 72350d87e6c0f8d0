//! APU power switch.
//!
//! The APU is not a door entity: its status lives in [`crate::components::ApuState`]
//! and the `ApuPostStep` runs its timers. This is the pilot's switch.

use xrvessel_logic::door::DoorStatus;

use super::{ActivationOutcome, Rejection};
use crate::sound::{files, SoundType};
use crate::vessel::VesselState;

impl VesselState {
    /// Request the APU to power up (`Opening`/`Open`) or down (`Closing`/`Closed`).
    pub fn activate_apu(&mut self, action: DoorStatus) -> ActivationOutcome {
        if self.crew.incapacitated_or_no_pilot() {
            return ActivationOutcome::Rejected(Rejection::Ignored);
        }
        if self.apu.status == DoorStatus::Failed {
            self.play_error_beep();
            self.show_warning(Some(files::APU_FAILED), SoundType::WarningCallout, "APU FAILED.", false);
            return ActivationOutcome::Rejected(Rejection::Failed);
        }
        let starting = matches!(action, DoorStatus::Opening | DoorStatus::Open);
        if starting && self.apu.fuel_qty_kg <= 0.0 {
            self.play_error_beep();
            self.show_warning(
                Some(files::APU_FUEL_DEPLETED),
                SoundType::WarningCallout,
                "APU fuel depleted:&NO HYDRAULIC PRESSURE!",
                false,
            );
            return ActivationOutcome::Rejected(Rejection::Interlock);
        }
        if !matches!(
            action,
            DoorStatus::Opening | DoorStatus::Open | DoorStatus::Closing | DoorStatus::Closed
        ) {
            return ActivationOutcome::Rejected(Rejection::Ignored);
        }

        self.mark_apu_active();
        if self.apu.status == action {
            return ActivationOutcome::Unchanged;
        }
        log::debug!("APU {} -> {}", self.apu.status.token(), action.token());
        self.apu.status = action;
        ActivationOutcome::Started
    }

    pub fn toggle_apu(&mut self) -> ActivationOutcome {
        let action = match self.apu.status {
            DoorStatus::Closed | DoorStatus::Closing => DoorStatus::Opening,
            _ => DoorStatus::Closing,
        };
        self.activate_apu(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::CrewState;
    use crate::sound::SilentSound;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use xrvessel_logic::config::VesselType;

    fn state() -> VesselState {
        let config = crate::config::builtin_config(VesselType::Xr1).expect("builtin config");
        VesselState::with_parts(config, Box::new(SilentSound), StdRng::seed_from_u64(8))
    }

    #[test]
    fn test_toggle_powers_up_and_down() {
        let mut s = state();
        s.simt = 4.0;
        assert_eq!(s.toggle_apu(), ActivationOutcome::Started);
        assert_eq!(s.apu.status, DoorStatus::Opening);
        assert_eq!(s.hydraulics.last_active_simt, 4.0);
        assert_eq!(s.toggle_apu(), ActivationOutcome::Started);
        assert_eq!(s.apu.status, DoorStatus::Closing);
    }

    #[test]
    fn test_empty_tanks_refuse_start() {
        let mut s = state();
        s.apu.fuel_qty_kg = 0.0;
        assert_eq!(
            s.activate_apu(DoorStatus::Opening),
            ActivationOutcome::Rejected(Rejection::Interlock)
        );
        assert_eq!(s.apu.status, DoorStatus::Closed);
        assert!(s.notifier.text.contains("APU fuel depleted:"));
    }

    #[test]
    fn test_failed_apu() {
        let mut s = state();
        s.apu.status = DoorStatus::Failed;
        assert_eq!(s.toggle_apu(), ActivationOutcome::Rejected(Rejection::Failed));
        assert!(s.notifier.text.contains("APU FAILED."));
    }

    #[test]
    fn test_ignored_without_pilot() {
        let mut s = state();
        s.crew.state = CrewState::Incapacitated;
        assert_eq!(s.toggle_apu(), ActivationOutcome::Rejected(Rejection::Ignored));
        assert!(s.notifier.text.is_empty());
    }
}
