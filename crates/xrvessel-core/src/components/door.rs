//! Door component: the mutable half of a fitted door.

use serde::{Deserialize, Serialize};
use xrvessel_logic::door::{derive_status, integrate_proc, reconcile_status, Direction, DoorId, DoorStatus};

/// Live state of one door. The immutable half is its
/// [`xrvessel_logic::config::DoorSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: DoorId,
    pub status: DoorStatus,
    /// 0 = fully closed, 1 = fully open.
    pub proc: f64,
    /// Last commanded direction; survives `Failed` so a repair knows where it was headed.
    pub direction: Direction,
    /// Stopped mid-travel by a loss of hydraulic pressure.
    pub arrested: bool,
}

impl Door {
    pub fn new(id: DoorId) -> Self {
        Self {
            id,
            status: DoorStatus::NotSet,
            proc: 0.0,
            direction: Direction::Closing,
            arrested: false,
        }
    }

    pub fn with_state(mut self, status: DoorStatus, proc: f64) -> Self {
        self.status = status;
        self.proc = proc;
        if let Some(dir) = status.direction() {
            self.direction = dir;
        }
        self
    }

    pub fn is_failed(&self) -> bool {
        self.status == DoorStatus::Failed
    }

    /// Begin travel toward `direction`'s terminal state.
    pub fn start(&mut self, direction: Direction) {
        self.direction = direction;
        self.arrested = false;
        self.status = if self.proc == direction.terminal_proc() {
            direction.terminal_status()
        } else {
            direction.moving_status()
        };
    }

    /// Set a status directly, bypassing travel. Terminal statuses move proc
    /// to the matching extreme.
    pub fn jump(&mut self, status: DoorStatus) {
        self.arrested = false;
        if let Some(dir) = status.direction() {
            self.direction = dir;
        }
        match status {
            DoorStatus::Open => self.proc = 1.0,
            DoorStatus::Closed => self.proc = 0.0,
            _ => {}
        }
        self.status = status;
    }

    pub fn fail(&mut self) {
        self.status = DoorStatus::Failed;
        self.arrested = false;
    }

    /// Clear a failure, settling on the terminal state nearest to proc.
    pub fn repair(&mut self) {
        if !self.is_failed() {
            return;
        }
        let status = if self.proc >= 0.5 {
            DoorStatus::Open
        } else {
            DoorStatus::Closed
        };
        self.jump(status);
    }

    /// Resolve a `NotSet` (or inconsistent) status against proc.
    pub fn reconcile(&mut self) {
        self.status = reconcile_status(self.status, self.proc);
        if let Some(dir) = self.status.direction() {
            self.direction = dir;
        }
    }

    /// Advance one tick of travel and re-derive the coarse status.
    pub fn advance(&mut self, simdt: f64, operating_speed: f64) {
        self.proc = integrate_proc(self.proc, self.direction, simdt, operating_speed);
        self.status = derive_status(self.proc, self.direction);
    }
}
