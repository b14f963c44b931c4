// --- Per-tick input snapshot consumed by the simulation ---

/// Keys whose held state matters this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
    pub spread: bool,
}

impl HeldKeys {
    /// Sum of the movement deltas of every held directional key.
    /// Opposite keys cancel, so each component is -1, 0 or 1.
    pub fn movement(&self) -> (i32, i32) {
        let mut dx = 0;
        let mut dy = 0;
        if self.up {
            dy -= 1;
        }
        if self.down {
            dy += 1;
        }
        if self.left {
            dx -= 1;
        }
        if self.right {
            dx += 1;
        }
        (dx, dy)
    }
}

/// Discrete key-press events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Fire,
    Emp,
    Hyper,
    Shield,
    Gravity,
    Quit,
}

#[derive(Clone, Debug, Default)]
pub struct TickInput {
    pub held: HeldKeys,
    pub triggers: Vec<Trigger>,
}

impl TickInput {
    pub fn quit_requested(&self) -> bool {
        self.triggers.contains(&Trigger::Quit)
    }
}
