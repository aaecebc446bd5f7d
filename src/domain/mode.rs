/// Global agent mode: Pursuit → Patrol → Pursuit … with Vulnerable as an
/// externally triggered, time-limited override.
///
/// Two counters, each advanced once per agent tick while its state is
/// active:
///   - `cycle`: Pursuit/Patrol schedule. Frozen (not reset) while
///     Vulnerable, so the schedule resumes where it left off.
///   - `vulnerable`: restarts at 1 on every trigger; its timeout always
///     lands in Pursuit.
///
/// Thresholds are checked before the counter advances, so with a pursuit
/// threshold of 100 the 100th tick is the one that flips to Patrol.

use crate::config::RulesConfig;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Pursuit,
    Patrol,
    Vulnerable,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Pursuit => "PURSUIT",
            Mode::Patrol => "PATROL",
            Mode::Vulnerable => "VULNERABLE",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ModeController {
    mode: Mode,
    cycle: u32,
    vulnerable: u32,
    pursuit_ticks: u32,
    patrol_ticks: u32,
    vulnerable_ticks: u32,
}

impl ModeController {
    pub fn new(rules: &RulesConfig) -> Self {
        ModeController {
            mode: Mode::Pursuit,
            cycle: 1,
            vulnerable: 1,
            pursuit_ticks: rules.pursuit_ticks,
            patrol_ticks: rules.patrol_ticks,
            vulnerable_ticks: rules.vulnerable_ticks,
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_vulnerable(&self) -> bool {
        self.mode == Mode::Vulnerable
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle
    }

    pub fn vulnerable_count(&self) -> u32 {
        self.vulnerable
    }

    /// Advance one agent tick. Returns the new mode if it changed.
    pub fn tick(&mut self) -> Option<Mode> {
        let before = self.mode;

        if self.mode == Mode::Vulnerable {
            if self.vulnerable == self.vulnerable_ticks {
                self.mode = Mode::Pursuit;
                self.vulnerable = 1;
            } else {
                self.vulnerable += 1;
            }
        } else if self.cycle == self.patrol_ticks {
            self.mode = Mode::Pursuit;
            self.cycle = 1;
        } else {
            if self.cycle == self.pursuit_ticks {
                self.mode = Mode::Patrol;
            }
            self.cycle += 1;
        }

        (self.mode != before).then_some(self.mode)
    }

    /// Enter Vulnerable from any state, restarting its timer.
    /// Returns true if the mode actually changed.
    pub fn frighten(&mut self) -> bool {
        let changed = self.mode != Mode::Vulnerable;
        self.mode = Mode::Vulnerable;
        self.vulnerable = 1;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ModeController {
        ModeController::new(&RulesConfig::default())
    }

    fn run(mc: &mut ModeController, ticks: u32) {
        for _ in 0..ticks {
            mc.tick();
        }
    }

    #[test]
    fn starts_in_pursuit() {
        let mc = controller();
        assert_eq!(mc.mode(), Mode::Pursuit);
        assert_eq!(mc.cycle_count(), 1);
    }

    #[test]
    fn pursuit_patrol_cycle_timing() {
        let mut mc = controller();
        run(&mut mc, 99);
        assert_eq!(mc.mode(), Mode::Pursuit);

        assert_eq!(mc.tick(), Some(Mode::Patrol)); // tick 100
        run(&mut mc, 34); // ticks 101..=134
        assert_eq!(mc.mode(), Mode::Patrol);

        assert_eq!(mc.tick(), Some(Mode::Pursuit)); // tick 135
        assert_eq!(mc.cycle_count(), 1);
    }

    #[test]
    fn second_cycle_matches_the_first() {
        let mut mc = controller();
        run(&mut mc, 135);
        run(&mut mc, 99);
        assert_eq!(mc.mode(), Mode::Pursuit);
        assert_eq!(mc.tick(), Some(Mode::Patrol));
    }

    #[test]
    fn vulnerable_times_out_to_pursuit() {
        let mut mc = controller();
        assert!(mc.frighten());
        assert_eq!(mc.mode(), Mode::Vulnerable);
        assert_eq!(mc.vulnerable_count(), 1);

        run(&mut mc, 34);
        assert_eq!(mc.mode(), Mode::Vulnerable);
        assert_eq!(mc.tick(), Some(Mode::Pursuit)); // 35th vulnerable tick
        assert_eq!(mc.vulnerable_count(), 1);
    }

    #[test]
    fn vulnerable_from_patrol_never_restores_patrol() {
        let mut mc = controller();
        run(&mut mc, 110);
        assert_eq!(mc.mode(), Mode::Patrol);
        mc.frighten();
        run(&mut mc, 35);
        assert_eq!(mc.mode(), Mode::Pursuit);
    }

    #[test]
    fn cycle_counter_freezes_while_vulnerable() {
        let mut mc = controller();
        run(&mut mc, 50);
        let frozen = mc.cycle_count();
        mc.frighten();
        run(&mut mc, 20);
        assert_eq!(mc.cycle_count(), frozen);
        run(&mut mc, 15); // timeout
        assert_eq!(mc.mode(), Mode::Pursuit);
        assert_eq!(mc.cycle_count(), frozen);
        mc.tick();
        assert_eq!(mc.cycle_count(), frozen + 1);
    }

    #[test]
    fn retrigger_restarts_the_vulnerable_timer() {
        let mut mc = controller();
        mc.frighten();
        run(&mut mc, 30);
        assert!(!mc.frighten());
        assert_eq!(mc.vulnerable_count(), 1);
        run(&mut mc, 34);
        assert!(mc.is_vulnerable());
        mc.tick();
        assert_eq!(mc.mode(), Mode::Pursuit);
    }
}
