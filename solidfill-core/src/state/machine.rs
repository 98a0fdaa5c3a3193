//! System state machine
//!
//! Translates one tick of operator input into navigation, target edits and
//! mode changes. A raised error pre-empts every mode.

use super::menu::{MainMenuItem, Menu, MenuCategory, MenuItem, VacuumMenuItem};
use crate::context::AppContext;
use crate::input::InputEvents;
use crate::sensor::{EditMagnitude, SensorArray};
use crate::traits::{ImmediateTransport, PhasedTransport, RelayOutput};

/// Top-level screen mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Live readings
    #[default]
    Info,
    /// Navigating a menu
    Menu,
    /// Editing the focused sensor's target
    SetVacuum,
    /// Error shown until the operator re-initializes
    Error,
}

impl Mode {
    /// Check if this is an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Mode::Error)
    }
}

/// Mode plus nested menu state
#[derive(Debug, Clone, Default)]
pub struct SystemStateMachine {
    mode: Mode,
    menu: Menu,
}

impl SystemStateMachine {
    pub const fn new() -> Self {
        Self {
            mode: Mode::Info,
            menu: Menu::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Force the error mode if an error is set
    pub fn check_error(&mut self, ctx: &AppContext) {
        if ctx.error().is_set() {
            self.set_mode(Mode::Error);
        }
    }

    /// Consume one tick of input
    ///
    /// A click takes precedence over a turn in the same tick.
    pub fn update<I, P, R, const N: usize>(
        &mut self,
        input: InputEvents,
        ctx: &mut AppContext,
        sensors: &mut SensorArray<I, P, R, N>,
    ) where
        I: ImmediateTransport,
        P: PhasedTransport,
        R: RelayOutput,
    {
        self.check_error(ctx);

        if input.click {
            self.click(ctx, sensors);
        } else if input.turn != 0 {
            self.turn(input.turn, sensors);
        }
    }

    fn click<I, P, R, const N: usize>(
        &mut self,
        ctx: &mut AppContext,
        sensors: &mut SensorArray<I, P, R, N>,
    ) where
        I: ImmediateTransport,
        P: PhasedTransport,
        R: RelayOutput,
    {
        match self.mode {
            Mode::Error => {
                ctx.clear_error();
                if sensors.reinit(ctx).is_ok() {
                    self.set_mode(Mode::Info);
                }
            }
            Mode::Info => self.open_menu(Menu::at(MenuCategory::Main, 0)),
            Mode::Menu => match self.menu.selected() {
                MenuItem::Main(MainMenuItem::Back) => self.set_mode(Mode::Info),
                MenuItem::Main(MainMenuItem::Start) => {
                    let _active = ctx.toggle_active();

                    #[cfg(feature = "defmt")]
                    defmt::info!("Active: {}", _active);

                    self.set_mode(Mode::Info);
                }
                MenuItem::Main(MainMenuItem::SetVacuum) => {
                    self.open_menu(Menu::at(MenuCategory::Vacuum, 0))
                }
                MenuItem::Vacuum(VacuumMenuItem::Back) => self.open_menu(Menu::at(
                    MenuCategory::Main,
                    MainMenuItem::SetVacuum.index(),
                )),
                MenuItem::Vacuum(item) => {
                    let selected = item
                        .sensor_index()
                        .is_some_and(|index| sensors.select(index));
                    if selected {
                        sensors.set_edit_magnitude(EditMagnitude::Ones);
                        self.set_mode(Mode::SetVacuum);
                    }
                }
            },
            Mode::SetVacuum => match sensors.edit_magnitude().next() {
                Some(finer) => sensors.set_edit_magnitude(finer),
                None => {
                    sensors.set_edit_magnitude(EditMagnitude::Ones);
                    self.set_mode(Mode::Menu);
                }
            },
        }
    }

    fn turn<I, P, R, const N: usize>(&mut self, turn: i8, sensors: &mut SensorArray<I, P, R, N>)
    where
        I: ImmediateTransport,
        P: PhasedTransport,
        R: RelayOutput,
    {
        match self.mode {
            Mode::Menu => self.menu.scroll(turn),
            Mode::SetVacuum => {
                let step = f32::from(turn.signum()) * sensors.edit_magnitude().value();
                if let Some(sensor) = sensors.current_mut() {
                    sensor.adjust_target(step);
                }
            }
            Mode::Info | Mode::Error => {}
        }
    }

    fn open_menu(&mut self, menu: Menu) {
        self.menu = menu;
        self.set_mode(Mode::Menu);
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            #[cfg(feature = "defmt")]
            defmt::info!("Mode: {} -> {}", self.mode, mode);

            self.mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::array::tests::{two_immediate, TestArray};
    use crate::sensor::mock::MockImmediate;
    use crate::sensor::{Quantity, SensorError};
    use crate::traits::TransportError;

    fn setup() -> (SystemStateMachine, AppContext, TestArray) {
        let mut ctx = AppContext::new();
        let mut sensors = two_immediate(&[1000.0], &[1000.0]);
        sensors.init(2, &mut ctx).unwrap();
        (SystemStateMachine::new(), ctx, sensors)
    }

    fn step(
        machine: &mut SystemStateMachine,
        ctx: &mut AppContext,
        sensors: &mut TestArray,
        input: InputEvents,
    ) {
        machine.update(input, ctx, sensors);
    }

    #[test]
    fn test_info_click_opens_main_menu() {
        let (mut m, mut ctx, mut s) = setup();
        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);

        assert_eq!(m.mode(), Mode::Menu);
        assert_eq!(*m.menu(), Menu::at(MenuCategory::Main, 0));
    }

    #[test]
    fn test_info_ignores_turns() {
        let (mut m, mut ctx, mut s) = setup();
        step(&mut m, &mut ctx, &mut s, InputEvents::turn(1));
        assert_eq!(m.mode(), Mode::Info);
    }

    #[test]
    fn test_main_back_returns_to_info() {
        let (mut m, mut ctx, mut s) = setup();
        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
        assert_eq!(m.mode(), Mode::Info);
    }

    #[test]
    fn test_start_toggles_active() {
        let (mut m, mut ctx, mut s) = setup();

        for expected in [true, false] {
            step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
            step(&mut m, &mut ctx, &mut s, InputEvents::turn(1));
            step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
            assert_eq!(m.mode(), Mode::Info);
            assert_eq!(ctx.is_active(), expected);
        }
    }

    #[test]
    fn test_click_wins_over_turn() {
        let (mut m, mut ctx, mut s) = setup();
        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
        step(
            &mut m,
            &mut ctx,
            &mut s,
            InputEvents {
                turn: 1,
                click: true,
            },
        );
        // Back was clicked; the turn to Start was dropped
        assert_eq!(m.mode(), Mode::Info);
        assert!(!ctx.is_active());
    }

    #[test]
    fn test_vacuum_back_lands_on_set_vacuum_item() {
        let (mut m, mut ctx, mut s) = setup();
        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
        step(&mut m, &mut ctx, &mut s, InputEvents::turn(1));
        step(&mut m, &mut ctx, &mut s, InputEvents::turn(1));
        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
        assert_eq!(*m.menu(), Menu::at(MenuCategory::Vacuum, 0));

        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
        assert_eq!(m.mode(), Mode::Menu);
        assert_eq!(m.menu().selected(), MenuItem::Main(MainMenuItem::SetVacuum));
    }

    fn enter_set(m: &mut SystemStateMachine, ctx: &mut AppContext, s: &mut TestArray, turns: u8) {
        *m = SystemStateMachine::new();
        step(m, ctx, s, InputEvents::CLICK);
        step(m, ctx, s, InputEvents::turn(1));
        step(m, ctx, s, InputEvents::turn(1));
        step(m, ctx, s, InputEvents::CLICK);
        for _ in 0..turns {
            step(m, ctx, s, InputEvents::turn(1));
        }
        step(m, ctx, s, InputEvents::CLICK);
    }

    #[test]
    fn test_set_top_and_bottom_focus_sensor() {
        let (mut m, mut ctx, mut s) = setup();

        enter_set(&mut m, &mut ctx, &mut s, 1);
        assert_eq!(m.mode(), Mode::SetVacuum);
        assert_eq!(s.current_index(), 0);

        enter_set(&mut m, &mut ctx, &mut s, 2);
        assert_eq!(m.mode(), Mode::SetVacuum);
        assert_eq!(s.current_index(), 1);
    }

    #[test]
    fn test_set_bottom_ignored_with_single_sensor() {
        let mut ctx = AppContext::new();
        let mut s = two_immediate(&[], &[]);
        s.init(1, &mut ctx).unwrap();
        let mut m = SystemStateMachine::new();

        enter_set(&mut m, &mut ctx, &mut s, 2);
        assert_eq!(m.mode(), Mode::Menu);
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn test_digit_edit_sequence() {
        let (mut m, mut ctx, mut s) = setup();
        enter_set(&mut m, &mut ctx, &mut s, 1);
        let initial = s.current().unwrap().target();

        for _ in 0..5 {
            step(&mut m, &mut ctx, &mut s, InputEvents::turn(1));
        }
        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
        assert_eq!(s.edit_magnitude(), EditMagnitude::Tenths);
        for _ in 0..3 {
            step(&mut m, &mut ctx, &mut s, InputEvents::turn(1));
        }

        let target = s.current().unwrap().target();
        assert!((target - (initial + 5.3)).abs() < 1e-4);
    }

    #[test]
    fn test_magnitude_cycle_returns_to_vacuum_menu() {
        let (mut m, mut ctx, mut s) = setup();
        enter_set(&mut m, &mut ctx, &mut s, 1);

        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
        assert_eq!(s.edit_magnitude(), EditMagnitude::Hundredths);
        assert_eq!(m.mode(), Mode::SetVacuum);

        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
        assert_eq!(m.mode(), Mode::Menu);
        assert_eq!(m.menu().category(), MenuCategory::Vacuum);
        assert_eq!(s.edit_magnitude(), EditMagnitude::Ones);
    }

    #[test]
    fn test_target_edit_is_unclamped() {
        let (mut m, mut ctx, mut s) = setup();
        enter_set(&mut m, &mut ctx, &mut s, 1);
        for _ in 0..3 {
            step(&mut m, &mut ctx, &mut s, InputEvents::turn(-1));
        }
        assert!((s.current().unwrap().target() - (-4.0)).abs() < 1e-6);
    }

    #[test]
    fn test_error_preempts_any_mode() {
        let (mut m, mut ctx, mut s) = setup();
        enter_set(&mut m, &mut ctx, &mut s, 1);
        ctx.set_active(true);

        ctx.raise(SensorError::AcquisitionRead(
            Quantity::Pressure,
            TransportError::Bus,
        ));
        m.check_error(&ctx);
        assert_eq!(m.mode(), Mode::Error);
        assert!(!ctx.is_active());

        // Turns are ignored in error
        step(&mut m, &mut ctx, &mut s, InputEvents::turn(1));
        assert_eq!(m.mode(), Mode::Error);
    }

    #[test]
    fn test_error_click_reinitializes() {
        let (mut m, mut ctx, mut s) = setup();
        ctx.raise_message("Sensor Init");
        step(&mut m, &mut ctx, &mut s, InputEvents::NONE);
        assert_eq!(m.mode(), Mode::Error);

        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);
        assert_eq!(m.mode(), Mode::Info);
        assert!(!ctx.error().is_set());
        assert!(!ctx.is_active());
    }

    #[test]
    fn test_error_click_with_failing_sensor_stays() {
        let mut ctx = AppContext::new();
        let mut s = TestArray::new();
        let mut bad = MockImmediate::with_pressures(&[]);
        bad.init_result = Some(TransportError::NotResponding);
        s.push(crate::sensor::Sensor::immediate(
            bad,
            crate::sensor::mock::MockRelay::default(),
        ))
        .ok();
        let mut m = SystemStateMachine::new();

        assert!(s.init(1, &mut ctx).is_err());
        step(&mut m, &mut ctx, &mut s, InputEvents::CLICK);

        assert_eq!(m.mode(), Mode::Error);
        assert_eq!(ctx.error().message(), "Sensor Init");
    }
}
