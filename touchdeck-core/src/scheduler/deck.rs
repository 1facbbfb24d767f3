//! The owned control context
//!
//! One `Deck` exists per device. It is built once at startup from the
//! configuration and the hardware parts, ticked from the control loop, and
//! torn down only at shutdown. Every piece of shared mutable state
//! (brightness, active screen, last touch) lives here and is only touched
//! from that one loop, so none of it needs locking.
//!
//! Tick order:
//! 1. GUI toolkit timer work, rate-limited to the GUI interval
//! 2. Touch sample through the debouncer
//! 3. Sample to the power controller (wake) and the GUI toolkit (pointer)
//! 4. Screen inactivity checks
//! 5. Power controller idle check (dim or sleep)
//! 6. Diagnostic snapshot, when due

use heapless::Vec;

use touchdeck_hal::{
    DisplayActuator, MonotonicClock, PixelWriter, Region, SystemMonitor, TouchSource,
};

use super::toolkit::GuiToolkit;
use super::BootError;
use crate::config::{DeckConfig, MAX_SCREENS};
use crate::diag::SystemSnapshot;
use crate::input::{InputDebouncer, TouchSample};
use crate::power::{DisplayPowerController, PowerAction};
use crate::time::{elapsed_ms, Interval};
use crate::ui::Screen;

/// Hardware and toolkit handed to (and returned from) a [`Deck`]
pub struct DeckParts<C, A, T, G, M> {
    pub clock: C,
    pub panel: A,
    pub touch: T,
    pub gui: G,
    pub monitor: M,
}

/// Outcome of one scheduler tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Clock time the tick ran at
    pub now_ms: u32,
    /// GUI toolkit work ran this tick
    pub gui_ran: bool,
    /// Pointer sample delivered this tick
    pub sample: TouchSample,
    /// Power action taken, if any (touch wake wins over idle)
    pub power: Option<PowerAction>,
    /// Screens deactivated by their inactivity timeout
    pub deactivated: usize,
    /// Diagnostic snapshot, when one was due
    pub snapshot: Option<SystemSnapshot>,
}

/// Control context for one touchscreen panel
pub struct Deck<'w, C, A, T, G, M> {
    clock: C,
    power: DisplayPowerController<A>,
    input: InputDebouncer<T>,
    gui: G,
    monitor: M,
    screens: Vec<Screen<'w>, MAX_SCREENS>,
    gui_interval: Interval,
    diagnostics: Option<Interval>,
    touch_resets_inactivity: bool,
    boot_ms: u32,
}

impl<'w, C, A, T, G, M> Deck<'w, C, A, T, G, M>
where
    C: MonotonicClock,
    A: DisplayActuator,
    T: TouchSource,
    G: GuiToolkit,
    M: SystemMonitor,
{
    /// Bring up the panel and touch controller and build the context
    ///
    /// The configuration is sanitized first. One inactive screen is created
    /// per configured screen; widgets are added afterwards through
    /// [`screen_mut`](Self::screen_mut).
    pub fn new(config: &DeckConfig, parts: DeckParts<C, A, T, G, M>) -> Result<Self, BootError> {
        let config = config.clone().sanitized();
        let DeckParts {
            clock,
            mut panel,
            touch,
            gui,
            monitor,
        } = parts;

        if panel.init().is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!("deck: display init failed");
            return Err(BootError::Display);
        }

        let mut input = InputDebouncer::new(touch, config.input.debounce_ms);
        if input.init().is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!("deck: touch init failed");
            return Err(BootError::Touch);
        }

        let now = clock.now_millis();
        let power = DisplayPowerController::new(panel, &config.power, now);

        let mut screens = Vec::new();
        for screen_config in config.screens.iter() {
            // Same capacity as the config list, cannot overflow
            let _ = screens.push(Screen::from_config(screen_config));
        }

        let gui_period = config.scheduler.gui_interval_ms;
        let diagnostics_period = config.scheduler.diagnostics_interval_ms;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "deck: {=usize} screens, gui every {=u32} ms",
            screens.len(),
            gui_period
        );

        Ok(Self {
            clock,
            power,
            input,
            gui,
            monitor,
            screens,
            // Due on the first tick
            gui_interval: Interval::new(gui_period, now.wrapping_sub(gui_period)),
            diagnostics: (diagnostics_period > 0).then(|| Interval::new(diagnostics_period, now)),
            touch_resets_inactivity: config.input.touch_resets_inactivity,
            boot_ms: now,
        })
    }

    /// Run one scheduler tick
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now_millis();

        let gui_ran = self.gui_interval.ready(now);
        if gui_ran {
            self.gui.run_pending_work(now, self.power.panel_mut());
        }

        let sample = self.input.sample(now);
        let wake = self.power.on_touch(&sample, now);
        self.gui.pointer_input(&sample);

        if sample.pressed && self.touch_resets_inactivity {
            for screen in self.screens.iter_mut() {
                screen.record_activity(now);
            }
        }

        let mut deactivated = 0;
        for screen in self.screens.iter_mut() {
            if screen.tick(now) {
                deactivated += 1;
            }
        }

        let idle = self.power.tick(now);

        let mut snapshot = None;
        if let Some(interval) = self.diagnostics.as_mut() {
            if interval.ready(now) {
                let captured =
                    SystemSnapshot::capture(self.monitor.stats(), elapsed_ms(now, self.boot_ms));
                captured.log();
                snapshot = Some(captured);
            }
        }

        TickReport {
            now_ms: now,
            gui_ran,
            sample,
            power: wake.or(idle),
            deactivated,
            snapshot,
        }
    }

    /// Write a block of pixels to the panel
    pub fn flush(&mut self, region: &Region, pixels: &[u16]) {
        self.power.panel_mut().write_pixels(region, pixels);
    }

    /// Register an additional screen
    ///
    /// Returns its index, or hands the screen back when the deck is full.
    pub fn add_screen(&mut self, screen: Screen<'w>) -> Result<usize, Screen<'w>> {
        match self.screens.push(screen) {
            Ok(()) => Ok(self.screens.len() - 1),
            Err(screen) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("deck: screen limit {=usize} reached", MAX_SCREENS);
                Err(screen)
            }
        }
    }

    pub fn screen(&self, index: usize) -> Option<&Screen<'w>> {
        self.screens.get(index)
    }

    pub fn screen_mut(&mut self, index: usize) -> Option<&mut Screen<'w>> {
        self.screens.get_mut(index)
    }

    /// Find a screen by name
    pub fn find_screen(&self, name: &str) -> Option<&Screen<'w>> {
        self.screens.iter().find(|s| s.name() == name)
    }

    /// Find a screen by name for modification
    pub fn find_screen_mut(&mut self, name: &str) -> Option<&mut Screen<'w>> {
        self.screens.iter_mut().find(|s| s.name() == name)
    }

    pub fn screens(&self) -> &[Screen<'w>] {
        &self.screens
    }

    /// Navigate to a screen
    ///
    /// Deactivates every other active screen, then activates the target.
    /// An unknown name changes nothing and returns `false`.
    pub fn show_screen(&mut self, name: &str) -> bool {
        let Some(target) = self.screens.iter().position(|s| s.name() == name) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("deck: no screen named {=str}", name);
            return false;
        };

        let now = self.clock.now_millis();
        for (index, screen) in self.screens.iter_mut().enumerate() {
            if index != target && screen.is_active() {
                screen.deactivate();
            }
        }
        self.screens[target].activate(now);
        true
    }

    /// Current clock time
    pub fn now_ms(&self) -> u32 {
        self.clock.now_millis()
    }

    /// Time since the deck was built
    pub fn uptime_ms(&self) -> u32 {
        elapsed_ms(self.clock.now_millis(), self.boot_ms)
    }

    pub fn power(&self) -> &DisplayPowerController<A> {
        &self.power
    }

    /// Get mutable access to the power controller (external overrides)
    pub fn power_mut(&mut self) -> &mut DisplayPowerController<A> {
        &mut self.power
    }

    pub fn input(&self) -> &InputDebouncer<T> {
        &self.input
    }

    pub fn gui(&self) -> &G {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut G {
        &mut self.gui
    }

    /// Tear down: deactivate every screen and release the parts
    pub fn shutdown(mut self) -> DeckParts<C, A, T, G, M> {
        // Dropping a screen deactivates it
        self.screens.clear();

        #[cfg(feature = "defmt")]
        defmt::info!("deck: shutdown");

        DeckParts {
            clock: self.clock,
            panel: self.power.into_panel(),
            touch: self.input.into_source(),
            gui: self.gui,
            monitor: self.monitor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenConfig;
    use crate::mock::{MockPanel, MockTouch};
    use crate::ui::Widget;
    use core::cell::Cell;
    use heapless::String;
    use touchdeck_hal::{ManualClock, NoMonitor, SystemStats};

    #[derive(Default)]
    struct MockGui {
        runs: u32,
        samples: u32,
        presses: u32,
        flushed: bool,
    }

    impl GuiToolkit for MockGui {
        fn run_pending_work(&mut self, _now_ms: u32, display: &mut dyn PixelWriter) {
            self.runs += 1;
            if !self.flushed {
                display.write_pixels(&Region::new(0, 0, 1, 1), &[0; 4]);
                self.flushed = true;
            }
        }

        fn pointer_input(&mut self, sample: &TouchSample) {
            self.samples += 1;
            if sample.pressed {
                self.presses += 1;
            }
        }
    }

    #[derive(Default)]
    struct CountingWidget {
        renders: Cell<u32>,
        destroys: Cell<u32>,
    }

    impl Widget for CountingWidget {
        fn render(&self) {
            self.renders.set(self.renders.get() + 1);
        }

        fn destroy(&self) {
            self.destroys.set(self.destroys.get() + 1);
        }
    }

    /// Touch source driven through a shared cell
    struct SharedTouch<'a>(&'a Cell<Option<(u16, u16)>>);

    impl TouchSource for SharedTouch<'_> {
        type Error = ();

        fn init(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn get_touch(&mut self) -> Option<(u16, u16)> {
            self.0.get()
        }
    }

    struct FixedMonitor;

    impl SystemMonitor for FixedMonitor {
        fn stats(&mut self) -> SystemStats {
            SystemStats {
                free_heap: 1000,
                largest_free_block: Some(900),
                ..Default::default()
            }
        }
    }

    fn config() -> DeckConfig {
        let mut config = DeckConfig::new();
        for (name, inactivity_s) in [("home", 0), ("lights", 10)] {
            let mut n: String<16> = String::new();
            let _ = n.push_str(name);
            let _ = config.screens.push(ScreenConfig {
                name: n,
                inactivity_s,
            });
        }
        config
    }

    fn parts(
        clock: &ManualClock,
    ) -> DeckParts<&ManualClock, MockPanel, MockTouch, MockGui, NoMonitor> {
        DeckParts {
            clock,
            panel: MockPanel::default(),
            touch: MockTouch::default(),
            gui: MockGui::default(),
            monitor: NoMonitor,
        }
    }

    #[test]
    fn test_boot_errors() {
        let clock = ManualClock::new(0);

        let mut bad_panel = parts(&clock);
        bad_panel.panel.fail_init = true;
        assert_eq!(
            Deck::new(&config(), bad_panel).err(),
            Some(BootError::Display)
        );

        let mut bad_touch = parts(&clock);
        bad_touch.touch.fail_init = true;
        assert_eq!(Deck::new(&config(), bad_touch).err(), Some(BootError::Touch));
    }

    #[test]
    fn test_screens_built_from_config() {
        let clock = ManualClock::new(0);
        let deck = Deck::new(&config(), parts(&clock)).unwrap();
        assert_eq!(deck.screens().len(), 2);
        assert_eq!(deck.find_screen("lights").map(|s| s.inactivity_ms()), Some(10_000));
        assert!(deck.screens().iter().all(|s| !s.is_active()));
        assert_eq!(deck.power().panel().inits, 1);
    }

    #[test]
    fn test_gui_work_rate_limited() {
        let clock = ManualClock::new(0);
        let mut deck = Deck::new(&config(), parts(&clock)).unwrap();

        assert!(deck.tick().gui_ran);
        for _ in 0..9 {
            clock.advance(1);
            assert!(!deck.tick().gui_ran);
        }
        clock.advance(1);
        assert!(deck.tick().gui_ran);

        assert_eq!(deck.gui().runs, 2);
        assert_eq!(deck.gui().samples, 11);
        assert_eq!(deck.power().panel().pixel_writes, 1);
    }

    #[test]
    fn test_touch_wakes_and_reaches_gui() {
        let clock = ManualClock::new(0);
        let mut p = parts(&clock);
        p.touch.point = Some((100, 50));
        let mut deck = Deck::new(&config(), p).unwrap();
        deck.power_mut().set_brightness(0);

        let report = deck.tick();
        assert!(report.sample.pressed);
        assert_eq!(report.power, Some(PowerAction::Woke));
        assert_eq!(deck.power().brightness(), 100);
        assert_eq!(deck.gui().presses, 1);
    }

    #[test]
    fn test_show_screen_switches() {
        let home = CountingWidget::default();
        let lamp = CountingWidget::default();
        let clock = ManualClock::new(0);
        let mut deck = Deck::new(&config(), parts(&clock)).unwrap();
        deck.find_screen_mut("home").unwrap().add_widget(Some(&home));
        deck.find_screen_mut("lights").unwrap().add_widget(Some(&lamp));

        assert!(deck.show_screen("home"));
        assert!(deck.show_screen("lights"));
        assert!(!deck.show_screen("garage"));

        assert_eq!(home.renders.get(), 1);
        assert_eq!(home.destroys.get(), 1);
        assert_eq!(lamp.renders.get(), 1);
        assert!(deck.find_screen("lights").unwrap().is_active());
        assert!(!deck.find_screen("home").unwrap().is_active());
    }

    #[test]
    fn test_press_refreshes_screen_inactivity() {
        let lamp = CountingWidget::default();
        let finger = Cell::new(None);
        let clock = ManualClock::new(0);
        let p = DeckParts {
            clock: &clock,
            panel: MockPanel::default(),
            touch: SharedTouch(&finger),
            gui: MockGui::default(),
            monitor: NoMonitor,
        };
        let mut deck = Deck::new(&config(), p).unwrap();
        deck.find_screen_mut("lights").unwrap().add_widget(Some(&lamp));
        deck.show_screen("lights");

        finger.set(Some((5, 5)));
        clock.set(9_000);
        deck.tick();
        finger.set(None);

        // Deadline moved from 10 s to 19 s
        clock.set(15_000);
        assert_eq!(deck.tick().deactivated, 0);
        clock.set(19_001);
        assert_eq!(deck.tick().deactivated, 1);

        // A press never reactivates an inactive screen
        finger.set(Some((5, 5)));
        clock.set(19_100);
        deck.tick();
        assert!(!deck.find_screen("lights").unwrap().is_active());
    }

    #[test]
    fn test_press_refresh_can_be_disabled() {
        let finger = Cell::new(None);
        let clock = ManualClock::new(0);
        let mut config = config();
        config.input.touch_resets_inactivity = false;
        let p = DeckParts {
            clock: &clock,
            panel: MockPanel::default(),
            touch: SharedTouch(&finger),
            gui: MockGui::default(),
            monitor: NoMonitor,
        };
        let mut deck = Deck::new(&config, p).unwrap();
        deck.show_screen("lights");

        finger.set(Some((5, 5)));
        clock.set(9_000);
        deck.tick();

        clock.set(10_001);
        assert_eq!(deck.tick().deactivated, 1);
    }

    #[test]
    fn test_screen_times_out_without_touch() {
        let lamp = CountingWidget::default();
        let clock = ManualClock::new(0);
        let mut deck = Deck::new(&config(), parts(&clock)).unwrap();
        deck.find_screen_mut("lights").unwrap().add_widget(Some(&lamp));
        deck.show_screen("lights");

        clock.set(10_000);
        assert_eq!(deck.tick().deactivated, 0);
        clock.set(10_001);
        assert_eq!(deck.tick().deactivated, 1);
        assert_eq!(lamp.destroys.get(), 1);
        clock.set(10_050);
        assert_eq!(deck.tick().deactivated, 0);
    }

    #[test]
    fn test_diagnostics_interval() {
        let clock = ManualClock::new(0);
        let p = DeckParts {
            clock: &clock,
            panel: MockPanel::default(),
            touch: MockTouch::default(),
            gui: MockGui::default(),
            monitor: FixedMonitor,
        };
        let mut deck = Deck::new(&config(), p).unwrap();

        clock.set(59_999);
        assert!(deck.tick().snapshot.is_none());
        clock.set(60_000);
        let snapshot = deck.tick().snapshot.unwrap();
        assert_eq!(snapshot.uptime_ms, 60_000);
        assert_eq!(snapshot.fragmentation_permille, Some(100));
    }

    #[test]
    fn test_diagnostics_disabled() {
        let clock = ManualClock::new(0);
        let mut config = config();
        config.scheduler.diagnostics_interval_ms = 0;
        let mut deck = Deck::new(&config, parts(&clock)).unwrap();

        clock.set(600_000);
        assert!(deck.tick().snapshot.is_none());
    }

    #[test]
    fn test_shutdown_destroys_once() {
        let home = CountingWidget::default();
        let clock = ManualClock::new(0);
        let mut deck = Deck::new(&config(), parts(&clock)).unwrap();
        deck.find_screen_mut("home").unwrap().add_widget(Some(&home));
        deck.show_screen("home");

        let released = deck.shutdown();
        assert_eq!(home.destroys.get(), 1);
        assert_eq!(released.panel.inits, 1);
    }

    #[test]
    fn test_flush_reaches_panel() {
        let clock = ManualClock::new(0);
        let mut deck = Deck::new(&config(), parts(&clock)).unwrap();
        let region = Region::new(0, 0, 3, 0);
        deck.flush(&region, &[0xFFFF; 4]);
        assert_eq!(deck.power().panel().last_region, Some(region));
    }

    #[test]
    fn test_add_screen_limit() {
        let clock = ManualClock::new(0);
        let mut deck = Deck::new(&config(), parts(&clock)).unwrap();
        for i in 2..MAX_SCREENS {
            assert_eq!(deck.add_screen(Screen::new("extra")).ok(), Some(i));
        }
        assert!(deck.add_screen(Screen::new("overflow")).is_err());
    }
}
