//! In-memory board used by the unit tests.
//!
//! Time only moves when the code under test asks for a delay, or when it
//! samples the echo line (each sample costs one `tick`), which makes the
//! ranging loop fully deterministic.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::level::{Edge, Level};
use crate::traits::board::Board;
use crate::traits::chip::ChipControl;
use crate::traits::clock::Clock;
use crate::traits::pwm::PwmControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Echo line behaviour: high on `[rise, fall)` in absolute mock time.
#[derive(Debug, Clone, Copy)]
pub struct EchoPlan {
    pub pin: u8,
    pub rise: Option<Duration>,
    pub fall: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct ChipState {
    pub claimed: BTreeMap<u8, Direction>,
    pub outputs: BTreeMap<u8, Level>,
    pub inputs: BTreeMap<u8, Level>,
    pub alerts: Vec<(u8, Edge)>,
    pub writes: Vec<(u8, Level)>,
    pub freed: Vec<u8>,
    pub echo: Option<EchoPlan>,
    pub echo_reads: usize,
    pub failing: BTreeSet<u8>,
    pub closed: usize,
}

#[derive(Debug, Default)]
pub struct PwmState {
    pub widths: Vec<(u8, u32)>,
    pub disconnected: usize,
}

/// Shared mock time.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now: Rc<Cell<Duration>>,
    pub delays: Rc<RefCell<Vec<Duration>>>,
}

impl MockClock {
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for MockClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn delay(&self, duration: Duration) {
        self.delays.borrow_mut().push(duration);
        self.advance(duration);
    }
}

pub struct MockChip {
    state: Rc<RefCell<ChipState>>,
    clock: MockClock,
    tick: Duration,
}

impl ChipControl for MockChip {
    fn claim_input(&mut self, pin: u8) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.failing.contains(&pin) {
            return Err(Error::transport(format!("line {pin} is busy")));
        }
        state.claimed.insert(pin, Direction::Input);
        Ok(())
    }

    fn claim_output(&mut self, pin: u8) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.failing.contains(&pin) {
            return Err(Error::transport(format!("line {pin} is busy")));
        }
        state.claimed.insert(pin, Direction::Output);
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<Level> {
        let now = self.clock.now();
        let mut state = self.state.borrow_mut();
        if state.claimed.get(&pin) != Some(&Direction::Input) {
            return Err(Error::transport(format!("line {pin} is not an input")));
        }
        if let Some(plan) = state.echo.filter(|plan| plan.pin == pin) {
            state.echo_reads += 1;
            drop(state);
            let risen = plan.rise.is_some_and(|rise| now >= rise);
            let fallen = plan.fall.is_some_and(|fall| now >= fall);
            self.clock.advance(self.tick);
            return Ok(Level::from(risen && !fallen));
        }
        Ok(state.inputs.get(&pin).copied().unwrap_or_default())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.claimed.get(&pin) != Some(&Direction::Output) {
            return Err(Error::transport(format!("line {pin} is not an output")));
        }
        state.outputs.insert(pin, level);
        state.writes.push((pin, level));
        Ok(())
    }

    fn free(&mut self, pin: u8) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.claimed.remove(&pin);
        state.freed.push(pin);
        Ok(())
    }

    fn claim_alert(&mut self, pin: u8, edge: Edge) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.claimed.insert(pin, Direction::Input);
        state.alerts.push((pin, edge));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.claimed.clear();
        state.closed += 1;
        Ok(())
    }
}

pub struct MockPwm {
    state: Rc<RefCell<PwmState>>,
}

impl PwmControl for MockPwm {
    fn set_pulse_width(&mut self, pin: u8, micros: u32) -> Result<()> {
        self.state.borrow_mut().widths.push((pin, micros));
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.state.borrow_mut().disconnected += 1;
        Ok(())
    }
}

/// Hands out chips and PWM handles that share state with the test.
#[derive(Clone, Default)]
pub struct MockBoard {
    pub chip: Rc<RefCell<ChipState>>,
    pub pwm: Rc<RefCell<PwmState>>,
    pub clock: MockClock,
    pub opened: Rc<Cell<usize>>,
    pub pwm_unavailable: bool,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chip handle outside of any session, for driving devices directly.
    pub fn chip(&self) -> MockChip {
        MockChip {
            state: Rc::clone(&self.chip),
            clock: self.clock.clone(),
            tick: Duration::from_micros(1),
        }
    }

    pub fn pwm_handle(&self) -> MockPwm {
        MockPwm {
            state: Rc::clone(&self.pwm),
        }
    }
}

impl Board for MockBoard {
    type Chip = MockChip;
    type Pwm = MockPwm;

    fn open_chip(&mut self, _index: u32) -> Result<MockChip> {
        self.opened.set(self.opened.get() + 1);
        Ok(self.chip())
    }

    fn connect_pwm(&mut self) -> Result<MockPwm> {
        if self.pwm_unavailable {
            return Err(Error::transport("pwm daemon not running"));
        }
        Ok(self.pwm_handle())
    }
}
