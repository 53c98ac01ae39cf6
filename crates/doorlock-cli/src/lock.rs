//! The simulated door lock: a mock keypad matrix, relay and lamp wired to
//! the access controller, driven by a tokio poll loop.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::Context;
use doorlock_controller::AccessController;
use doorlock_core::LockConfig;
use doorlock_hardware::devices::{FlashingIndicator, RelayActuator};
use doorlock_hardware::lcd::LcdDisplay;
use doorlock_hardware::mock::{MockColumnPin, MockMatrix, MockMatrixHandle, MockPin, MockRowPin};
use doorlock_keypad::{Keypad, KeypadMatrix};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

type SimulatedKeypad = Keypad<MockRowPin, MockColumnPin>;
type SimulatedController =
    AccessController<LcdDisplay, RelayActuator<MockPin>, FlashingIndicator<MockPin>>;

/// Current monotonic time, following tokio's clock so paused tests work.
fn now() -> Instant {
    time::Instant::now().into_std()
}

/// Everything a real board would have, with mock pins underneath.
pub struct SimulatedLock {
    keypad: SimulatedKeypad,
    controller: SimulatedController,
    relay: MockPin,
    lamp: MockPin,
    rendered_revision: Option<u64>,
}

impl SimulatedLock {
    /// Wire up the lock and return the handle used to press keys.
    pub fn new(config: &LockConfig) -> anyhow::Result<(Self, MockMatrixHandle)> {
        let (rows, cols, handle) = MockMatrix::new(config.keypad.rows, config.keypad.cols)?;
        let matrix = KeypadMatrix::new(rows, cols)?;
        let keypad = Keypad::from_config(matrix, config).context("invalid keypad layout")?;

        let relay = MockPin::new(false);
        let lamp = MockPin::new(false);
        let controller = AccessController::new(
            config,
            LcdDisplay::default(),
            RelayActuator::new(relay.clone()),
            FlashingIndicator::new(lamp.clone()),
        )
        .context("invalid lock configuration")?;

        let lock = Self {
            keypad,
            controller,
            relay,
            lamp,
            rendered_revision: None,
        };
        Ok((lock, handle))
    }

    pub fn controller(&self) -> &SimulatedController {
        &self.controller
    }

    pub fn start(&mut self) {
        self.controller.start();
    }

    /// One pass of the main loop: scan, dispatch, advance timers.
    pub fn poll(&mut self, now: Instant) -> Option<char> {
        let key = self.keypad.get_key(now);
        if let Some(key) = key {
            self.controller.handle_key(key, now);
        }
        self.controller.handle_tick(now);
        self.controller.indicator_mut().update(now);
        key
    }

    /// The LCD and outputs as text, if the LCD changed since the last call.
    pub fn take_frame(&mut self) -> Option<String> {
        let lcd = self.controller.display();
        if self.rendered_revision == Some(lcd.revision()) {
            return None;
        }
        self.rendered_revision = Some(lcd.revision());

        let border = format!("+{}+", "-".repeat(lcd.columns()));
        let mut frame = border.clone();
        for line in lcd.get_all_lines() {
            frame.push_str(&format!("\n|{}|", line));
        }
        frame.push_str(&format!("\n{}", border));
        frame.push_str(&format!(
            "\n relay: {}  lamp: {}  mode: {}",
            if self.relay.level() { "open" } else { "locked" },
            self.controller.indicator().mode(),
            self.controller.mode()
        ));
        Some(frame)
    }

    /// Run until `shutdown` completes.
    ///
    /// The loop wakes on the poll interval and, while the lamp is flashing,
    /// at each lamp toggle in between.
    pub async fn run<F>(&mut self, poll_interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut ticker = time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.start();
        info!(?poll_interval, "Door lock running");

        loop {
            let lamp_wait = self
                .controller
                .indicator()
                .time_until_toggle(now())
                .unwrap_or(poll_interval);

            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    if let Some(key) = self.poll(now()) {
                        debug!(%key, mode = %self.controller.mode(), "Key handled");
                    }
                }
                _ = time::sleep(lamp_wait) => {
                    self.controller.indicator_mut().update(now());
                }
            }

            if let Some(frame) = self.take_frame() {
                println!("{frame}");
            }
        }

        info!(
            mode = %self.controller.mode(),
            lamp = self.lamp.level(),
            transitions = self.controller.history().len(),
            "Door lock stopped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::feed_keys;
    use doorlock_controller::LockMode;
    use doorlock_hardware::IndicatorMode;
    use tokio::sync::oneshot;

    const POLL: Duration = Duration::from_millis(100);
    const HOLD: Duration = Duration::from_millis(250);

    async fn run_with_input(
        lock: &mut SimulatedLock,
        handle: MockMatrixHandle,
        input: &'static [u8],
    ) {
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let key_map = LockConfig::default().key_map().unwrap();

        let feeder = async move {
            feed_keys(input, handle, key_map, HOLD).await.unwrap();
            let _ = done_tx.send(());
        };
        let shutdown = async move {
            let _ = done_rx.await;
        };

        tokio::join!(lock.run(POLL, shutdown), feeder);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_password_opens_door() {
        let (mut lock, handle) = SimulatedLock::new(&LockConfig::default()).unwrap();

        run_with_input(&mut lock, handle, b"1234#\n").await;

        assert_eq!(lock.controller().mode(), LockMode::DoorOpen);
        assert!(lock.relay.level());
        assert!(lock.controller().indicator().mode().is_flashing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_password_counts_once_per_press() {
        let (mut lock, handle) = SimulatedLock::new(&LockConfig::default()).unwrap();

        run_with_input(&mut lock, handle, b"99#\n").await;

        assert_eq!(lock.controller().mode(), LockMode::Idle);
        assert_eq!(lock.controller().state().failed_attempts(), 1);
        assert_eq!(lock.controller().indicator().mode(), IndicatorMode::Solid);
    }

    #[test]
    fn test_poll_sequence_without_runtime() {
        let (mut lock, handle) = SimulatedLock::new(&LockConfig::default()).unwrap();
        let t0 = Instant::now();
        lock.start();

        handle.press(0, 0).unwrap();
        assert_eq!(lock.poll(t0), Some('1'));
        assert_eq!(lock.poll(t0 + POLL), None);
        handle.release(0, 0).unwrap();
        assert_eq!(lock.poll(t0 + 2 * POLL), None);

        assert_eq!(lock.controller().state().input_len(), 1);
    }

    #[test]
    fn test_frame_only_on_change() {
        let (mut lock, _handle) = SimulatedLock::new(&LockConfig::default()).unwrap();
        lock.start();

        let frame = lock.take_frame().unwrap();
        assert!(frame.contains("|Enter Password: |"));
        assert!(frame.contains("relay: locked"));
        assert!(lock.take_frame().is_none());
    }
}
