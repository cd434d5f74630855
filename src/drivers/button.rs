//! Polled trigger-button debouncer.
//!
//! ## Hardware
//!
//! Active-low momentary switch on [`crate::pins::BUTTON_GPIO`] with the
//! internal pull-up enabled.  No ISR: the main loop samples the level every
//! poll and feeds it in here together with the monotonic clock.
//!
//! ## Semantics
//!
//! | State      | Meaning                                            |
//! |------------|----------------------------------------------------|
//! | Idle       | level stable released, nothing pending             |
//! | Debouncing | level changed less than one debounce window ago    |
//! | Stable     | level unchanged for longer than the window         |
//!
//! A *stable pressed* level fires on every poll, not once per edge: holding
//! the button down walks a multi-point session forward point by point.  The
//! trigger consumer's `measuring` guard is what keeps that from re-entering
//! a running acquisition.

/// Debounce phases.  `Debouncing` restarts whenever the raw level flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Debouncing { since_ms: u32 },
    Stable,
}

pub struct ButtonDebouncer {
    debounce_ms: u32,
    state: DebounceState,
    last_pressed: bool,
}

impl ButtonDebouncer {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            state: DebounceState::Idle,
            last_pressed: false,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Feed one observed level (`true` = pressed, polarity already
    /// resolved by the caller).  Returns `true` when the debounced level
    /// is pressed, which holds for every poll while the press lasts.
    pub fn poll(&mut self, pressed: bool, now_ms: u32) -> bool {
        if pressed != self.last_pressed {
            self.last_pressed = pressed;
            self.state = DebounceState::Debouncing { since_ms: now_ms };
            return false;
        }

        match self.state {
            DebounceState::Idle => false,

            DebounceState::Debouncing { since_ms } => {
                if now_ms.wrapping_sub(since_ms) > self.debounce_ms {
                    self.state = if pressed {
                        DebounceState::Stable
                    } else {
                        DebounceState::Idle
                    };
                    pressed
                } else {
                    false
                }
            }

            DebounceState::Stable => pressed,
        }
    }
}
