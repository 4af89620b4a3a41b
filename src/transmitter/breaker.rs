//! Circuit breaker decorator for transmitters.
//!
//! A plain binary trip with a single-trial half-open probe, not a
//! token-bucket or sliding-window breaker. After `max_failures`
//! connection-class failures the breaker opens and rejects every call
//! without touching the delegate; once the recovery period elapses it
//! permits exactly one trial call per cooldown window.

use std::time::{Duration, Instant};

use log::warn;
use parking_lot::Mutex;

use crate::{config::BreakerConfig, payload::Payload};

use super::{TransmitError, Transmitter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Circuit {
    Closed,
    Open,
    PartiallyOpen,
}

struct BreakerState {
    circuit: Circuit,
    failures: u32,
    opened_at: Option<Instant>,
}

/// Transmitter wrapping another transmitter with failure isolation.
///
/// Only connection-class failures ([`TransmitError::is_connection_error`])
/// count towards tripping; encoding and compression failures propagate
/// without affecting breaker state. While open, `transmit` fails fast with
/// [`TransmitError::CircuitOpen`].
pub struct CircuitBreakerTransmitter {
    max_failures: u32,
    recovery_period: Duration,
    state: Mutex<BreakerState>,
    delegate: Box<dyn Transmitter>,
}

impl CircuitBreakerTransmitter {
    pub fn new(config: BreakerConfig, delegate: Box<dyn Transmitter>) -> Self {
        Self {
            max_failures: config.max_failures,
            recovery_period: config.recovery_period,
            state: Mutex::new(BreakerState {
                circuit: Circuit::Closed,
                failures: 0,
                opened_at: None,
            }),
            delegate,
        }
    }

    /// Evaluate the open-to-partially-open transition and report the
    /// circuit state the current call must honour.
    fn admit(&self) -> Circuit {
        let mut state = self.state.lock();
        if state.circuit == Circuit::Open {
            let recovered = state
                .opened_at
                .is_some_and(|opened| opened.elapsed() >= self.recovery_period);
            if recovered {
                state.circuit = Circuit::PartiallyOpen;
                // Partial credit towards recovery; a failing trial call
                // increments the counter straight back.
                state.failures = state.failures.saturating_sub(1);
            }
        }
        state.circuit
    }

    fn mark_closed(&self) {
        let mut state = self.state.lock();
        if state.circuit != Circuit::Closed {
            state.circuit = Circuit::Closed;
            state.failures = 0;
        }
    }

    fn record_failure(&self) {
        let mut state = self.state.lock();
        state.failures = (state.failures + 1).min(self.max_failures);
        if state.failures >= self.max_failures && state.circuit != Circuit::Open {
            state.circuit = Circuit::Open;
            state.opened_at = Some(Instant::now());
            warn!(
                "circuit opened after {} connection failures",
                state.failures
            );
        }
    }
}

impl Transmitter for CircuitBreakerTransmitter {
    fn open(&self) -> Result<(), TransmitError> {
        self.delegate.open()
    }

    fn transmit(&self, payload: &Payload) -> Result<(), TransmitError> {
        if self.admit() == Circuit::Open {
            return Err(TransmitError::CircuitOpen);
        }
        match self.delegate.transmit(payload) {
            Ok(()) => {
                self.mark_closed();
                Ok(())
            }
            Err(err) => {
                if err.is_connection_error() {
                    self.record_failure();
                }
                Err(err)
            }
        }
    }

    fn close(&self) -> Result<(), TransmitError> {
        self.delegate.close()
    }
}
