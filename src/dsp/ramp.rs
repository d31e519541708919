//! Linear ramp generator.

/*
Linear Ramps
============

A ramp walks a value from a start point to a target in fixed increments, one
increment per call to `advance()`. Envelopes use it to fade a voice in and
out, and leaf oscillators use it for portamento (lag).

Vocabulary
----------

  value    The ramp's current output.

  target   Where the ramp is heading. Once reached, the ramp holds there.

  step     The largest change applied per `advance()`. Always positive; the
           direction comes from the sign of (target - value).


The Shape
---------

    target ┤            ●───────────  (holds)
           │         ●
           │      ●
           │   ●
    start  ●─────────────────────────→ advance() calls

The last step is shortened so the ramp lands exactly on the target. After
that every call returns the same value, which is how callers detect that the
ramp has converged: compare the new value against the previous one.


Monotonicity
------------

A ramp never overshoots and never reverses. Between construction and
convergence the output is strictly monotone toward the target, so an envelope
built on it can never click by jumping backwards.
*/

/// Default per-call increment.
pub const DEFAULT_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    value: f32,
    target: f32,
    step: f32,
}

impl Ramp {
    /// Ramp from `start` toward `target` at [`DEFAULT_STEP`] per call.
    ///
    /// A non-finite target holds the ramp at `start`. A NaN start begins at
    /// the target. If neither is usable the ramp sits at zero.
    pub fn new(start: f32, target: f32) -> Self {
        let (value, target) = match (start.is_finite(), target.is_finite()) {
            (true, true) => (start, target),
            (true, false) => (start, start),
            (false, true) => (target, target),
            (false, false) => (0.0, 0.0),
        };
        Self {
            value,
            target,
            step: DEFAULT_STEP,
        }
    }

    /// Override the per-call increment.
    ///
    /// Non-finite or negative steps fall back to a jump: the next `advance()`
    /// lands on the target.
    pub fn with_step(mut self, step: f32) -> Self {
        self.step = if step.is_finite() && step >= 0.0 {
            step
        } else {
            f32::INFINITY
        };
        self
    }

    /// Move one step toward the target and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let remaining = self.target - self.value;
        if remaining.abs() <= self.step {
            self.value = self.target;
        } else {
            self.value += self.step.copysign(remaining);
        }
        self.value
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True once the ramp sits on its target.
    pub fn is_done(&self) -> bool {
        self.value == self.target
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rises_by_default_step() {
        let mut ramp = Ramp::new(0.0, 1.0);
        assert!((ramp.advance() - 0.1).abs() < 1e-6);
        assert!((ramp.advance() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn lands_exactly_on_target_and_holds() {
        let mut ramp = Ramp::new(0.0, 1.0);
        for _ in 0..10 {
            ramp.advance();
        }
        assert_eq!(ramp.value(), 1.0);
        assert!(ramp.is_done());

        // Converged: repeated calls return the same value
        assert_eq!(ramp.advance(), 1.0);
        assert_eq!(ramp.advance(), 1.0);
    }

    #[test]
    fn falls_toward_lower_target() {
        let mut ramp = Ramp::new(0.55, 0.0);
        let mut previous = ramp.value();
        for _ in 0..20 {
            let next = ramp.advance();
            assert!(next <= previous, "ramp must never rise while falling");
            assert!(next >= 0.0, "ramp must never overshoot");
            previous = next;
        }
        assert_eq!(ramp.value(), 0.0);
    }

    #[test]
    fn infinite_step_jumps() {
        let mut ramp = Ramp::new(0.2, 0.9).with_step(f32::INFINITY);
        assert_eq!(ramp.advance(), 0.9);

        let mut ramp = Ramp::new(0.2, 0.9).with_step(-1.0);
        assert_eq!(ramp.advance(), 0.9);
    }

    #[test]
    fn non_finite_endpoints_never_run_away() {
        let mut ramp = Ramp::new(0.3, f32::NAN);
        assert_eq!(ramp.target(), 0.3);
        assert_eq!(ramp.advance(), 0.3);

        let mut ramp = Ramp::new(0.0, f32::INFINITY);
        for _ in 0..100 {
            ramp.advance();
        }
        assert_eq!(ramp.value(), 0.0);

        let mut ramp = Ramp::new(f32::NAN, 0.5);
        assert!(ramp.is_done());
        assert_eq!(ramp.advance(), 0.5);
    }

    #[test]
    fn start_equal_to_target_is_already_converged() {
        let mut ramp = Ramp::new(0.4, 0.4);
        assert!(ramp.is_done());
        assert_eq!(ramp.advance(), 0.4);
    }
}
