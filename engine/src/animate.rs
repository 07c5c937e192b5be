/// Easing curves for smooth scrolling, domain and range `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    EaseInQuad,
    #[default]
    EaseOutQuad,
    EaseInOutQuad,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum AnimatorState {
    Idle,
    Animating {
        start: (f64, f64),
        target: (f64, f64),
        start_time: f64,
        duration: f64,
        easing: Easing,
    },
}

/// Drives the scroll offset toward a target over a fixed duration,
/// frame-rate independent. Time is injected in f64 milliseconds; sampling
/// with the same clock the caller renders with keeps playback smooth.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    state: AnimatorState,
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self {
            state: AnimatorState::Idle,
        }
    }
}

impl ScrollAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animating from `current` toward `target`. Calling this while a
    /// previous animation is running redirects smoothly: the new run starts
    /// at whatever offset the caller is at now, not the old start point.
    pub fn animate_to(
        &mut self,
        current: (f64, f64),
        target: (f64, f64),
        duration: f64,
        easing: Easing,
        now: f64,
    ) {
        self.state = AnimatorState::Animating {
            start: current,
            target,
            start_time: now,
            duration,
            easing,
        };
    }

    /// Current animated offset, or None when idle. The completing sample
    /// returns the target exactly and transitions back to Idle.
    pub fn sample(&mut self, now: f64) -> Option<(f64, f64)> {
        let AnimatorState::Animating {
            start,
            target,
            start_time,
            duration,
            easing,
        } = self.state
        else {
            return None;
        };

        let progress = if duration <= 0.0 {
            1.0
        } else {
            ((now - start_time) / duration).clamp(0.0, 1.0)
        };

        if progress >= 1.0 {
            self.state = AnimatorState::Idle;
            return Some(target);
        }

        let eased = easing.apply(progress);
        Some((
            start.0 + (target.0 - start.0) * eased,
            start.1 + (target.1 - start.1) * eased,
        ))
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimatorState::Animating { .. })
    }

    pub fn target(&self) -> Option<(f64, f64)> {
        match self.state {
            AnimatorState::Animating { target, .. } => Some(target),
            AnimatorState::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = AnimatorState::Idle;
    }
}
