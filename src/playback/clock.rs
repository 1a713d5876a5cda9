use crate::animation::ease::Easing;
use crate::playback::scheduler::{FrameScheduler, TickToken};

/// What happens when playback runs past the end of the timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoopMode {
    #[serde(rename = "once")]
    Once,
    #[default]
    #[serde(rename = "loop")]
    Loop,
    #[serde(rename = "pingpong")]
    PingPong,
}

impl LoopMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "once" => Some(Self::Once),
            "loop" => Some(Self::Loop),
            "pingpong" | "ping-pong" => Some(Self::PingPong),
            _ => None,
        }
    }

    /// Folds elapsed time into `[0, total]`; the flag is set once a `Once` run is over.
    pub fn fold(self, elapsed_ms: f64, total_ms: f64) -> (f64, bool) {
        if total_ms <= 0.0 {
            return (0.0, self == Self::Once);
        }
        let elapsed = elapsed_ms.max(0.0);
        match self {
            Self::Once => {
                if elapsed >= total_ms {
                    (total_ms, true)
                } else {
                    (elapsed, false)
                }
            }
            Self::Loop => (elapsed % total_ms, false),
            Self::PingPong => {
                let phase = elapsed % (2.0 * total_ms);
                if phase >= total_ms {
                    (2.0 * total_ms - phase, false)
                } else {
                    (phase, false)
                }
            }
        }
    }
}

/// Frame resolved for a point on the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelinePosition {
    pub frame_index: usize,
    pub next_index: usize,
    pub local_time_ms: f64,
    /// Progress through the frame, clamped to `[0, 1]`, before easing.
    pub t: f64,
}

/// Finds the frame whose `[start, start + duration)` window holds `current_ms`.
///
/// A time at or past the end resolves to the last frame at `t = 1`.
/// Returns `None` for an empty timeline.
pub fn resolve_position(durations_ms: &[u32], current_ms: f64) -> Option<TimelinePosition> {
    let len = durations_ms.len();
    if len == 0 {
        return None;
    }
    let mut accum = 0.0;
    for (i, &d) in durations_ms.iter().enumerate() {
        let d = f64::from(d);
        if current_ms < accum + d {
            let local = (current_ms - accum).max(0.0);
            let t = if d > 0.0 { (local / d).clamp(0.0, 1.0) } else { 1.0 };
            return Some(TimelinePosition {
                frame_index: i,
                next_index: (i + 1) % len,
                local_time_ms: local,
                t,
            });
        }
        accum += d;
    }
    let last = len - 1;
    let d = f64::from(durations_ms[last]);
    Some(TimelinePosition {
        frame_index: last,
        next_index: 0,
        local_time_ms: d,
        t: 1.0,
    })
}

/// One published playback update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub frame_index: usize,
    pub next_index: usize,
    pub current_time_ms: f64,
    pub local_time_ms: f64,
    pub t: f64,
    pub eased_t: f64,
    /// Horizontal playhead offset on the timeline ruler.
    pub playhead_px: f64,
    /// Set on the tick that ends a `Once` run. Render that frame statically.
    pub finished: bool,
}

/// Pure tick evaluation shared by the live clock and offline renders.
pub fn evaluate_at(
    durations_ms: &[u32],
    elapsed_ms: f64,
    mode: LoopMode,
    easing: Easing,
    pixels_per_second: f64,
) -> Option<Tick> {
    let total: f64 = durations_ms.iter().map(|&d| f64::from(d)).sum();
    let (current, finished) = mode.fold(elapsed_ms, total);
    let pos = resolve_position(durations_ms, current)?;
    Some(Tick {
        frame_index: pos.frame_index,
        next_index: pos.next_index,
        current_time_ms: current,
        local_time_ms: pos.local_time_ms,
        t: pos.t,
        eased_t: easing.apply(pos.t),
        playhead_px: current / 1000.0 * pixels_per_second,
        finished,
    })
}

#[derive(Clone, Debug, PartialEq)]
enum ClockState {
    Stopped,
    Playing {
        start_ms: f64,
        offset_ms: f64,
        durations_ms: Vec<u32>,
        pending: TickToken,
    },
}

/// Maps wall-clock time onto the frames of one timeline.
///
/// Frame durations are captured when playback starts. Every tick schedules the
/// next one; stopping cancels the pending tick and late ticks carrying a stale
/// token are ignored.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    state: ClockState,
    pub loop_mode: LoopMode,
    pub easing: Easing,
    pub pixels_per_second: f64,
}

impl PlaybackClock {
    pub fn new(loop_mode: LoopMode, easing: Easing, pixels_per_second: f64) -> Self {
        Self {
            state: ClockState::Stopped,
            loop_mode,
            easing,
            pixels_per_second,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, ClockState::Playing { .. })
    }

    /// Starts from the beginning of `current_index`. Returns `false` if already
    /// playing or the timeline is empty.
    #[tracing::instrument(skip(self, durations_ms, scheduler))]
    pub fn start(
        &mut self,
        now_ms: f64,
        durations_ms: &[u32],
        current_index: usize,
        scheduler: &mut dyn FrameScheduler,
    ) -> bool {
        if self.is_playing() || durations_ms.is_empty() {
            return false;
        }
        let offset_ms = durations_ms
            .iter()
            .take(current_index)
            .map(|&d| f64::from(d))
            .sum();
        self.state = ClockState::Playing {
            start_ms: now_ms,
            offset_ms,
            durations_ms: durations_ms.to_vec(),
            pending: scheduler.request(),
        };
        true
    }

    /// Cancels the pending tick. Returns `false` if the clock was already stopped.
    #[tracing::instrument(skip(self, scheduler))]
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        match std::mem::replace(&mut self.state, ClockState::Stopped) {
            ClockState::Playing { pending, .. } => {
                scheduler.cancel(pending);
                true
            }
            ClockState::Stopped => false,
        }
    }

    /// Stops without a scheduler at hand, returning the abandoned token.
    /// If that tick still fires it is ignored as stale.
    pub fn halt(&mut self) -> Option<TickToken> {
        match std::mem::replace(&mut self.state, ClockState::Stopped) {
            ClockState::Playing { pending, .. } => Some(pending),
            ClockState::Stopped => None,
        }
    }

    /// Handles a fired tick. Ticks that are not the pending one yield `None`.
    pub fn on_tick(
        &mut self,
        token: TickToken,
        now_ms: f64,
        scheduler: &mut dyn FrameScheduler,
    ) -> Option<Tick> {
        let ClockState::Playing {
            start_ms,
            offset_ms,
            durations_ms,
            pending,
        } = &mut self.state
        else {
            return None;
        };
        if *pending != token {
            tracing::trace!(?token, "ignoring stale playback tick");
            return None;
        }
        let elapsed = now_ms - *start_ms + *offset_ms;
        let tick = evaluate_at(
            durations_ms,
            elapsed,
            self.loop_mode,
            self.easing,
            self.pixels_per_second,
        )?;
        if tick.finished {
            self.state = ClockState::Stopped;
        } else {
            *pending = scheduler.request();
        }
        Some(tick)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
