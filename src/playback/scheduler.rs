/// Handle for one requested display-refresh callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickToken(pub u64);

/// Source of refresh ticks (an animation-frame loop, a timer, a test driver).
///
/// The clock requests exactly one tick at a time and cancels the pending one on stop.
pub trait FrameScheduler {
    fn request(&mut self) -> TickToken;
    fn cancel(&mut self, token: TickToken);
}

/// Scheduler driven by hand: tokens are queued until the caller fires them.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    pending: Vec<TickToken>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest requested tick that has not fired or been cancelled.
    pub fn pending(&self) -> Option<TickToken> {
        self.pending.first().copied()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Takes the oldest pending tick, as the display loop would when it fires it.
    pub fn fire(&mut self) -> Option<TickToken> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request(&mut self) -> TickToken {
        self.next += 1;
        let token = TickToken(self.next);
        self.pending.push(token);
        token
    }

    fn cancel(&mut self, token: TickToken) {
        self.pending.retain(|t| *t != token);
    }
}
