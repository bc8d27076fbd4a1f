use crate::api::types::TimerId;

/// Tolerance when comparing deadlines, so 45 steps of 1/60 s still reach 0.75 s.
const DEADLINE_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    deadline: f64,
    /// `Some(period)` for recurring timers.
    period: Option<f64>,
    payload: T,
}

/// Frame-driven timer wheel.
///
/// Stands in for `setTimeout`/`setInterval`: timers are scheduled relative to
/// the queue's own clock and fire from [`TimerQueue::advance`]. Cancelling a
/// handle guarantees its payload is never returned again.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: f64,
    timers: Vec<Timer<T>>,
    next_id: u32,
}

impl<T: Copy> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            timers: Vec::with_capacity(8),
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    /// Fire `payload` once, `delay` seconds from now.
    pub fn schedule_once(&mut self, delay: f32, payload: T) -> TimerId {
        let id = self.alloc_id();
        self.timers.push(Timer {
            id,
            deadline: self.now + delay.max(0.0) as f64,
            period: None,
            payload,
        });
        id
    }

    /// Fire `payload` every `period` seconds until cancelled.
    pub fn schedule_every(&mut self, period: f32, payload: T) -> TimerId {
        let id = self.alloc_id();
        // A zero period would fire unboundedly inside a single advance.
        let period = (period as f64).max(1e-3);
        self.timers.push(Timer {
            id,
            deadline: self.now + period,
            period: Some(period),
            payload,
        });
        id
    }

    /// Cancel a timer. Returns false if it had already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_live(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Advance the clock by `dt` seconds and return fired payloads in deadline order.
    pub fn advance(&mut self, dt: f32) -> Vec<(TimerId, T)> {
        self.now += dt.max(0.0) as f64;
        let mut fired: Vec<(f64, TimerId, T)> = Vec::new();

        let now = self.now;
        self.timers.retain_mut(|t| {
            while t.deadline <= now + DEADLINE_EPSILON {
                fired.push((t.deadline, t.id, t.payload));
                match t.period {
                    Some(period) => t.deadline += period,
                    None => return false,
                }
            }
            true
        });

        fired.sort_by(|a, b| a.0.total_cmp(&b.0));
        fired.into_iter().map(|(_, id, payload)| (id, payload)).collect()
    }

    /// Seconds elapsed on this queue's clock.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

impl<T: Copy> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
