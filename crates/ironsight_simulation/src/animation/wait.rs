//! Polling ожидание завершения motion (cooperative, без suspension)

use super::oracle::{AnimationOracle, Motion};

/// Результат одного poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    Pending,
    Completed,
    /// Oracle так и не ответил за `limit`: force-complete
    TimedOut,
}

/// Ожидание motion, запрошенного через `request_trigger`
///
/// Completed когда:
/// - motion не поддерживается graph'ом (degrade → immediate)
/// - motion был замечен playing, а теперь не играет
/// - progress дошёл до 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OracleWait {
    pub motion: Motion,
    pub elapsed: f32,
    seen_playing: bool,
}

impl OracleWait {
    pub fn new(motion: Motion) -> Self {
        Self {
            motion,
            elapsed: 0.0,
            seen_playing: false,
        }
    }

    pub fn poll(&mut self, dt: f32, oracle: &dyn AnimationOracle, limit: f32) -> WaitStatus {
        if !oracle.supports(self.motion) {
            return WaitStatus::Completed;
        }

        self.elapsed += dt;

        if oracle.is_playing(self.motion) {
            self.seen_playing = true;
            if oracle.normalized_progress(self.motion) >= 1.0 {
                return WaitStatus::Completed;
            }
        } else if self.seen_playing {
            return WaitStatus::Completed;
        }

        if self.elapsed >= limit {
            WaitStatus::TimedOut
        } else {
            WaitStatus::Pending
        }
    }
}
