//! Animation sessions and frame scheduling
//!
//! Every render starts a new generation. Frame tokens carry the generation
//! they were issued for, and a session only accepts tokens of its own
//! generation, so frames queued by a superseded render never draw.

use std::collections::VecDeque;

use serde::Serialize;

/// Where a chart is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationPhase {
    Idle,
    Animating,
    Settled,
}

/// Permission to draw one frame of one render generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken {
    generation: u64,
}

impl FrameToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Host hook that arranges for `ChartSession::on_frame` to be called later
/// with `token`, e.g. on the next display refresh
pub trait FrameScheduler {
    fn request_frame(&mut self, token: FrameToken);
}

/// Queue-backed scheduler for tests and headless hosts
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: VecDeque<FrameToken>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest requested token
    pub fn next(&mut self) -> Option<FrameToken> {
        self.pending.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self, token: FrameToken) {
        self.pending.push_back(token);
    }
}

/// Progress of one render's animation
#[derive(Debug, Clone)]
pub struct AnimationSession {
    generation: u64,
    total_steps: u32,
    frames: u32,
    phase: AnimationPhase,
}

impl AnimationSession {
    pub fn new(generation: u64, total_steps: u32) -> Self {
        Self {
            generation,
            total_steps: total_steps.max(1),
            frames: 0,
            phase: AnimationPhase::Animating,
        }
    }

    pub fn token(&self) -> FrameToken {
        FrameToken {
            generation: self.generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `token` belongs to this session and it is still animating
    pub fn accepts(&self, token: FrameToken) -> bool {
        token.generation == self.generation && self.phase == AnimationPhase::Animating
    }

    /// Step forward one frame and return the new progress
    pub fn advance(&mut self) -> f64 {
        if self.phase == AnimationPhase::Animating {
            self.frames += 1;
            if self.frames >= self.total_steps {
                self.phase = AnimationPhase::Settled;
            }
        }
        self.progress()
    }

    /// Fraction of the animation completed, in [0, 1]
    pub fn progress(&self) -> f64 {
        (self.frames as f64 / self.total_steps as f64).min(1.0)
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase == AnimationPhase::Settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_reaches_one_exactly() {
        let mut session = AnimationSession::new(1, 200);
        let mut last = 0.0;
        let mut frames = 0;
        while !session.is_settled() {
            let progress = session.advance();
            assert!(progress > last);
            last = progress;
            frames += 1;
        }
        assert_eq!(frames, 200);
        assert_eq!(session.progress(), 1.0);
        assert_eq!(session.advance(), 1.0);
    }

    #[test]
    fn test_tokens_are_generation_scoped() {
        let old = AnimationSession::new(1, 10);
        let new = AnimationSession::new(2, 10);
        assert!(!new.accepts(old.token()));
        assert!(new.accepts(new.token()));
    }

    #[test]
    fn test_settled_session_rejects_tokens() {
        let mut session = AnimationSession::new(3, 1);
        let token = session.token();
        session.advance();
        assert!(session.is_settled());
        assert!(!session.accepts(token));
    }

    #[test]
    fn test_zero_steps_treated_as_one() {
        let mut session = AnimationSession::new(1, 0);
        assert_eq!(session.advance(), 1.0);
        assert!(session.is_settled());
    }

    #[test]
    fn test_manual_scheduler_fifo() {
        let mut scheduler = ManualScheduler::new();
        scheduler.request_frame(AnimationSession::new(1, 5).token());
        scheduler.request_frame(AnimationSession::new(2, 5).token());
        assert_eq!(scheduler.pending(), 2);
        assert_eq!(scheduler.next().map(|t| t.generation()), Some(1));
        assert_eq!(scheduler.next().map(|t| t.generation()), Some(2));
        assert_eq!(scheduler.next(), None);
    }
}
