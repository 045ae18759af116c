/// Frame clock for the mode stack driver
///
/// Simulation runs on a fixed timestep of `MAX_FPS` steps per second while
/// frames are drawn as often as the window asks. Each frame reports how many
/// `step()` calls the driver owes the executing modes.
use std::time::{Duration, Instant};

/// Simulation steps per second
pub const MAX_FPS: u32 = 60;

/// Length of one simulation step in seconds
pub const FIXED_TIMESTEP: f32 = 1.0 / MAX_FPS as f32;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(1_000_000 / MAX_FPS as u64);

/// Steps run in a single frame at most, so a long stall doesn't snowball
pub const MAX_STEPS_PER_FRAME: u32 = 5;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

pub struct GameLoop {
    /// Time not yet consumed by simulation steps
    accumulator: Duration,

    last_frame_time: Instant,
    start_time: Instant,

    frame_times: Vec<Duration>,
    frame_count: u64,
    step_count: u64,
    current_fps: f32,
}

impl GameLoop {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: now,
            start_time: now,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            step_count: 0,
            current_fps: 0.0,
        }
    }

    /// Begin a new frame, returns the number of simulation steps to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Account for `frame_time` of wall time and return the steps now due
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            steps += 1;
        }
        // Whatever is left after hitting the cap is dropped, not carried over
        if steps == MAX_STEPS_PER_FRAME {
            self.accumulator = self.accumulator.min(FIXED_TIMESTEP_DURATION);
        }

        self.step_count += steps as u64;
        steps
    }

    /// Forget accumulated time, e.g. while simulation is disabled
    pub fn discard_pending_steps(&mut self) {
        self.accumulator = Duration::ZERO;
    }

    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.start_time)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Total simulation steps handed out so far
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
