//! Input Capture and Snapshotting
//!
//! The simulation only ever polls an [`InputSource`] once per tick.
//! [`KeyboardState`] is the host-facing held-key set; [`InputFrame`] is the
//! frozen per-tick snapshot; [`InputRecording`] delta-compresses a session's
//! frames for replay.

use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};

// =============================================================================
// INPUT SOURCE
// =============================================================================

/// Directional intent, each axis in {-1, 0, 1}.
///
/// Not normalized: a diagonal moves a full step on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    /// -1 left, 1 right
    pub dx: i8,
    /// -1 up, 1 down
    pub dy: i8,
}

impl Direction {
    /// No movement.
    pub const NONE: Self = Self { dx: 0, dy: 0 };

    /// Create a direction, collapsing each axis to its sign.
    pub const fn new(dx: i8, dy: i8) -> Self {
        Self {
            dx: dx.signum(),
            dy: dy.signum(),
        }
    }
}

/// Anything the simulation can poll for per-tick intent.
pub trait InputSource {
    /// Current directional intent.
    fn direction(&self) -> Direction;

    /// Whether the fire trigger is held.
    fn is_firing(&self) -> bool;
}

// =============================================================================
// KEYBOARD STATE
// =============================================================================

/// Key bound to firing.
pub const FIRE_KEY: &str = "z";

/// Live set of held keys, fed by the host's key-down/key-up events.
///
/// Key identifiers are stored lowercase. Construct one at bootstrap and call
/// [`KeyboardState::release_all`] at session teardown.
#[derive(Clone, Debug, Default)]
pub struct KeyboardState {
    held: BTreeSet<String>,
}

impl KeyboardState {
    /// Create an empty key set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press.
    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_lowercase());
    }

    /// Record a key release.
    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    /// Check if a key is held (case-insensitive).
    pub fn is_key_down(&self, key: &str) -> bool {
        self.held.contains(&key.to_lowercase())
    }

    /// Drop every held key.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Freeze the current state into a per-tick frame.
    pub fn snapshot(&self) -> InputFrame {
        let dir = self.direction();
        let mut frame = InputFrame::with_movement(dir.dx, dir.dy);
        frame.set_fire(self.is_firing());
        frame
    }

    fn any_down(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.held.contains(*k))
    }
}

impl InputSource for KeyboardState {
    /// Left wins over right and up wins over down when both are held.
    fn direction(&self) -> Direction {
        let dx = if self.any_down(&["arrowleft", "a"]) {
            -1
        } else if self.any_down(&["arrowright", "d"]) {
            1
        } else {
            0
        };

        let dy = if self.any_down(&["arrowup", "w"]) {
            -1
        } else if self.any_down(&["arrowdown", "s"]) {
            1
        } else {
            0
        };

        Direction { dx, dy }
    }

    fn is_firing(&self) -> bool {
        self.held.contains(FIRE_KEY)
    }
}

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Input snapshot for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Movement X direction: -1, 0 or 1
    pub move_x: i8,

    /// Movement Y direction: -1, 0 or 1
    pub move_y: i8,

    /// Action flags (packed bits):
    /// - Bit 0: Fire held
    /// - Bit 1-7: Reserved
    pub flags: u8,
}

impl InputFrame {
    /// Fire flag bit
    pub const FLAG_FIRE: u8 = 0x01;

    /// Create an idle frame.
    pub const fn new() -> Self {
        Self {
            move_x: 0,
            move_y: 0,
            flags: 0,
        }
    }

    /// Create input with movement direction (clamped to signs).
    pub const fn with_movement(move_x: i8, move_y: i8) -> Self {
        Self {
            move_x: move_x.signum(),
            move_y: move_y.signum(),
            flags: 0,
        }
    }

    /// Builder: set the fire flag.
    pub const fn firing(mut self) -> Self {
        self.flags |= Self::FLAG_FIRE;
        self
    }

    /// Set fire flag.
    #[inline]
    pub fn set_fire(&mut self, pressed: bool) {
        if pressed {
            self.flags |= Self::FLAG_FIRE;
        } else {
            self.flags &= !Self::FLAG_FIRE;
        }
    }

    /// Check if this is an idle frame (no input).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.move_x == 0 && self.move_y == 0 && self.flags == 0
    }
}

impl InputSource for InputFrame {
    fn direction(&self) -> Direction {
        Direction::new(self.move_x, self.move_y)
    }

    fn is_firing(&self) -> bool {
        self.flags & Self::FLAG_FIRE != 0
    }
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// A frame that took effect at a given tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

/// Delta-compressed input history for one session.
///
/// Only ticks where the frame changed are stored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputRecording {
    /// Last tick covered by the recording
    pub end_tick: u32,

    deltas: Vec<InputDelta>,

    #[serde(skip)]
    last_frame: InputFrame,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self {
            end_tick: 0,
            deltas: Vec::with_capacity(256),
            last_frame: InputFrame::new(),
        }
    }

    /// Record input for a tick.
    ///
    /// Only stores if input changed from previous frame.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        self.end_tick = tick;

        if frame != self.last_frame {
            self.deltas.push(InputDelta { tick, frame });
            self.last_frame = frame;
        }
    }

    /// Get input in effect at a specific tick.
    pub fn input_at(&self, tick: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);
        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// Stored deltas.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Finalize the recording (call at session end).
    pub fn finalize(&mut self, end_tick: u32) {
        self.end_tick = end_tick;
    }

    /// Iterate `(tick, frame)` for every tick from 0 to `end_tick`.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            current_tick: 0,
            delta_idx: 0,
            current_frame: InputFrame::new(),
        }
    }
}

/// Iterator for replaying inputs tick-by-tick.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    current_tick: u32,
    delta_idx: usize,
    current_frame: InputFrame,
}

impl Iterator for ReplayIterator<'_> {
    type Item = (u32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick > self.recording.end_tick {
            return None;
        }

        while let Some(delta) = self.recording.deltas.get(self.delta_idx) {
            if delta.tick > self.current_tick {
                break;
            }
            self.current_frame = delta.frame;
            self.delta_idx += 1;
        }

        let result = (self.current_tick, self.current_frame);
        self.current_tick += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_direction_precedence() {
        let mut keys = KeyboardState::new();
        assert_eq!(keys.direction(), Direction::NONE);

        keys.key_down("ArrowRight");
        assert_eq!(keys.direction(), Direction::new(1, 0));

        // Left beats right when both are held
        keys.key_down("a");
        assert_eq!(keys.direction(), Direction::new(-1, 0));

        keys.key_down("s");
        keys.key_down("W");
        assert_eq!(keys.direction(), Direction::new(-1, -1));

        keys.key_up("A");
        keys.key_up("w");
        assert_eq!(keys.direction(), Direction::new(1, 1));
    }

    #[test]
    fn test_keyboard_fire_and_teardown() {
        let mut keys = KeyboardState::new();
        assert!(!keys.is_firing());

        keys.key_down("Z");
        assert!(keys.is_firing());
        assert!(keys.is_key_down("z"));

        keys.release_all();
        assert!(!keys.is_firing());
        assert!(keys.snapshot().is_idle());
    }

    #[test]
    fn test_snapshot_matches_live_state() {
        let mut keys = KeyboardState::new();
        keys.key_down("d");
        keys.key_down("z");

        let frame = keys.snapshot();
        assert_eq!(frame.direction(), keys.direction());
        assert!(frame.is_firing());

        // Later key changes do not touch the frozen frame
        keys.key_up("z");
        assert!(frame.is_firing());
    }

    #[test]
    fn test_input_frame_flags() {
        let mut frame = InputFrame::new();
        assert!(!frame.is_firing());
        assert!(frame.is_idle());

        frame.set_fire(true);
        assert!(frame.is_firing());
        assert!(!frame.is_idle());

        frame.set_fire(false);
        assert!(!frame.is_firing());

        assert!(InputFrame::with_movement(0, 0).firing().is_firing());
    }

    #[test]
    fn test_input_frame_movement_is_clamped_to_sign() {
        let frame = InputFrame::with_movement(100, -7);
        assert_eq!(frame.direction(), Direction::new(1, -1));
        assert_eq!(Direction::new(-128, 0), Direction { dx: -1, dy: 0 });
    }

    #[test]
    fn test_recording_delta_compression() {
        let mut recording = InputRecording::new();

        let frame = InputFrame::with_movement(1, 0);
        for tick in 0..4 {
            recording.record(tick, frame);
        }
        assert_eq!(recording.deltas().len(), 1);

        recording.record(4, InputFrame::with_movement(-1, 0).firing());
        assert_eq!(recording.deltas().len(), 2);
    }

    #[test]
    fn test_recording_input_at() {
        let mut recording = InputRecording::new();

        let frame1 = InputFrame::with_movement(1, 0);
        let frame2 = InputFrame::with_movement(-1, 0);
        let frame3 = InputFrame::with_movement(0, 1).firing();

        recording.record(10, frame1);
        recording.record(20, frame2);
        recording.record(30, frame3);

        assert!(recording.input_at(5).is_idle());
        assert_eq!(recording.input_at(10), frame1);
        assert_eq!(recording.input_at(15), frame1);
        assert_eq!(recording.input_at(25), frame2);
        assert_eq!(recording.input_at(100), frame3);
    }

    #[test]
    fn test_replay_iterator() {
        let mut recording = InputRecording::new();

        recording.record(0, InputFrame::with_movement(1, 0));
        recording.record(3, InputFrame::with_movement(0, 1));
        recording.finalize(5);

        let frames: Vec<_> = recording.replay_iter().collect();

        assert_eq!(frames.len(), 6);
        assert_eq!(frames[2].1.move_x, 1);
        assert_eq!(frames[3].1.move_x, 0);
        assert_eq!(frames[5].1.move_y, 1);
        assert_eq!(frames[5].0, 5);
    }
}
