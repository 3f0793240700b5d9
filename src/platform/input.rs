//! Input events delivered to the session loop

use std::collections::BTreeMap;

/// Host input relevant to the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    JumpRequested,
}

/// Source of input events, drained once per frame
pub trait InputSource {
    fn drain(&mut self) -> Vec<InputEvent>;
}

/// Never produces anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn drain(&mut self) -> Vec<InputEvent> {
        Vec::new()
    }
}

/// Replays events at fixed frame numbers.
///
/// Frames count drains: the first `drain()` is frame 1.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    script: BTreeMap<u64, Vec<InputEvent>>,
    frame: u64,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` for drain number `frame`
    pub fn at(mut self, frame: u64, event: InputEvent) -> Self {
        self.script.entry(frame).or_default().push(event);
        self
    }

    pub fn jump_at(self, frame: u64) -> Self {
        self.at(frame, InputEvent::JumpRequested)
    }

    pub fn quit_at(self, frame: u64) -> Self {
        self.at(frame, InputEvent::Quit)
    }

    /// Number of drains so far
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl InputSource for ScriptedInput {
    fn drain(&mut self) -> Vec<InputEvent> {
        self.frame += 1;
        self.script.remove(&self.frame).unwrap_or_default()
    }
}
