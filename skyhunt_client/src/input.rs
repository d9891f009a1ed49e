//! Input handling.
//!
//! In a real client this would integrate with the window's raw mouse and
//! keyboard events. Here input arrives as console commands (`hold w`,
//! `look 12 -3`, ...) which `InputState` folds into one `FrameInput` per frame.

use anyhow::{bail, Context};

bitflags::bitflags! {
    /// Physical keys the game reads. Their meaning depends on the game state
    /// (Q rises in flight but starts the next wave in the shop).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Keys: u32 {
        const W = 1 << 0;
        const A = 1 << 1;
        const S = 1 << 2;
        const D = 1 << 3;
        const Q = 1 << 4;
        const E = 1 << 5;
        const X = 1 << 6;
        const F = 1 << 7;
        const SPACE = 1 << 8;
        const ONE = 1 << 9;
        const TAB = 1 << 10;
        const ESCAPE = 1 << 11;
    }
}

impl Default for Keys {
    fn default() -> Self {
        Self::empty()
    }
}

impl Keys {
    /// Parses a single key name as typed on the console.
    pub fn parse_key(name: &str) -> anyhow::Result<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            "w" => Keys::W,
            "a" => Keys::A,
            "s" => Keys::S,
            "d" => Keys::D,
            "q" => Keys::Q,
            "e" => Keys::E,
            "x" => Keys::X,
            "f" => Keys::F,
            "space" | "fire" => Keys::SPACE,
            "1" | "one" => Keys::ONE,
            "tab" => Keys::TAB,
            "esc" | "escape" => Keys::ESCAPE,
            other => bail!("unknown key: {other}"),
        };
        Ok(key)
    }

    /// Parses a list of key names into one set.
    pub fn parse_list(names: &[&str]) -> anyhow::Result<Self> {
        if names.is_empty() {
            bail!("expected at least one key");
        }
        names.iter().try_fold(Keys::empty(), |acc, name| -> anyhow::Result<Keys> {
            Ok(acc | Keys::parse_key(name)?)
        })
    }
}

/// Everything the game reads from the input collaborator for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Keys down this frame.
    pub held: Keys,
    /// Keys that went down since the previous frame.
    pub pressed: Keys,
    /// Mouse displacement since the previous sample, in pixels.
    pub mouse_dx: f32,
    pub mouse_dy: f32,
    /// Window-close request.
    pub close_requested: bool,
}

impl FrameInput {
    pub fn holding(keys: Keys) -> Self {
        Self {
            held: keys,
            ..Self::default()
        }
    }

    pub fn pressing(keys: Keys) -> Self {
        Self {
            held: keys,
            pressed: keys,
            ..Self::default()
        }
    }

    pub fn is_held(&self, key: Keys) -> bool {
        self.held.contains(key)
    }

    pub fn was_pressed(&self, key: Keys) -> bool {
        self.pressed.contains(key)
    }
}

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Hold(Keys),
    Release(Keys),
    /// Down for exactly one frame.
    Tap(Keys),
    Look { dx: f32, dy: f32 },
    Status,
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = tokens.split_first() else {
            bail!("empty command");
        };

        match cmd {
            "hold" => Ok(ConsoleCommand::Hold(Keys::parse_list(args)?)),
            "release" => Ok(ConsoleCommand::Release(Keys::parse_list(args)?)),
            "tap" => Ok(ConsoleCommand::Tap(Keys::parse_list(args)?)),
            "look" => {
                if args.len() != 2 {
                    bail!("usage: look <dx> <dy>");
                }
                let dx = args[0].parse().with_context(|| format!("parse dx '{}'", args[0]))?;
                let dy = args[1].parse().with_context(|| format!("parse dy '{}'", args[1]))?;
                Ok(ConsoleCommand::Look { dx, dy })
            }
            "status" => Ok(ConsoleCommand::Status),
            "quit" | "exit" => Ok(ConsoleCommand::Quit),
            other => bail!("unknown command: {other}"),
        }
    }
}

/// Input accumulated between frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: Keys,
    previous_held: Keys,
    taps: Keys,
    mouse_dx: f32,
    mouse_dy: f32,
    quit: bool,
}

impl InputState {
    pub fn apply(&mut self, cmd: ConsoleCommand) {
        match cmd {
            ConsoleCommand::Hold(keys) => self.held |= keys,
            ConsoleCommand::Release(keys) => self.held &= !keys,
            ConsoleCommand::Tap(keys) => self.taps |= keys,
            ConsoleCommand::Look { dx, dy } => {
                self.mouse_dx += dx;
                self.mouse_dy += dy;
            }
            ConsoleCommand::Quit => self.quit = true,
            ConsoleCommand::Status => {}
        }
    }

    /// Produces this frame's input. Taps and mouse motion are consumed;
    /// held keys persist until released.
    pub fn sample(&mut self) -> FrameInput {
        let held = self.held | self.taps;
        let pressed = (self.held & !self.previous_held) | self.taps;
        let frame = FrameInput {
            held,
            pressed,
            mouse_dx: std::mem::take(&mut self.mouse_dx),
            mouse_dy: std::mem::take(&mut self.mouse_dy),
            close_requested: self.quit,
        };
        self.previous_held = self.held;
        self.taps = Keys::empty();
        frame
    }
}
