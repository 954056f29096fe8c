/// Keyboard → intent translation.
///
/// Games never see key codes. Each frame the binary turns raw crossterm
/// events into an [`InputSnapshot`]: the set of intents currently held plus
/// the ordered list of intents whose key went down since the last frame.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): proper
///   `Press` / `Repeat` / `Release` events, so keys are dropped on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`). Keys expire after `hold_window` frames of silence,
///   which is shorter than the OS repeat interval, so a key stays held while
///   it is actively generating repeats. A `Press` on a key that is still
///   held is treated as a repeat and does not count as a new key-down.

use std::collections::{HashMap, HashSet};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Default number of frames a key stays held after its last press/repeat.
pub const HOLD_WINDOW: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Attack,
    Shoot,
    Grenade,
    Melee,
    Mount,
    Confirm,
    Pause,
    ToggleMode,
}

pub type Bindings = &'static [(KeyCode, Intent)];

pub const KNIGHT_KEYS: Bindings = &[
    (KeyCode::Left, Intent::Left),
    (KeyCode::Right, Intent::Right),
    (KeyCode::Char('a'), Intent::Left),
    (KeyCode::Char('d'), Intent::Right),
    (KeyCode::Char('A'), Intent::Left),
    (KeyCode::Char('D'), Intent::Right),
    (KeyCode::Char(' '), Intent::Jump),
    (KeyCode::Char('x'), Intent::Attack),
    (KeyCode::Char('X'), Intent::Attack),
    (KeyCode::Enter, Intent::Confirm),
    (KeyCode::Char('p'), Intent::Pause),
    (KeyCode::Char('P'), Intent::Pause),
];

pub const SLUG_KEYS: Bindings = &[
    (KeyCode::Left, Intent::Left),
    (KeyCode::Right, Intent::Right),
    (KeyCode::Char('a'), Intent::Left),
    (KeyCode::Char('d'), Intent::Right),
    (KeyCode::Char(' '), Intent::Jump),
    (KeyCode::Up, Intent::Jump),
    (KeyCode::Char('w'), Intent::Jump),
    (KeyCode::Down, Intent::Down),
    (KeyCode::Char('s'), Intent::Down),
    (KeyCode::Char('A'), Intent::Left),
    (KeyCode::Char('D'), Intent::Right),
    (KeyCode::Char('W'), Intent::Jump),
    (KeyCode::Char('S'), Intent::Down),
    (KeyCode::Char('x'), Intent::Shoot),
    (KeyCode::Char('X'), Intent::Shoot),
    (KeyCode::Char('z'), Intent::Shoot),
    (KeyCode::Char('Z'), Intent::Shoot),
    (KeyCode::Char('j'), Intent::Shoot),
    (KeyCode::Char('J'), Intent::Shoot),
    (KeyCode::Char('c'), Intent::Grenade),
    (KeyCode::Char('C'), Intent::Grenade),
    (KeyCode::Char('k'), Intent::Grenade),
    (KeyCode::Char('K'), Intent::Grenade),
    (KeyCode::Char('v'), Intent::Melee),
    (KeyCode::Char('V'), Intent::Melee),
    (KeyCode::Char('l'), Intent::Melee),
    (KeyCode::Char('L'), Intent::Melee),
    (KeyCode::Char('e'), Intent::Mount),
    (KeyCode::Char('E'), Intent::Mount),
    (KeyCode::Char('f'), Intent::Mount),
    (KeyCode::Char('F'), Intent::Mount),
    (KeyCode::Enter, Intent::Confirm),
    (KeyCode::Char('p'), Intent::Pause),
    (KeyCode::Char('P'), Intent::Pause),
];

pub const SNAKE_KEYS: Bindings = &[
    (KeyCode::Up, Intent::Up),
    (KeyCode::Down, Intent::Down),
    (KeyCode::Left, Intent::Left),
    (KeyCode::Right, Intent::Right),
    (KeyCode::Char('w'), Intent::Up),
    (KeyCode::Char('s'), Intent::Down),
    (KeyCode::Char('a'), Intent::Left),
    (KeyCode::Char('d'), Intent::Right),
    (KeyCode::Char('W'), Intent::Up),
    (KeyCode::Char('S'), Intent::Down),
    (KeyCode::Char('A'), Intent::Left),
    (KeyCode::Char('D'), Intent::Right),
    (KeyCode::Enter, Intent::Confirm),
    (KeyCode::Char(' '), Intent::Confirm),
    (KeyCode::Char('p'), Intent::Pause),
    (KeyCode::Char('P'), Intent::Pause),
    (KeyCode::Esc, Intent::Pause),
    (KeyCode::Char('m'), Intent::ToggleMode),
    (KeyCode::Char('M'), Intent::ToggleMode),
];

fn lookup(bindings: Bindings, code: &KeyCode) -> Option<Intent> {
    bindings
        .iter()
        .find(|(key, _)| key == code)
        .map(|(_, intent)| *intent)
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Everything a game's `update` learns about the keyboard for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    held: HashSet<Intent>,
    pressed: Vec<Intent>,
}

impl InputSnapshot {
    pub fn held(&self, intent: Intent) -> bool {
        self.held.contains(&intent)
    }

    pub fn pressed(&self, intent: Intent) -> bool {
        self.pressed.contains(&intent)
    }

    /// Key-down intents in arrival order.
    pub fn presses(&self) -> &[Intent] {
        &self.pressed
    }

    pub fn with_held(mut self, intent: Intent) -> Self {
        self.held.insert(intent);
        self
    }

    /// Marks `intent` as pressed this frame (and therefore held).
    pub fn with_press(mut self, intent: Intent) -> Self {
        self.held.insert(intent);
        self.pressed.push(intent);
        self
    }
}

// ── Tracker ───────────────────────────────────────────────────────────────────

/// Maps each held key to the frame it was last seen (press or repeat).
#[derive(Debug)]
pub struct KeyTracker {
    bindings: Bindings,
    hold_window: u64,
    key_frame: HashMap<KeyCode, u64>,
    pressed: Vec<Intent>,
    frame: u64,
}

impl KeyTracker {
    pub fn new(bindings: Bindings, hold_window: u64) -> Self {
        Self {
            bindings,
            hold_window,
            key_frame: HashMap::new(),
            pressed: Vec::new(),
            frame: 0,
        }
    }

    pub fn record(&mut self, event: &KeyEvent) {
        match event.kind {
            KeyEventKind::Press => {
                // A press on a key that is still held is OS auto-repeat
                let fresh = !self.is_live(&event.code);
                self.key_frame.insert(event.code, self.frame);
                if fresh {
                    if let Some(intent) = lookup(self.bindings, &event.code) {
                        self.pressed.push(intent);
                    }
                }
            }
            // Refresh timestamp so the key stays held
            KeyEventKind::Repeat => {
                self.key_frame.insert(event.code, self.frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&event.code);
            }
        }
    }

    fn is_live(&self, code: &KeyCode) -> bool {
        self.key_frame
            .get(code)
            .is_some_and(|last| self.frame.saturating_sub(*last) <= self.hold_window)
    }

    /// Closes the current frame and returns what was held / pressed in it.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let frame = self.frame;
        let window = self.hold_window;
        self.key_frame
            .retain(|_, last| frame.saturating_sub(*last) <= window);

        let held = self
            .key_frame
            .keys()
            .filter_map(|code| lookup(self.bindings, code))
            .collect();

        self.frame += 1;
        InputSnapshot {
            held,
            pressed: std::mem::take(&mut self.pressed),
        }
    }

    /// Forget every held key, e.g. when switching games.
    pub fn clear(&mut self) {
        self.key_frame.clear();
        self.pressed.clear();
    }
}
