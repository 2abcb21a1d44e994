use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit vector in screen coordinates (y grows downwards).
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Discrete commands consumed by the round controller.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Command {
    Direction(Direction),
    TogglePause,
    Restart,
    Quit,
}

/// Maps one key press to a command.
#[must_use]
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Some(Command::Direction(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Some(Command::Direction(Direction::Down)),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Command::Direction(Direction::Left)),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Command::Direction(Direction::Right)),
        KeyCode::Char('p' | 'P') => Some(Command::TogglePause),
        KeyCode::Enter => Some(Command::Restart),
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => Some(Command::Quit),
        _ => None,
    }
}

/// Terminal keyboard source, sampled once per loop iteration.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Drains every pending terminal event without blocking and returns the
    /// commands in arrival order.
    pub fn drain_commands(&mut self) -> io::Result<Vec<Command>> {
        let mut commands = Vec::new();

        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(command) = command_for_key(key) {
                commands.push(command);
            }
        }

        Ok(commands)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{Command, Direction, command_for_key};

    fn press(code: KeyCode) -> Option<Command> {
        command_for_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn opposite_deltas_cancel_out() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(press(KeyCode::Up), Some(Command::Direction(Direction::Up)));
        assert_eq!(press(KeyCode::Char('a')), Some(Command::Direction(Direction::Left)));
        assert_eq!(press(KeyCode::Char('S')), Some(Command::Direction(Direction::Down)));
        assert_eq!(press(KeyCode::Right), Some(Command::Direction(Direction::Right)));
    }

    #[test]
    fn control_keys_map_to_round_commands() {
        assert_eq!(press(KeyCode::Char('p')), Some(Command::TogglePause));
        assert_eq!(press(KeyCode::Enter), Some(Command::Restart));
        assert_eq!(press(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(
            command_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(press(KeyCode::Char('x')), None);
    }
}
