/// Keyboard bindings for the terminal host
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use wordfield_core::sketch::{ChangeMode, Part};
use wordfield_core::SketchAction;

/// Orbit step per key press, in radians
const ORBIT_STEP: f32 = 0.1;
/// Pan step per key press, in world units
const PAN_STEP: f32 = 0.5;
const SLIDER_STEP: f32 = 0.1;
const ROTATION_SLIDER_STEP: f32 = 0.01;
const LIGHT_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zoom {
    In,
    Out,
}

/// What a key press asks the host to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    Orbit { left: f32, up: f32 },
    Pan { right: f32, up: f32 },
    Zoom(Zoom),
    Sketch(SketchAction),
}

pub const HELP: &str = "arrows orbit  shift+arrows pan  +/- zoom  enter advance  q quit";

pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let command = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,

        KeyCode::Left if key.modifiers.contains(KeyModifiers::SHIFT) => {
            Command::Pan { right: -PAN_STEP, up: 0.0 }
        }
        KeyCode::Right if key.modifiers.contains(KeyModifiers::SHIFT) => {
            Command::Pan { right: PAN_STEP, up: 0.0 }
        }
        KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => {
            Command::Pan { right: 0.0, up: PAN_STEP }
        }
        KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => {
            Command::Pan { right: 0.0, up: -PAN_STEP }
        }
        KeyCode::Left => Command::Orbit { left: ORBIT_STEP, up: 0.0 },
        KeyCode::Right => Command::Orbit { left: -ORBIT_STEP, up: 0.0 },
        KeyCode::Up => Command::Orbit { left: 0.0, up: ORBIT_STEP },
        KeyCode::Down => Command::Orbit { left: 0.0, up: -ORBIT_STEP },
        KeyCode::Char('+') | KeyCode::Char('=') => Command::Zoom(Zoom::In),
        KeyCode::Char('-') | KeyCode::Char('_') => Command::Zoom(Zoom::Out),

        KeyCode::Enter => Command::Sketch(SketchAction::Advance),
        KeyCode::Char(c @ '1'..='3') => {
            Command::Sketch(SketchAction::ToggleTerm(c as usize - '1' as usize))
        }
        KeyCode::Char('t') => Command::Sketch(SketchAction::ToggleTurntable),
        KeyCode::Char('p') => Command::Sketch(SketchAction::SelectPart(Part::One)),
        KeyCode::Char('P') => Command::Sketch(SketchAction::SelectPart(Part::Two)),
        KeyCode::Char('f') => Command::Sketch(SketchAction::EnableChange(ChangeMode::First)),
        KeyCode::Char('g') => Command::Sketch(SketchAction::EnableChange(ChangeMode::Second)),
        KeyCode::Char('h') => Command::Sketch(SketchAction::EnableChange(ChangeMode::Third)),
        KeyCode::Char('j') => Command::Sketch(SketchAction::EnableChange(ChangeMode::Fourth)),
        KeyCode::Char('w') => Command::Sketch(SketchAction::ToggleWireframe),

        KeyCode::Char('[') => Command::Sketch(SketchAction::AdjustSpeed(-SLIDER_STEP)),
        KeyCode::Char(']') => Command::Sketch(SketchAction::AdjustSpeed(SLIDER_STEP)),
        KeyCode::Char('{') => Command::Sketch(SketchAction::AdjustDistance(-SLIDER_STEP)),
        KeyCode::Char('}') => Command::Sketch(SketchAction::AdjustDistance(SLIDER_STEP)),
        KeyCode::Char('<') => {
            Command::Sketch(SketchAction::AdjustRotationSpeed(-ROTATION_SLIDER_STEP))
        }
        KeyCode::Char('>') => {
            Command::Sketch(SketchAction::AdjustRotationSpeed(ROTATION_SLIDER_STEP))
        }

        KeyCode::Char('i') => Command::Sketch(SketchAction::MoveLight { dy: LIGHT_STEP, dz: 0.0 }),
        KeyCode::Char('k') => Command::Sketch(SketchAction::MoveLight { dy: -LIGHT_STEP, dz: 0.0 }),
        KeyCode::Char('u') => Command::Sketch(SketchAction::MoveLight { dy: 0.0, dz: -LIGHT_STEP }),
        KeyCode::Char('o') => Command::Sketch(SketchAction::MoveLight { dy: 0.0, dz: LIGHT_STEP }),

        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_keys() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(map_key(press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn digits_toggle_term_slots() {
        assert_eq!(
            map_key(press(KeyCode::Char('1'))),
            Some(Command::Sketch(SketchAction::ToggleTerm(0)))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('3'))),
            Some(Command::Sketch(SketchAction::ToggleTerm(2)))
        );
        assert_eq!(map_key(press(KeyCode::Char('4'))), None);
    }

    #[test]
    fn shifted_p_selects_part_two() {
        let key = KeyEvent::new(KeyCode::Char('P'), KeyModifiers::SHIFT);
        assert_eq!(
            map_key(key),
            Some(Command::Sketch(SketchAction::SelectPart(Part::Two)))
        );
    }

    #[test]
    fn arrows_orbit() {
        assert_eq!(
            map_key(press(KeyCode::Left)),
            Some(Command::Orbit { left: ORBIT_STEP, up: 0.0 })
        );
        assert_eq!(map_key(press(KeyCode::Char('+'))), Some(Command::Zoom(Zoom::In)));
    }

    #[test]
    fn shifted_arrows_pan() {
        let key = KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT);
        assert_eq!(map_key(key), Some(Command::Pan { right: PAN_STEP, up: 0.0 }));
        let key = KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT);
        assert_eq!(map_key(key), Some(Command::Pan { right: 0.0, up: -PAN_STEP }));
    }

    #[test]
    fn releases_are_ignored() {
        let key = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(key), None);
    }
}
