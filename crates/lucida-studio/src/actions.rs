//! Keyboard shortcuts.

use lucida_engine::input::{Key, Modifiers};

/// Something the user asked the studio to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    AddPoint,
    AddHorizonPair,
    AddPerpendicularPair,
    RemoveSelected,
    ToggleAnchor,
    /// Degrees; positive turns clockwise on screen.
    Rotate(f32),
    /// World units; positive moves the horizon down.
    MoveHorizon(f32),
    LineCount(i32),
    Curvature(f32),
    CycleAspectRatio,
    ToggleBackground,
    ToggleParallelGrid,
    TogglePerpendicularGrid,
    Export,
    LogSnapshot,
    ReloadBackground,
    Quit,
}

/// Step sizes used when mapping keys to actions.
#[derive(Debug, Clone, Copy)]
pub struct Steps {
    pub rotation: f32,
    pub coarse_rotation: f32,
    pub level: f32,
    pub curvature: f32,
}

pub fn action_for(key: Key, modifiers: Modifiers, steps: &Steps) -> Option<Action> {
    let rotation = if modifiers.shift { steps.coarse_rotation } else { steps.rotation };
    let action = match key {
        Key::P => Action::AddPoint,
        Key::H => Action::AddHorizonPair,
        Key::V => Action::AddPerpendicularPair,
        Key::Delete | Key::Backspace => Action::RemoveSelected,
        Key::A => Action::ToggleAnchor,
        Key::Q => Action::Rotate(-rotation),
        Key::E => Action::Rotate(rotation),
        Key::ArrowUp => Action::MoveHorizon(-steps.level),
        Key::ArrowDown => Action::MoveHorizon(steps.level),
        Key::Plus => Action::LineCount(1),
        Key::Minus => Action::LineCount(-1),
        Key::C => Action::Curvature(steps.curvature),
        Key::Z => Action::Curvature(-steps.curvature),
        Key::F => Action::CycleAspectRatio,
        Key::B => Action::ToggleBackground,
        Key::G => Action::ToggleParallelGrid,
        Key::T => Action::TogglePerpendicularGrid,
        Key::X => Action::Export,
        Key::J => Action::LogSnapshot,
        Key::L => Action::ReloadBackground,
        Key::Escape => Action::Quit,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEPS: Steps = Steps { rotation: 1.0, coarse_rotation: 15.0, level: 10.0, curvature: 0.1 };

    #[test]
    fn shift_makes_rotation_coarse() {
        let none = Modifiers::default();
        let shift = Modifiers { shift: true, ..Modifiers::default() };
        assert_eq!(action_for(Key::Q, none, &STEPS), Some(Action::Rotate(-1.0)));
        assert_eq!(action_for(Key::E, shift, &STEPS), Some(Action::Rotate(15.0)));
    }

    #[test]
    fn both_delete_keys_remove() {
        let none = Modifiers::default();
        assert_eq!(action_for(Key::Delete, none, &STEPS), Some(Action::RemoveSelected));
        assert_eq!(action_for(Key::Backspace, none, &STEPS), Some(Action::RemoveSelected));
    }

    #[test]
    fn unbound_keys_do_nothing() {
        assert_eq!(action_for(Key::K, Modifiers::default(), &STEPS), None);
        assert_eq!(action_for(Key::Unknown(77), Modifiers::default(), &STEPS), None);
    }
}
