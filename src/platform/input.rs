//! Keyboard and touch input mapped to left/right intents

use serde::{Deserialize, Serialize};

use crate::sim::Steer;

/// Touch points sampled per event
pub const MAX_TOUCH_POINTS: usize = 2;

/// Key codes (`KeyboardEvent.code`) bound to each direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl KeyBindings {
    pub fn arrows() -> Self {
        Self {
            left: vec!["ArrowLeft".to_string()],
            right: vec!["ArrowRight".to_string()],
        }
    }

    pub fn wasd() -> Self {
        Self {
            left: vec!["KeyA".to_string()],
            right: vec!["KeyD".to_string()],
        }
    }

    fn direction(&self, code: &str) -> Option<Steer> {
        if self.left.iter().any(|k| k == code) {
            Some(Steer::Left)
        } else if self.right.iter().any(|k| k == code) {
            Some(Steer::Right)
        } else {
            None
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::arrows()
    }
}

/// Held directions plus the tie-break turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    /// Whose turn it is when both directions are held
    tie_goes_right: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is bound for this player
    pub fn key_down(&mut self, code: &str, bindings: &KeyBindings) -> bool {
        self.set_key(code, bindings, true)
    }

    /// Returns true if the key is bound for this player
    pub fn key_up(&mut self, code: &str, bindings: &KeyBindings) -> bool {
        self.set_key(code, bindings, false)
    }

    fn set_key(&mut self, code: &str, bindings: &KeyBindings, held: bool) -> bool {
        match bindings.direction(code) {
            Some(Steer::Left) => self.move_left = held,
            Some(Steer::Right) => self.move_right = held,
            None => return false,
        }
        true
    }

    /// Recompute intents from the active touch x positions (canvas space)
    ///
    /// Points off the canvas are ignored; of the rest only the first two
    /// count. Each one presses the half of the canvas it lands in.
    pub fn touch(&mut self, xs: &[f32], canvas_width: f32) {
        let mid = canvas_width / 2.0;
        self.move_left = false;
        self.move_right = false;
        let on_canvas = xs.iter().copied().filter(|x| (0.0..canvas_width).contains(x));
        for x in on_canvas.take(MAX_TOUCH_POINTS) {
            if x < mid {
                self.move_left = true;
            } else {
                self.move_right = true;
            }
        }
    }

    pub fn cancel_touch(&mut self) {
        self.move_left = false;
        self.move_right = false;
    }

    /// Direction for this frame
    ///
    /// With both directions held the winner alternates every call, so holding
    /// both jitters in place instead of drifting one way.
    pub fn steer(&mut self) -> Option<Steer> {
        match (self.move_left, self.move_right) {
            (false, false) => None,
            (true, false) => Some(Steer::Left),
            (false, true) => Some(Steer::Right),
            (true, true) => {
                let steer = if self.tie_goes_right {
                    Steer::Right
                } else {
                    Steer::Left
                };
                self.tie_goes_right = !self.tie_goes_right;
                Some(steer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_map_to_intents() {
        let bindings = KeyBindings::arrows();
        let mut input = InputState::new();

        assert!(input.key_down("ArrowLeft", &bindings));
        assert_eq!(input.steer(), Some(Steer::Left));
        assert!(input.key_up("ArrowLeft", &bindings));
        assert_eq!(input.steer(), None);

        assert!(!input.key_down("KeyA", &bindings));
        assert_eq!(input.steer(), None);
        assert!(input.key_down("KeyA", &KeyBindings::wasd()));
        assert_eq!(input.steer(), Some(Steer::Left));
    }

    #[test]
    fn test_both_held_alternates() {
        let bindings = KeyBindings::arrows();
        let mut input = InputState::new();
        input.key_down("ArrowLeft", &bindings);
        input.key_down("ArrowRight", &bindings);

        let steers: Vec<_> = (0..4).filter_map(|_| input.steer()).collect();
        assert_eq!(
            steers,
            vec![Steer::Left, Steer::Right, Steer::Left, Steer::Right]
        );
    }

    #[test]
    fn test_touch_halves() {
        let mut input = InputState::new();
        input.touch(&[50.0], 480.0);
        assert!(input.move_left && !input.move_right);

        input.touch(&[400.0], 480.0);
        assert!(!input.move_left && input.move_right);

        input.touch(&[50.0, 400.0], 480.0);
        assert!(input.move_left && input.move_right);

        // Third touch is not sampled
        input.touch(&[400.0, 410.0, 20.0], 480.0);
        assert!(!input.move_left && input.move_right);

        input.touch(&[], 480.0);
        assert_eq!(input.steer(), None);
    }

    #[test]
    fn test_touch_off_canvas_ignored() {
        let mut input = InputState::new();
        // A finger on the neighbouring canvas maps outside this one
        input.touch(&[-300.0, 400.0], 480.0);
        assert!(!input.move_left && input.move_right);

        input.touch(&[900.0, 480.0, f32::NAN], 480.0);
        assert_eq!(input.steer(), None);

        // Off-canvas points do not use up the two sampled slots
        input.touch(&[-1.0, -2.0, 20.0], 480.0);
        assert!(input.move_left && !input.move_right);
    }

    #[test]
    fn test_cancel_clears_both() {
        let mut input = InputState::new();
        input.touch(&[50.0, 400.0], 480.0);
        input.cancel_touch();
        assert_eq!(input.steer(), None);
    }

    #[test]
    fn test_bindings_json() {
        let bindings: KeyBindings =
            serde_json::from_str(r#"{"left":["KeyJ","Numpad4"],"right":["KeyL"]}"#).unwrap();
        let mut input = InputState::new();
        assert!(input.key_down("Numpad4", &bindings));
        assert_eq!(input.steer(), Some(Steer::Left));
    }
}
