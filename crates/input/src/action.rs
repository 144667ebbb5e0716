/// A discrete event the frame loop acts on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Leave the frame loop (window closed or Escape pressed).
    Quit,
    /// Turn the camera by a pointer delta in device units.
    Look { dx: f32, dy: f32 },
    /// Event the core ignores.
    Noop,
}

impl Action {
    /// Raw pointer motion; a zero delta carries nothing to apply.
    pub fn pointer_motion(dx: f64, dy: f64) -> Self {
        if dx == 0.0 && dy == 0.0 {
            Action::Noop
        } else {
            Action::Look {
                dx: dx as f32,
                dy: dy as f32,
            }
        }
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, Action::Quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_motion_becomes_look() {
        let a = Action::pointer_motion(3.0, -2.0);
        assert_eq!(a, Action::Look { dx: 3.0, dy: -2.0 });
        assert!(!a.is_quit());
    }

    #[test]
    fn still_pointer_is_noop() {
        assert_eq!(Action::pointer_motion(0.0, 0.0), Action::Noop);
    }

    #[test]
    fn quit_is_quit() {
        assert!(Action::Quit.is_quit());
    }
}
