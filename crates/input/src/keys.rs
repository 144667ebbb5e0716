use glam::Vec2;

/// The four movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Left,
    Right,
    Backward,
    Forward,
}

/// Snapshot of which movement keys are currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub left: bool,
    pub right: bool,
    pub backward: bool,
    pub forward: bool,
}

impl MoveKeys {
    pub fn set(&mut self, key: MoveKey, held: bool) {
        let slot = match key {
            MoveKey::Left => &mut self.left,
            MoveKey::Right => &mut self.right,
            MoveKey::Backward => &mut self.backward,
            MoveKey::Forward => &mut self.forward,
        };
        if *slot != held {
            tracing::trace!(?key, held, "movement key changed");
        }
        *slot = held;
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Unit travel direction in the right/forward tangent plane, or zero.
    ///
    /// `x` runs along the camera's right axis; `y` along its forward
    /// column, so the forward key maps to `-1` (the view looks down
    /// `-forward`). Opposite keys cancel.
    pub fn intent(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.left {
            v.x -= 1.0;
        }
        if self.right {
            v.x += 1.0;
        }
        if self.backward {
            v.y += 1.0;
        }
        if self.forward {
            v.y -= 1.0;
        }
        v.normalize_or_zero()
    }
}
