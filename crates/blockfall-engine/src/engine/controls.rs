/// A single input button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Down,
    Rotate,
}

/// Which buttons are currently held.
///
/// The front end sets flags as key events arrive and hands the whole set to
/// [`Game::apply_controls`](super::Game::apply_controls) once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub rotate: bool,
}

impl Controls {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left: false,
            right: false,
            down: false,
            rotate: false,
        }
    }

    fn slot(&mut self, button: Button) -> &mut bool {
        match button {
            Button::Left => &mut self.left,
            Button::Right => &mut self.right,
            Button::Down => &mut self.down,
            Button::Rotate => &mut self.rotate,
        }
    }

    pub fn press(&mut self, button: Button) {
        *self.slot(button) = true;
    }

    pub fn release_all(&mut self) {
        *self = Self::new();
    }
}
