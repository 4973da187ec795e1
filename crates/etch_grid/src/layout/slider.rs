/// Row of equally wide resize buttons laid out from the left edge of the viewport.
///
/// The button at position `p` requests a grid of side `p`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slider {
    pub button_width: f32,
    pub buttons: u16,
}

impl Slider {
    /// Spread `buttons` evenly over `width` pixels.
    pub fn spanning(width: f32, buttons: u16) -> Self {
        let button_width = if buttons == 0 { 0.0 } else { width / f32::from(buttons) };
        Self { button_width, buttons }
    }

    /// Position of the button under `client_x`, if any.
    pub fn button_at(&self, client_x: f32) -> Option<u16> {
        if !(self.button_width > 0.0) {
            return None;
        }

        let position = (client_x / self.button_width).floor();
        if !position.is_finite() || position < 0.0 || position >= f32::from(self.buttons) {
            return None;
        }

        Some(position as u16)
    }
}
