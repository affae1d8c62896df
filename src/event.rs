//! Input vocabulary shared with the embedding UI layer.
//!
//! The viewer does not open a window or poll an event loop; the embedding
//! toolkit translates its own events into these types and forwards them to
//! [`Viewer`](crate::viewer::Viewer).

/// State of a key or mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// The key or button is pressed.
    Press,
    /// The key or button is released.
    Release,
}

/// A mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    /// The left mouse button.
    Left,
    /// The middle mouse button (wheel click).
    Middle,
    /// The right mouse button.
    Right,
}

/// Keys the viewer reacts to.
///
/// Anything the embedding toolkit cannot map onto one of these should be
/// forwarded as `Unknown`; the viewer ignores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Focus the camera on the loaded model.
    F,
    /// Toggle the wireframe overlay.
    W,
    /// Toggle the heads-up readout.
    H,
    /// Rotate the view left by a fixed step.
    Left,
    /// Rotate the view right by a fixed step.
    Right,
    /// Rotate the view up by a fixed step.
    Up,
    /// Rotate the view down by a fixed step.
    Down,
    /// Any key without a viewer binding.
    Unknown,
}

bitflags! {
    /// Keyboard modifiers active during a pointer event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Modifiers: u32 {
        const SHIFT   = 0b0001;
        const CONTROL = 0b0010;
        const ALT     = 0b0100;
        const SUPER   = 0b1000;
    }
}
