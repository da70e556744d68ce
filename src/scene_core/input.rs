//! Who receives a window event: the command box, the egui overlay, the
//! orbit camera. Kept free of winit types so the rules are testable.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A fresh `/` key press.
    Slash,
    Keyboard,
    Pointer,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRoute {
    /// Open or refocus the command box. The key is not forwarded, the box
    /// inserts the slash itself.
    CommandBox,
    /// Only the overlay sees the event.
    Overlay,
    /// Overlay first, then the camera unless the overlay consumed it.
    OverlayThenCamera,
}

/// `field_focused` is true while the command field holds keyboard focus.
pub fn route_input(kind: InputKind, field_focused: bool) -> InputRoute {
    match (kind, field_focused) {
        (InputKind::Slash, false) => InputRoute::CommandBox,
        (_, true) => InputRoute::Overlay,
        (_, false) => InputRoute::OverlayThenCamera,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_opens_box_when_field_is_not_focused() {
        assert_eq!(route_input(InputKind::Slash, false), InputRoute::CommandBox);
    }

    #[test]
    fn focused_field_takes_everything() {
        for kind in [
            InputKind::Slash,
            InputKind::Keyboard,
            InputKind::Pointer,
            InputKind::Other,
        ] {
            assert_eq!(route_input(kind, true), InputRoute::Overlay);
        }
    }

    #[test]
    fn camera_moves_while_box_is_open_but_unfocused() {
        assert_eq!(
            route_input(InputKind::Pointer, false),
            InputRoute::OverlayThenCamera
        );
        assert_eq!(
            route_input(InputKind::Keyboard, false),
            InputRoute::OverlayThenCamera
        );
    }
}
