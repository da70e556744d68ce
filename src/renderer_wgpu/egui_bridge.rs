use egui::{Context, Event, Key, Modifiers, Pos2, RawInput, Rect, Vec2};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Translates winit events into egui input for the command box overlay.
pub struct EguiBridge {
    ctx: Context,
    events: Vec<Event>,
    pointer_pos: Pos2,
    modifiers: Modifiers,
    pixels_per_point: f32,
    /// Window scale factor; cursor positions arrive in these device pixels.
    window_scale_factor: f32,
    screen_size: (u32, u32),
}

impl EguiBridge {
    pub fn new(pixels_per_point: f32, window_scale_factor: f32, width: u32, height: u32) -> Self {
        Self {
            ctx: Context::default(),
            events: Vec::new(),
            pointer_pos: Pos2::ZERO,
            modifiers: Modifiers::NONE,
            pixels_per_point,
            window_scale_factor,
            screen_size: (width, height),
        }
    }

    pub fn ctx(&self) -> &Context {
        &self.ctx
    }

    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        pixels_per_point: f32,
        window_scale_factor: f32,
    ) {
        self.screen_size = (width, height);
        self.pixels_per_point = pixels_per_point;
        self.window_scale_factor = window_scale_factor;
    }

    /// True while a text field holds keyboard focus.
    pub fn wants_keyboard_input(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }

    /// Cursor position in egui points. The drawing buffer may use a clamped
    /// pixel ratio, but points are always window pixels over the scale factor.
    fn cursor_to_points(&self, x: f64, y: f64) -> Pos2 {
        let scale = if self.window_scale_factor > 0.0 {
            self.window_scale_factor
        } else {
            1.0
        };
        Pos2::new(x as f32 / scale, y as f32 / scale)
    }

    /// Returns true when egui wants the event (a text field has focus or the
    /// pointer is over the overlay).
    pub fn on_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let pos = self.cursor_to_points(position.x, position.y);
                self.pointer_pos = pos;
                self.events.push(Event::PointerMoved(pos));
                self.ctx.wants_pointer_input()
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let egui_button = match button {
                    MouseButton::Left => egui::PointerButton::Primary,
                    MouseButton::Right => egui::PointerButton::Secondary,
                    MouseButton::Middle => egui::PointerButton::Middle,
                    _ => return false,
                };
                self.events.push(Event::PointerButton {
                    pos: self.pointer_pos,
                    button: egui_button,
                    pressed: *state == ElementState::Pressed,
                    modifiers: self.modifiers,
                });
                self.ctx.wants_pointer_input()
            }

            WindowEvent::ModifiersChanged(state) => {
                let state = state.state();
                self.modifiers = Modifiers {
                    alt: state.alt_key(),
                    ctrl: state.control_key(),
                    shift: state.shift_key(),
                    mac_cmd: cfg!(target_os = "macos") && state.super_key(),
                    command: if cfg!(target_os = "macos") {
                        state.super_key()
                    } else {
                        state.control_key()
                    },
                };
                false
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed;

                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(key) = editing_key(code) {
                        self.events.push(Event::Key {
                            key,
                            physical_key: None,
                            pressed,
                            repeat: event.repeat,
                            modifiers: self.modifiers,
                        });
                    }
                }

                if pressed && !self.modifiers.command {
                    if let Some(text) = event.text.as_ref() {
                        let printable: String = text.chars().filter(|c| !c.is_control()).collect();
                        if !printable.is_empty() {
                            self.events.push(Event::Text(printable));
                        }
                    }
                }

                self.ctx.wants_keyboard_input()
            }

            // The Resized that follows updates pixels_per_point.
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.window_scale_factor = *scale_factor as f32;
                false
            }

            _ => false,
        }
    }

    pub fn take_raw_input(&mut self) -> RawInput {
        let (w, h) = self.screen_size;
        let screen_rect = Rect::from_min_size(
            Pos2::ZERO,
            Vec2::new(
                w as f32 / self.pixels_per_point,
                h as f32 / self.pixels_per_point,
            ),
        );

        let mut raw = RawInput {
            screen_rect: Some(screen_rect),
            events: std::mem::take(&mut self.events),
            modifiers: self.modifiers,
            ..Default::default()
        };
        raw.viewports
            .entry(egui::ViewportId::ROOT)
            .or_default()
            .native_pixels_per_point = Some(self.pixels_per_point);
        raw
    }
}

/// Keys a single-line text field reacts to.
fn editing_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::ArrowLeft => Some(Key::ArrowLeft),
        KeyCode::ArrowRight => Some(Key::ArrowRight),
        KeyCode::Home => Some(Key::Home),
        KeyCode::End => Some(Key::End),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Delete => Some(Key::Delete),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyC => Some(Key::C),
        KeyCode::KeyV => Some(Key::V),
        KeyCode::KeyX => Some(Key::X),
        KeyCode::KeyZ => Some(Key::Z),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_keys_cover_submit_and_erase() {
        assert_eq!(editing_key(KeyCode::Enter), Some(Key::Enter));
        assert_eq!(editing_key(KeyCode::NumpadEnter), Some(Key::Enter));
        assert_eq!(editing_key(KeyCode::Backspace), Some(Key::Backspace));
        assert_eq!(editing_key(KeyCode::KeyW), None);
    }

    #[test]
    fn raw_input_drains_queued_events() {
        let mut bridge = EguiBridge::new(2.0, 2.0, 800, 600);
        bridge.events.push(Event::Text("a".to_string()));
        let raw = bridge.take_raw_input();
        assert_eq!(raw.events.len(), 1);
        let rect = raw.screen_rect.unwrap();
        assert_eq!(rect.width(), 400.0);
        assert!(bridge.take_raw_input().events.is_empty());
    }

    #[test]
    fn cursor_maps_through_window_scale_not_clamped_ratio() {
        // Device pixel ratio 3 with the drawing buffer clamped to 2.
        let bridge = EguiBridge::new(2.0, 3.0, 1200, 800);
        let pos = bridge.cursor_to_points(300.0, 150.0);
        assert_eq!(pos, Pos2::new(100.0, 50.0));
    }
}
