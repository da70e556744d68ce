use egui::{self, Color32, FontId, RichText};

use crate::scene_core::command::CommandBox;
use crate::scene_core::time::TimeOverride;

const FIELD_ID: &str = "command-box-input";

/// Draw the command field at the bottom-left while the box is visible.
pub fn show(ctx: &egui::Context, command_box: &mut CommandBox, time_override: &mut TimeOverride) {
    if !command_box.is_visible() {
        return;
    }

    let id = egui::Id::new(FIELD_ID);
    let mut submitted = false;

    egui::Area::new(egui::Id::new("command-box-area"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
        .show(ctx, |ui| {
            egui::Frame::NONE
                .fill(Color32::from_black_alpha(160))
                .inner_margin(egui::Margin::same(6))
                .corner_radius(4.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(">").monospace().color(Color32::LIGHT_GRAY));
                        let response = ui.add(
                            egui::TextEdit::singleline(command_box.buffer_mut())
                                .id(id)
                                .font(FontId::monospace(16.0))
                                .desired_width(360.0)
                                .frame(false),
                        );
                        if command_box.take_focus_request() {
                            response.request_focus();
                            move_cursor_to_end(ui.ctx(), id, command_box.buffer().chars().count());
                        }
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            submitted = true;
                        }
                    });
                });
        });

    if submitted {
        command_box.submit(time_override);
    }
}

fn move_cursor_to_end(ctx: &egui::Context, id: egui::Id, len: usize) {
    if let Some(mut state) = egui::TextEdit::load_state(ctx, id) {
        let cursor = egui::text::CCursor::new(len);
        state
            .cursor
            .set_char_range(Some(egui::text::CCursorRange::one(cursor)));
        state.store(ctx, id);
    }
}
