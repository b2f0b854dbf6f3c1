//! AI assistant panel: prompt box, request state and message log

use egui::Ui;

use crate::app::styles::{ERROR_RED, INDIGO_400, SLATE_400};
use crate::i18n::t;
use crate::state::{AppState, ChatMessage, ChatRole};

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(t("ai.title")).strong().color(INDIGO_400));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if !state.assistant.messages.is_empty()
                && !state.assistant.is_loading()
                && ui.small_button(t("ai.clear")).clicked()
            {
                state.assistant.clear();
            }
        });
    });
    ui.label(egui::RichText::new(t("ai.description")).small().color(SLATE_400));
    ui.add_space(4.0);

    let loading = state.assistant.is_loading();
    ui.add_enabled(
        !loading,
        egui::TextEdit::multiline(&mut state.assistant.input)
            .hint_text(t("ai.placeholder"))
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );

    ui.horizontal(|ui| {
        let label = if loading { t("ai.thinking") } else { t("ai.send") };
        let clicked = ui
            .add_enabled(state.assistant.can_send(), egui::Button::new(label))
            .clicked();
        if loading {
            ui.spinner();
        }
        if clicked {
            let ctx = ui.ctx().clone();
            state.assistant.send(&state.settings.ai, Some(ctx));
        }
    });

    if !state.assistant.messages.is_empty() {
        ui.add_space(4.0);
        egui::ScrollArea::vertical()
            .id_salt("assistant_log")
            .max_height(160.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for msg in &state.assistant.messages {
                    show_message(ui, msg);
                }
            });
    }

    ui.add_space(6.0);
    ui.label(egui::RichText::new(t("ai.tips")).small().strong().color(SLATE_400));
    for tip in ["ai.tip1", "ai.tip2", "ai.tip3", "ai.tip4"] {
        ui.label(egui::RichText::new(format!("• {}", t(tip))).small().color(SLATE_400));
    }
}

fn show_message(ui: &mut Ui, msg: &ChatMessage) {
    let (prefix, color, bg) = if msg.is_error {
        (
            t("ai.bot"),
            ERROR_RED,
            egui::Color32::from_rgba_premultiplied(80, 30, 30, 200),
        )
    } else {
        match msg.role {
            ChatRole::User => (
                t("ai.you"),
                egui::Color32::from_rgb(130, 190, 255),
                egui::Color32::from_rgba_premultiplied(40, 60, 90, 200),
            ),
            ChatRole::Assistant => (
                t("ai.bot"),
                egui::Color32::from_rgb(130, 255, 170),
                egui::Color32::from_rgba_premultiplied(30, 60, 40, 200),
            ),
        }
    };

    egui::Frame::NONE
        .fill(bg)
        .corner_radius(egui::CornerRadius::same(4))
        .inner_margin(egui::Margin::same(6))
        .outer_margin(egui::Margin::symmetric(0, 2))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.colored_label(color, format!("{prefix}:"));
                ui.label(&msg.text);
            });
        });
}
