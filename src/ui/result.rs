/// Result screen: the roast card and what to do with it
use iced::widget::{button, canvas, column, container, image, row, stack, text, Row};
use iced::{Alignment, Border, Color, ContentFit, Element, Length};

use super::overlay::FilterOverlay;
use super::{action, panel, PURPLE_TEXT, RED, YELLOW};
use crate::capture::CaptureMode;
use crate::route::Route;
use crate::state::data::{Photo, RoastResult};
use crate::Message;

/// Id of the card container; sharing rasterizes exactly this region
pub fn card_id() -> container::Id {
    container::Id::new("result-card")
}

pub fn view<'a>(photo: &'a Photo, result: &'a RoastResult, sharing: bool) -> Element<'a, Message> {
    let card = container(
        column![
            text("🤡").size(56),
            text("Analysis Complete!").size(26),
            text("AI Roast Results").color(Color::from_rgb(0.99, 0.65, 0.65)),
            photo_with_overlays(photo, result),
            container(text(result.roast_text()).size(16))
                .padding(16)
                .width(Length::Fill)
                .center_x(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.3).into()),
                    border: Border {
                        radius: 12.0.into(),
                        ..Border::default()
                    },
                    ..container::Style::default()
                }),
            stats(result),
        ]
        .spacing(16)
        .align_x(Alignment::Center),
    )
    .id(card_id())
    .padding(24)
    .max_width(420)
    .style(panel(0.08));

    let share_label = if sharing {
        "Creating Shareable Image..."
    } else {
        "📤  Share Your Roast"
    };

    let actions = column![
        action(share_label, (!sharing).then_some(Message::Share)).style(button::success),
        row![
            action("📋  Copy Text", Some(Message::CopyText)).style(button::secondary),
            action(
                "↺  Try Again",
                Some(Message::Navigate(Route::Capture { mode: CaptureMode::Camera })),
            )
            .style(button::secondary),
        ]
        .spacing(12),
        action("🏠  Back to Home", Some(Message::Navigate(Route::Landing))).style(button::text),
        text("🤡 Ugly Face Detector - Where AI meets savage roasts!")
            .size(14)
            .color(PURPLE_TEXT),
    ]
    .spacing(12)
    .max_width(420)
    .align_x(Alignment::Center);

    container(
        column![card, actions]
            .spacing(24)
            .align_x(Alignment::Center),
    )
    .padding(16)
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

fn photo_with_overlays<'a>(photo: &'a Photo, result: &'a RoastResult) -> Element<'a, Message> {
    let badge = container(
        column![
            text(format!("{}%", result.score())).size(18),
            text("UGLY").size(11),
        ]
        .align_x(Alignment::Center),
    )
    .width(64)
    .height(64)
    .center_x(64)
    .center_y(64)
    .style(|_theme| container::Style {
        background: Some(RED.into()),
        border: Border {
            radius: 32.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    });

    stack![
        image(photo.handle())
            .width(Length::Fill)
            .content_fit(ContentFit::Contain),
        canvas(FilterOverlay {
            filters: result.filters().to_vec(),
        })
        .width(Length::Fill)
        .height(Length::Fill),
        container(badge)
            .width(Length::Fill)
            .align_right(Length::Fill),
    ]
    .into()
}

fn stats(result: &RoastResult) -> Element<'_, Message> {
    let colors = [Color::from_rgb(0.99, 0.65, 0.65), YELLOW, Color::from_rgb(0.53, 0.94, 0.67)];

    let cells = result.stats().into_iter().zip(colors).map(|(stat, color)| {
        container(
            column![
                text(stat.emoji).size(24),
                text(stat.label).size(12),
                text(format!("{}%", stat.value)).size(14).color(color),
            ]
            .align_x(Alignment::Center),
        )
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
    });

    Row::with_children(cells).spacing(12).into()
}
