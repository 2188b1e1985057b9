/// Landing screen
use iced::widget::{button, column, container, row, text, Space};
use iced::{Alignment, Element, Length};

use super::{action, panel, PURPLE_TEXT, YELLOW};
use crate::capture::CaptureMode;
use crate::route::Route;
use crate::Message;

pub fn view<'a>() -> Element<'a, Message> {
    let feature = |icon: &'a str, label: &'a str| {
        container(
            column![text(icon).size(28), text(label).size(14)]
                .spacing(4)
                .align_x(Alignment::Center),
        )
        .padding(12)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .style(panel(0.1))
    };

    let content = column![
        text("🤡").size(96),
        text("Ugly Face Detector").size(40),
        text("AI-Powered Roast Machine 🔥").size(20).color(PURPLE_TEXT),
        Space::with_height(16),
        row![
            feature("⚡", "Instant AI Analysis"),
            feature("👥", "Roast Your Friends"),
        ]
        .spacing(12),
        Space::with_height(16),
        action(
            "📷  Take Selfie & Get Roasted",
            Some(Message::Navigate(Route::Capture { mode: CaptureMode::Camera })),
        )
        .style(button::primary),
        action(
            "⬆  Upload Photo",
            Some(Message::Navigate(Route::Capture { mode: CaptureMode::Upload })),
        )
        .style(button::secondary),
        container(text("⚠️ Warning: Our AI has no chill. Prepare to be roasted! 🔥").size(14).color(YELLOW))
            .padding(12)
            .style(panel(0.05)),
    ]
    .spacing(16)
    .max_width(420)
    .align_x(Alignment::Center);

    container(content)
        .padding(24)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
