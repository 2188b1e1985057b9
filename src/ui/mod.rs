/// User interface module
///
/// One file per screen plus the canvas overlays:
/// - landing.rs - title screen with the two entry buttons
/// - capture.rs - camera preview, file chooser and the "analyzing" view
/// - result.rs - the roast card and share actions
/// - overlay.rs - filter decorations and the spinner
pub mod capture;
pub mod landing;
pub mod overlay;
pub mod result;

use iced::theme::Palette;
use iced::widget::{button, center, column, container, opaque, stack, text};
use iced::{Alignment, Border, Color, Element, Length, Theme};

use crate::Message;

pub const INDIGO: Color = Color::from_rgb(0.12, 0.11, 0.29);
pub const PURPLE_TEXT: Color = Color::from_rgb(0.85, 0.78, 1.0);
pub const RED: Color = Color::from_rgb(0.94, 0.27, 0.27);
pub const YELLOW: Color = Color::from_rgb(0.99, 0.88, 0.28);

/// Dark purple theme used everywhere
pub fn theme() -> Theme {
    Theme::custom(
        "Roast".to_string(),
        Palette {
            background: INDIGO,
            text: Color::WHITE,
            primary: Color::from_rgb(0.93, 0.28, 0.6),
            success: Color::from_rgb(0.13, 0.77, 0.37),
            danger: RED,
        },
    )
}

/// Translucent rounded panel
pub fn panel(alpha: f32) -> impl Fn(&Theme) -> container::Style {
    move |_theme| container::Style {
        background: Some(Color::from_rgba(1.0, 1.0, 1.0, alpha).into()),
        border: Border {
            radius: 16.0.into(),
            width: 1.0,
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.1),
        },
        ..container::Style::default()
    }
}

/// Full-width action button
pub fn action<'a>(label: &'a str, on_press: Option<Message>) -> button::Button<'a, Message> {
    button(
        container(text(label).size(18))
            .width(Length::Fill)
            .center_x(Length::Fill),
    )
    .padding([14, 24])
    .width(Length::Fill)
    .on_press_maybe(on_press)
}

/// Show `notice` as a blocking dialog over `base`
pub fn with_notice<'a>(base: Element<'a, Message>, notice: Option<&'a str>) -> Element<'a, Message> {
    let Some(notice) = notice else {
        return base;
    };

    let dialog = container(
        column![
            text(notice).size(18),
            button(text("OK")).padding([8, 32]).on_press(Message::DismissNotice),
        ]
        .spacing(20)
        .align_x(Alignment::Center),
    )
    .padding(24)
    .max_width(360)
    .style(|_theme| container::Style {
        background: Some(INDIGO.into()),
        border: Border {
            radius: 12.0.into(),
            width: 1.0,
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.2),
        },
        ..container::Style::default()
    });

    stack![
        base,
        opaque(center(opaque(dialog)).style(|_theme| container::Style {
            background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.7).into()),
            ..container::Style::default()
        }))
    ]
    .into()
}
