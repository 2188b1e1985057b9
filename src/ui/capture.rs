/// Capture screen: camera preview, upload chooser, still confirmation and
/// the fake "analyzing" view
use iced::widget::{button, canvas, column, container, image, progress_bar, row, text, Space};
use iced::{Alignment, ContentFit, Element, Length};
use std::time::{Duration, Instant};

use super::overlay::Spinner;
use super::{action, panel, PURPLE_TEXT};
use crate::capture::{CaptureMode, CaptureScreen, Stage};
use crate::route::Route;
use crate::Message;

/// How long the progress bar takes to fill, independent of the real delay
const PROGRESS_DURATION: Duration = Duration::from_secs(3);

pub fn view(screen: &CaptureScreen, now: Instant) -> Element<'_, Message> {
    if let Stage::Analyzing { started, .. } = screen.stage() {
        return analyzing(*started, now);
    }

    let title = match screen.mode() {
        CaptureMode::Camera => "Take Selfie",
        CaptureMode::Upload => "Upload Photo",
    };

    let header = row![
        button(text("←").size(20))
            .padding([6, 14])
            .style(button::secondary)
            .on_press(Message::Navigate(Route::Landing)),
        container(text(title).size(22)).width(Length::Fill).center_x(Length::Fill),
        Space::with_width(44),
    ]
    .align_y(Alignment::Center);

    let body = column![stage_area(screen), actions(screen)]
        .spacing(32)
        .max_width(420)
        .align_x(Alignment::Center);

    column![
        header,
        container(body)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill),
    ]
    .padding(16)
    .into()
}

fn stage_area(screen: &CaptureScreen) -> Element<'_, Message> {
    let square = |content: Element<'static, Message>| {
        container(content)
            .width(Length::Fill)
            .height(360)
            .center_x(Length::Fill)
            .center_y(360)
            .style(panel(0.1))
    };

    match screen.stage() {
        Stage::Live { preview: Some(frame), .. } => image(frame.clone())
            .width(Length::Fill)
            .content_fit(ContentFit::Contain)
            .into(),
        Stage::Live { preview: None, .. } => {
            square(text("Waiting for the camera...").color(PURPLE_TEXT).into()).into()
        }
        Stage::NoPreview { reason } => square(
            column![
                text("🚫").size(48),
                text("Camera unavailable").size(18),
                text("Allow camera access, then go back and try again.")
                    .size(14)
                    .color(PURPLE_TEXT),
                text(reason.to_string()).size(12).color(PURPLE_TEXT),
            ]
            .spacing(8)
            .align_x(Alignment::Center)
            .into(),
        )
        .into(),
        Stage::Chooser { loading } => {
            let hint = if *loading { "Opening your photo..." } else { "JPG, PNG supported" };
            let tile = square(
                column![
                    text("⬆").size(48),
                    text("Tap to upload photo").size(18),
                    text(hint).size(14).color(PURPLE_TEXT),
                ]
                .spacing(8)
                .align_x(Alignment::Center)
                .into(),
            );
            button(tile)
                .padding(0)
                .style(button::text)
                .on_press_maybe((!*loading).then_some(Message::PickFile))
                .into()
        }
        Stage::Still { photo } | Stage::Analyzing { photo, .. } => image(photo.handle())
            .width(Length::Fill)
            .content_fit(ContentFit::Contain)
            .into(),
    }
}

fn actions(screen: &CaptureScreen) -> Element<'_, Message> {
    if screen.still().is_some() {
        let retake = match screen.mode() {
            CaptureMode::Camera => "↺  Retake",
            CaptureMode::Upload => "↺  Choose Different Photo",
        };
        return column![
            action("⚡  Roast This Face!", Some(Message::Analyze)).style(button::primary),
            action(retake, Some(Message::Retake)).style(button::secondary),
        ]
        .spacing(16)
        .into();
    }

    if screen.mode() == CaptureMode::Camera && screen.is_streaming() {
        return button(text("📸").size(32))
            .padding(20)
            .style(button::danger)
            .on_press(Message::Snap)
            .into();
    }

    Space::with_height(0).into()
}

fn analyzing<'a>(started: Instant, now: Instant) -> Element<'a, Message> {
    let elapsed = now.saturating_duration_since(started);
    let progress = (elapsed.as_secs_f32() / PROGRESS_DURATION.as_secs_f32()).min(1.0);

    let content = column![
        canvas(Spinner { angle: spin_angle(elapsed) }).width(120).height(120),
        text("AI is analyzing your face...").size(24.0 * pulse_scale(elapsed)),
        container(progress_bar(0.0..=1.0, progress).height(Length::Fixed(8.0))).width(256),
        text("Scanning for ugly features... 🔍").color(PURPLE_TEXT),
        text("Preparing roast... 🔥").color(PURPLE_TEXT),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// Mascot rotation: one full turn every two seconds
fn spin_angle(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() * std::f32::consts::PI) % std::f32::consts::TAU
}

/// Headline size factor, pulsing once a second between 1.0 and 1.1
fn pulse_scale(elapsed: Duration) -> f32 {
    1.0 + 0.1 * (elapsed.as_secs_f32() * std::f32::consts::PI).sin().abs()
}
