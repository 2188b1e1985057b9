/// Canvas drawings layered over the photo
use iced::alignment;
use iced::mouse::Cursor;
use iced::widget::canvas::{self, path, Frame, Path, Stroke, Text};
use iced::{font, Color, Font, Pixels, Point, Radians, Rectangle, Renderer, Size, Theme, Vector};

use crate::state::data::FilterTag;

/// Decorations for the filters picked by a result
#[derive(Debug, Clone)]
pub struct FilterOverlay {
    pub filters: Vec<FilterTag>,
}

impl<Message> canvas::Program<Message> for FilterOverlay {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let size = bounds.size();

        // Drawn bottom-up so "wasted" darkens everything below it
        for tag in FilterTag::ALL {
            if !self.filters.contains(&tag) {
                continue;
            }
            match tag {
                FilterTag::GiantForehead => draw_forehead(&mut frame, size),
                FilterTag::Unibrow => draw_unibrow(&mut frame, size),
                FilterTag::CrookedTeeth => draw_teeth(&mut frame, size),
                FilterTag::Pimples => draw_pimples(&mut frame, size),
                FilterTag::Wasted => draw_wasted(&mut frame, size),
            }
        }

        vec![frame.into_geometry()]
    }
}

fn draw_forehead(frame: &mut Frame, size: Size) {
    let bulge = Path::circle(
        Point::new(size.width / 2.0, -size.height * 0.12),
        size.width * 0.45,
    );
    frame.fill(&bulge, Color::from_rgba(1.0, 0.87, 0.75, 0.35));
    frame.stroke(
        &bulge,
        Stroke::default()
            .with_color(Color::from_rgba(0.55, 0.35, 0.25, 0.5))
            .with_width(2.0),
    );
}

fn draw_unibrow(frame: &mut Frame, size: Size) {
    let brow = Size::new(size.width * 0.28, (size.height * 0.03).max(8.0));
    let top_left = Point::new(
        (size.width - brow.width) / 2.0,
        size.height / 4.0 - brow.height / 2.0,
    );
    let path = Path::rounded_rectangle(top_left, brow, (brow.height / 2.0).into());
    frame.fill(&path, Color::from_rgba(0.0, 0.0, 0.0, 0.8));
}

fn draw_teeth(frame: &mut Frame, size: Size) {
    let tooth = Size::new(size.width * 0.035, size.height * 0.05);
    let row_width = tooth.width * 6.0;
    let left = (size.width - row_width) / 2.0;
    let baseline = size.height * 0.72;
    // Heights and offsets per tooth, deliberately uneven
    let wobble = [0.0, 0.35, -0.2, 0.5, 0.1, -0.3];

    for (i, offset) in wobble.iter().enumerate() {
        let top_left = Point::new(
            left + i as f32 * tooth.width,
            baseline + offset * tooth.height,
        );
        let path = Path::rectangle(top_left, Size::new(tooth.width * 0.9, tooth.height));
        frame.fill(&path, Color::from_rgb(0.98, 0.95, 0.78));
        frame.stroke(
            &path,
            Stroke::default()
                .with_color(Color::from_rgba(0.3, 0.25, 0.1, 0.7))
                .with_width(1.0),
        );
    }
}

fn draw_pimples(frame: &mut Frame, size: Size) {
    let spots = [
        (0.75, 1.0 / 3.0, 6.0, Color::from_rgb(0.94, 0.27, 0.27)),
        (1.0 / 3.0, 0.5, 4.0, Color::from_rgb(0.97, 0.44, 0.44)),
        (2.0 / 3.0, 2.0 / 3.0, 4.0, Color::from_rgb(0.86, 0.15, 0.15)),
    ];
    for (x, y, radius, color) in spots {
        let spot = Path::circle(Point::new(size.width * x, size.height * y), radius);
        frame.fill(&spot, color);
    }
}

fn draw_wasted(frame: &mut Frame, size: Size) {
    frame.fill_rectangle(Point::ORIGIN, size, Color::from_rgba(0.0, 0.0, 0.0, 0.5));
    frame.fill_text(Text {
        content: "WASTED".to_string(),
        position: Point::new(size.width / 2.0, size.height / 2.0),
        color: Color::from_rgb(0.94, 0.27, 0.27),
        size: Pixels((size.width / 7.0).clamp(24.0, 64.0)),
        font: Font {
            weight: font::Weight::Bold,
            ..Font::DEFAULT
        },
        horizontal_alignment: alignment::Horizontal::Center,
        vertical_alignment: alignment::Vertical::Center,
        ..Text::default()
    });
}

/// Robot mascot spinning inside a progress ring while "analyzing"
#[derive(Debug, Clone, Copy)]
pub struct Spinner {
    /// Current rotation in radians
    pub angle: f32,
}

impl<Message> canvas::Program<Message> for Spinner {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let center = frame.center();
        let radius = bounds.width.min(bounds.height) / 2.0 - 4.0;

        let track = Path::circle(center, radius);
        frame.stroke(
            &track,
            Stroke::default()
                .with_color(Color::from_rgba(1.0, 1.0, 1.0, 0.2))
                .with_width(6.0),
        );

        let arc = Path::new(|builder| {
            builder.arc(path::Arc {
                center,
                radius,
                start_angle: Radians(self.angle),
                end_angle: Radians(self.angle + std::f32::consts::FRAC_PI_2 * 1.5),
            });
        });
        frame.stroke(
            &arc,
            Stroke::default()
                .with_color(Color::from_rgb(0.96, 0.62, 0.04))
                .with_width(6.0),
        );

        frame.with_save(|frame| {
            frame.translate(Vector::new(center.x, center.y));
            frame.rotate(Radians(self.angle));
            draw_robot(frame, radius * 0.55);
        });

        vec![frame.into_geometry()]
    }
}

/// Robot head centered on the origin, `half` = half its width
fn draw_robot(frame: &mut Frame, half: f32) {
    let metal = Color::from_rgb(0.75, 0.78, 0.85);
    let dark = Color::from_rgb(0.16, 0.15, 0.32);

    // Antenna
    frame.stroke(
        &Path::line(Point::new(0.0, -half * 0.8), Point::new(0.0, -half * 1.15)),
        Stroke::default().with_color(metal).with_width(half * 0.08),
    );
    frame.fill(&Path::circle(Point::new(0.0, -half * 1.2), half * 0.12), Color::from_rgb(0.94, 0.27, 0.27));

    let head = Path::rounded_rectangle(
        Point::new(-half, -half * 0.8),
        Size::new(half * 2.0, half * 1.6),
        (half * 0.3).into(),
    );
    frame.fill(&head, metal);

    for x in [-half * 0.4, half * 0.4] {
        frame.fill(&Path::circle(Point::new(x, -half * 0.2), half * 0.18), dark);
    }

    let mouth = Path::rectangle(Point::new(-half * 0.5, half * 0.3), Size::new(half, half * 0.15));
    frame.fill(&mouth, dark);
}
