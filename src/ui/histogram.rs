/// RGB histogram canvas for the Image Analysis tool
use iced::widget::canvas::{self, Path, Stroke};
use iced::{Color, Point, Rectangle, Size};

use crate::Message;

/// Borrowed per-channel histogram: [R[256], G[256], B[256]]
#[derive(Debug, Clone, Copy)]
pub struct Histogram<'a> {
    pub data: &'a [[u32; 256]; 3],
}

fn channel_color(channel: usize) -> Color {
    match channel {
        0 => Color::from_rgba(1.0, 0.0, 0.0, 0.5),
        1 => Color::from_rgba(0.0, 1.0, 0.0, 0.5),
        _ => Color::from_rgba(0.0, 0.0, 1.0, 0.5),
    }
}

impl<'a> canvas::Program<Message> for Histogram<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            Size::new(bounds.width, bounds.height),
            theme.extended_palette().background.weak.color,
        );

        let max_value = self
            .data
            .iter()
            .flat_map(|channel| channel.iter())
            .copied()
            .max()
            .unwrap_or(0) as f32;

        // Blank or fully transparent-black images have nothing to plot
        if max_value < 1.0 {
            return vec![frame.into_geometry()];
        }

        let height = bounds.height;
        let bar_width = bounds.width / 256.0;

        for (channel, counts) in self.data.iter().enumerate() {
            let mut builder = canvas::path::Builder::new();

            for (i, &count) in counts.iter().enumerate() {
                if count == 0 {
                    continue;
                }
                let x = i as f32 * bar_width;
                builder.move_to(Point::new(x, height));
                builder.line_to(Point::new(x, height - (count as f32 / max_value) * height));
            }

            let path: Path = builder.build();
            frame.stroke(
                &path,
                Stroke::default()
                    .with_color(channel_color(channel))
                    .with_width(bar_width.max(1.0)),
            );
        }

        vec![frame.into_geometry()]
    }
}
