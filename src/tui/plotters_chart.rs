//! Plotters-powered dashboard chart widget for Ratatui.
//!
//! Plotters gives us axes, tick labels and filled series without redoing the
//! layout math by hand. Output goes into the Ratatui buffer through
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::PlotModel;
use crate::color::Rgb;
use crate::views::RefLine;

/// Render-only chart over a bound [`PlotModel`].
///
/// All series and bounds are computed by `chart::bind`; `render()` only draws.
pub struct DashPlottersChart<'a> {
    pub model: &'a PlotModel,
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

impl<'a> Widget for DashPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a tiny chart; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let model = self.model;
        let [x0, x1] = model.x_bounds;
        let [y0, y1] = model.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Mesh lines are noise at terminal resolution; axes and labels suffice.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(model.x_label.as_str())
                .y_desc(model.y_label.as_str())
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| model.x_axis.format(*v))
                .y_label_formatter(&|v| model.y_format.format(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Areas first so lines and markers stay visible on top.
            for band in &model.areas {
                let color = rgb(band.color);
                for seg in &band.segments {
                    chart.draw_series(AreaSeries::new(seg.iter().copied(), band.baseline, color.mix(0.6).filled()))?;
                }
            }

            let bar_color = rgb(model.bar_color);
            chart.draw_series(model.bars.iter().map(|b| {
                Rectangle::new([(b.x0, 0.0), (b.x1, b.y)], bar_color.filled())
            }))?;

            for r in &model.ref_lines {
                let pts = match *r {
                    RefLine::Vertical { x, color } if x >= x0 && x <= x1 => Some(([(x, y0), (x, y1)], color)),
                    RefLine::Horizontal { y, color } if y >= y0 && y <= y1 => Some(([(x0, y), (x1, y)], color)),
                    _ => None,
                };
                if let Some((pts, color)) = pts {
                    chart.draw_series(LineSeries::new(pts, &rgb(color)))?;
                }
            }

            for line in &model.lines {
                let color = rgb(line.color);
                for seg in &line.segments {
                    chart.draw_series(LineSeries::new(seg.iter().copied(), &color))?;
                }
            }

            // `Circle` radii come out huge through the ratatui backend; a
            // colored `Pixel` reads as a clean dot.
            let point_color = rgb(model.point_color);
            chart.draw_series(model.points.iter().map(|&p| Pixel::new(p, point_color)))?;

            if let Some(m) = &model.marker {
                let c = rgb(m.color);
                let dx = (x1 - x0) * 0.01;
                let dy = (y1 - y0) * 0.02;
                chart.draw_series(LineSeries::new([(m.x - dx, m.y), (m.x + dx, m.y)], &WHITE))?;
                chart.draw_series(LineSeries::new([(m.x, m.y - dy), (m.x, m.y + dy)], &WHITE))?;
                chart.draw_series(std::iter::once(Pixel::new((m.x, m.y), c)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Binding, bind};
    use crate::domain::{Bucket, DrawdownRow, ShapeOptions, Shaped};
    use crate::views::{ViewKind, spec_for};

    fn plot(shaped: &Shaped, kind: ViewKind) -> PlotModel {
        match bind(shaped, &spec_for(kind).chart, &ShapeOptions::default()) {
            Binding::Plot(m) => m,
            Binding::Heat(_) => panic!("expected plot model"),
        }
    }

    fn drawn_cells(model: &PlotModel, area: Rect) -> usize {
        let mut buf = Buffer::empty(area);
        DashPlottersChart { model }.render(area, &mut buf);
        (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .filter(|&(x, y)| buf[(x, y)].symbol() != " ")
            .count()
    }

    #[test]
    fn draws_filled_drawdown_area() {
        let shaped = Shaped::Drawdown {
            rows: vec![
                DrawdownRow { date: "2024-01-01".into(), drawdown: Some(0.0), benchmark: None },
                DrawdownRow { date: "2024-01-02".into(), drawdown: Some(-0.1), benchmark: None },
                DrawdownRow { date: "2024-01-03".into(), drawdown: Some(-0.04), benchmark: None },
            ],
            max: None,
        };
        let model = plot(&shaped, ViewKind::Drawdown);
        assert!(!model.areas.is_empty());
        assert!(drawn_cells(&model, Rect::new(0, 0, 80, 24)) > 0);
    }

    #[test]
    fn draws_histogram_bars() {
        let shaped = Shaped::Histogram {
            buckets: vec![
                Bucket { lower: 0.0, upper: 10.0, count: 3, median: None },
                Bucket { lower: 10.0, upper: 20.0, count: 1, median: None },
            ],
            unit: "d".into(),
        };
        let model = plot(&shaped, ViewKind::Recovery);
        assert_eq!(model.bars.len(), 2);
        assert!(drawn_cells(&model, Rect::new(0, 0, 80, 24)) > 0);
    }

    #[test]
    fn tiny_area_shows_resize_hint() {
        let model = plot(&Shaped::Histogram { buckets: Vec::new(), unit: "d".into() }, ViewKind::Recovery);
        let area = Rect::new(0, 0, 60, 4);
        let mut buf = Buffer::empty(area);
        DashPlottersChart { model: &model }.render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "C");
    }
}
