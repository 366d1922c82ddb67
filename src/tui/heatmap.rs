//! Monthly-return heat grid drawn straight into Ratatui cells.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::chart::HeatModel;
use crate::color::{CellStyle, NO_DATA_BORDER, Rgb};
use crate::views::AxisFormat;

const LABEL_WIDTH: u16 = 6;
const BACKGROUND: Rgb = Rgb(0, 0, 0);

fn color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// Cell grid plus a one-line gradient legend.
pub struct HeatGridWidget<'a> {
    pub model: &'a HeatModel,
    /// `(row, column)` of the highlighted cell.
    pub selected: Option<(usize, usize)>,
}

impl<'a> Widget for HeatGridWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = self.model.column_labels.len().max(1) as u16;
        if area.width < LABEL_WIDTH + cols * 2 || area.height < 4 {
            buf.set_string(
                area.x,
                area.y,
                "Grid area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let cell_w = ((area.width - LABEL_WIDTH) / cols).min(9);
        let grid_h = area.height.saturating_sub(2);
        let rows = self.model.rows.len() as u16;
        // One terminal line per row; tall terminals get two.
        let cell_h = if rows > 0 && rows * 2 <= grid_h.saturating_sub(1) { 2 } else { 1 };
        let header = Style::default().fg(Color::Gray);

        for (j, label) in self.model.column_labels.iter().enumerate() {
            let x = area.x + LABEL_WIDTH + j as u16 * cell_w;
            buf.set_stringn(x, area.y, label, cell_w as usize, header);
        }

        for (i, (label, cells)) in self.model.rows.iter().enumerate() {
            let y = area.y + 1 + i as u16 * cell_h;
            if y + cell_h > area.y + grid_h {
                break;
            }
            buf.set_stringn(area.x, y, label, LABEL_WIDTH as usize - 1, header);

            for (j, cell) in cells.iter().enumerate() {
                let x = area.x + LABEL_WIDTH + j as u16 * cell_w;
                let fill = cell.style.composite(BACKGROUND);
                let mut style = Style::default().bg(color(fill)).fg(Color::White);
                if matches!(cell.style, CellStyle::NoData) {
                    style = style.fg(color(NO_DATA_BORDER));
                }
                if self.selected == Some((i, j)) {
                    style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                }

                let text = match cell.value {
                    Some(v) if cell_w >= 7 => format!("{:>w$}", AxisFormat::Percent1.format(v), w = cell_w as usize - 1),
                    Some(_) => String::new(),
                    None if cell_w >= 3 => format!("{:>w$}", "·", w = cell_w as usize - 1),
                    None => String::new(),
                };
                let w = cell_w.saturating_sub(1) as usize;
                for dy in 0..cell_h {
                    let line = if dy == 0 { text.as_str() } else { "" };
                    buf.set_stringn(x, y + dy, format!("{line:<w$}"), w, style);
                }
            }
        }

        render_legend(self.model, Rect { y: area.y + area.height - 1, height: 1, ..area }, buf);
    }
}

/// Gradient from `-max` through zero to `+max`.
fn render_legend(model: &HeatModel, area: Rect, buf: &mut Buffer) {
    let max = model.scale.max();
    let lo = AxisFormat::Percent0.format(-max);
    let hi = format!("+{}", AxisFormat::Percent0.format(max));

    let bar_x = area.x + LABEL_WIDTH;
    let bar_w = area.width.saturating_sub(LABEL_WIDTH + hi.len() as u16 + 1).min(36);
    if bar_w < 6 {
        return;
    }

    let label = Style::default().fg(Color::Gray);
    buf.set_stringn(area.x, area.y, &lo, LABEL_WIDTH as usize - 1, label);
    for k in 0..bar_w {
        let t = k as f64 / (bar_w - 1) as f64;
        let v = -max + t * 2.0 * max;
        let fill = model.scale.style(Some(v)).composite(BACKGROUND);
        buf.set_string(bar_x + k, area.y, " ", Style::default().bg(color(fill)));
    }
    buf.set_string(bar_x + bar_w / 2, area.y, "0", Style::default().fg(Color::Black));
    buf.set_string(bar_x + bar_w + 1, area.y, &hi, label);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Binding, bind};
    use crate::domain::{ShapeOptions, Shaped};
    use crate::shape::grid_from_triples;
    use crate::views::{ViewKind, spec_for};

    fn model() -> HeatModel {
        let shaped = Shaped::Heatmap {
            grid: grid_from_triples([(2024, 1, Some(0.05)), (2024, 2, None)]),
            compact: false,
        };
        match bind(&shaped, &spec_for(ViewKind::Monthly).chart, &ShapeOptions::default()) {
            Binding::Heat(m) => m,
            Binding::Plot(_) => panic!("expected heat model"),
        }
    }

    #[test]
    fn renders_labels_values_and_legend() {
        let model = model();
        let area = Rect::new(0, 0, 120, 8);
        let mut buf = Buffer::empty(area);
        HeatGridWidget { model: &model, selected: None }.render(area, &mut buf);

        let row = |y: u16| (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>();
        assert!(row(0).contains("Jan"));
        assert!(row(0).contains("Dec"));
        let body: String = (1..area.height - 1).map(row).collect();
        assert!(body.contains("2024"));
        assert!(body.contains("5.0%"));
        let legend = row(area.height - 1);
        assert!(legend.contains("-10%"));
        assert!(legend.contains("+10%"));
    }

    #[test]
    fn tiny_area_shows_hint() {
        let model = model();
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        HeatGridWidget { model: &model, selected: None }.render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "G");
    }
}
