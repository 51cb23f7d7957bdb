//! Plotters-powered "Income & Loan Overview" bar chart for Ratatui.
//!
//! Plotters output is rendered into the Ratatui buffer using
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

/// Render-only bar chart description; values are computed by the caller.
pub struct OverviewBarChart<'a> {
    /// `(label, value)` per bar, left to right.
    pub bars: &'a [(&'static str, f64)],
    /// Y axis label.
    pub y_label: &'a str,
}

impl OverviewBarChart<'_> {
    /// Upper y bound with headroom for the value labels.
    fn y_max(&self) -> f64 {
        let max = self.bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
        if max.is_finite() && max > 0.0 { max * 1.2 } else { 1.0 }
    }
}

impl Widget for OverviewBarChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }
        if self.bars.is_empty() {
            return;
        }

        let n = self.bars.len() as f64;
        let y_max = self.y_max();
        let bars = self.bars;
        let y_label = self.y_label;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(-0.5..n - 0.5, 0.0..y_max)?;

            // Bars sit on integer x positions; only those ticks get a name.
            let label_for = |v: &f64| {
                let idx = v.round();
                if (v - idx).abs() > 0.05 || idx < 0.0 {
                    return String::new();
                }
                bars.get(idx as usize)
                    .map(|(label, _)| label.to_string())
                    .unwrap_or_default()
            };

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(y_label)
                .x_labels(bars.len())
                .y_labels(5)
                .x_label_formatter(&label_for)
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            let palette = [
                RGBColor(0, 255, 255), // cyan
                RGBColor(0, 255, 0),   // green
                RGBColor(255, 255, 0), // yellow
            ];

            chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
                let x = i as f64;
                Rectangle::new(
                    [(x - 0.3, 0.0), (x + 0.3, value.max(0.0))],
                    palette[i % palette.len()].filled(),
                )
            }))?;

            chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
                Text::new(
                    format!("{value:.2}"),
                    (i as f64 - 0.3, value.max(0.0) + y_max * 0.05),
                    ("sans-serif", 10).into_font().color(&WHITE),
                )
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
