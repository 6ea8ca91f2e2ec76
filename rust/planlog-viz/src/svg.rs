//! SVG output for a [`Figure`].
//!
//! The figure is written to a file instead of an interactive window. The
//! layout mirrors a default matplotlib axes: title on top, equal aspect,
//! background grid at the tick positions, labelled axes.

use std::fmt::{self, Write};
use std::fs;
use std::path::{Path, PathBuf};

use itertools::{Itertools, MinMaxResult};
use tracing::info;

use crate::errors::VizError;
use crate::DEFAULT_PLOT_FILE;
use crate::figure::{Figure, Marker, Role, Series};

/// Display backend for a built figure.
pub trait FigureSink {
    fn show(&mut self, figure: &Figure) -> Result<(), VizError>;
}

const PT_TO_PX: f64 = 96.0 / 72.0;
const TARGET_TICKS: f64 = 8.0;

#[derive(Clone, Debug)]
pub struct SvgConfig {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    /// Fraction of the data span added on each side.
    pub data_padding: f64,
    pub line_width: f64,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 640.0,
            margin_left: 70.0,
            margin_right: 20.0,
            margin_top: 50.0,
            margin_bottom: 60.0,
            data_padding: 0.05,
            line_width: 1.5,
        }
    }
}

fn role_color(role: Role) -> &'static str {
    match role {
        Role::Obstacles => "#1f77b4",
        Role::Start => "#ff7f0e",
        Role::Goal => "#2ca02c",
        Role::Path => "#d62728",
    }
}

/// Writes each shown figure to `out`, or to `plot.svg` inside its run directory.
pub struct SvgSink {
    out: Option<PathBuf>,
    config: SvgConfig,
}

impl SvgSink {
    pub fn new(out: Option<PathBuf>) -> Self {
        Self { out, config: SvgConfig::default() }
    }

    pub fn with_config(mut self, config: SvgConfig) -> Self {
        self.config = config;
        self
    }

    pub fn target(&self, run_dir: &Path) -> PathBuf {
        self.out.clone().unwrap_or_else(|| run_dir.join(DEFAULT_PLOT_FILE))
    }
}

impl FigureSink for SvgSink {
    fn show(&mut self, figure: &Figure) -> Result<(), VizError> {
        let svg = render_svg(figure, &self.config)?;
        let out = self.target(&figure.source);
        fs::write(&out, svg).map_err(|e| VizError::io(&out, e))?;
        info!(out=%out.display(), series=figure.series.len(), "figure written");
        Ok(())
    }
}

pub fn render_svg(figure: &Figure, config: &SvgConfig) -> Result<String, VizError> {
    let mut svg = String::new();
    write_figure(&mut svg, figure, config).map_err(|e| VizError::Render(e.to_string()))?;
    Ok(svg)
}

/// Data-to-pixel mapping for the plot area.
#[derive(Clone, Copy, Debug)]
struct Viewport {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    left: f64,
    top: f64,
    pw: f64,
    ph: f64,
}

impl Viewport {
    fn fit(figure: &Figure, config: &SvgConfig) -> Self {
        let left = config.margin_left;
        let top = config.margin_top;
        let pw = (config.width - config.margin_left - config.margin_right).max(1.0);
        let ph = (config.height - config.margin_top - config.margin_bottom).max(1.0);

        let points: Vec<(f64, f64)> = figure
            .series
            .iter()
            .flat_map(|s| s.points())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        let (x0, x1) = padded_range(points.iter().map(|p| p.0), config.data_padding);
        let (y0, y1) = padded_range(points.iter().map(|p| p.1), config.data_padding);

        let mut vp = Self { x0, x1, y0, y1, left, top, pw, ph };
        if figure.equal_aspect {
            // one scale for both axes; the slack axis grows around its center
            let scale = (pw / (x1 - x0)).min(ph / (y1 - y0));
            let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
            let (hx, hy) = (pw / scale / 2.0, ph / scale / 2.0);
            vp.x0 = cx - hx;
            vp.x1 = cx + hx;
            vp.y0 = cy - hy;
            vp.y1 = cy + hy;
        }
        vp
    }

    fn px(&self, x: f64) -> f64 {
        self.left + (x - self.x0) / (self.x1 - self.x0) * self.pw
    }

    fn py(&self, y: f64) -> f64 {
        self.top + self.ph - (y - self.y0) / (self.y1 - self.y0) * self.ph
    }
}

fn padded_range(values: impl Iterator<Item = f64>, padding: f64) -> (f64, f64) {
    let (lo, hi) = match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => (0.0, 1.0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    let span = hi - lo;
    if span <= f64::EPSILON * lo.abs().max(1.0) {
        return (lo - 0.5, hi + 0.5);
    }
    (lo - span * padding, hi + span * padding)
}

/// 1/2/5 step giving roughly `TARGET_TICKS` intervals over `span`.
fn tick_step(span: f64) -> f64 {
    let raw = span / TARGET_TICKS;
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm < 1.5 {
        1.0
    } else if norm < 3.5 {
        2.0
    } else if norm < 7.5 {
        5.0
    } else {
        10.0
    };
    nice * mag
}

fn ticks(lo: f64, hi: f64) -> (Vec<f64>, f64) {
    let step = tick_step(hi - lo);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    let values = (first..=last)
        .take(1000)
        .map(|i| {
            let v = i as f64 * step;
            if v.abs() < step * 1e-9 { 0.0 } else { v }
        })
        .collect();
    (values, step)
}

fn tick_label(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10()).ceil() as usize };
    format!("{:.*}", decimals, value)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn marker_radius(size: f64) -> f64 {
    size.max(0.0).sqrt() / 2.0 * PT_TO_PX
}

fn write_figure(svg: &mut String, figure: &Figure, config: &SvgConfig) -> fmt::Result {
    let vp = Viewport::fit(figure, config);
    let (w, h) = (config.width, config.height);

    writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#
    )?;
    writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(svg, "  <defs>")?;
    writeln!(
        svg,
        r#"    <clipPath id="plot-area"><rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/></clipPath>"#,
        vp.left, vp.top, vp.pw, vp.ph
    )?;
    writeln!(
        svg,
        r#"    <marker id="arrow" viewBox="0 0 10 10" refX="9" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="context-stroke"/></marker>"#
    )?;
    writeln!(svg, "  </defs>")?;

    writeln!(
        svg,
        r##"  <text id="title" x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="16" text-anchor="middle" fill="#222">{}</text>"##,
        vp.left + vp.pw / 2.0,
        vp.top - 18.0,
        escape_xml(&figure.title)
    )?;

    write_axes(svg, figure, &vp)?;

    writeln!(svg, r#"  <g id="data" clip-path="url(#plot-area)">"#)?;
    for series in &figure.series {
        write_series(svg, series, &vp, config)?;
    }
    writeln!(svg, "  </g>")?;

    writeln!(svg, "</svg>")
}

fn write_axes(svg: &mut String, figure: &Figure, vp: &Viewport) -> fmt::Result {
    let (xticks, xstep) = ticks(vp.x0, vp.x1);
    let (yticks, ystep) = ticks(vp.y0, vp.y1);
    let bottom = vp.top + vp.ph;
    let right = vp.left + vp.pw;

    if figure.grid {
        writeln!(svg, r##"  <g id="grid" stroke="#b0b0b0" stroke-width="0.8" opacity="0.6">"##)?;
        for &t in &xticks {
            let x = vp.px(t);
            writeln!(svg, r#"    <line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{bottom:.1}"/>"#, vp.top)?;
        }
        for &t in &yticks {
            let y = vp.py(t);
            writeln!(svg, r#"    <line x1="{:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}"/>"#, vp.left)?;
        }
        writeln!(svg, "  </g>")?;
    }

    writeln!(
        svg,
        r##"  <rect id="frame" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="#222" stroke-width="1"/>"##,
        vp.left, vp.top, vp.pw, vp.ph
    )?;

    writeln!(svg, r##"  <g id="ticks" font-family="sans-serif" font-size="11" fill="#222">"##)?;
    for &t in &xticks {
        writeln!(
            svg,
            r#"    <text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            vp.px(t),
            bottom + 16.0,
            tick_label(t, xstep)
        )?;
    }
    for &t in &yticks {
        writeln!(
            svg,
            r#"    <text x="{:.1}" y="{:.1}" text-anchor="end" dy="4">{}</text>"#,
            vp.left - 6.0,
            vp.py(t),
            tick_label(t, ystep)
        )?;
    }
    writeln!(svg, "  </g>")?;

    writeln!(
        svg,
        r##"  <text id="x-label" x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="13" text-anchor="middle" fill="#222">{}</text>"##,
        vp.left + vp.pw / 2.0,
        bottom + 40.0,
        escape_xml(&figure.x_label)
    )?;
    let ly = vp.top + vp.ph / 2.0;
    writeln!(
        svg,
        r##"  <text id="y-label" x="20" y="{ly:.1}" font-family="sans-serif" font-size="13" text-anchor="middle" fill="#222" transform="rotate(-90 20 {ly:.1})">{}</text>"##,
        escape_xml(&figure.y_label)
    )
}

fn write_series(svg: &mut String, series: &Series, vp: &Viewport, config: &SvgConfig) -> fmt::Result {
    match series {
        Series::Scatter { role, points, size, marker, filled } => {
            let color = role_color(*role);
            let r = marker_radius(*size);
            writeln!(svg, r#"    <g class="scatter {}">"#, role_class(*role))?;
            for &(x, y) in points {
                let (cx, cy) = (vp.px(x), vp.py(y));
                match marker {
                    Marker::Circle if *filled => writeln!(
                        svg,
                        r#"      <circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{color}"/>"#
                    )?,
                    Marker::Circle => writeln!(
                        svg,
                        r#"      <circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="none" stroke="{color}" stroke-width="0.8"/>"#
                    )?,
                    Marker::Cross => writeln!(
                        svg,
                        r#"      <path d="M {:.2} {:.2} L {:.2} {:.2} M {:.2} {:.2} L {:.2} {:.2}" stroke="{color}" stroke-width="2"/>"#,
                        cx - r, cy - r, cx + r, cy + r, cx - r, cy + r, cx + r, cy - r
                    )?,
                }
            }
            writeln!(svg, "    </g>")
        }
        Series::Line { role, points } => {
            let coords = points
                .iter()
                .map(|&(x, y)| format!("{:.2},{:.2}", vp.px(x), vp.py(y)))
                .join(" ");
            writeln!(
                svg,
                r#"    <polyline class="line {}" points="{coords}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round"/>"#,
                role_class(*role),
                role_color(*role),
                config.line_width
            )
        }
        Series::Heading { role, origin, yaw } => {
            let len = marker_radius(crate::figure::ENDPOINT_SIZE) * 4.0;
            let (x1, y1) = (vp.px(origin.0), vp.py(origin.1));
            // screen y grows downward
            let (x2, y2) = (x1 + len * yaw.cos(), y1 - len * yaw.sin());
            writeln!(
                svg,
                r#"    <line class="heading {}" x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="1.5" marker-end="url(#arrow)"/>"#,
                role_class(*role),
                role_color(*role)
            )
        }
    }
}

fn role_class(role: Role) -> &'static str {
    match role {
        Role::Obstacles => "obstacles",
        Role::Start => "start",
        Role::Goal => "goal",
        Role::Path => "path",
    }
}
