use std::path::PathBuf;

use crate::load::RunLog;
use crate::models::PlanResponse;

pub const OBSTACLE_SIZE: f64 = 3.0;
pub const ENDPOINT_SIZE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Obstacles,
    Start,
    Goal,
    Path,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    /// `size` follows the matplotlib convention: marker area in pt^2.
    Scatter { role: Role, points: Vec<(f64, f64)>, size: f64, marker: Marker, filled: bool },
    Line { role: Role, points: Vec<(f64, f64)> },
    Heading { role: Role, origin: (f64, f64), yaw: f64 },
}

impl Series {
    pub fn role(&self) -> Role {
        match self {
            Series::Scatter { role, .. } | Series::Line { role, .. } | Series::Heading { role, .. } => *role,
        }
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        match self {
            Series::Scatter { points, .. } | Series::Line { points, .. } => points.clone(),
            Series::Heading { origin, .. } => vec![*origin],
        }
    }
}

/// Backend-independent description of the plot for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Run directory the figure was built from.
    pub source: PathBuf,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub equal_aspect: bool,
    pub grid: bool,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn lines(&self) -> impl Iterator<Item = &Series> {
        self.series.iter().filter(|s| matches!(s, Series::Line { .. }))
    }

    pub fn find(&self, role: Role) -> Option<&Series> {
        self.series.iter().find(|s| s.role() == role)
    }
}

pub fn build_figure(log: &RunLog) -> Figure {
    let req = &log.request;
    let resp = &log.response;
    let mut series = Vec::new();

    if !req.ox.is_empty() && !req.oy.is_empty() {
        series.push(Series::Scatter {
            role: Role::Obstacles,
            points: req.obstacles(),
            size: OBSTACLE_SIZE,
            marker: Marker::Circle,
            filled: false,
        });
    }

    series.push(Series::Scatter {
        role: Role::Start,
        points: vec![req.start()],
        size: ENDPOINT_SIZE,
        marker: Marker::Circle,
        filled: true,
    });
    series.push(Series::Scatter {
        role: Role::Goal,
        points: vec![req.goal()],
        size: ENDPOINT_SIZE,
        marker: Marker::Cross,
        filled: true,
    });

    if let Some(yaw) = req.syaw {
        series.push(Series::Heading { role: Role::Start, origin: req.start(), yaw });
    }
    if let Some(yaw) = req.gyaw {
        series.push(Series::Heading { role: Role::Goal, origin: req.goal(), yaw });
    }

    if resp.has_path() {
        series.push(Series::Line { role: Role::Path, points: resp.path() });
    }

    Figure {
        source: log.dir.clone(),
        title: title_for(resp),
        x_label: "x".to_string(),
        y_label: "y".to_string(),
        equal_aspect: true,
        grid: true,
        series,
    }
}

pub fn title_for(resp: &PlanResponse) -> String {
    if resp.has_path() {
        format!("Path ok=true, n={}, cost={}", resp.x.len(), format_cost(resp.cost))
    } else {
        format!("Path ok={}, error={}", resp.ok, resp.error.as_deref().unwrap_or(""))
    }
}

fn format_cost(cost: Option<f64>) -> String {
    // Debug keeps the trailing ".0" on whole numbers
    match cost {
        Some(c) => format!("{c:?}"),
        None => "none".to_string(),
    }
}
