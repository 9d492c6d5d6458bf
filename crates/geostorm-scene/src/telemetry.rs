//! Live magnetic-field graph.
//!
//! Raw samples are exponentially smoothed into a bounded history, and the
//! history is drawn as a smooth polyline onto a 2D surface. The surface is
//! a trait so a backend (browser canvas, terminal, test recorder) can be
//! swapped in.

use std::collections::VecDeque;

use crate::constants::{
    CHART_HEIGHT, CHART_WIDTH, GRAPH_LINE_WIDTH, GRAPH_MAX_VALUE, GRAPH_STROKE, HISTORY_CAPACITY,
    SMOOTHING_FACTOR,
};

/// Bounded history of smoothed field-strength samples (µT).
#[derive(Debug, Clone, PartialEq)]
pub struct MagneticHistory {
    samples: VecDeque<f64>,
    smoothed: f64,
    capacity: usize,
}

impl Default for MagneticHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MagneticHistory {
    /// Empty history holding the most recent 80 samples.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Empty history holding the most recent `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            smoothed: 0.0,
            capacity,
        }
    }

    /// Blend `raw` into the running value and append the result, evicting
    /// the oldest entry when full.
    pub fn push(&mut self, raw: f64) -> f64 {
        self.smoothed += (raw - self.smoothed) * SMOOTHING_FACTOR;
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        if self.capacity > 0 {
            self.samples.push_back(self.smoothed);
        }
        self.smoothed
    }

    /// Forget the plotted samples. The running smoothed value is kept.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// The current smoothed value.
    pub const fn smoothed(&self) -> f64 {
        self.smoothed
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Retained samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

/// Minimal 2D path-drawing surface.
pub trait Canvas2d {
    /// Surface width in pixels.
    fn width(&self) -> f64;
    /// Surface height in pixels.
    fn height(&self) -> f64;
    /// Erase everything.
    fn clear(&mut self);
    /// Stroke colour and line width for the next stroke.
    fn set_stroke(&mut self, color: &str, width: f64);
    /// Start a new path.
    fn begin_path(&mut self);
    /// Move the pen without drawing.
    fn move_to(&mut self, x: f64, y: f64);
    /// Quadratic Bézier from the pen through control `(cx, cy)` to `(x, y)`.
    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
    /// Stroke the current path.
    fn stroke(&mut self);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    /// Stroke style change.
    SetStroke {
        /// CSS colour.
        color: String,
        /// Line width.
        width: f64,
    },
    /// Path start.
    BeginPath,
    /// Pen move.
    MoveTo {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
    /// Quadratic segment.
    QuadraticCurveTo {
        /// Control point X.
        cx: f64,
        /// Control point Y.
        cy: f64,
        /// End point X.
        x: f64,
        /// End point Y.
        y: f64,
    },
    /// Path stroke.
    Stroke,
}

/// A [`Canvas2d`] that records calls instead of rasterising.
///
/// Used headless and in tests; `clear` drops everything recorded so far.
#[derive(Debug, Clone, PartialEq)]
pub struct PathRecorder {
    width: f64,
    height: f64,
    commands: Vec<PathCommand>,
}

impl Default for PathRecorder {
    fn default() -> Self {
        Self::new(CHART_WIDTH, CHART_HEIGHT)
    }
}

impl PathRecorder {
    /// A recorder for a `width` × `height` surface.
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Calls recorded since the last clear.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }
}

impl Canvas2d for PathRecorder {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn set_stroke(&mut self, color: &str, width: f64) {
        self.commands.push(PathCommand::SetStroke {
            color: color.to_owned(),
            width,
        });
    }

    fn begin_path(&mut self) {
        self.commands.push(PathCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo { x, y });
    }

    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.commands
            .push(PathCommand::QuadraticCurveTo { cx, cy, x, y });
    }

    fn stroke(&mut self) {
        self.commands.push(PathCommand::Stroke);
    }
}

/// Redraw `history` onto `canvas`.
///
/// Samples are spaced evenly across the width; the value
/// [`GRAPH_MAX_VALUE`] maps to the top edge and zero to the bottom. Each
/// sample is a control point and the curve passes through the midpoints
/// between consecutive samples.
#[allow(clippy::cast_precision_loss)]
pub fn draw_history<C: Canvas2d + ?Sized>(canvas: &mut C, history: &MagneticHistory) {
    canvas.clear();
    let (w, h) = (canvas.width(), canvas.height());
    let len = history.len();
    let step = if len > 1 {
        w / len.saturating_sub(1) as f64
    } else {
        0.0
    };
    let y_of = |v: f64| h - (v / GRAPH_MAX_VALUE) * h;

    canvas.set_stroke(GRAPH_STROKE, GRAPH_LINE_WIDTH);
    canvas.begin_path();

    let points: Vec<(f64, f64)> = history
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64 * step, y_of(v)))
        .collect();
    if let Some(&(x, y)) = points.first() {
        canvas.move_to(x, y);
    }
    for pair in points.windows(2) {
        if let &[(x0, y0), (x1, y1)] = pair {
            canvas.quadratic_curve_to(x0, y0, (x0 + x1) / 2.0, (y0 + y1) / 2.0);
        }
    }
    canvas.stroke();
}

/// The collapsible live graph panel.
///
/// While collapsed nothing is recorded or drawn. Toggling either way
/// clears the plotted history.
#[derive(Debug, Clone, Default)]
pub struct LiveGraph {
    history: MagneticHistory,
    surface: Option<PathRecorder>,
}

impl LiveGraph {
    /// A collapsed panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the panel is expanded.
    pub const fn is_expanded(&self) -> bool {
        self.surface.is_some()
    }

    /// Expand or collapse. Returns the new expanded state.
    pub fn toggle(&mut self) -> bool {
        self.history.clear();
        self.surface = match self.surface.take() {
            Some(_) => None,
            None => Some(PathRecorder::default()),
        };
        self.is_expanded()
    }

    /// Record one raw sample and redraw. Returns the smoothed value, or
    /// `None` while collapsed.
    pub fn update(&mut self, raw: f64) -> Option<f64> {
        let surface = self.surface.as_mut()?;
        let smoothed = self.history.push(raw);
        draw_history(surface, &self.history);
        Some(smoothed)
    }

    /// The retained history.
    pub const fn history(&self) -> &MagneticHistory {
        &self.history
    }

    /// The drawing surface, if expanded.
    pub const fn surface(&self) -> Option<&PathRecorder> {
        self.surface.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_converges_toward_input() {
        let mut history = MagneticHistory::new();
        assert!((history.push(100.0) - 15.0).abs() < 1e-9);
        assert!((history.push(100.0) - 27.75).abs() < 1e-9);
        for _ in 0..200 {
            history.push(100.0);
        }
        assert!((history.smoothed() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn history_is_bounded() {
        let mut history = MagneticHistory::new();
        for i in 0..200 {
            history.push(f64::from(i));
            assert!(history.len() <= 80);
        }
        assert_eq!(history.len(), 80);
        let last = history.iter().last().unwrap();
        assert!((last - history.smoothed()).abs() < f64::EPSILON);
    }

    #[test]
    fn full_history_evicts_the_oldest_sample() {
        let mut history = MagneticHistory::new();
        let pushed: Vec<f64> = (0..81).map(|i| history.push(f64::from(i) + 30.0)).collect();
        assert_eq!(history.len(), 80);
        let first = history.iter().next().unwrap();
        assert!((first - pushed.get(1).unwrap()).abs() < f64::EPSILON);
        assert!(history.iter().all(|v| (v - pushed.first().unwrap()).abs() > f64::EPSILON));
    }

    #[test]
    fn clear_keeps_smoothed_value() {
        let mut history = MagneticHistory::new();
        history.push(40.0);
        let before = history.smoothed();
        history.clear();
        assert!(history.is_empty());
        assert!((history.smoothed() - before).abs() < f64::EPSILON);
    }

    #[test]
    fn single_sample_draws_a_lone_point() {
        let mut history = MagneticHistory::new();
        // Smooths to 6 µT on the first push.
        history.push(40.0);
        let mut canvas = PathRecorder::default();
        draw_history(&mut canvas, &history);
        let cmds = canvas.commands();
        assert_eq!(cmds.len(), 4);
        assert_eq!(
            cmds[0],
            PathCommand::SetStroke {
                color: "#00eaff".to_owned(),
                width: 2.0
            }
        );
        assert_eq!(cmds[1], PathCommand::BeginPath);
        let PathCommand::MoveTo { x, y } = cmds[2] else {
            panic!("expected a move");
        };
        assert!(x.abs() < f64::EPSILON);
        assert!((y - (160.0 - 6.0 / 80.0 * 160.0)).abs() < 1e-9);
        assert_eq!(cmds[3], PathCommand::Stroke);
    }

    #[test]
    fn segments_pass_through_midpoints() {
        let mut history = MagneticHistory::with_capacity(3);
        history.push(0.0);
        history.push(0.0);
        history.push(0.0);
        let mut canvas = PathRecorder::new(400.0, 160.0);
        draw_history(&mut canvas, &history);
        let curves: Vec<_> = canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                PathCommand::QuadraticCurveTo { cx, x, y, .. } => Some((*cx, *x, *y)),
                _ => None,
            })
            .collect();
        assert_eq!(curves, vec![(0.0, 100.0, 160.0), (200.0, 300.0, 160.0)]);
    }

    #[test]
    fn redraw_replaces_previous_frame() {
        let mut history = MagneticHistory::new();
        let mut canvas = PathRecorder::default();
        history.push(30.0);
        draw_history(&mut canvas, &history);
        let first = canvas.commands().len();
        draw_history(&mut canvas, &history);
        assert_eq!(canvas.commands().len(), first);
    }

    #[test]
    fn collapsed_graph_ignores_samples() {
        let mut graph = LiveGraph::new();
        assert_eq!(graph.update(50.0), None);
        assert!(graph.history().is_empty());

        assert!(graph.toggle());
        assert!(graph.update(50.0).is_some());
        assert!(graph.update(50.0).is_some());
        assert_eq!(graph.history().len(), 2);
        assert!(!graph.surface().unwrap().commands().is_empty());

        assert!(!graph.toggle());
        assert!(graph.history().is_empty());
        assert!(graph.toggle());
        assert!(graph.history().is_empty());
    }
}
