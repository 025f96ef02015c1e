//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Draw order: line series, then reference lines into blank cells, then
//! point series on top.

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Consecutive points joined with this character.
    Line(char),
    /// Each point marked individually.
    Points(char),
}

impl Glyph {
    fn symbol(self) -> char {
        match self {
            Glyph::Line(ch) | Glyph::Points(ch) => ch,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub glyph: Glyph,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, glyph: Glyph, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            glyph,
            points,
        }
    }
}

/// Horizontal (`y = value`) or vertical (`x = value`) reference line.
#[derive(Debug, Clone, PartialEq)]
pub enum RefLine {
    Horizontal { label: String, value: f64, ch: char },
    Vertical { label: String, value: f64, ch: char },
}

impl RefLine {
    pub fn horizontal(label: impl Into<String>, value: f64) -> Self {
        RefLine::Horizontal {
            label: label.into(),
            value,
            ch: '=',
        }
    }

    pub fn vertical(label: impl Into<String>, value: f64) -> Self {
        RefLine::Vertical {
            label: label.into(),
            value,
            ch: '|',
        }
    }

    fn legend(&self) -> (char, &str) {
        match self {
            RefLine::Horizontal { label, ch, .. } | RefLine::Vertical { label, ch, .. } => {
                (*ch, label.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub series: Vec<Series>,
    pub refs: Vec<RefLine>,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            series: Vec::new(),
            refs: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_ref(mut self, line: RefLine) -> Self {
        self.refs.push(line);
        self
    }
}

/// Render a figure into a `width x height` character grid with a header and legend.
pub fn render_figure(fig: &Figure, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(fig).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(fig).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let frame = Frame {
        x_min,
        x_max,
        y_min,
        y_max,
    };

    let mut grid = vec![vec![' '; width]; height];

    for s in &fig.series {
        if let Glyph::Line(ch) = s.glyph {
            draw_curve(&mut grid, &s.points, &frame, ch);
        }
    }

    for r in &fig.refs {
        match *r {
            RefLine::Horizontal { value, ch, .. } => {
                let y = map_y(value, y_min, y_max, height);
                draw_line(&mut grid, 0, y, width - 1, y, ch);
            }
            RefLine::Vertical { value, ch, .. } => {
                let x = map_x(value, x_min, x_max, width);
                draw_line(&mut grid, x, 0, x, height - 1, ch);
            }
        }
    }

    for s in &fig.series {
        if let Glyph::Points(ch) = s.glyph {
            for &(px, py) in s.points.iter().filter(|(px, py)| px.is_finite() && py.is_finite()) {
                let x = map_x(px, x_min, x_max, width);
                let y = map_y(py, y_min, y_max, height);
                grid[y][x] = ch;
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{}: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n",
        fig.title
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let mut legend: Vec<String> = fig
        .series
        .iter()
        .map(|s| format!("  {} {}", s.glyph.symbol(), s.label))
        .collect();
    legend.extend(fig.refs.iter().map(|r| {
        let (ch, label) = r.legend();
        format!("  {ch} {label}")
    }));
    if !legend.is_empty() {
        out.push_str(&legend.concat());
        out.push('\n');
    }

    out
}

struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

fn finite_points(fig: &Figure) -> impl Iterator<Item = (f64, f64)> + '_ {
    fig.series
        .iter()
        .flat_map(|s| s.points.iter().copied())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
}

fn x_range(fig: &Figure) -> Option<(f64, f64)> {
    let refs = fig.refs.iter().filter_map(|r| match r {
        RefLine::Vertical { value, .. } => Some(*value),
        RefLine::Horizontal { .. } => None,
    });
    span(finite_points(fig).map(|(x, _)| x).chain(refs))
}

fn y_range(fig: &Figure) -> Option<(f64, f64)> {
    let refs = fig.refs.iter().filter_map(|r| match r {
        RefLine::Horizontal { value, .. } => Some(*value),
        RefLine::Vertical { .. } => None,
    });
    span(finite_points(fig).map(|(_, y)| y).chain(refs))
}

fn span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y_max maps to row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], points: &[(f64, f64)], frame: &Frame, ch: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points.iter().filter(|(x, y)| x.is_finite() && y.is_finite()) {
        let col = map_x(x, frame.x_min, frame.x_max, width);
        let row = map_y(y, frame.y_min, frame.y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None => {
                if grid[row][col] == ' ' {
                    grid[row][col] = ch;
                }
            }
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham) into blank cells only.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let fig = Figure::new("Test")
            .with_series(Series::new("flat", Glyph::Line('-'), vec![(0.0, 1.0), (9.0, 1.0)]))
            .with_series(Series::new("dot", Glyph::Points('o'), vec![(9.0, 2.0)]));

        let txt = render_figure(&fig, 10, 5);
        let expected = concat!(
            "Test: x=[0.000, 9.000] | y=[0.95, 2.05]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "----------\n",
            "  - flat  o dot\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn reference_lines_fill_only_blank_cells() {
        let fig = Figure::new("Refs")
            .with_series(Series::new("rise", Glyph::Line('*'), vec![(0.0, 0.0), (9.0, 4.0)]))
            .with_ref(RefLine::horizontal("mid", 2.0))
            .with_ref(RefLine::vertical("t", 3.0));

        let txt = render_figure(&fig, 10, 5);
        let rows: Vec<&str> = txt.lines().skip(1).take(5).collect();

        let middle: Vec<char> = rows[2].chars().collect();
        assert!(middle.contains(&'*'));
        assert_eq!(middle.iter().filter(|&&c| c == '=').count(), 8);
        assert!(rows.iter().all(|r| r.chars().nth(3) != Some(' ')));
        assert!(txt.ends_with("  * rise  = mid  | t\n"));
    }

    #[test]
    fn degenerate_ranges_fall_back_to_unit_box() {
        let fig = Figure::new("Empty");
        let txt = render_figure(&fig, 10, 5);
        assert!(txt.starts_with("Empty: x=[0.000, 1.000] | y=[-0.05, 1.05]\n"));
        assert_eq!(txt.lines().count(), 6);
    }
}
