//! Line-chart scaffold for a month of daily values in the range 1..=12.
//!
//! The scene is a flat list of drawing primitives in canvas coordinates
//! (origin top left, y pointing down). It can be painted on a terminal
//! canvas or written out as an SVG document.

use std::fmt::Write as _;

pub const VALUE_MIN: u32 = 1;
pub const VALUE_MAX: u32 = 12;
pub const VALUE_MID: u32 = 6;
/// Day domain of the x axis; fixed so every month shares one scale.
pub const DAY_SPAN: u32 = 31;
const WEEK: u32 = 7;
const DOT_EVERY: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub pad_left: f64,
    pub pad_right: f64,
    pub pad_top: f64,
    pub pad_bottom: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 210.0,
            pad_left: 72.0,
            pad_right: 12.0,
            pad_top: 16.0,
            pad_bottom: 30.0,
        }
    }
}

impl ChartLayout {
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.pad_left - self.pad_right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.pad_top - self.pad_bottom
    }

    pub fn plot_right(&self) -> f64 {
        self.width - self.pad_right
    }

    pub fn x_for_day(&self, day: f64) -> f64 {
        self.pad_left + (day - 1.0) * (self.plot_width() / (DAY_SPAN - 1) as f64)
    }

    pub fn y_for_value(&self, value: f64) -> f64 {
        let range = (VALUE_MAX - VALUE_MIN) as f64;
        self.pad_top + (VALUE_MAX as f64 - value) * (self.plot_height() / range)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
    pub dash: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    Value(u32),
    Day(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<&'static str>,
        stroke: Option<Stroke>,
    },
    GridLine {
        axis: GridAxis,
        major: bool,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Stroke,
    },
    Text {
        x: f64,
        y: f64,
        anchor: Anchor,
        size: f64,
        fill: &'static str,
        content: String,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: &'static str,
        opacity: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub layout: ChartLayout,
    pub title: String,
    pub days_in_month: u32,
    pub primitives: Vec<Primitive>,
}

/// Builds the axes, gridlines, weekly shading and labels of one chart.
///
/// No data series is plotted; the scene is the scaffold only.
pub fn render_line_template(layout: &ChartLayout, days_in_month: u32, title: &str) -> ChartScene {
    let dim = days_in_month.min(DAY_SPAN);
    let mut out = Vec::new();

    out.push(Primitive::Rect {
        x: 0.0,
        y: 0.0,
        width: layout.width,
        height: layout.height,
        fill: Some("#fff"),
        stroke: None,
    });

    // Weekly bands, clipped at the last active day.
    for start in (1..=DAY_SPAN).step_by(WEEK as usize) {
        let x1 = layout.x_for_day(start as f64);
        let x2 = layout.x_for_day((start + WEEK - 1).min(dim) as f64);
        let shaded = ((start - 1) / WEEK) % 2 == 0;
        out.push(Primitive::Rect {
            x: x1,
            y: layout.pad_top,
            width: (x2 - x1).max(0.0),
            height: layout.plot_height(),
            fill: Some(if shaded { "#f5f5f5" } else { "#ffffff" }),
            stroke: None,
        });
    }

    for value in VALUE_MIN..=VALUE_MAX {
        let y = layout.y_for_value(value as f64);
        let major = value == VALUE_MIN || value == VALUE_MAX || value == VALUE_MID;
        let stroke = if major {
            Stroke {
                color: "#2b2b2b",
                width: 1.2,
                dash: None,
            }
        } else {
            Stroke {
                color: "#7f7f7f",
                width: 0.9,
                dash: Some("3 3"),
            }
        };
        out.push(Primitive::GridLine {
            axis: GridAxis::Value(value),
            major,
            x1: layout.pad_left,
            y1: y,
            x2: layout.plot_right(),
            y2: y,
            stroke,
        });
        out.push(Primitive::Text {
            x: layout.pad_left - 10.0,
            y: y + 3.0,
            anchor: Anchor::End,
            size: 10.5,
            fill: "#111",
            content: value.to_string(),
        });
    }

    for day in 1..=dim {
        let x = layout.x_for_day(day as f64);
        let major = day == 1 || day == dim || day % 5 == 0;
        out.push(Primitive::GridLine {
            axis: GridAxis::Day(day),
            major,
            x1: x,
            y1: layout.pad_top,
            x2: x,
            y2: layout.pad_top + layout.plot_height(),
            stroke: Stroke {
                color: if major { "#5a5a5a" } else { "#a0a0a0" },
                width: if major { 1.0 } else { 0.8 },
                dash: None,
            },
        });
        if major {
            out.push(Primitive::Text {
                x,
                y: layout.height - 10.0,
                anchor: Anchor::Middle,
                size: 10.0,
                fill: "#111",
                content: day.to_string(),
            });
        }
    }

    out.push(Primitive::Rect {
        x: layout.pad_left,
        y: layout.pad_top,
        width: layout.plot_width(),
        height: layout.plot_height(),
        fill: None,
        stroke: Some(Stroke {
            color: "#1f1f1f",
            width: 1.4,
            dash: None,
        }),
    });

    out.push(Primitive::Text {
        x: layout.pad_left,
        y: 14.0,
        anchor: Anchor::Start,
        size: 10.0,
        fill: "#111",
        content: title.to_string(),
    });

    // Ornamental markers along the midline.
    let mid = layout.y_for_value(VALUE_MID as f64);
    for day in (DOT_EVERY..=dim).step_by(DOT_EVERY as usize) {
        out.push(Primitive::Circle {
            cx: layout.x_for_day(day as f64),
            cy: mid,
            r: 1.2,
            fill: "#111",
            opacity: 0.35,
        });
    }

    ChartScene {
        layout: *layout,
        title: title.to_string(),
        days_in_month: dim,
        primitives: out,
    }
}

impl ChartScene {
    pub fn gridlines(&self, days: bool) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| match p {
            Primitive::GridLine { axis, .. } => matches!(axis, GridAxis::Day(_)) == days,
            _ => false,
        })
    }

    pub fn to_svg(&self) -> String {
        let layout = &self.layout;
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = fmt_num(layout.width),
            h = fmt_num(layout.height)
        );
        for primitive in &self.primitives {
            match primitive {
                Primitive::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                    stroke,
                } => {
                    let _ = write!(
                        out,
                        r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                        fmt_num(*x),
                        fmt_num(*y),
                        fmt_num(*width),
                        fmt_num(*height),
                        fill.unwrap_or("none")
                    );
                    if let Some(stroke) = stroke {
                        write_stroke(&mut out, stroke);
                    }
                    out.push_str("/>\n");
                }
                Primitive::GridLine {
                    x1,
                    y1,
                    x2,
                    y2,
                    stroke,
                    ..
                } => {
                    let _ = write!(
                        out,
                        r#"  <line x1="{}" y1="{}" x2="{}" y2="{}""#,
                        fmt_num(*x1),
                        fmt_num(*y1),
                        fmt_num(*x2),
                        fmt_num(*y2)
                    );
                    write_stroke(&mut out, stroke);
                    out.push_str("/>\n");
                }
                Primitive::Text {
                    x,
                    y,
                    anchor,
                    size,
                    fill,
                    content,
                } => {
                    let _ = writeln!(
                        out,
                        r#"  <text x="{}" y="{}" text-anchor="{}" font-size="{}" fill="{}">{}</text>"#,
                        fmt_num(*x),
                        fmt_num(*y),
                        anchor.as_svg(),
                        fmt_num(*size),
                        fill,
                        escape_text(content)
                    );
                }
                Primitive::Circle {
                    cx,
                    cy,
                    r,
                    fill,
                    opacity,
                } => {
                    let _ = writeln!(
                        out,
                        r#"  <circle cx="{}" cy="{}" r="{}" fill="{}" opacity="{}"/>"#,
                        fmt_num(*cx),
                        fmt_num(*cy),
                        fmt_num(*r),
                        fill,
                        fmt_num(*opacity)
                    );
                }
            }
        }
        out.push_str("</svg>\n");
        out
    }
}

fn write_stroke(out: &mut String, stroke: &Stroke) {
    let _ = write!(
        out,
        r#" stroke="{}" stroke-width="{}""#,
        stroke.color,
        fmt_num(stroke.width)
    );
    if let Some(dash) = stroke.dash {
        let _ = write!(out, r#" stroke-dasharray="{dash}""#);
    }
}

// Two decimals at most, trailing zeros dropped.
fn fmt_num(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" { "0".to_string() } else { text.to_string() }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
