use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Paragraph, Row, Table,
        canvas::{Canvas, Circle, Line as CanvasLine, Rectangle},
    },
};

use crate::app::{App, Mode};
use crate::calendar::MAX_DAYS;
use crate::chart::{Anchor, ChartScene, Primitive};
use crate::grid::LabelCell;

const ROW_NUM_WIDTH: u16 = 3;
const DAY_WIDTH: u16 = 3;
const NARROW_DAY_WIDTH: u16 = 2;
const NAME_MIN_WIDTH: u16 = 8;
const NAME_MAX_WIDTH: u16 = 24;
/// Header rows above the habit rows inside the grid block.
const HEADER_ROWS: u16 = 2;
/// Two headers, twelve habits, totals, borders.
const GRID_HEIGHT: u16 = HEADER_ROWS + 12 + 1 + 2;
/// Smallest chart panel worth painting.
const MIN_CHART_HEIGHT: u16 = 6;

const HELP_LINE: &str =
    "Space toggle · Enter rename · ←↑→↓ move · [ ] month · m pick month · t today · x export · q quit";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(GRID_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.size());

    draw_month_bar(frame, app, chunks[0]);
    draw_grid(frame, app, chunks[1]);
    draw_charts(frame, app, chunks[2]);
    draw_status(frame, app, chunks[3]);
}

fn button(text: &str, color: Color) -> Paragraph<'_> {
    Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .style(Style::default().fg(color))
}

fn draw_month_bar(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(15),
            Constraint::Percentage(25),
            Constraint::Percentage(10),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
        ])
        .split(area);

    let label = Paragraph::new(app.session.label().to_string())
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(label, chunks[0]);

    app.prev_month_btn = chunks[1];
    frame.render_widget(button("◄ Prev", Color::Cyan), chunks[1]);

    let (field_text, field_style) = if matches!(app.mode, Mode::MonthInput) {
        (
            format!("Month: {}_", app.month_input),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )
    } else {
        (format!("Month: {}", app.month_input), Style::default().fg(Color::White))
    };
    let field = Paragraph::new(field_text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .style(field_style);
    app.month_field = chunks[2];
    frame.render_widget(field, chunks[2]);

    app.go_btn = chunks[3];
    frame.render_widget(button("Go", Color::Green), chunks[3]);

    app.next_month_btn = chunks[4];
    frame.render_widget(button("Next ►", Color::Cyan), chunks[4]);

    app.export_btn = chunks[5];
    frame.render_widget(button("Export SVG", Color::Magenta), chunks[5]);
}

fn label_cell(cell: &LabelCell) -> Cell<'static> {
    let style = if cell.disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Cell::from(cell.text.clone()).style(style)
}

fn draw_grid(frame: &mut Frame, app: &mut App, area: Rect) {
    app.mark_cells.clear();
    app.name_cells.clear();

    let block = Block::default()
        .title(format!("Habits · {}", app.session.label()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Columns only land where they are declared while their widths fit the
    // block; past that the table squeezes them and clicks are not mapped.
    let needed = |day_width: u16| ROW_NUM_WIDTH + NAME_MIN_WIDTH + day_width * MAX_DAYS as u16;
    let day_width = if inner.width >= needed(DAY_WIDTH) {
        DAY_WIDTH
    } else {
        NARROW_DAY_WIDTH
    };
    let clickable = inner.width >= needed(day_width);
    let name_width = inner
        .width
        .saturating_sub(ROW_NUM_WIDTH + day_width * MAX_DAYS as u16)
        .clamp(NAME_MIN_WIDTH, NAME_MAX_WIDTH);
    let days_x = inner.x + ROW_NUM_WIDTH + name_width;

    let grid = app.session.grid();
    let mut rows = Vec::with_capacity(grid.rows.len() + 3);

    let mut days = vec![Cell::from(""), Cell::from("Day")];
    days.extend(grid.days.iter().map(label_cell));
    rows.push(Row::new(days));

    let mut weekdays = vec![Cell::from(""), Cell::from("")];
    weekdays.extend(grid.weekdays.iter().map(label_cell));
    rows.push(Row::new(weekdays));

    for (idx, habit) in grid.rows.iter().enumerate() {
        let y = inner.y + HEADER_ROWS + idx as u16;
        let editing = app.mode == Mode::Rename { row: idx };

        let name = if editing {
            let (_, col) = app.textarea.cursor();
            let text = app.editor_text();
            let split = text
                .char_indices()
                .nth(col)
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            Cell::from(format!("{}│{}", &text[..split], &text[split..]))
                .style(Style::default().fg(Color::Black).bg(Color::Yellow))
        } else {
            Cell::from(habit.name.clone())
        };

        let mut cells = vec![
            Cell::from(habit.number.to_string()).style(Style::default().fg(Color::DarkGray)),
            name,
        ];
        if clickable && y < inner.y + inner.height {
            app.name_cells
                .push((idx, Rect::new(inner.x + ROW_NUM_WIDTH, y, name_width, 1)));
        }

        for (d, cell) in habit.cells.iter().enumerate() {
            let day = d as u32 + 1;
            let mut style = if cell.interactive {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if cell.interactive && idx == app.cursor_row && day == app.cursor_day {
                style = style.add_modifier(Modifier::REVERSED);
            }
            cells.push(Cell::from(cell.glyph()).style(style));

            let x = days_x + d as u16 * day_width;
            if clickable && cell.interactive && y < inner.y + inner.height {
                app.mark_cells.push(((idx, day), Rect::new(x, y, day_width, 1)));
            }
        }
        rows.push(Row::new(cells));
    }

    let mut totals = vec![
        Cell::from(""),
        Cell::from("Total").style(Style::default().add_modifier(Modifier::BOLD)),
    ];
    totals.extend(grid.totals.iter().map(|cell| {
        let style = if cell.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        };
        Cell::from(cell.text.clone()).style(style)
    }));
    rows.push(Row::new(totals));

    let mut widths = vec![Constraint::Length(ROW_NUM_WIDTH), Constraint::Length(name_width)];
    widths.extend(std::iter::repeat(Constraint::Length(day_width)).take(MAX_DAYS));

    let table = Table::new(rows, widths).column_spacing(0);
    frame.render_widget(table, inner);
}

fn draw_charts(frame: &mut Frame, app: &App, area: Rect) {
    let panels = app.session.charts();
    if panels.is_empty() || area.height < MIN_CHART_HEIGHT {
        return;
    }
    let constraints: Vec<Constraint> = panels
        .iter()
        .map(|_| Constraint::Ratio(1, panels.len() as u32))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (panel, slot) in panels.iter().zip(slots.iter()) {
        // A slot too small to hold the chart is skipped, the rest still draw.
        if slot.height < MIN_CHART_HEIGHT || slot.width < 20 {
            continue;
        }
        draw_chart(frame, &panel.scene, *slot);
    }
}

fn stroke_color(hex: &str) -> Color {
    match hex {
        "#2b2b2b" | "#1f1f1f" => Color::White,
        "#5a5a5a" => Color::Gray,
        _ => Color::DarkGray,
    }
}

fn draw_chart(frame: &mut Frame, scene: &ChartScene, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    let w = scene.layout.width;
    let h = scene.layout.height;
    // Canvas units covered by one terminal column.
    let char_w = w / f64::from(inner.width.max(1));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, w])
        .y_bounds([0.0, h])
        .paint(|ctx| {
            for primitive in &scene.primitives {
                match primitive {
                    // Fills (background, week bands) have no terminal equivalent.
                    Primitive::Rect { stroke: None, .. } => {}
                    Primitive::Rect {
                        x,
                        y,
                        width,
                        height,
                        stroke: Some(stroke),
                        ..
                    } => ctx.draw(&Rectangle {
                        x: *x,
                        y: h - y - height,
                        width: *width,
                        height: *height,
                        color: stroke_color(stroke.color),
                    }),
                    Primitive::GridLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        stroke,
                        ..
                    } => ctx.draw(&CanvasLine {
                        x1: *x1,
                        y1: h - y1,
                        x2: *x2,
                        y2: h - y2,
                        color: stroke_color(stroke.color),
                    }),
                    Primitive::Circle { cx, cy, r, .. } => ctx.draw(&Circle {
                        x: *cx,
                        y: h - cy,
                        radius: *r,
                        color: Color::DarkGray,
                    }),
                    Primitive::Text {
                        x,
                        y,
                        anchor,
                        content,
                        ..
                    } => {
                        let len = content.chars().count() as f64 * char_w;
                        let left = match anchor {
                            Anchor::Start => *x,
                            Anchor::Middle => x - len / 2.0,
                            Anchor::End => x - len,
                        };
                        ctx.print(
                            left.max(0.0),
                            h - y,
                            Span::styled(content.clone(), Style::default().fg(Color::White)),
                        );
                    }
                }
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = match (&app.status, app.mode) {
        (Some(status), _) => Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        )),
        (None, Mode::Rename { .. }) => Line::from(Span::styled(
            "Renaming · changes save as you type · Enter/Esc to finish",
            Style::default().fg(Color::Gray),
        )),
        (None, Mode::MonthInput) => Line::from(Span::styled(
            "Type YYYY-MM · Enter to go · Esc to cancel",
            Style::default().fg(Color::Gray),
        )),
        (None, Mode::Browse) => {
            Line::from(Span::styled(HELP_LINE, Style::default().fg(Color::Gray)))
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}
