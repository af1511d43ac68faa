use anyhow::Result;
use log::{debug, info};

use crate::calendar::MonthKey;
use crate::chart::{ChartLayout, ChartScene, render_line_template};
use crate::codec;
use crate::grid::{GridEvent, GridPatch, GridView};
use crate::state::{MonthState, normalize};
use crate::store::KvStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartTarget {
    Sleep,
    Study,
}

impl ChartTarget {
    pub const ALL: [ChartTarget; 2] = [ChartTarget::Sleep, ChartTarget::Study];

    pub fn title(self) -> &'static str {
        match self {
            ChartTarget::Sleep => "Sleep hours (1–12)",
            ChartTarget::Study => "Study hours (1–12)",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            ChartTarget::Sleep => "sleep",
            ChartTarget::Study => "study",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub target: ChartTarget,
    pub scene: ChartScene,
}

pub struct Session<S: KvStore> {
    store: S,
    month: MonthKey,
    days_in_month: u32,
    label: String,
    state: MonthState,
    grid: GridView,
    charts: Vec<ChartPanel>,
    layout: ChartLayout,
}

impl<S: KvStore> Session<S> {
    /// Creates a session showing `month` with blank state. Nothing is read
    /// or written until `render` runs.
    pub fn new(store: S, month: MonthKey) -> Self {
        let days_in_month = month.days();
        let state = MonthState::default();
        let grid = GridView::build(days_in_month, month.year, month.month0(), &state);
        Self {
            store,
            month,
            days_in_month,
            label: month.label(),
            state,
            grid,
            charts: Vec::new(),
            layout: ChartLayout::default(),
        }
    }

    pub fn render(&mut self) -> Result<()> {
        let month = self.month;
        self.days_in_month = month.days();
        self.label = month.label();

        let loaded = codec::load(&self.store, month.year, month.month);
        self.state = normalize(loaded.as_ref());

        self.grid = GridView::build(self.days_in_month, month.year, month.month0(), &self.state);
        self.charts = ChartTarget::ALL
            .iter()
            .map(|&target| ChartPanel {
                target,
                scene: render_line_template(&self.layout, self.days_in_month, target.title()),
            })
            .collect();

        info!(
            "event=month_render module=session status=ok month={} days={} restored={}",
            month,
            self.days_in_month,
            loaded.is_some()
        );

        self.persist()
    }

    pub fn select_month(&mut self, month: MonthKey) -> Result<()> {
        self.month = month;
        self.render()
    }

    pub fn apply(&mut self, event: GridEvent) -> Result<GridPatch> {
        let patch = match event {
            GridEvent::Toggle { row, day } => {
                if !self.grid.is_interactive(row, day) {
                    debug!("event=toggle module=session status=ignored row={row} day={day}");
                    return Ok(GridPatch::Ignored);
                }
                let Some(checked) = self.state.toggle(row, day) else {
                    return Ok(GridPatch::Ignored);
                };
                self.grid.set_mark(row, day, checked);
                self.grid.refresh_totals(&self.state);
                GridPatch::Mark { row, day, checked }
            }
            GridEvent::Rename { row, text } => {
                if !self.state.rename(row, &text) {
                    return Ok(GridPatch::Ignored);
                }
                self.grid.set_name(row, &self.state.habits[row]);
                GridPatch::Name { row }
            }
        };
        self.persist()?;
        Ok(patch)
    }

    fn persist(&mut self) -> Result<()> {
        codec::save(&mut self.store, self.month.year, self.month.month, &self.state)
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> &MonthState {
        &self.state
    }

    pub fn grid(&self) -> &GridView {
        &self.grid
    }

    pub fn charts(&self) -> &[ChartPanel] {
        &self.charts
    }

    pub fn chart(&self, target: ChartTarget) -> Option<&ChartScene> {
        self.charts
            .iter()
            .find(|panel| panel.target == target)
            .map(|panel| &panel.scene)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
