use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode};
use futures_util::StreamExt;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    DefaultTerminal, Frame,
};
use std::time::Duration;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info};

use crate::{
    expansion::ExpansionState,
    group::{group_by_asset_class, Grouping},
    loader::{FetchHandle, LoadState},
    tui::view::{table_lines, Column, Selection, TableLine},
    AppEvent,
};

pub struct App {
    should_quit: bool,
    rx: Receiver<AppEvent>,
    load: LoadState,
    grouping: Grouping,
    expansion: ExpansionState,
    selected: Option<Selection>,
    fetch: Option<FetchHandle>,
}

impl App {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self {
            should_quit: false,
            rx,
            load: LoadState::default(),
            grouping: Grouping::default(),
            expansion: ExpansionState::new(),
            selected: None,
            fetch: None,
        }
    }

    /// Ties the running fetch to this view. Dropping the app aborts it.
    pub fn attach_fetch(&mut self, fetch: FetchHandle) {
        self.load.begin();
        self.fetch = Some(fetch);
    }


    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal).await;
        ratatui::restore();
        if self.fetch.take().is_some_and(|fetch| !fetch.is_finished()) {
            debug!("Holdings fetch still pending on exit, aborting");
        }
        result
    }

    async fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        terminal.clear()?;

        let mut events = EventStream::new();

        let period = Duration::from_secs_f64(1.0 / 20.0);
        let mut interval = tokio::time::interval(period);

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => { terminal.draw(|frame| self.render(frame))?; },
                Some(Ok(event)) = events.next() => self.handle_events(event),
                Some(event) = self.rx.recv() => self.handle_app_event(event),
            }
        }

        Ok(())
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::HoldingsFetched(result) => {
                self.load.finish(result);
                if self.load.error.is_none() {
                    self.grouping = group_by_asset_class(&self.load.holdings);
                    info!(
                        "Loaded {} holdings in {} groups",
                        self.load.holdings.len(),
                        self.grouping.len()
                    );
                    if self.selected.is_none() {
                        let first = self.lines().first().map(TableLine::selection);
                        self.selected = first;
                    }
                }
            }
        }
        self.fetch = None;
    }

    fn handle_events(&mut self, event: Event) {
        if let Some(key) = event.as_key_press_event() {
            self.handle_key(key.code);
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            _ => {}
        }
    }

    fn lines(&self) -> Vec<TableLine<'_>> {
        table_lines(&self.grouping, &self.expansion)
    }

    fn selected_index(&self, lines: &[TableLine<'_>]) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        lines.iter().position(|line| line.selection() == *selected)
    }

    fn move_selection(&mut self, next: bool) {
        let selection = {
            let lines = self.lines();
            if lines.is_empty() {
                return;
            }
            let index = match self.selected_index(&lines) {
                Some(i) if next => (i + 1).min(lines.len() - 1),
                Some(i) => i.saturating_sub(1),
                None => 0,
            };
            lines[index].selection()
        };
        self.selected = Some(selection);
    }

    /// Toggles the group under the cursor. On a detail row, that row's group.
    pub fn toggle_selected(&mut self) {
        let label = match &self.selected {
            Some(Selection::Group(label)) => label.clone(),
            Some(Selection::Holding(key)) => key.asset_class.clone(),
            None => return,
        };
        let expanded = self.expansion.toggle(&label);
        debug!("Toggled {} (expanded: {})", label, expanded);
        self.selected = Some(Selection::Group(label));
    }

    pub fn render(&self, frame: &mut Frame) {
        let [header_area, main_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(frame.area());

        self.render_header(frame, header_area);
        self.render_table(frame, main_area);
        self.render_footer(frame, footer_area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let p = Paragraph::new(Line::from(Span::styled(
            "Holdings Table",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .centered()
        .block(block);
        frame.render_widget(p, area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let columns = Column::all();

        let header = Row::new(columns.iter().map(|column| {
            Cell::from(column.to_string()).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        }))
        .height(1)
        .bottom_margin(1);

        let lines = self.lines();
        let rows = lines.iter().map(|line| match line {
            TableLine::Header {
                label,
                expanded,
                count,
            } => {
                let marker = if *expanded { "▾" } else { "▸" };
                Row::new(vec![
                    Cell::from(format!("{} {}", marker, label)),
                    Cell::from(format!("({})", count)),
                ])
                .style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
            }
            TableLine::Detail { holding, .. } => {
                Row::new(columns.iter().map(|column| Cell::from(column.value(holding))))
            }
        });

        let widths = columns.iter().map(|column| Constraint::Percentage(column.width()));

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = TableState::default().with_selected(self.selected_index(&lines));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let line = if let Some(error) = &self.load.error {
            Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
        } else if self.load.loading {
            Line::from(Span::styled(
                "Loading holdings...",
                Style::default().fg(Color::Yellow),
            ))
        } else {
            Line::from("↑/↓ select, Enter toggle, 'q' quit")
        };
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
