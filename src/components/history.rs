//! Transaction history component.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    config::HistoryConfig,
    domain::{
        fetch::{FetchDirection, FetchStatus},
        filter::FilterId,
        transaction::{Direction, TransactionSummary, format_coin},
        view::HistoryView,
        window::WindowMode,
    },
    infra::source::WalletBackend,
    tui::Frame,
};

use super::{Component, detail};

/// History component: renders the current window of the transaction cache
/// and routes navigation into the owned [`HistoryView`].
pub struct HistoryComponent {
    view: HistoryView,
    near_edge_rows: usize,
    list_state: ListState,
    selected_index: usize,
}

impl HistoryComponent {
    pub fn new(backend: Arc<dyn WalletBackend>, config: HistoryConfig, mode: WindowMode) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            near_edge_rows: config.near_edge_rows,
            view: HistoryView::new(backend, config, mode),
            list_state,
            selected_index: 0,
        }
    }

    /// Start the first filter epoch. Called once the event loop is up.
    pub fn init(&mut self) {
        self.view.select_filter(FilterId::All);
    }

    /// Drain async completions. Returns whether anything changed.
    pub fn poll(&mut self) -> bool {
        let changed = self.view.poll();
        if changed {
            let (slice, _) = self.view.current_slice();
            if !slice.is_empty() && self.selected_index >= slice.len() {
                self.selected_index = slice.len() - 1;
            }
            self.list_state.select(Some(self.selected_index));
        }
        changed
    }

    /// Periodic background refresh trigger.
    pub fn refresh(&mut self) {
        self.view.refresh();
    }

    pub fn cycle_filter(&mut self) {
        let next = self.view.filter().id.next();
        self.view.select_filter(next);
        self.selected_index = 0;
        self.list_state.select(Some(0));
    }

    pub fn retry(&mut self) {
        self.view.retry();
    }

    pub fn detail_open(&self) -> bool {
        self.view.detail().is_some()
    }

    pub fn close_detail(&mut self) {
        self.view.close_detail();
    }

    fn next(&mut self) {
        let (slice, _) = self.view.current_slice();
        if slice.is_empty() {
            return;
        }
        if self.selected_index + 1 < slice.len() {
            self.selected_index += 1;
        }
        self.list_state.select(Some(self.selected_index));
        self.maybe_trigger_near_edge();
    }

    fn previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
        self.list_state.select(Some(self.selected_index));
        self.maybe_trigger_near_edge();
    }

    /// In scroll mode, grow the cache when the selection closes in on a
    /// loaded edge.
    fn maybe_trigger_near_edge(&mut self) {
        if !matches!(self.view.window_mode(), WindowMode::Scroll { .. }) {
            return;
        }
        let (loaded_start, loaded_end) = self.view.loaded_range();
        let absolute = self.view.window_start() + self.selected_index;
        if absolute + self.near_edge_rows >= loaded_end {
            self.view.scroll_near_edge(FetchDirection::Forward);
        } else if absolute < loaded_start + self.near_edge_rows {
            self.view.scroll_near_edge(FetchDirection::Backward);
        }
    }

    fn page_forward(&mut self) {
        if self.view.page_forward() {
            self.selected_index = 0;
            self.list_state.select(Some(0));
        }
    }

    fn page_backward(&mut self) {
        if self.view.page_backward() {
            self.selected_index = 0;
            self.list_state.select(Some(0));
        }
    }

    fn open_selected(&mut self) {
        let hash = {
            let (slice, _) = self.view.current_slice();
            slice.get(self.selected_index).map(|tx| tx.hash.clone())
        };
        if let Some(hash) = hash {
            self.view.open_detail(&hash);
        }
    }

    /// Time of day for transactions younger than 24 hours, date otherwise.
    fn date_or_time(timestamp: i64) -> String {
        let Some(when) = Utc.timestamp_opt(timestamp, 0).single() else {
            return timestamp.to_string();
        };
        let age = Utc::now().timestamp().saturating_sub(timestamp);
        if age < 86400 {
            when.format("%H:%M:%S").to_string()
        } else {
            when.format("%Y-%m-%d").to_string()
        }
    }

    fn direction_color(direction: Direction) -> Color {
        match direction {
            Direction::Sent => Color::Red,
            Direction::Received => Color::Green,
            Direction::Transferred => Color::Yellow,
            Direction::Coinbase => Color::Cyan,
            Direction::Staking => Color::Magenta,
        }
    }

    fn row_item(tx: &TransactionSummary, selected: bool) -> ListItem<'static> {
        let style = if selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Reset)
        };

        let content = Line::from(vec![
            Span::styled(
                format!("{:<12}", Self::date_or_time(tx.timestamp)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("{:<12}", tx.direction.to_string()),
                Style::default().fg(Self::direction_color(tx.direction)),
            ),
            Span::styled(format!("{:>17}", format_coin(tx.amount)), style),
            Span::styled(
                format!("{:>14}", format_coin(tx.fee)),
                Style::default().fg(Color::DarkGray),
            ),
            if tx.is_confirmed() {
                Span::styled("  Confirmed  ", Style::default().fg(Color::Green))
            } else {
                Span::styled("  Pending    ", Style::default().fg(Color::Yellow))
            },
            Span::raw(format!("{:<9}", tx.tx_type)),
            Span::styled(tx.short_hash(), Style::default().fg(Color::DarkGray)),
        ]);
        ListItem::new(content)
    }

    fn footer_lines(&self) -> Vec<Line<'static>> {
        let controls = self.view.controls();
        let (_, fetch) = self.view.current_slice();

        let mut page_info = match controls.total {
            Some(total) => format!(
                "Showing transactions {}-{} of {}",
                controls.first_row, controls.last_row, total
            ),
            None => format!(
                "Showing transactions {}-{}",
                controls.first_row, controls.last_row
            ),
        };
        let mut hints: Vec<&str> = Vec::new();
        if controls.has_previous {
            hints.push("(p)revious");
        }
        if controls.has_next {
            hints.push("(n)ext");
        }
        hints.push("(f)ilter");
        hints.push("(q)uit");
        page_info.push_str(", ");
        page_info.push_str(&hints.join(", "));

        let mut lines = vec![Line::from(Span::styled(
            page_info,
            Style::default().fg(Color::DarkGray),
        ))];

        match fetch.status() {
            FetchStatus::Loading => lines.push(Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::Yellow),
            ))),
            FetchStatus::Error => {
                if let Some(err) = &fetch.last_error {
                    lines.push(Line::from(Span::styled(
                        format!("{err} - press 'r' to retry"),
                        Style::default().fg(Color::Red),
                    )));
                }
            }
            FetchStatus::Idle => {
                if let Some(err) = &fetch.last_error {
                    // EmptyResult: informational, not retryable
                    lines.push(Line::from(Span::styled(
                        err.to_string(),
                        Style::default().fg(Color::Yellow),
                    )));
                }
            }
        }

        lines
    }
}

impl Component for HistoryComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if self.detail_open() {
            match key.code {
                KeyCode::Esc | KeyCode::Backspace => self.view.close_detail(),
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Down => self.next(),
            KeyCode::Up => self.previous(),
            KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => self.page_forward(),
            KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => self.page_backward(),
            KeyCode::Enter => self.open_selected(),
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        if let Some(session) = self.view.detail() {
            detail::draw(f, area, session);
            return;
        }

        let chunks =
            Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).split(area);

        let (slice, _) = self.view.current_slice();
        let items: Vec<ListItem> = slice
            .iter()
            .enumerate()
            .map(|(i, tx)| Self::row_item(tx, i == self.selected_index))
            .collect();

        let title = format!("History - {}", self.view.filter().label());
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        f.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let footer = Paragraph::new(self.footer_lines()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(footer, chunks[1]);
    }
}
