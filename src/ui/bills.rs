use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::containers::BillsView;
use crate::error::StoreError;
use crate::models::DisplayBill;
use crate::ui::centered_rect;
use crate::views::sort_by_date_desc;

struct Receipt {
    file_url: Option<String>,
    file_name: Option<String>,
}

// Represents the state of the bills table screen
pub struct BillsState {
    bills: Vec<DisplayBill>,
    table_state: TableState,
    loading: bool,
    error: Option<String>,
    receipt: Option<Receipt>,
}

impl BillsState {
    pub fn new() -> Self {
        Self {
            bills: Vec::new(),
            table_state: TableState::default(),
            loading: true,
            error: None,
            receipt: None,
        }
    }

    pub fn next(&mut self) {
        if self.bills.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) if i >= self.bills.len() - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.bills.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(0) | None => self.bills.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_bill(&self) -> Option<&DisplayBill> {
        self.table_state.selected().and_then(|i| self.bills.get(i))
    }

    pub fn is_showing_receipt(&self) -> bool {
        self.receipt.is_some()
    }

    pub fn close_receipt(&mut self) {
        self.receipt = None;
    }
}

impl BillsView for BillsState {
    fn render_list(&mut self, bills: &[DisplayBill]) {
        let mut bills = bills.to_vec();
        sort_by_date_desc(&mut bills);

        self.table_state = TableState::default();
        if !bills.is_empty() {
            self.table_state.select(Some(0));
        }
        self.bills = bills;
        self.loading = false;
        self.error = None;
    }

    fn render_error(&mut self, error: &StoreError) {
        self.bills.clear();
        self.table_state = TableState::default();
        self.loading = false;
        self.error = Some(error.user_message());
    }

    fn open_receipt(&mut self, file_url: Option<&str>, file_name: Option<&str>) {
        self.receipt = Some(Receipt {
            file_url: file_url.map(String::from),
            file_name: file_name.map(String::from),
        });
    }
}

pub enum BillsAction {
    Quit,
    Logout,
    Reload,
    NewBill,
    ViewReceipt,
}

pub fn render_bills<B: Backend>(frame: &mut Frame<B>, state: &mut BillsState) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    if state.loading {
        let loading = Paragraph::new("Loading...")
            .block(Block::default().title("Mes notes de frais").borders(Borders::ALL));
        frame.render_widget(loading, chunks[0]);
    } else if let Some(error) = &state.error {
        let error = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .block(Block::default().title("Mes notes de frais").borders(Borders::ALL));
        frame.render_widget(error, chunks[0]);
    } else {
        render_table(frame, state, chunks[0]);
    }

    let buttons_text = if state.selected_bill().is_some() {
        "<N> Nouvelle note de frais | <Enter> Justificatif | <R> Reload | <L> Logout | <Q> Quit"
    } else {
        "<N> Nouvelle note de frais | <R> Reload | <L> Logout | <Q> Quit"
    };
    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[1]);

    if let Some(receipt) = &state.receipt {
        render_receipt(frame, receipt, size);
    }
}

fn render_table<B: Backend>(frame: &mut Frame<B>, state: &mut BillsState, area: Rect) {
    let header_cells = ["Type", "Nom", "Date", "Montant", "Statut"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = state.bills.iter().map(|bill| {
        Row::new(vec![
            Cell::from(bill.bill.bill_type.as_str()),
            Cell::from(bill.bill.name.as_str()),
            Cell::from(bill.formatted_date.as_str()),
            Cell::from(format!("{} €", bill.bill.amount)),
            Cell::from(bill.status_label.as_str()),
        ])
        .height(1)
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Mes notes de frais").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&[
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
        ]);

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

fn render_receipt<B: Backend>(frame: &mut Frame<B>, receipt: &Receipt, size: Rect) {
    let popup_area = centered_rect(60, 30, size);

    let lines = match &receipt.file_url {
        Some(url) => vec![
            Spans::from(""),
            Spans::from(format!("Fichier : {}", receipt.file_name.as_deref().unwrap_or("-"))),
            Spans::from(format!("Emplacement : {}", url)),
            Spans::from(""),
            Spans::from("<Esc> Fermer"),
        ],
        None => vec![
            Spans::from(""),
            Spans::from("Aucun justificatif"),
            Spans::from(""),
            Spans::from("<Esc> Fermer"),
        ],
    };

    let popup = Paragraph::new(lines)
        .block(Block::default().title("Justificatif").borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

pub fn handle_key(state: &mut BillsState, key: KeyCode) -> Option<BillsAction> {
    if state.is_showing_receipt() {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            state.close_receipt();
        }
        return None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => Some(BillsAction::Quit),
        KeyCode::Char('l') => Some(BillsAction::Logout),
        KeyCode::Char('r') => Some(BillsAction::Reload),
        KeyCode::Char('n') => Some(BillsAction::NewBill),
        KeyCode::Enter | KeyCode::Char('v') if state.selected_bill().is_some() => {
            Some(BillsAction::ViewReceipt)
        }
        KeyCode::Down => {
            state.next();
            None
        }
        KeyCode::Up => {
            state.previous();
            None
        }
        _ => None,
    }
}

pub fn handle_input(state: &mut BillsState) -> Result<Option<BillsAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}
