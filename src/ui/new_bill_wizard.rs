use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::containers::{BillForm, NewBillView};
use crate::error::StoreError;
use crate::ui::components::date_input::DateInputState;
use crate::views::EXPENSE_TYPES;

pub enum NewBillAction {
    Cancel,
    SelectFile(PathBuf),
    Submit(BillForm),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum BillField {
    Type,
    Name,
    Date,
    Amount,
    Vat,
    Pct,
    Commentary,
    File,
}

const FIELDS: [BillField; 8] = [
    BillField::Type,
    BillField::Name,
    BillField::Date,
    BillField::Amount,
    BillField::Vat,
    BillField::Pct,
    BillField::Commentary,
    BillField::File,
];

impl BillField {
    fn label(&self) -> &'static str {
        match self {
            BillField::Type => "Type de dépense",
            BillField::Name => "Nom de la dépense",
            BillField::Date => "Date",
            BillField::Amount => "Montant TTC",
            BillField::Vat => "TVA",
            BillField::Pct => "%",
            BillField::Commentary => "Commentaire",
            BillField::File => "Justificatif",
        }
    }

    fn index(&self) -> usize {
        FIELDS.iter().position(|f| f == self).unwrap_or(0)
    }
}

pub struct NewBillWizardState {
    form: BillForm,
    type_index: usize,
    date_input: DateInputState,
    file_path: String,
    file_name: Option<String>,
    current_field: BillField,
    editing: bool,
    message: Option<String>,
}

impl NewBillWizardState {
    pub fn new() -> Self {
        Self {
            form: BillForm {
                bill_type: EXPENSE_TYPES[0].to_string(),
                ..Default::default()
            },
            type_index: 0,
            date_input: DateInputState::new(Local::now().date_naive()),
            file_path: String::new(),
            file_name: None,
            current_field: BillField::Type,
            editing: false,
            message: None,
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn next_field(&mut self) {
        self.current_field = FIELDS[(self.current_field.index() + 1) % FIELDS.len()];
    }

    pub fn previous_field(&mut self) {
        self.current_field = FIELDS[(self.current_field.index() + FIELDS.len() - 1) % FIELDS.len()];
    }

    fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.current_field == BillField::Date {
            self.date_input.toggle_editing();
        }
    }

    fn cycle_type(&mut self, forward: bool) {
        let len = EXPENSE_TYPES.len();
        self.type_index = if forward {
            (self.type_index + 1) % len
        } else {
            (self.type_index + len - 1) % len
        };
        self.form.bill_type = EXPENSE_TYPES[self.type_index].to_string();
    }

    fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field_value = match self.current_field {
            BillField::Type => {
                match key {
                    KeyCode::Right | KeyCode::Down => self.cycle_type(true),
                    KeyCode::Left | KeyCode::Up => self.cycle_type(false),
                    _ => {}
                }
                return;
            }
            BillField::Date => {
                self.date_input.handle_input(key);
                return;
            }
            BillField::Name => &mut self.form.name,
            BillField::Amount => &mut self.form.amount,
            BillField::Vat => &mut self.form.vat,
            BillField::Pct => &mut self.form.pct,
            BillField::Commentary => &mut self.form.commentary,
            BillField::File => &mut self.file_path,
        };

        match key {
            KeyCode::Char(c) => field_value.push(c),
            KeyCode::Backspace => {
                field_value.pop();
            }
            _ => {}
        }
    }

    /// The form as it will be submitted.
    pub fn form(&self) -> BillForm {
        BillForm {
            date: self.date_input.iso(),
            ..self.form.clone()
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.form.bill_type.is_empty()
            && !self.form.name.trim().is_empty()
            && !self.form.amount.trim().is_empty()
            && self.file_name.is_some()
    }

    fn value_of(&self, field: BillField) -> String {
        match field {
            BillField::Type => self.form.bill_type.clone(),
            BillField::Name => self.form.name.clone(),
            BillField::Date => self.date_input.get_display_string(),
            BillField::Amount => self.form.amount.clone(),
            BillField::Vat => self.form.vat.clone(),
            BillField::Pct => self.form.pct.clone(),
            BillField::Commentary => self.form.commentary.clone(),
            BillField::File => match (&self.file_name, self.editing && field == self.current_field) {
                (Some(name), false) => name.clone(),
                _ => self.file_path.clone(),
            },
        }
    }
}

impl NewBillView for NewBillWizardState {
    fn show_file_name(&mut self, name: &str) {
        self.file_name = Some(name.to_string());
        self.message = None;
    }

    fn clear_file(&mut self) {
        self.file_path.clear();
        self.file_name = None;
    }

    fn render_error(&mut self, error: &StoreError) {
        self.message = Some(error.user_message());
    }
}

pub fn render_new_bill_wizard<B: Backend>(f: &mut Frame<B>, state: &mut NewBillWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new("Envoyer une note de frais")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let help_text = match (&state.message, state.editing) {
        (Some(message), _) => message.clone(),
        (None, true) => "Enter - Valider le champ | Esc - Annuler".to_string(),
        (None, false) => {
            "Enter - Modifier | Up/Down - Naviguer | S - Envoyer | Esc - Retour".to_string()
        }
    };
    let help_style = if state.message.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    };
    let help = Paragraph::new(help_text)
        .style(help_style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &mut NewBillWizardState, area: Rect) {
    let items: Vec<ListItem> = FIELDS
        .iter()
        .map(|field| {
            let value = state.value_of(*field);
            let selected = *field == state.current_field;
            let content = if selected && state.editing {
                let cursor = if *field == BillField::Date { "" } else { "|" };
                Spans::from(vec![
                    Span::styled(
                        format!("{}: ", field.label()),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        format!("{}{}", value, cursor),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label()), style),
                    Span::raw(value),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Note de frais"));

    f.render_widget(form_list, area);
}

pub fn handle_key(state: &mut NewBillWizardState, key: KeyCode) -> Option<NewBillAction> {
    match key {
        KeyCode::Esc => {
            if state.editing {
                state.toggle_editing();
            } else {
                return Some(NewBillAction::Cancel);
            }
        }
        KeyCode::Enter => {
            let finished_file = state.editing && state.current_field == BillField::File;
            state.toggle_editing();
            if finished_file && !state.file_path.trim().is_empty() {
                return Some(NewBillAction::SelectFile(PathBuf::from(state.file_path.trim())));
            }
        }
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Char('s') if !state.editing => {
            if state.is_valid() {
                return Some(NewBillAction::Submit(state.form()));
            }
            state.set_message("Champs requis : type, nom, date, montant et justificatif");
        }
        _ if state.editing => state.edit_current_field(key),
        _ => {}
    }

    None
}

pub fn handle_input(state: &mut NewBillWizardState) -> Result<Option<NewBillAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}
