mod config;
mod containers;
mod db;
mod error;
mod format;
mod models;
mod router;
mod session;
mod store;
mod telemetry;
mod ui;
mod views;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::containers::{Bills, NewBill, NewBillView};
use crate::error::NewBillError;
use crate::models::{User, UserType};
use crate::router::{Navigator, PendingRoute, Route};
use crate::session::{Session, SessionStore};
use crate::store::{BillStore, ReceiptFile};
use crate::ui::{
    bills::{BillsAction, BillsState, handle_input as handle_bills_input, render_bills},
    new_bill_wizard::{
        NewBillAction, NewBillWizardState, handle_input as handle_new_bill_input,
        render_new_bill_wizard,
    },
};
use crate::views::HtmlBillsView;

#[derive(Parser)]
#[command(name = "billed", about = "Employee expense reports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the application (default)
    Run {
        /// Start on another screen, e.g. `#employee/bill/new`
        #[arg(long)]
        route: Option<String>,
    },
    /// Remember who is using the application
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        admin: bool,
    },
    /// Forget the current user
    Logout,
    /// Write the bills page, or the new bill form, as HTML
    Export {
        #[arg(long, default_value = "bills.html")]
        output: PathBuf,
        #[arg(long)]
        form: bool,
    },
}

// Main application state
struct AppState {
    screen: Route,
    navigator: Arc<PendingRoute>,
    session_store: SessionStore,
    bills: Bills,
    new_bill: NewBill,
    bills_state: BillsState,
    new_bill_state: NewBillWizardState,
    store: Arc<dyn BillStore>,
    session: Session,
}

impl AppState {
    fn new(store: Arc<dyn BillStore>, session: Session, session_store: SessionStore) -> Self {
        let navigator = Arc::new(PendingRoute::new());
        Self {
            screen: Route::Bills,
            bills: Bills::new(store.clone(), navigator.clone()),
            new_bill: NewBill::new(store.clone(), navigator.clone(), session.clone()),
            navigator,
            session_store,
            bills_state: BillsState::new(),
            new_bill_state: NewBillWizardState::new(),
            store,
            session,
        }
    }

    async fn show(&mut self, route: Route) {
        match route {
            Route::Bills => {
                self.bills_state = BillsState::new();
                self.bills.load(&mut self.bills_state).await;
            }
            Route::NewBill => {
                // a fresh form forgets any earlier upload
                self.new_bill = NewBill::new(self.store.clone(), self.navigator.clone(), self.session.clone());
                self.new_bill_state = NewBillWizardState::new();
            }
            Route::Login => {}
        }
        self.screen = route;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;
    telemetry::init_telemetry(&config.log_file)?;
    let session_store = SessionStore::new(&config.session_file);

    let start = match cli.command.unwrap_or(Command::Run { route: None }) {
        Command::Login { email, admin } => {
            let user_type = if admin { UserType::Admin } else { UserType::Employee };
            session_store.login(&User { user_type, email: email.clone() })?;
            println!("Logged in as {}", email);
            return Ok(());
        }
        Command::Logout => {
            session_store.logout()?;
            println!("Logged out");
            return Ok(());
        }
        Command::Export { output, form: true } => {
            std::fs::write(&output, views::new_bill_ui())?;
            println!("New bill form written to {}", output.display());
            return Ok(());
        }
        Command::Export { output, form: false } => {
            let Some(session) = session_store.current()? else {
                println!("Not logged in. Run `billed login --email <email>` first.");
                return Ok(());
            };
            let store: Arc<dyn BillStore> = Arc::new(db::Database::new(&config, &session).await?);
            let bills = Bills::new(store, Arc::new(PendingRoute::new()));

            let mut view = HtmlBillsView::default();
            bills.load(&mut view).await;
            std::fs::write(&output, view.html)?;
            println!("Bills written to {}", output.display());
            return Ok(());
        }
        Command::Run { route } => match route.as_deref().map(Route::from_path) {
            None => Route::Bills,
            Some(Some(route)) => route,
            Some(None) => anyhow::bail!("unknown route {:?}", route.as_deref().unwrap_or_default()),
        },
    };

    let Some(session) = session_store.current()? else {
        println!("Not logged in. Run `billed login --email <email>` first.");
        return Ok(());
    };
    if session.user_type() != UserType::Employee {
        println!("The bills screen is reserved to employees.");
        return Ok(());
    }

    let store: Arc<dyn BillStore> = Arc::new(db::Database::new(&config, &session).await?);
    tracing::info!(email = %session.email(), "starting bills screen");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(store, session, session_store);
    app_state.show(start).await;

    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "application stopped");
        println!("Error: {}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| match app_state.screen {
            Route::Bills => render_bills(f, &mut app_state.bills_state),
            Route::NewBill => render_new_bill_wizard(f, &mut app_state.new_bill_state),
            Route::Login => {}
        })?;

        let should_quit = match app_state.screen {
            Route::Bills => handle_bills_screen(app_state).await?,
            Route::NewBill => handle_new_bill_screen(app_state).await?,
            Route::Login => true,
        };

        if should_quit {
            break;
        }

        if let Some(route) = app_state.navigator.take() {
            if route == Route::Login {
                break;
            }
            app_state.show(route).await;
        }
    }

    Ok(())
}

async fn handle_bills_screen(app_state: &mut AppState) -> Result<bool> {
    match handle_bills_input(&mut app_state.bills_state)? {
        Some(BillsAction::Quit) => return Ok(true),
        Some(BillsAction::Logout) => {
            app_state.session_store.logout()?;
            app_state.navigator.navigate(Route::Login);
        }
        Some(BillsAction::Reload) => {
            app_state.bills.load(&mut app_state.bills_state).await;
        }
        Some(BillsAction::NewBill) => {
            app_state.bills.handle_click_new_bill();
        }
        Some(BillsAction::ViewReceipt) => {
            if let Some(bill) = app_state.bills_state.selected_bill().cloned() {
                app_state
                    .bills
                    .handle_click_icon_eye(&mut app_state.bills_state, &bill);
            }
        }
        None => {}
    }

    Ok(false)
}

async fn handle_new_bill_screen(app_state: &mut AppState) -> Result<bool> {
    match handle_new_bill_input(&mut app_state.new_bill_state)? {
        Some(NewBillAction::Cancel) => {
            app_state.navigator.navigate(Route::Bills);
        }
        Some(NewBillAction::SelectFile(path)) => {
            let file = match ReceiptFile::from_path(&path).await {
                Ok(file) => file,
                Err(e) => {
                    app_state.new_bill_state.clear_file();
                    app_state
                        .new_bill_state
                        .set_message(format!("{}: {}", path.display(), e));
                    return Ok(false);
                }
            };
            let result = app_state
                .new_bill
                .handle_change_file(&mut app_state.new_bill_state, file)
                .await;
            report(&mut app_state.new_bill_state, result.err());
        }
        Some(NewBillAction::Submit(form)) => {
            let result = app_state
                .new_bill
                .handle_submit(&mut app_state.new_bill_state, &form)
                .await;
            report(&mut app_state.new_bill_state, result.err());
        }
        None => {}
    }

    Ok(false)
}

// Store errors are already shown by the view.
fn report(state: &mut NewBillWizardState, error: Option<NewBillError>) {
    match error {
        None | Some(NewBillError::Store(_)) => {}
        Some(e) => state.set_message(e.to_string()),
    }
}
