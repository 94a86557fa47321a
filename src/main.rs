//! Biblioteca - Library Management Client
//!
//! Command-line client for the Biblioteca REST backend, with a durable
//! session and an offline administrative path.

use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblioteca_client::{
    config::AppConfig,
    models::enums::Role,
    models::loan::NewLoan,
    models::returns::{ReturnSubmission, UpdateReturn},
    models::user::{NewUser, UpdateProfile},
    AppState,
};

mod cli;
use cli::{
    AuthorCommands, BookCommands, Cli, Commands, LoanCommands, RepairCommands, ReturnCommands,
    ReturnsCommands,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Cli::parse();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("biblioteca_client={}", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::debug!("Biblioteca client v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(config)?;

    // Restore the persisted identity (or materialize the bootstrap admin)
    // before any command runs.
    state.services.session.initialize().await;

    run(args, &state).await
}

async fn run(args: Cli, state: &AppState) -> anyhow::Result<()> {
    match args.command {
        Commands::Login { email, password } => {
            let password = read_password(password)?;
            let user = state.services.auth.authenticate(&email, &password).await?;
            println!("Signed in as {} ({})", user.display_name(), user.role);
        }
        Commands::Logout => {
            state.services.session.logout().await?;
            println!("Signed out");
        }
        Commands::Whoami => match state.services.session.current().await {
            Some(user) => {
                println!("{}  {}  {}", user.id, user.display_name(), user.email);
                println!("role: {}", user.role);
            }
            None => println!("No active session"),
        },
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            phone,
            address,
        } => {
            let password = read_password(password)?;
            let user = state
                .services
                .auth
                .register(NewUser {
                    first_name,
                    last_name,
                    email,
                    password,
                    phone,
                    address,
                    gender: None,
                    document_kind: None,
                    document_number: None,
                    role: Role::User,
                })
                .await?;
            println!("Registered {} as {}", user.email, user.id);
        }
        Commands::Profile {
            first_name,
            last_name,
            email,
            phone,
            address,
            gender,
        } => {
            let updated = state
                .services
                .session
                .update_profile(UpdateProfile {
                    first_name,
                    last_name,
                    email,
                    phone,
                    address,
                    gender,
                })
                .await?;
            println!("Profile updated for {}", updated.display_name());
        }
        Commands::Authors { command } => match command {
            AuthorCommands::List => {
                for author in state.gateways.authors.list(&[]).await? {
                    println!("{}  {}", author.id, author.name);
                }
            }
        },
        Commands::Books { command } => match command {
            BookCommands::List { available } => {
                let books = if available {
                    state.gateways.books.available().await?
                } else {
                    state.gateways.books.list(&[]).await?
                };
                for book in books {
                    println!(
                        "{}  {} by {}  ({} copies)",
                        book.id,
                        book.title,
                        book.author_name(),
                        book.copies
                    );
                }
            }
        },
        Commands::Loans { command } => match command {
            LoanCommands::List { all } => {
                let loans = if all {
                    state.gateways.loans.list(&[]).await?
                } else {
                    state.services.loans.active_loans().await?
                };
                for loan in loans {
                    println!(
                        "{}  {}  user {}  book {}  since {}",
                        loan.id,
                        loan.status,
                        loan.user.id(),
                        loan.book.id(),
                        loan.loan_date.format("%Y-%m-%d")
                    );
                }
            }
        },
        Commands::Borrow { user, book, due } => {
            require_admin(state).await?;
            flush_pending_repairs(state).await;
            let loan = state
                .services
                .loans
                .checkout(NewLoan {
                    user_id: user,
                    book_id: book,
                    loan_date: None,
                    expected_return_date: due,
                })
                .await?;
            match loan.expected_return_date() {
                Some(due) => println!("Loan {} opened, due {}", loan.id, due.format("%Y-%m-%d")),
                None => println!("Loan {} opened", loan.id),
            }
        }
        Commands::Returns { command } => match command {
            ReturnsCommands::List => {
                for record in state.services.loans.list_returns().await? {
                    println!(
                        "{}  {}  loan {}  returned {}  fine {}",
                        record.id,
                        record.status,
                        record.loan.id(),
                        record.actual_return_date.format("%Y-%m-%d"),
                        record.fine
                    );
                }
            }
        },
        Commands::Return { command } => {
            require_admin(state).await?;
            flush_pending_repairs(state).await;
            match command {
                ReturnCommands::Record {
                    loan,
                    date,
                    outcome,
                    condition,
                    fine,
                    notes,
                } => {
                    let record = state
                        .services
                        .loans
                        .record_return(ReturnSubmission {
                            loan_id: loan,
                            actual_return_date: date,
                            loan_outcome: outcome,
                            condition,
                            fine,
                            notes,
                        })
                        .await?;
                    println!("Return {} recorded ({})", record.id, record.status);
                }
                ReturnCommands::Amend {
                    id,
                    date,
                    condition,
                    fine,
                    notes,
                } => {
                    let record = state
                        .services
                        .loans
                        .amend_return(
                            &id,
                            UpdateReturn {
                                actual_return_date: date,
                                condition,
                                fine,
                                notes,
                            },
                        )
                        .await?;
                    println!("Return {} amended ({})", record.id, record.status);
                }
                ReturnCommands::Cancel { id } => {
                    let loan = state.services.loans.cancel_return(&id).await?;
                    println!("Return cancelled, loan {} is active again", loan.id);
                }
            }
        }
        Commands::Repairs { command } => match command {
            RepairCommands::List => {
                let pending = state.services.loans.pending_repairs()?;
                if pending.is_empty() {
                    println!("No pending repairs");
                }
                for repair in pending {
                    println!(
                        "loan {}  {}  queued {}",
                        repair.loan_id,
                        repair.status,
                        repair.queued_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
            RepairCommands::Flush => {
                let applied = state.services.loans.flush_repairs().await?;
                println!("{} repair(s) applied", applied);
            }
        },
    }
    Ok(())
}

async fn require_admin(state: &AppState) -> anyhow::Result<()> {
    if !state.services.session.is_admin().await {
        anyhow::bail!("this command needs an administrator session; sign in first");
    }
    Ok(())
}

/// Replay queued loan repairs before a mutating command. Failure here only
/// logs; the command itself still runs.
async fn flush_pending_repairs(state: &AppState) {
    match state.services.loans.flush_repairs().await {
        Ok(0) => {}
        Ok(n) => tracing::info!("Applied {} queued loan repair(s)", n),
        Err(e) => tracing::warn!("Repair flush failed: {}", e),
    }
}

fn read_password(flag: Option<String>) -> anyhow::Result<String> {
    match flag {
        Some(password) => Ok(password),
        None => {
            eprint!("Password: ");
            io::stderr().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}
