//! Command-line surface of the Biblioteca client

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use biblioteca_client::models::enums::{BookCondition, LoanStatus};

#[derive(Parser, Debug)]
#[command(name = "biblioteca", version, about = "Biblioteca library management client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and persist the session
    Login {
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Clear the active session
    Logout,
    /// Show the active identity
    Whoami,
    /// Create an account (works offline; stored locally until the backend is back)
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Update the signed-in profile
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        gender: Option<String>,
    },
    /// Author catalog
    Authors {
        #[command(subcommand)]
        command: AuthorCommands,
    },
    /// Book catalog
    Books {
        #[command(subcommand)]
        command: BookCommands,
    },
    /// Loan ledger
    Loans {
        #[command(subcommand)]
        command: LoanCommands,
    },
    /// Open a loan (admin)
    Borrow {
        /// Borrower document id
        #[arg(long)]
        user: String,
        /// Book document id
        #[arg(long)]
        book: String,
        /// Expected return date (RFC 3339 or YYYY-MM-DD)
        #[arg(long, value_parser = parse_datetime)]
        due: Option<DateTime<Utc>>,
    },
    /// Return ledger
    Returns {
        #[command(subcommand)]
        command: ReturnsCommands,
    },
    /// Record, amend or cancel a single return (admin)
    Return {
        #[command(subcommand)]
        command: ReturnCommands,
    },
    /// Queued loan repairs
    Repairs {
        #[command(subcommand)]
        command: RepairCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthorCommands {
    List,
}

#[derive(Subcommand, Debug)]
pub enum BookCommands {
    List {
        /// Only books with copies on the shelf
        #[arg(long)]
        available: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum LoanCommands {
    List {
        /// Include closed loans
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReturnsCommands {
    List,
}

#[derive(Subcommand, Debug)]
pub enum ReturnCommands {
    /// Record a return against an active loan and close it
    Record {
        loan: String,
        /// Actual return date; defaults to now
        #[arg(long, value_parser = parse_datetime)]
        date: Option<DateTime<Utc>>,
        /// Terminal loan status: devuelto or vencido
        #[arg(long, default_value_t = LoanStatus::Returned)]
        outcome: LoanStatus,
        /// bueno, regular, dañado or perdido
        #[arg(long, default_value_t = BookCondition::Good)]
        condition: BookCondition,
        #[arg(long)]
        fine: Option<Decimal>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a recorded return without touching its loan
    Amend {
        id: String,
        #[arg(long, value_parser = parse_datetime)]
        date: Option<DateTime<Utc>>,
        #[arg(long)]
        condition: Option<BookCondition>,
        #[arg(long)]
        fine: Option<Decimal>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a return and reopen its loan
    Cancel { id: String },
}

#[derive(Subcommand, Debug)]
pub enum RepairCommands {
    List,
    /// Replay queued loan-side writes against the backend
    Flush,
}

/// Accept full RFC 3339 timestamps or a bare date (taken as midnight UTC).
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
        .map_err(|e| format!("invalid date '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_accepts_rfc3339() {
        let dt = parse_datetime("2024-03-10T12:30:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 10, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_accepts_bare_date() {
        let dt = parse_datetime("2024-03-10").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("next tuesday").is_err());
    }

    #[test]
    fn test_cli_parses_return_record() {
        let cli = Cli::try_parse_from([
            "biblioteca",
            "return",
            "record",
            "loan-1",
            "--outcome",
            "vencido",
            "--fine",
            "3.50",
        ])
        .unwrap();
        match cli.command {
            Commands::Return {
                command:
                    ReturnCommands::Record {
                        loan,
                        outcome,
                        condition,
                        fine,
                        ..
                    },
            } => {
                assert_eq!(loan, "loan-1");
                assert_eq!(outcome, LoanStatus::Overdue);
                assert_eq!(condition, BookCondition::Good);
                assert_eq!(fine, Some(Decimal::new(350, 2)));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }
}
