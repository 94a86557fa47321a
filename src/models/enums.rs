//! Shared domain enums (matching the backend's wire vocabulary)
//!
//! The REST backend speaks Spanish on the wire; these enums carry the exact
//! wire strings and expose English identifiers to the rest of the crate.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Account role, stored as `rol` on user documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "user")]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Loan lifecycle state, stored as `estado` on loan documents.
///
/// `Active` is the only non-terminal state; a loan leaves it when a return
/// is recorded and re-enters it when that return is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "devuelto")]
    Returned,
    #[serde(rename = "vencido")]
    Overdue,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "activo",
            LoanStatus::Returned => "devuelto",
            LoanStatus::Overdue => "vencido",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoanStatus::Active)
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "activo" => Ok(LoanStatus::Active),
            "devuelto" => Ok(LoanStatus::Returned),
            "vencido" => Ok(LoanStatus::Overdue),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// ReturnStatus
// ---------------------------------------------------------------------------

/// Punctuality of a recorded return, stored as `estado` on return documents.
/// Computed from the expected and actual dates, never entered by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnStatus {
    #[serde(rename = "a_tiempo")]
    OnTime,
    #[serde(rename = "retrasado")]
    Late,
}

impl ReturnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::OnTime => "a_tiempo",
            ReturnStatus::Late => "retrasado",
        }
    }
}

impl std::fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReturnStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a_tiempo" => Ok(ReturnStatus::OnTime),
            "retrasado" => Ok(ReturnStatus::Late),
            _ => Err(format!("Invalid return status: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// BookCondition
// ---------------------------------------------------------------------------

/// Physical condition reported when a book comes back, stored as
/// `condicionLibro` on return documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookCondition {
    #[serde(rename = "bueno")]
    Good,
    #[serde(rename = "regular")]
    Fair,
    #[serde(rename = "dañado")]
    Damaged,
    #[serde(rename = "perdido")]
    Lost,
}

impl BookCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookCondition::Good => "bueno",
            BookCondition::Fair => "regular",
            BookCondition::Damaged => "dañado",
            BookCondition::Lost => "perdido",
        }
    }
}

impl std::fmt::Display for BookCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bueno" => Ok(BookCondition::Good),
            "regular" => Ok(BookCondition::Fair),
            "dañado" | "danado" => Ok(BookCondition::Damaged),
            "perdido" => Ok(BookCondition::Lost),
            _ => Err(format!("Invalid book condition: {}", s)),
        }
    }
}

impl Default for BookCondition {
    fn default() -> Self {
        BookCondition::Good
    }
}
