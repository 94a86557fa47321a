//! Data models for the Biblioteca client

pub mod author;
pub mod book;
pub mod enums;
pub mod loan;
pub mod returns;
pub mod user;
pub mod wire;

// Re-export commonly used types
pub use author::{Author, NewAuthor, UpdateAuthor};
pub use book::{Book, NewBook, UpdateBook};
pub use enums::{BookCondition, LoanStatus, ReturnStatus, Role};
pub use loan::{Loan, LoanRepair, NewLoan, UpdateLoan};
pub use returns::{ReturnRecord, ReturnSubmission, UpdateReturn};
pub use user::{Credentials, NewUser, StoredUser, UpdateProfile, UpdateUser, User};
pub use wire::{DocRef, HasId, ListEnvelope};
