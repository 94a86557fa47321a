//! REST gateway layer: one thin wrapper per backend resource

pub mod authors;
pub mod books;
pub mod http;
pub mod loans;
pub mod reports;
pub mod returns;
pub mod users;

pub use http::ApiClient;

use crate::storage::LocalStore;

/// Main gateway struct holding one wrapper per backend resource
#[derive(Clone)]
pub struct Gateways {
    pub authors: authors::AuthorsGateway,
    pub books: books::BooksGateway,
    pub users: users::UsersGateway,
    pub loans: loans::LoansGateway,
    pub returns: returns::ReturnsGateway,
    pub reports: reports::ReportsGateway,
}

impl Gateways {
    /// Create the gateways over a shared HTTP client. The local store backs
    /// the usuarios degrade path only.
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self {
            authors: authors::AuthorsGateway::new(api.clone()),
            books: books::BooksGateway::new(api.clone()),
            users: users::UsersGateway::new(api.clone(), store),
            loans: loans::LoansGateway::new(api.clone()),
            returns: returns::ReturnsGateway::new(api.clone()),
            reports: reports::ReportsGateway::new(api),
        }
    }
}
