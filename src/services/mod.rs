//! Business logic services

pub mod auth;
pub mod loans;
pub mod session;

use crate::gateway::Gateways;
use crate::storage::LocalStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub session: session::SessionService,
    pub auth: auth::AuthService,
    pub loans: loans::LoanService,
}

impl Services {
    /// Create all services over the gateways and the shared local store
    pub fn new(gateways: &Gateways, store: LocalStore) -> Self {
        let session = session::SessionService::new(store.clone(), gateways.users.clone());
        Self {
            auth: auth::AuthService::new(gateways.users.clone(), session.clone()),
            loans: loans::LoanService::new(
                gateways.loans.clone(),
                gateways.returns.clone(),
                store,
            ),
            session,
        }
    }
}
