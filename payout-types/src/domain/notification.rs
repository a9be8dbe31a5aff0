//! Company change notification.

use super::user::User;
use crate::dto::ChangeCompanyRequest;

/// Outgoing email asking operators to move a user to another company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyChangeNotification {
    pub subject: String,
    pub body: String,
}

impl CompanyChangeNotification {
    pub fn new(user: &User, req: &ChangeCompanyRequest, environment: &str) -> Self {
        let subject = format!("[{}] Company change request", environment);
        let body = format!(
            "User {} ({}) requested to change their company to \"{}\".\n\nEnvironment: {}\n",
            user.id, user.email, req.company_name, environment
        );
        Self { subject, body }
    }
}
