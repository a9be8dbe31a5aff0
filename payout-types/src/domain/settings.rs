//! Settings view.

use serde::{Deserialize, Serialize};

use super::payout::Payout;
use super::user::User;

/// A user's payout settings as shown to them. Built fresh on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub user: User,
    pub payout: Payout,
}
