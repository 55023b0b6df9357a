//! Caller roles and the category-visibility policy for activity feeds.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::activity::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Worker,
  Client,
}

/// The identity a feed is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Caller {
  Admin { admin_id: Uuid },
  Worker { worker_id: Uuid },
  Client { client_id: Uuid },
}

impl Caller {
  pub fn role(&self) -> Role {
    match self {
      Self::Admin { .. } => Role::Admin,
      Self::Worker { .. } => Role::Worker,
      Self::Client { .. } => Role::Client,
    }
  }

  pub fn id(&self) -> Uuid {
    match self {
      Self::Admin { admin_id } => *admin_id,
      Self::Worker { worker_id } => *worker_id,
      Self::Client { client_id } => *client_id,
    }
  }
}

/// The activity categories a role may see in its feed. Clients are kept out
/// of the expense trail; workers have no feed at all and are rejected before
/// this policy applies.
pub fn allowed_categories(role: Role) -> &'static [Category] {
  match role {
    Role::Admin | Role::Worker => {
      &[Category::Task, Category::Expense, Category::Inventory]
    }
    Role::Client => &[Category::Task, Category::Inventory],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clients_do_not_see_expenses() {
    let allowed = allowed_categories(Role::Client);
    assert!(!allowed.contains(&Category::Expense));
    assert!(allowed.contains(&Category::Task));
    assert!(allowed.contains(&Category::Inventory));
  }

  #[test]
  fn admins_see_everything() {
    assert_eq!(allowed_categories(Role::Admin).len(), 3);
  }

  #[test]
  fn caller_deserializes_from_tagged_form() {
    let caller: Caller = serde_json::from_value(serde_json::json!({
      "role":      "client",
      "client_id": "6f9fca6e-0f61-4dbb-9fcd-1f6bb2a3b1de",
    }))
    .unwrap();
    assert_eq!(caller.role(), Role::Client);
  }
}
