// storefront/src/models/order.rs

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Contact and delivery fields an order is placed with. All are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
  pub street: String,
  pub house: String,
  pub zip: String,
  pub city: String,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub phone: String,
  pub payment_method: String,
}

/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub user_id: String,
  pub street: String,
  pub house: String,
  pub zip: String,
  pub city: String,
  pub first_name: String,
  pub last_name: String,
  pub email: String,
  pub phone: String,
  pub payment_method: String,
  pub created_at: DateTime<Utc>,
}

impl Order {
  /// Stamps the order at microsecond precision so the stored `TIMESTAMPTZ`
  /// matches what is returned to the caller.
  pub fn place(user_id: impl Into<String>, shipping: ShippingDetails) -> Self {
    let ShippingDetails {
      street,
      house,
      zip,
      city,
      first_name,
      last_name,
      email,
      phone,
      payment_method,
    } = shipping;

    Self {
      id: Uuid::new_v4(),
      user_id: user_id.into(),
      street,
      house,
      zip,
      city,
      first_name,
      last_name,
      email,
      phone,
      payment_method,
      created_at: Utc::now().trunc_subsecs(6),
    }
  }
}
