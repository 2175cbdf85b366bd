use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods received; adds to the product quantity.
    Entry,
    /// Goods issued; subtracts from the product quantity.
    Exit,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entry => "entry",
            MovementKind::Exit => "exit",
        }
    }

    /// Signed change applied to the product quantity.
    pub fn signed(&self, quantity: i64) -> i64 {
        match self {
            MovementKind::Entry => quantity,
            MovementKind::Exit => -quantity,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(MovementKind::Entry),
            "exit" => Ok(MovementKind::Exit),
            other => Err(format!("unknown movement kind '{}'", other)),
        }
    }
}

/// One row of the stock ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StockMovement {
    pub id: i64,
    pub product_id: i64,
    pub kind: MovementKind,
    pub quantity: i64,
    /// Origin for entries, destination for exits.
    #[serde(default)]
    pub counterparty: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
