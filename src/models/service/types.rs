use serde::{Deserialize, Serialize};

use crate::models::payment::format_vnd;

/// A bookable clinic service (consultation, IUI, IVF cycle, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in VND.
    pub price: i64,
}

impl Service {
    pub fn price_label(&self) -> String {
        format_vnd(self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
}

impl Doctor {
    pub fn specialty_label(&self) -> &str {
        self.specialty.as_deref().unwrap_or("General")
    }
}

/// One appointment window in a doctor's day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub start_time: String, // HH:MM
    pub end_time: String,   // HH:MM
    #[serde(default)]
    pub available: bool,
}

impl Slot {
    pub fn label(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }
}
