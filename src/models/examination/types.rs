use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Findings a doctor records against a completed or ongoing appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Examination {
    pub id: i64,
    pub booking_id: i64,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    pub date: NaiveDate,
    pub diagnosis: String,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Examination {
    pub fn doctor_label(&self) -> &str {
        self.doctor_name.as_deref().unwrap_or("—")
    }

    pub fn result_text(&self) -> &str {
        self.result.as_deref().unwrap_or("")
    }

    pub fn note_text(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }

    pub fn date_label(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExamination {
    pub booking_id: i64,
    pub diagnosis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExaminationForm {
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub note: String,
    pub csrf_token: String,
}
