use askama::Template;

use crate::models::booking::Booking;
use crate::models::examination::Examination;

use super::PageContext;

#[derive(Template)]
#[template(path = "doctor/examination_form.html")]
pub struct ExaminationFormTemplate {
    pub ctx: PageContext,
    pub booking: Booking,
    pub existing: Vec<Examination>,
    pub errors: Vec<String>,
    pub diagnosis: String,
    pub result: String,
    pub note: String,
}

#[derive(Template)]
#[template(path = "examinations/patient_list.html")]
pub struct PatientExaminationsTemplate {
    pub ctx: PageContext,
    pub exams: Vec<Examination>,
}
