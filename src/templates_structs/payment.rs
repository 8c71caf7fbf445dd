use askama::Template;

use crate::models::payment::PaymentResult;

use super::PageContext;

#[derive(Template)]
#[template(path = "payment/result.html")]
pub struct PaymentResultTemplate {
    pub ctx: PageContext,
    pub result: PaymentResult,
}
