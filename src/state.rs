use crate::services::ai::LlmProvider;
use crate::services::billing::BillingBackend;

pub struct AppState {
    pub llm: Box<dyn LlmProvider>,
    pub billing: Box<dyn BillingBackend>,
}
