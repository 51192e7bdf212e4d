pub mod intent;
pub mod month;

pub use intent::{BillingIntent, Extraction, IntentKind, IntentRecord};
pub use month::{due_date, month_from_name, month_label, resolve_month, ResolvedMonth};
