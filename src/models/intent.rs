use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum IntentKind {
    QueryBill,
    QueryBillDetailed,
    MakePayment,
    BillHistory,
    /// Well-formed line naming an intent the gateway has no route for.
    Unsupported(String),
}

impl IntentKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "query_bill" => IntentKind::QueryBill,
            "query_bill_detailed" => IntentKind::QueryBillDetailed,
            "make_payment" => IntentKind::MakePayment,
            "bill_history" => IntentKind::BillHistory,
            other => IntentKind::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IntentKind::QueryBill => "query_bill",
            IntentKind::QueryBillDetailed => "query_bill_detailed",
            IntentKind::MakePayment => "make_payment",
            IntentKind::BillHistory => "bill_history",
            IntentKind::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillingIntent {
    pub kind: IntentKind,
    pub subscriber_no: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub amount: Option<String>,
}

impl BillingIntent {
    pub fn subscriber(&self) -> &str {
        self.subscriber_no.as_deref().unwrap_or_default()
    }

    pub fn year(&self) -> &str {
        self.year.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntentRecord {
    Valid(BillingIntent),
    Invalid,
}

/// What the extractor hands to the rest of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Trimmed model reply, or `intent=invalid` when it was rejected.
    pub raw: String,
    pub record: IntentRecord,
}
