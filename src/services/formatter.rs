//! Renders billing API payloads as chat replies.
//!
//! Everything here is pure: the same intent and payload text always produce
//! the same reply.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::models::{due_date, month_label, resolve_month, BillingIntent, IntentKind, IntentRecord};

pub const NOT_UNDERSTOOD: &str =
    "⚠️ I couldn't understand your request. Please try again with a clear question.";

const NOT_PROCESSED: &str = "Sorry, I could not process your request.";

/// Flat monthly charge included in every detailed bill.
const BASE_PLAN: f64 = 50.0;

pub fn format_reply(record: &IntentRecord, json_text: &str) -> String {
    let Ok(payload) = serde_json::from_str::<Value>(json_text) else {
        return json_text.to_string();
    };

    let intent = match record {
        IntentRecord::Invalid => return NOT_UNDERSTOOD.to_string(),
        IntentRecord::Valid(intent) => intent,
    };

    match intent.kind {
        IntentKind::QueryBill => bill_summary(intent, &payload),
        IntentKind::QueryBillDetailed => bill_details(intent, &payload),
        IntentKind::MakePayment => payment_summary(intent, &payload),
        IntentKind::BillHistory => bill_history(intent, &payload),
        IntentKind::Unsupported(_) => NOT_PROCESSED.to_string(),
    }
}

fn no_bill(intent: &BillingIntent, label: &str) -> String {
    format!(
        "No bill found for subscriber {} for {} {}.",
        intent.subscriber(),
        label,
        intent.year()
    )
}

fn bill_summary(intent: &BillingIntent, payload: &Value) -> String {
    let month = resolve_month(intent.month.as_deref());
    let Some(total) = total_amount(payload) else {
        return no_bill(intent, &month.label);
    };

    let amount = total
        .as_f64()
        .map(money)
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "Bill Summary:
----------------------------
Subscriber:       {subscriber}
Month:            {label} {year}
Amount Due:       ${amount}
Due Date:         {due}
----------------------------
Would you like to see the detailed bill or proceed with payment?",
        subscriber = intent.subscriber(),
        label = month.label,
        year = intent.year(),
        due = due_date(month.number, intent.year.as_deref()),
    )
}

fn bill_details(intent: &BillingIntent, payload: &Value) -> String {
    let month = resolve_month(intent.month.as_deref());
    let entries = match payload.get("content").and_then(Value::as_array) {
        Some(entries) if !entries.is_empty() && !is_no_data(payload) => entries,
        _ => return no_bill(intent, &month.label),
    };

    let target_year = intent
        .year
        .as_deref()
        .and_then(|y| y.trim().parse::<i64>().ok());

    let Some(entry) = entries.iter().find(|entry| {
        let subscriber = entry
            .get("subscriber")
            .and_then(|s| s.get("subscriberNo"))
            .map(display_value);
        subscriber.as_deref() == intent.subscriber_no.as_deref()
            && numbers_match(entry.get("month"), month.number.map(i64::from))
            && numbers_match(entry.get("year"), target_year)
    }) else {
        return no_bill(intent, &month.label);
    };

    let total = entry.get("totalAmount").and_then(Value::as_f64);
    let usage_charge = total.map(|t| money(t - BASE_PLAN));
    let not_available = || "N/A".to_string();

    format!(
        "Bill Details for {label} {year}:
----------------------------
Base Plan:             ${base}
Data Usage:            {mb} MB
Minutes Usage:         {minutes} minutes
Data & Minutes Charge: ${usage}
Total Due:             ${total}
Due Date:              {due}
----------------------------
Would you like to proceed with payment?",
        label = month.label,
        year = intent.year(),
        base = money(BASE_PLAN),
        mb = field_display(entry, "totalMb"),
        minutes = field_display(entry, "totalMinutes"),
        usage = usage_charge.unwrap_or_else(not_available),
        total = total.map(money).unwrap_or_else(not_available),
        due = due_date(month.number, intent.year.as_deref()),
    )
}

fn payment_summary(intent: &BillingIntent, payload: &Value) -> String {
    let month = resolve_month(intent.month.as_deref());
    let Some(total) = total_amount(payload) else {
        return format!(
            "{} Payment could not be processed.",
            no_bill(intent, &month.label)
        );
    };

    let paid_now = intent
        .amount
        .as_deref()
        .and_then(|a| a.trim().parse::<f64>().ok())
        .filter(|a| a.is_finite())
        .unwrap_or(0.0);
    let total_bill = total.as_f64().unwrap_or(0.0);
    let previously_paid = payload
        .get("paidAmount")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let total_paid = previously_paid + paid_now;
    let remaining = total_bill - total_paid;

    format!(
        "✅ Payment successful!

Payment Summary:
----------------------------
Subscriber:        {subscriber}
Month:             {label} {year}
Total Bill:        ${total_bill}
Previously Paid:   ${previously_paid}
Amount Paid Now:   ${paid_now}
Total Paid:        ${total_paid}
Remaining Balance: ${remaining}
----------------------------
Thank you for your payment!",
        subscriber = intent.subscriber(),
        label = month.label,
        year = intent.year(),
        total_bill = money(total_bill),
        previously_paid = money(previously_paid),
        paid_now = money(paid_now),
        total_paid = money(total_paid),
        remaining = money(remaining),
    )
}

fn bill_history(intent: &BillingIntent, payload: &Value) -> String {
    let entries = payload
        .as_array()
        .or_else(|| payload.get("content").and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or_default();

    if entries.is_empty() {
        return format!(
            "No bill history found for subscriber {}.",
            intent.subscriber()
        );
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            let month = entry
                .get("month")
                .and_then(Value::as_u64)
                .and_then(|m| u32::try_from(m).ok())
                .and_then(month_label)
                .map(str::to_string)
                .unwrap_or_else(|| field_display(entry, "month"));
            let paid = if entry.get("isPaid").is_some_and(is_truthy) {
                "Yes"
            } else {
                "No"
            };
            format!(
                "- {} {}  | Amount Due: ${} | Paid: {}",
                month,
                field_display(entry, "year"),
                field_display(entry, "totalAmount"),
                paid
            )
        })
        .collect();

    format!(
        "Bill History for Subscriber {}:\n{}",
        intent.subscriber(),
        lines.join("\n")
    )
}

/// The payload's `totalAmount`, or `None` when the payload stands for
/// "nothing on record".
fn total_amount(payload: &Value) -> Option<&Value> {
    if !is_truthy(payload) || is_no_data(payload) {
        return None;
    }
    payload.get("totalAmount")
}

fn is_no_data(payload: &Value) -> bool {
    payload.get("noData").is_some_and(is_truthy)
}

/// Loose truthiness: null, false, zero and the empty string are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn numbers_match(value: Option<&Value>, expected: Option<i64>) -> bool {
    match (value.and_then(Value::as_f64), expected) {
        (Some(actual), Some(expected)) => actual == expected as f64,
        _ => false,
    }
}

/// Renders a raw JSON value for display; integral numbers drop the `.0`.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn field_display(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .map(display_value)
        .unwrap_or_else(|| "N/A".to_string())
}

/// Two-decimal amount with exact ties rounded away from zero (`0.125` -> `0.13`).
fn money(amount: f64) -> String {
    // avoid printing "-0.00"
    let amount = if amount == 0.0 { 0.0 } else { amount };
    match Decimal::from_f64_retain(amount) {
        Some(exact) => {
            let mut rounded =
                exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            rounded.to_string()
        }
        None => format!("{amount:.2}"),
    }
}
