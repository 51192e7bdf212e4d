use crate::models::{BillingIntent, Extraction, IntentKind, IntentRecord};
use crate::services::ai::LlmProvider;

pub const INVALID_INTENT_LINE: &str = "intent=invalid";

const INTENT_PREFIX: &str = "intent=";

fn build_prompt(message: &str) -> String {
    format!(
        r#"Extract intent and parameters from this message.
Supported intents: query_bill, query_bill_detailed, make_payment, bill_history.
Expected format: intent=<intent_name>;subscriberNo=<value>;month=<value>;year=<value>;amount=<value>

Message: "{message}""#
    )
}

pub async fn extract_intent(llm: &dyn LlmProvider, message: &str) -> anyhow::Result<Extraction> {
    let reply = llm.generate(&build_prompt(message)).await?;
    let reply = reply.trim();
    tracing::info!(reply = %reply, "model reply");

    if !reply.starts_with(INTENT_PREFIX) {
        tracing::warn!(reply = %reply, "model reply is not an intent line");
        return Ok(Extraction {
            raw: INVALID_INTENT_LINE.to_string(),
            record: IntentRecord::Invalid,
        });
    }

    Ok(Extraction {
        raw: reply.to_string(),
        record: parse_intent_line(reply),
    })
}

/// Splits `key=value` on the first `=`. A part without `=` has no value.
fn split_field(part: &str) -> (&str, Option<&str>) {
    match part.split_once('=') {
        Some((key, value)) => (key.trim(), Some(value.trim()).filter(|v| !v.is_empty())),
        None => (part, None),
    }
}

/// Tokenizes `intent=..;subscriberNo=..;month=..;year=..;amount=..`.
///
/// Subscriber, month and year are taken by position, whatever their keys;
/// `amount` is looked up by key since most intents omit it.
pub fn parse_intent_line(line: &str) -> IntentRecord {
    let fields: Vec<(&str, Option<&str>)> = line
        .trim()
        .split(';')
        .map(str::trim)
        .map(split_field)
        .collect();

    let Some(&("intent", Some(name))) = fields.first() else {
        return IntentRecord::Invalid;
    };
    if name == "invalid" {
        return IntentRecord::Invalid;
    }

    let positional = |index: usize| {
        fields
            .get(index)
            .and_then(|(_, value)| *value)
            .map(str::to_string)
    };

    let amount = fields
        .iter()
        .find(|(key, _)| *key == "amount")
        .and_then(|(_, value)| *value)
        .map(str::to_string);

    IntentRecord::Valid(BillingIntent {
        kind: IntentKind::from_name(name),
        subscriber_no: positional(1),
        month: positional(2),
        year: positional(3),
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedLlm(&'static str);

    #[async_trait]
    impl LlmProvider for FixedLlm {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmProvider for FailingLlm {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    fn valid(record: IntentRecord) -> BillingIntent {
        match record {
            IntentRecord::Valid(intent) => intent,
            IntentRecord::Invalid => panic!("expected a valid intent"),
        }
    }

    #[test]
    fn test_prompt_embeds_message() {
        let prompt = build_prompt("what is my bill for march?");
        assert!(prompt.contains(r#"Message: "what is my bill for march?""#));
        assert!(prompt.contains("query_bill, query_bill_detailed, make_payment, bill_history"));
        assert!(prompt.contains("intent=<intent_name>;subscriberNo=<value>"));
    }

    #[test]
    fn test_parse_query_bill() {
        let intent = valid(parse_intent_line(
            "intent=query_bill;subscriberNo=123;month=march;year=2024",
        ));
        assert_eq!(intent.kind, IntentKind::QueryBill);
        assert_eq!(intent.subscriber_no.as_deref(), Some("123"));
        assert_eq!(intent.month.as_deref(), Some("march"));
        assert_eq!(intent.year.as_deref(), Some("2024"));
        assert_eq!(intent.amount, None);
    }

    #[test]
    fn test_parse_fields_are_positional() {
        let intent = valid(parse_intent_line(
            "intent=query_bill; sub=55 ; m=4 ; y=2023",
        ));
        assert_eq!(intent.subscriber_no.as_deref(), Some("55"));
        assert_eq!(intent.month.as_deref(), Some("4"));
        assert_eq!(intent.year.as_deref(), Some("2023"));
    }

    #[test]
    fn test_parse_amount_by_key() {
        let intent = valid(parse_intent_line(
            "intent=make_payment;subscriberNo=1;month=5;year=2024;amount=30.5",
        ));
        assert_eq!(intent.kind, IntentKind::MakePayment);
        assert_eq!(intent.amount.as_deref(), Some("30.5"));

        let history = valid(parse_intent_line("intent=bill_history;subscriberNo=1"));
        assert_eq!(history.amount, None);
        assert_eq!(history.month, None);
    }

    #[test]
    fn test_parse_empty_values_are_absent() {
        let intent = valid(parse_intent_line(
            "intent=make_payment;subscriberNo=9;month=;year=2024;amount=",
        ));
        assert_eq!(intent.month, None);
        assert_eq!(intent.amount, None);
    }

    #[test]
    fn test_parse_unknown_intent_is_kept() {
        let intent = valid(parse_intent_line("intent=cancel_plan;subscriberNo=1"));
        assert_eq!(intent.kind, IntentKind::Unsupported("cancel_plan".to_string()));
    }

    #[test]
    fn test_parse_invalid_lines() {
        assert_eq!(parse_intent_line("intent=invalid"), IntentRecord::Invalid);
        assert_eq!(parse_intent_line("intent="), IntentRecord::Invalid);
        assert_eq!(parse_intent_line("hello there"), IntentRecord::Invalid);
    }

    #[tokio::test]
    async fn test_extract_valid_reply_is_trimmed() {
        let llm = FixedLlm("  intent=bill_history;subscriberNo=42\n");
        let extraction = extract_intent(&llm, "show my history").await.unwrap();
        assert_eq!(extraction.raw, "intent=bill_history;subscriberNo=42");
        assert_eq!(valid(extraction.record).kind, IntentKind::BillHistory);
    }

    #[tokio::test]
    async fn test_extract_chatty_reply_becomes_invalid() {
        let llm = FixedLlm("Sure! Here is the intent: intent=query_bill");
        let extraction = extract_intent(&llm, "bill?").await.unwrap();
        assert_eq!(extraction.raw, INVALID_INTENT_LINE);
        assert_eq!(extraction.record, IntentRecord::Invalid);
    }

    #[tokio::test]
    async fn test_extract_raw_line_shape() {
        for reply in ["intent=query_bill;subscriberNo=1", "nonsense", "", "intent=invalid"] {
            let extraction = extract_intent(&FixedLlm(reply), "msg").await.unwrap();
            assert!(
                extraction.raw.starts_with(INTENT_PREFIX) || extraction.raw == INVALID_INTENT_LINE
            );
        }
    }

    #[tokio::test]
    async fn test_extract_propagates_provider_failure() {
        assert!(extract_intent(&FailingLlm, "bill?").await.is_err());
    }
}
