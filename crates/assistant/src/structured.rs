use hisab_core::{re, Transaction};
use serde::Deserialize;

use crate::generator::CapabilityError;

re!(re_json_object, r"(?s)\{.*\}");

/// Expense list returned by the capability.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructuredParse {
    #[serde(default)]
    pub expenses: Vec<Transaction>,
    #[serde(default)]
    pub reply: Option<String>,
}

/// Decodes a generated reply. Markdown code fences and prose around the
/// outermost JSON object are ignored.
pub fn decode_expenses(raw: &str) -> Result<StructuredParse, CapabilityError> {
    let body = strip_fences(raw.trim());
    let json = re_json_object()
        .find(body)
        .ok_or_else(|| CapabilityError::Malformed("no JSON object in response".to_string()))?;
    serde_json::from_str(json.as_str()).map_err(|e| CapabilityError::Malformed(e.to_string()))
}

fn strip_fences(s: &str) -> &str {
    let inner = s
        .strip_prefix("```json")
        .or_else(|| s.strip_prefix("```"))
        .unwrap_or(s);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hisab_core::Category;

    #[test]
    fn plain_json() {
        let p = decode_expenses(
            r#"{"expenses":[{"amount":100,"item":"chiya","category":"Food","remarks":"Chiya","paid_by":null}],"reply":"ok"}"#,
        )
        .unwrap();
        assert_eq!(p.expenses.len(), 1);
        assert_eq!(p.expenses[0].category, Category::Food);
        assert_eq!(p.reply.as_deref(), Some("ok"));
    }

    #[test]
    fn fenced_json_with_prose() {
        let raw = "```json\nHere you go:\n{\"expenses\":[{\"amount\":-4000,\"item\":\"loan\",\"category\":\"Loan\",\"remarks\":\"Loan taken from Munchun\",\"paid_by\":\"Munchun\"}]}\n```";
        let p = decode_expenses(raw).unwrap();
        assert_eq!(p.expenses[0].amount, -4000);
        assert_eq!(p.expenses[0].payer(), Some("Munchun"));
        assert!(p.reply.is_none());
    }

    #[test]
    fn malformed() {
        assert!(matches!(decode_expenses("sorry, no idea"), Err(CapabilityError::Malformed(_))));
        assert!(matches!(decode_expenses("{not json}"), Err(CapabilityError::Malformed(_))));
    }

    #[test]
    fn missing_expenses_is_empty_list() {
        let p = decode_expenses(r#"{"reply":"nothing"}"#).unwrap();
        assert!(p.expenses.is_empty());
    }
}
