//! Prompt builders for the text-generation capability.

/// Structured-output instruction for expense parsing.
pub fn parse_prompt(text: &str) -> String {
    format!(
        r#"You are an intelligent expense parser. Parse this text into structured expense data.

Text: "{text}"

Rules:
1. Extract an expense from any text that mentions an amount.
2. Understand context and intent, not just exact patterns.
3. Handle short forms like "100 chiya", "300 admission fee", "50 tea".
4. Categories: Food, Transport, Groceries, Shopping, Utilities, Entertainment, Rent, Loan, Income, Medical, Education, Travel, Other
5. Income uses negative amounts: salary, bonus, refund, got back, received.
6. Loans:
   - "gave/lend to person" is a POSITIVE amount (loan given)
   - "taken/borrowed from person" is a NEGATIVE amount (loan taken)
   - "paid person" or "paid person's loan" is a POSITIVE amount (loan repaid)
   - "received from person" is a NEGATIVE amount (they repaid you)

Examples:
- "100 chiya" → {{"amount": 100, "item": "chiya", "category": "Food", "remarks": "Chiya"}}
- "300 admission fee" → {{"amount": 300, "item": "admission fee", "category": "Education", "remarks": "Admission Fee"}}
- "500 on biryani" → {{"amount": 500, "item": "biryani", "category": "Food", "remarks": "Biryani"}}
- "gave sonu 400" → {{"amount": 400, "item": "loan", "category": "Loan", "remarks": "Loan given to Sonu", "paid_by": "Sonu"}}
- "taken loan from munchun 4000" → {{"amount": -4000, "item": "loan", "category": "Loan", "remarks": "Loan taken from Munchun", "paid_by": "Munchun"}}
- "paid munchun 3000" → {{"amount": 3000, "item": "loan repayment", "category": "Loan", "remarks": "Loan repaid to Munchun", "paid_by": "Munchun"}}
- "got salary 50000" → {{"amount": -50000, "item": "salary", "category": "Income", "remarks": "Salary received"}}

Return ONLY valid JSON:
{{
  "expenses": [
    {{"amount": 100, "item": "chiya", "category": "Food", "remarks": "Chiya", "paid_by": null}}
  ],
  "reply": "Added Rs.100 → Food (Chiya)"
}}
"#
    )
}

/// Question prompt seeded with the rich retrieval context.
pub fn retrieval_prompt(user: &str, query: &str, context: &str) -> String {
    format!(
        r#"You are a personal finance assistant analyzing expense data.

USER: {user}
QUERY: "{query}"

EXPENSE DATA:
{context}

INSTRUCTIONS:
1. Answer the question using ONLY the data above.
2. Be conversational and start with "Hi {user}!"
3. Use exact numbers from the data.
4. When several categories are asked about (e.g. "food and grocery"), combine their totals.
5. For loan questions use only the "Loan Details by Person" section. Names there may be spelled slightly differently for the same person.
6. "Money left", "remaining" or "available" means the Net Balance, not loans.
7. If data is missing, say so politely.
8. Format currency as Rs.X.
9. Be concise.

Provide a helpful response:"#
    )
}

/// Simpler question prompt, used when the retrieval model is unavailable.
pub fn direct_prompt(user: &str, query: &str, summary: &str) -> String {
    format!(
        r#"You are a personal finance assistant. Answer the user's question based on their financial data.

User: {user}
Query: "{query}"

FINANCIAL DATA:

{summary}

INSTRUCTIONS:
1. Answer naturally and conversationally.
2. Use the exact numbers from the data.
3. When several categories are asked about, combine their totals.
4. Start the response with "Hi {user}!"
5. If data is missing, say so politely.

Provide a helpful, accurate response:"#
    )
}
