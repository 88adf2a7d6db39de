//! Prompt templates for summarization and clause verification.

use shared_types::Clause;

/// Structured-summary prompt: one JSON object with `summary`,
/// `Timelines`, and `Clauses`, capped at eight clauses.
pub fn summarization_prompt(text: &str, language: &str) -> String {
    format!(
        r#"You are an advanced text analysis system. Your task is to carefully read and process the following text, then produce a comprehensive, structured output in JSON format.

Your responsibilities:
1. **Summarization**: Create a detailed and cohesive summary that preserves all key facts, events, and context.
   - The summary must not be overly brief.
   - Avoid redundancy and filler.
   - Ensure clarity, flow, and readability in {language}.

2. **Timelines**: Extract chronological events and represent them as structured timeline entries.
   - Each timeline entry must include a start, an end (if applicable), and a description.
   - If exact dates are unavailable, use approximate references (e.g., "early 2000s").
   - Maintain chronological order.
   - If no timelines are present, return an empty object {{}}.

3. **Clauses**: Identify distinct clauses, rules, or provisions in the text.
   - Each clause should have a unique "clause_id" in the format "C-1", "C-2", etc.
   - Provide the extracted clause text in English under "text_en".
   - Ensure clauses are semantically meaningful and not just random sentence splits.
   - If no clauses exist, return an empty list [].

---

### Input Text:
{text}

---

### Output JSON Schema (strictly follow this structure):
{{
    "summary": "A detailed summary of the text, covering all major points, facts, and context.",
    "Timelines": {{
        "timeline1": {{
            "start": "Exact or approximate start date",
            "end": "Exact or approximate end date or null",
            "description": "Explanation of events in this period"
        }}
    }},
    "Clauses": [
        {{
            "clause_id": "C-1",
            "text_en": "..."
        }}
    ]
}}

---

### Guidelines:
- Follow the JSON schema strictly.
- Do not wrap the output in markdown; return raw JSON.
- Always provide a "summary" field.
- Ensure the JSON is valid and parsable (no trailing commas, properly quoted strings).
- If timelines or clauses are missing, return "Timelines": {{}} or "Clauses": [] respectively.
- Limit "Clauses" to at most 8 entries, numbered sequentially.
- Do not add extra keys or fields outside the specified schema."#
    )
}

/// Verification prompt for a single clause: compliance verdict plus
/// the candidate rules the model weighed.
pub fn verification_prompt(clause: &Clause) -> String {
    format!(
        r#"You are a compliance verification assistant. Compare the given clause against the regulatory rules you know to be relevant.

You must:
- Identify candidate rules and analyze each carefully
- Decide which (if any) rules actually apply
- State whether the clause is compliant
- Explain your reasoning clearly

Return JSON in this format:
{{
  "clause": "...",
  "is_compliant": true,
  "matched_rules": [
    {{
      "rule": "...",
      "is_relevant": true,
      "reason": "..."
    }}
  ],
  "final_reason": "Summary reasoning whether compliant or not",
  "Section": "Wealth/Banking/Insurance/Compliance"
}}

Clause:
{clause_text}

Check compliance. For each rule, mark whether it is relevant and why. Then decide overall if the clause is compliant. Return raw JSON only, no markdown."#,
        clause_text = clause.text_en,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prompt_embeds_text_and_language() {
        let prompt = summarization_prompt("The quick brown fox.", "French");
        assert!(prompt.contains("The quick brown fox."));
        assert!(prompt.contains("readability in French"));
        assert!(prompt.contains("\"clause_id\": \"C-1\""));
    }

    #[test]
    fn verification_prompt_embeds_the_clause() {
        let clause = Clause {
            id: "C-3".into(),
            text_en: "Fees may change without notice.".into(),
            text_original: None,
        };
        let prompt = verification_prompt(&clause);
        assert!(prompt.contains("Fees may change without notice."));
        assert!(prompt.contains("is_compliant"));
    }
}
