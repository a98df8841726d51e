//! Prompt templates.
//!
//! Templates are fixed text; only the reference date, the user's query and
//! the transaction fields are substituted in.

use chrono::NaiveDate;

use crate::model::DEFAULT_CATEGORIES;

pub const FILTER_PREAMBLE: &str = "\
You interpret natural-language questions about a person's financial transactions.
Your only job is to extract filter criteria from the question. Do NOT filter,
list, or invent transactions yourself.

Reply with a single JSON object and nothing else. Recognized fields:
- textSearch (string): keywords to look for in transaction titles and notes.
- category (string): one specific category, for example \"Food\" or \"Transport\".
- minAmount (number): smallest transaction amount to include.
- maxAmount (number): largest transaction amount to include.
- startDate (string, YYYY-MM-DD): first day to include.
- endDate (string, YYYY-MM-DD): last day to include.

Expenses are stored as negative amounts and income as positive amounts.
Turn relative expressions such as \"last month\" or \"yesterday\" into concrete
YYYY-MM-DD dates using the current date you are given.
Leave out every field the question does not mention or imply. If nothing
applies, reply with {}.";

/// User turn for filter extraction.
pub fn filter_prompt(query: &str, today: NaiveDate) -> String {
    format!(
        "The current date is {}.\n\nUser query: \"{}\"\n\nExtracted filters as a JSON object:",
        today.format("%Y-%m-%d"),
        query
    )
}

/// System turn for category suggestions, listing the default vocabulary.
pub fn suggest_preamble() -> String {
    format!(
        "\
You are a financial assistant that suggests categories for a transaction based on
its title and notes.

Common categories: {}.

Suggest at least 3 relevant categories, ordered from most to least relevant.
Reply with a JSON array of strings and nothing else.",
        DEFAULT_CATEGORIES.join(", ")
    )
}

/// User turn for category suggestions.
pub fn suggest_prompt(title: &str, notes: Option<&str>) -> String {
    let mut prompt = format!("Transaction title: {title}\n");
    if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
        prompt.push_str(&format!("Notes: {notes}\n"));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_prompt_embeds_date_and_verbatim_query() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 2).unwrap();
        let prompt = filter_prompt("dining out last month", today);
        assert!(prompt.contains("2024-08-02"));
        assert!(prompt.contains("\"dining out last month\""));
    }

    #[test]
    fn filter_preamble_names_every_field() {
        for field in crate::model::filter::FILTER_FIELDS {
            assert!(FILTER_PREAMBLE.contains(field), "missing {field}");
        }
    }

    #[test]
    fn suggest_prompt_skips_blank_notes() {
        assert_eq!(suggest_prompt("Netflix", Some("  ")), "Transaction title: Netflix\n");
        assert!(suggest_prompt("Netflix", Some("Monthly plan")).contains("Notes: Monthly plan"));
        assert!(suggest_preamble().contains("Dining Out"));
    }
}
