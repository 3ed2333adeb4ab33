use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SmsParseError;
use crate::types::TransactionType;

/// Category ids shared with the app's category registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Salary,
    Business,
    OtherIncome,
    Grocery,
    Food,
    Transport,
    Health,
    OtherExpense,
}

struct Rule {
    needles: &'static [&'static str],
    category: Category,
}

/// Expense rules, first match wins.
const EXPENSE_RULES: &[Rule] = &[
    Rule { needles: &["upi", "payment"], category: Category::OtherExpense },
    Rule { needles: &["atm", "cash"], category: Category::OtherExpense },
    Rule { needles: &["grocery", "mart"], category: Category::Grocery },
    Rule { needles: &["food", "restaurant"], category: Category::Food },
    Rule { needles: &["fuel", "petrol"], category: Category::Transport },
    Rule { needles: &["medicine", "hospital"], category: Category::Health },
];

const INCOME_RULES: &[Rule] = &[
    Rule { needles: &["salary"], category: Category::Salary },
    Rule { needles: &["business"], category: Category::Business },
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Salary => "salary",
            Category::Business => "business",
            Category::OtherIncome => "other_income",
            Category::Grocery => "grocery",
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Health => "health",
            Category::OtherExpense => "other_expense",
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Category::Salary | Category::Business | Category::OtherIncome => TransactionType::Income,
            _ => TransactionType::Expense,
        }
    }

    /// Catch-all bucket for a direction.
    pub fn other(transaction_type: TransactionType) -> Self {
        match transaction_type {
            TransactionType::Income => Category::OtherIncome,
            TransactionType::Expense => Category::OtherExpense,
        }
    }

    /// Best-effort classification of a transaction description.
    pub fn classify(description: &str, transaction_type: TransactionType) -> Self {
        let desc = description.to_lowercase();
        let rules = match transaction_type {
            TransactionType::Income => INCOME_RULES,
            TransactionType::Expense => EXPENSE_RULES,
        };

        rules
            .iter()
            .find(|rule| rule.needles.iter().any(|needle| desc.contains(needle)))
            .map(|rule| rule.category)
            .unwrap_or_else(|| Category::other(transaction_type))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SmsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "salary" => Ok(Category::Salary),
            "business" => Ok(Category::Business),
            "other_income" => Ok(Category::OtherIncome),
            "grocery" => Ok(Category::Grocery),
            "food" => Ok(Category::Food),
            "transport" => Ok(Category::Transport),
            "health" => Ok(Category::Health),
            "other_expense" => Ok(Category::OtherExpense),
            other => Err(SmsParseError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Salary Credit", Category::Salary)]
    #[case("Business income", Category::Business)]
    #[case("UPI Credit Received", Category::OtherIncome)]
    #[case("Bank Credit", Category::OtherIncome)]
    fn test_classify_income(#[case] description: &str, #[case] expected: Category) {
        assert_eq!(Category::classify(description, TransactionType::Income), expected);
    }

    #[rstest]
    #[case("UPI to amolkhot751@okicici", Category::OtherExpense)]
    #[case("ATM Withdrawal", Category::OtherExpense)]
    #[case("Card Payment", Category::OtherExpense)]
    #[case("Fresh Grocery Store", Category::Grocery)]
    #[case("Super Mart", Category::Grocery)]
    #[case("Food court", Category::Food)]
    #[case("Restaurant bill", Category::Food)]
    #[case("Petrol pump", Category::Transport)]
    #[case("City Hospital", Category::Health)]
    #[case("Bank Debit", Category::OtherExpense)]
    fn test_classify_expense(#[case] description: &str, #[case] expected: Category) {
        assert_eq!(Category::classify(description, TransactionType::Expense), expected);
    }

    #[test]
    fn test_classify_first_rule_wins() {
        // "payment" is checked before "grocery"
        assert_eq!(
            Category::classify("Grocery payment", TransactionType::Expense),
            Category::OtherExpense
        );
        // "mart" before "food"
        assert_eq!(
            Category::classify("Food Mart", TransactionType::Expense),
            Category::Grocery
        );
    }

    #[test]
    fn test_income_words_do_not_leak_into_expense() {
        assert_eq!(
            Category::classify("Salary advance repayment", TransactionType::Expense),
            Category::OtherExpense
        );
    }

    #[rstest]
    #[case(Category::Salary, "salary")]
    #[case(Category::OtherIncome, "other_income")]
    #[case(Category::OtherExpense, "other_expense")]
    #[case(Category::Transport, "transport")]
    fn test_category_ids(#[case] category: Category, #[case] id: &str) {
        assert_eq!(category.as_str(), id);
        assert_eq!(category.to_string(), id);
        assert_eq!(id.parse::<Category>().unwrap(), category);

        let json = serde_json::to_string(&category).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }

    #[test]
    fn test_unknown_category() {
        let result = "shopping".parse::<Category>();
        assert!(matches!(result, Err(SmsParseError::UnknownCategory(id)) if id == "shopping"));
    }

    #[test]
    fn test_category_direction() {
        assert_eq!(Category::Business.transaction_type(), TransactionType::Income);
        assert_eq!(Category::Health.transaction_type(), TransactionType::Expense);
        assert_eq!(Category::other(TransactionType::Income), Category::OtherIncome);
    }
}
