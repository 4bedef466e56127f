//! Payment context: what is being paid, where, and how often.

use serde::{Deserialize, Serialize};

/// An amount in the currency's minor unit (cents for EUR).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountOfMoney {
    pub amount: i64,
    pub currency_code: String,
}

impl AmountOfMoney {
    pub fn new(amount: i64, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }
}

/// Determines which payment products are offered and how they are configured.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentContext {
    pub amount_of_money: AmountOfMoney,
    pub country_code: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl PaymentContext {
    /// Create a one-off payment context.
    pub fn new(amount: i64, currency_code: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            amount_of_money: AmountOfMoney::new(amount, currency_code),
            country_code: country_code.into(),
            is_recurring: false,
            locale: None,
        }
    }

    /// Mark the payment as recurring.
    pub fn with_recurring(mut self, recurring: bool) -> Self {
        self.is_recurring = recurring;
        self
    }

    /// Set the locale used for labels (e.g. `nl_NL`).
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Query parameters for product lookups.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("countryCode", self.country_code.clone()),
            ("currencyCode", self.amount_of_money.currency_code.clone()),
            ("amount", self.amount_of_money.amount.to_string()),
            ("isRecurring", self.is_recurring.to_string()),
        ];
        if let Some(locale) = &self.locale {
            params.push(("locale", locale.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let ctx = PaymentContext::new(1298, "EUR", "NL")
            .with_recurring(true)
            .with_locale("nl_NL");
        let params = ctx.query_params();
        assert_eq!(params[0], ("countryCode", "NL".to_string()));
        assert_eq!(params[2], ("amount", "1298".to_string()));
        assert_eq!(params[3], ("isRecurring", "true".to_string()));
        assert_eq!(params.last().unwrap().1, "nl_NL");
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(PaymentContext::new(500, "USD", "US")).unwrap();
        assert_eq!(json["amountOfMoney"]["currencyCode"], "USD");
        assert_eq!(json["isRecurring"], false);
        assert!(json.get("locale").is_none());
    }
}
