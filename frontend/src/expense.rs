use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identity of an expense.
///
/// Opaque to the client: it is only compared and echoed back in URLs. The
/// server may send it as a JSON number or string; both decode to the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for ExpenseId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ExpenseId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ExpenseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Integer(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Integer(id) => Self::from(id),
            Raw::Text(id) => Self(id),
        })
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    #[default]
    Pix,
    Cartao,
    Dinheiro,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::Pix, Self::Cartao, Self::Dinheiro];

    /// The tag used on the wire and as the `<option>` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pix => "PIX",
            Self::Cartao => "CARTAO",
            Self::Dinheiro => "DINHEIRO",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pix => "PIX",
            Self::Cartao => "Cartão",
            Self::Dinheiro => "Dinheiro",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Pix => "📱",
            Self::Cartao => "💳",
            Self::Dinheiro => "💵",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Pix => "bg-blue-100 text-blue-800",
            Self::Cartao => "bg-purple-100 text-purple-800",
            Self::Dinheiro => "bg-green-100 text-green-800",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment method `{0}`")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| UnknownPaymentMethod(s.to_string()))
    }
}

/// An expense as confirmed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "formaPagamento")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "data")]
    pub date: NaiveDate,
}

/// Body of the create and update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensePayload {
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "formaPagamento")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "data")]
    pub date: NaiveDate,
}

/// `1234567` becomes `1.234.567`.
fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let lead = match digits.len() % 3 {
        0 => 3,
        n => n,
    };

    let mut groups = vec![&digits[..lead]];
    groups.extend((lead..digits.len()).step_by(3).map(|at| &digits[at..at + 3]));
    groups.join(".")
}

/// Formats an amount as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_brl(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}R$ {},{:02}",
        sign,
        group_thousands(cents / 100),
        cents % 100
    )
}

pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 despesa".to_string()
    } else {
        format!("{} despesas", count)
    }
}
