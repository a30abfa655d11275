//! Requester account operations.

use serde::{Deserialize, Serialize};

use crate::clients::{MturkClient, MturkError, OperationCall, OperationError, XmlNode};
use crate::operations::Operation;

/// An amount of money as the provider reports it.
///
/// Values are kept verbatim; the provider formats `formatted_price` for the
/// currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// The amount, e.g. `"10000.000"`.
    pub amount: String,
    /// An ISO 4217 currency code.
    pub currency_code: String,
    /// The amount formatted for display, e.g. `"$10,000.00"`.
    pub formatted_price: String,
}

impl Price {
    /// Reads a price from a node with `Amount`, `CurrencyCode` and
    /// `FormattedPrice` children.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::MissingField`] if `Amount` or `CurrencyCode`
    /// is absent. A missing `FormattedPrice` reads as empty.
    pub fn from_xml(node: &XmlNode) -> Result<Self, OperationError> {
        let required = |field: &str| {
            node.child_text(field)
                .map(str::to_string)
                .ok_or_else(|| OperationError::MissingField {
                    field: field.to_string(),
                })
        };
        Ok(Self {
            amount: required("Amount")?,
            currency_code: required("CurrencyCode")?,
            formatted_price: node.child_text("FormattedPrice").unwrap_or_default().to_string(),
        })
    }
}

/// The requester account the client's credentials belong to.
#[derive(Clone, Copy, Debug, Default)]
pub struct Account;

impl Account {
    /// Returns the available balance.
    ///
    /// # Errors
    ///
    /// Returns [`MturkError`] if the call fails at either tier, and
    /// [`OperationError::MissingField`] if the result has no
    /// `AvailableBalance`.
    pub async fn balance(client: &MturkClient) -> Result<Price, MturkError> {
        let operation = Operation::GetAccountBalance;
        let call = OperationCall::builder(operation.name()).build()?;
        let envelope = client.execute(&call).await?;
        let result = envelope
            .retrieve_result(&operation.result_name())?
            .into_payload()
            .ok_or_else(missing_balance)?;
        let balance = result.child("AvailableBalance").ok_or_else(missing_balance)?;
        Ok(Price::from_xml(balance)?)
    }
}

fn missing_balance() -> OperationError {
    OperationError::MissingField {
        field: "AvailableBalance".to_string(),
    }
}
