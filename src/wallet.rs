//! Wallet: the account balance and its fixed-amount ledger operations.

use crate::error::NavixError;
use crate::gateway::{Identity, Records};
use crate::models::enums::TransactionKind;
use crate::models::NewTransaction;

/// Every wallet operation moves this fixed amount.
pub const OPERATION_AMOUNT: f64 = 1_000.0;

/// The two operations the wallet screen offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletAction {
    Deposit,
    Pay,
}

impl WalletAction {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Deposit => "Depósito via PIX",
            Self::Pay => "Pagamento de Taxa",
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::Deposit => TransactionKind::Credit,
            Self::Pay => TransactionKind::Debit,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Pay => "Tax",
        }
    }
}

/// Current balance from the profile row.
pub async fn balance<G: Identity + Records>(gateway: &G) -> Result<f64, NavixError> {
    let user = gateway
        .current_user()
        .await?
        .ok_or(NavixError::AuthRequired)?;
    Ok(gateway.get_profile(user.id).await?.balance)
}

/// Apply a wallet operation and return the new balance.
///
/// Two writes with no cross-step atomicity: the balance update lands
/// first, then the ledger entry. A ledger-insert failure after a
/// successful balance update is surfaced as the returned error with the
/// balance already moved; the same partial-write posture as the wizard
/// commit.
pub async fn apply<G: Identity + Records>(
    gateway: &G,
    action: WalletAction,
) -> Result<f64, NavixError> {
    let user = gateway
        .current_user()
        .await?
        .ok_or(NavixError::AuthRequired)?;

    let current = gateway.get_profile(user.id).await?.balance;
    let new_balance = match action {
        WalletAction::Deposit => current + OPERATION_AMOUNT,
        WalletAction::Pay => current - OPERATION_AMOUNT,
    };
    if new_balance < 0.0 {
        return Err(NavixError::InsufficientBalance);
    }

    gateway.update_balance(user.id, new_balance).await?;
    gateway
        .insert_transaction(&NewTransaction {
            user_id: user.id,
            description: action.description().to_string(),
            amount: OPERATION_AMOUNT,
            kind: action.kind(),
            category: action.category().to_string(),
        })
        .await?;

    tracing::info!(action = ?action, new_balance, "Wallet operation applied");
    Ok(new_balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;
    use crate::models::UserProfile;
    use uuid::Uuid;

    fn gateway_with_balance(user_id: Uuid, balance: f64) -> MockGateway {
        MockGateway::signed_in(user_id).with_profile(UserProfile {
            id: user_id,
            email: format!("{user_id}@example.com"),
            company_name: Some("Navix Trading Ltda".into()),
            balance,
        })
    }

    #[tokio::test]
    async fn deposit_credits_and_records() {
        let user_id = Uuid::new_v4();
        let gateway = gateway_with_balance(user_id, 500.0);

        let new_balance = apply(&gateway, WalletAction::Deposit).await.unwrap();

        assert_eq!(new_balance, 1_500.0);
        assert_eq!(gateway.profile_rows()[0].balance, 1_500.0);
        let txs = gateway.transaction_rows();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].kind, TransactionKind::Credit);
        assert_eq!(txs[0].description, "Depósito via PIX");
        assert_eq!(txs[0].category, "Deposit");
    }

    #[tokio::test]
    async fn payment_debits() {
        let user_id = Uuid::new_v4();
        let gateway = gateway_with_balance(user_id, 2_500.0);

        let new_balance = apply(&gateway, WalletAction::Pay).await.unwrap();

        assert_eq!(new_balance, 1_500.0);
        assert_eq!(gateway.transaction_rows()[0].kind, TransactionKind::Debit);
        assert_eq!(gateway.transaction_rows()[0].category, "Tax");
    }

    #[tokio::test]
    async fn payment_below_zero_is_rejected_before_any_write() {
        let user_id = Uuid::new_v4();
        let gateway = gateway_with_balance(user_id, 999.0);

        let result = apply(&gateway, WalletAction::Pay).await;

        assert!(matches!(result, Err(NavixError::InsufficientBalance)));
        assert_eq!(gateway.profile_rows()[0].balance, 999.0);
        assert!(gateway.transaction_rows().is_empty());
    }

    #[tokio::test]
    async fn ledger_failure_after_balance_update_surfaces() {
        let user_id = Uuid::new_v4();
        let gateway = gateway_with_balance(user_id, 0.0);
        gateway.fail_transaction_inserts();

        let result = apply(&gateway, WalletAction::Deposit).await;

        assert!(result.is_err());
        // The balance write already landed; the ledger entry did not.
        assert_eq!(gateway.profile_rows()[0].balance, 1_000.0);
        assert!(gateway.transaction_rows().is_empty());
    }

    #[tokio::test]
    async fn balance_requires_session() {
        let gateway = MockGateway::new();
        assert!(matches!(
            balance(&gateway).await,
            Err(NavixError::AuthRequired)
        ));
    }
}
