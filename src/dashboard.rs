//! Dashboard data: the user's registered processes.

use crate::error::NavixError;
use crate::gateway::{Identity, Records};
use crate::models::Process;

pub async fn processes<G: Identity + Records>(gateway: &G) -> Result<Vec<Process>, NavixError> {
    let user = gateway
        .current_user()
        .await?
        .ok_or(NavixError::AuthRequired)?;
    gateway.list_processes(user.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MockGateway, Records as _};
    use crate::models::{NewProcess, OperationKind};
    use uuid::Uuid;

    #[tokio::test]
    async fn lists_only_the_sessions_user() {
        let user_id = Uuid::new_v4();
        let gateway = MockGateway::signed_in(user_id);
        for owner in [user_id, Uuid::new_v4()] {
            gateway
                .insert_process(&NewProcess {
                    user_id: owner,
                    kind: OperationKind::Import,
                    code: "IMP-1".into(),
                    product: "Steel".into(),
                    origin: "DE".into(),
                    destination: "BR".into(),
                    status: "Em análise".into(),
                    progress: 10,
                })
                .await
                .unwrap();
        }

        let rows = processes(&gateway).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, user_id);
    }

    #[tokio::test]
    async fn requires_session() {
        let gateway = MockGateway::new();
        assert!(matches!(
            processes(&gateway).await,
            Err(NavixError::AuthRequired)
        ));
    }
}
