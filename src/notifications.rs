//! Activity feed: the user's notifications, newest first.

use crate::error::NavixError;
use crate::gateway::{Identity, Records};
use crate::models::NotificationRecord;

pub async fn recent<G: Identity + Records>(
    gateway: &G,
) -> Result<Vec<NotificationRecord>, NavixError> {
    let user = gateway
        .current_user()
        .await?
        .ok_or(NavixError::AuthRequired)?;
    gateway.list_notifications(user.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MockGateway, Records as _};
    use crate::models::{NewNotification, NotificationKind};
    use uuid::Uuid;

    #[tokio::test]
    async fn lists_the_users_notifications() {
        let user_id = Uuid::new_v4();
        let gateway = MockGateway::signed_in(user_id);
        gateway
            .insert_notification(&NewNotification {
                user_id,
                title: "Novo Processo Criado".into(),
                message: "O processo EXP-12 de Coffee foi iniciado com sucesso.".into(),
                kind: NotificationKind::Success,
            })
            .await
            .unwrap();

        let rows = recent(&gateway).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, NotificationKind::Success);
    }

    #[tokio::test]
    async fn requires_session() {
        let gateway = MockGateway::new();
        assert!(matches!(
            recent(&gateway).await,
            Err(NavixError::AuthRequired)
        ));
    }
}
