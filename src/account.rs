//! Account: sign-in/sign-out and the profile view.

use crate::error::NavixError;
use crate::gateway::{AuthUser, Identity, Records};
use crate::models::UserProfile;

/// Establish a session with email + password.
pub async fn sign_in<G: Identity>(
    gateway: &G,
    email: &str,
    password: &str,
) -> Result<AuthUser, NavixError> {
    gateway.sign_in(email, password).await
}

/// Drop the active session.
pub async fn sign_out<G: Identity>(gateway: &G) -> Result<(), NavixError> {
    gateway.sign_out().await
}

/// The signed-in user's profile row.
pub async fn profile<G: Identity + Records>(gateway: &G) -> Result<UserProfile, NavixError> {
    let user = gateway
        .current_user()
        .await?
        .ok_or(NavixError::AuthRequired)?;
    gateway.get_profile(user.id).await
}
