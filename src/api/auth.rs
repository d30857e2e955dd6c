use tracing::{debug, info, instrument};

use super::{TripmateClient, endpoint};
use crate::error::TripmateError;
use crate::forms::{FORM_FIELD, FormErrors};
use crate::http::ApiRequest;
use crate::models::{AuthResponse, Credentials, RefreshRequest, Registration, User};

impl TripmateClient {
    /// Sign in and store the session
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<User, TripmateError> {
        let request = ApiRequest::post(endpoint("auth/login/")).json(credentials)?;
        let response = self.http.send_anonymous(request).await?;
        if response.is_unauthorized() {
            let mut errors = FormErrors::default();
            errors.add(FORM_FIELD, "Invalid email or password");
            return Err(TripmateError::Rejected { errors });
        }
        let auth: AuthResponse = response.into_json()?;
        self.session().store_auth(&auth).await?;
        Ok(auth.user)
    }

    /// Create an account; the backend signs the new user in
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<User, TripmateError> {
        let request = ApiRequest::post(endpoint("auth/register/")).json(registration)?;
        let auth: AuthResponse = self.public(request).await?;
        self.session().store_auth(&auth).await?;
        Ok(auth.user)
    }

    /// Revoke the refresh token if possible; the local session is always cleared
    pub async fn logout(&self) -> Result<(), TripmateError> {
        if let Some(refresh) = self.session().refresh_token().await? {
            let request = ApiRequest::post(endpoint("auth/logout/")).json(&RefreshRequest { refresh })?;
            match self.http.send(request).await {
                Ok(response) if !response.is_success() => {
                    debug!("Logout returned status {}", response.status);
                }
                Ok(_) => {}
                Err(e) => debug!("Logout request failed: {}", e),
            }
        }
        self.session().clear().await?;
        info!("Signed out");
        Ok(())
    }

    /// Fetch the signed-in user and refresh the cached copy
    pub async fn current_user(&self) -> Result<User, TripmateError> {
        let user: User = self.authed(ApiRequest::get(endpoint("auth/me/"))).await?;
        self.session().store_user(&user).await?;
        Ok(user)
    }

    /// User cached at login, without a network call
    pub async fn cached_user(&self) -> Result<Option<User>, TripmateError> {
        self.session().user().await
    }
}
