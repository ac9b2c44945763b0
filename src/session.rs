use crate::error::AuthError;
use crate::models::{AuthResponse, Role, User};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

/// Email and password as typed on the login form
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    fn validate(&self) -> Result<(), AuthError> {
        if self.email.trim().is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if self.password.expose_secret().is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        Ok(())
    }
}

/// Who is acting. Every call that needs identity takes a `&Session`.
pub struct Session {
    user: User,
    token: SecretString,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: SecretString::from(token.into()),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Session::new(response.user, response.token)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user.email)
            .field("role", &self.user.role)
            .finish_non_exhaustive()
    }
}

/// Something that can exchange credentials for a token
#[allow(async_fn_in_trait)]
pub trait Authenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError>;
}

pub async fn login<A: Authenticator>(
    auth: &A,
    credentials: &Credentials,
) -> Result<Session, AuthError> {
    credentials.validate()?;
    let response = auth.authenticate(credentials).await?;
    info!("Logged in as {} ({})", response.user.email, response.user.role);
    Ok(Session::from(response))
}

/// Ends the session; the token is dropped with it
pub fn logout(session: Session) {
    info!("Logged out {}", session.user.email);
}
