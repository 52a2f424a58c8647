use tracing::{info, warn};

use super::{Navigation, Outcome, Route};
use crate::client::{ApiError, HrClient};

/// Signs in and follows the backend's redirect to the role's dashboard.
/// The session cookie from the redirect is persisted by the client.
pub async fn login(client: &HrClient, email: &str, password: &str) -> Outcome<()> {
    match client.login(email.trim(), password).await {
        Ok(redirect) => {
            if !redirect.session_stored {
                warn!("login redirect carried no session cookie");
            }
            let route = Route::from_location(&redirect.location);
            info!(location = %redirect.location, "signed in");
            Outcome::Navigate(Navigation::to(route))
        }
        Err(ApiError::Unauthorized) => Outcome::Failed("Invalid email or password".to_string()),
        Err(ApiError::Transport(err)) => {
            warn!(error = %err, "login request failed");
            Outcome::Failed("Network error. Please try again.".to_string())
        }
        Err(err) => {
            warn!(error = %err, "login rejected");
            Outcome::Failed("Login failed. Please try again.".to_string())
        }
    }
}

/// Forgets the stored session and returns to the login page.
pub fn logout(client: &HrClient) -> Result<Outcome<()>, ApiError> {
    client.logout()?;
    info!("signed out");
    Ok(Outcome::Navigate(Navigation::login()))
}
