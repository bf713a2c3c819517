// ============================================================================
// Formulaires : Login et Register
// ============================================================================
// État des formulaires + soumission au serveur
//
// Flux :
// 1. handle_change(name, value) : met à jour un champ par son nom
// 2. submit() : trim de tous les champs, POST JSON, puis
//    - HTTP 200 : User créé, stocké en session, retourné
//    - sinon (500, réseau, JSON invalide) : error = true
//
// CONCEPTS RUST :
// 1. &mut self : submit modifie l'état d'erreur du formulaire
// 2. match sur &str : dispatch des champs par nom
// 3. Pas de retry : une erreur est remontée telle quelle
// ============================================================================

use tracing::{info, instrument, warn};

use super::{ApiClient, ClientError, Session};
use crate::models::{LoginRequest, RegisterRequest, User};

/// Formulaire de connexion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,

    /// État d'erreur générique (le client affiche un message unique)
    pub error: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Met à jour un champ par son nom ("username" ou "password")
    pub fn handle_change(&mut self, name: &str, value: &str) -> Result<(), ClientError> {
        let field = match name {
            "username" => &mut self.username,
            "password" => &mut self.password,
            other => return Err(ClientError::UnknownField(other.to_string())),
        };
        *field = value.to_string();
        Ok(())
    }

    /// Payload envoyé au serveur, champs trimés
    pub fn request(&self) -> LoginRequest {
        LoginRequest {
            username: self.username.trim().to_string(),
            password: self.password.trim().to_string(),
        }
    }

    /// Soumet le formulaire et ouvre la session en cas de succès
    #[instrument(skip_all)]
    pub async fn submit(&mut self, api: &ApiClient, session: &Session) -> Result<User, ClientError> {
        let request = self.request();

        match api.login(&request).await {
            Ok(response) => {
                let user = User::from(response);
                info!(user_id = user.id, "Login succeeded");

                session.set_user(user.clone());
                self.error = false;
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.error = true;
                Err(e)
            }
        }
    }
}

/// Formulaire d'inscription
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub error: bool,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Met à jour un champ par son nom
    pub fn handle_change(&mut self, name: &str, value: &str) -> Result<(), ClientError> {
        let field = match name {
            "username" => &mut self.username,
            "password" => &mut self.password,
            "firstname" => &mut self.firstname,
            "lastname" => &mut self.lastname,
            other => return Err(ClientError::UnknownField(other.to_string())),
        };
        *field = value.to_string();
        Ok(())
    }

    pub fn request(&self) -> RegisterRequest {
        RegisterRequest {
            username: self.username.trim().to_string(),
            password: self.password.trim().to_string(),
            firstname: self.firstname.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
        }
    }

    /// Soumet le formulaire
    ///
    /// Le serveur ne renvoie que l'id : le reste du User vient du formulaire,
    /// et un nouveau compte n'a aucune position.
    #[instrument(skip_all)]
    pub async fn submit(&mut self, api: &ApiClient, session: &Session) -> Result<User, ClientError> {
        let request = self.request();

        match api.register(&request).await {
            Ok(response) => {
                let user = User::authenticated(
                    response.id,
                    request.username,
                    request.firstname,
                    request.lastname,
                    Vec::new(),
                );
                info!(user_id = user.id, "Registration succeeded");

                session.set_user(user.clone());
                self.error = false;
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                self.error = true;
                Err(e)
            }
        }
    }
}

// ============================================================================
// Tests : vrai serveur local (faux Alpha Vantage derrière)
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_app;
    use reqwest::StatusCode;

    fn filled_register(username: &str) -> RegisterForm {
        let mut form = RegisterForm::new();
        form.handle_change("username", username).unwrap();
        form.handle_change("password", "  s3cret ").unwrap();
        form.handle_change("firstname", " Ada").unwrap();
        form.handle_change("lastname", "Lovelace\n").unwrap();
        form
    }

    #[test]
    fn test_handle_change_rejects_unknown_field() {
        let mut form = LoginForm::new();
        assert!(matches!(
            form.handle_change("email", "x"),
            Err(ClientError::UnknownField(ref f)) if f == "email"
        ));
        assert_eq!(form, LoginForm::new());
    }

    #[test]
    fn test_request_is_trimmed() {
        let mut form = LoginForm::new();
        form.handle_change("username", "  ada\t").unwrap();
        form.handle_change("password", " pw ").unwrap();

        assert_eq!(
            form.request(),
            LoginRequest {
                username: "ada".to_string(),
                password: "pw".to_string()
            }
        );
        // Le formulaire lui-même garde la saisie brute
        assert_eq!(form.username, "  ada\t");
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (base, _) = spawn_app().await;
        let api = ApiClient::new(&base).unwrap();
        let session = Session::new();

        let mut register = filled_register(" ada ");
        let user = register.submit(&api, &session).await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.username, "ada");
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
        assert!(user.authenticated);
        assert!(user.holdings.is_empty());
        assert!(!register.error);
        assert_eq!(session.user(), Some(user));

        session.logout();

        let mut login = LoginForm::new();
        login.handle_change("username", "ada ").unwrap();
        login.handle_change("password", "s3cret").unwrap();
        let user = login.submit(&api, &session).await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.display_name(), "Ada Lovelace");
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_500_sets_error_state() {
        let (base, _) = spawn_app().await;
        let api = ApiClient::new(&base).unwrap();
        let session = Session::new();

        let mut login = LoginForm::new();
        login.handle_change("username", "ghost").unwrap();
        login.handle_change("password", "pw").unwrap();

        let err = login.submit(&api, &session).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Rejected { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert!(login.error);
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_register_sets_error_state() {
        let (base, _) = spawn_app().await;
        let api = ApiClient::new(&base).unwrap();
        let session = Session::new();

        filled_register("ada").submit(&api, &session).await.unwrap();
        session.logout();

        let mut again = filled_register("ada");
        assert!(again.submit(&api, &session).await.is_err());
        assert!(again.error);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_unreachable_server_sets_error_state() {
        // Port 1 : rien n'écoute, connexion refusée
        let api = ApiClient::new("http://127.0.0.1:1").unwrap();
        let session = Session::new();

        let mut login = LoginForm::new();
        login.handle_change("username", "ada").unwrap();
        login.handle_change("password", "pw").unwrap();

        let err = login.submit(&api, &session).await.unwrap_err();
        assert!(matches!(err, ClientError::Request(_)));
        assert!(login.error);
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_success_clears_previous_error() {
        let (base, _) = spawn_app().await;
        let api = ApiClient::new(&base).unwrap();
        let session = Session::new();
        filled_register("ada").submit(&api, &session).await.unwrap();

        let mut login = LoginForm::new();
        login.handle_change("username", "ada").unwrap();
        login.handle_change("password", "wrong").unwrap();
        assert!(login.submit(&api, &session).await.is_err());
        assert!(login.error);

        login.handle_change("password", "s3cret").unwrap();
        login.submit(&api, &session).await.unwrap();
        assert!(!login.error);
    }
}
