use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, Caller, LoginInput, NewAccount, RegisterInput, Role, UserAccount, UserProfile};
use super::errors::AuthError;
use super::password::{self, ARGON2, LEGACY_SHA256};
use super::repository::AuthRepository;
use super::token::TokenIssuer;

pub const MIN_PASSWORD_LEN: usize = 8;

fn count_login(outcome: &str) {
    common::metrics::LOGINS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Auth business service independent of web framework
pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, tokens: TokenIssuer) -> Self {
        Self { repo, tokens }
    }

    /// Register an account together with its walker or guardian profile.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthService, token::TokenIssuer, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{NewProfile, PersonInput, RegisterInput};
    /// let svc = AuthService::new(Arc::new(MockAuthRepository::default()), TokenIssuer::new("0123456789abcdef", 7));
    /// let input = RegisterInput {
    ///     email: "tutor@voltapets.cl".into(),
    ///     password: "Secreta123".into(),
    ///     perfil: NewProfile::Tutor(PersonInput {
    ///         rut: "12345678".into(), dv: "5".into(), nombre: "Ana".into(),
    ///         apellido: "Rojas".into(), telefono: "56912345678".into(),
    ///     }),
    ///     ubicacion: None,
    /// };
    /// let account = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(account.codigo_rol, 3);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<UserAccount, AuthError> {
        models::usuario::validate_email(&input.email)?;
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres"
            )));
        }
        models::paseador::validate_person(&input.perfil.person())?;
        if let Some(u) = &input.ubicacion {
            models::ubicacion::validate(&u.direccion, u.latitud, u.longitud)?;
        }
        if let Some(existing) = self.repo.find_account_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict("El email ya se encuentra registrado".into()));
        }

        let password_hash = password::hash_password(&input.password)?;
        let account = self
            .repo
            .create_account(NewAccount {
                email: input.email.trim().to_string(),
                password_hash,
                password_algorithm: ARGON2.to_string(),
                perfil: input.perfil,
                ubicacion: input.ubicacion,
            })
            .await?;
        info!(codigo_usuario = account.codigo_usuario, codigo_rol = account.codigo_rol, "user_registered");
        Ok(account)
    }

    /// Authenticate and issue a session token, which is also stored on the account.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let result = self.try_login(&input).await;
        if let Err(e) = &result {
            if matches!(e, AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_)) {
                count_login("error");
            }
        }
        result
    }

    async fn try_login(&self, input: &LoginInput) -> Result<AuthSession, AuthError> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("El email y la contraseña son obligatorios".into()));
        }
        let Some(account) = self.repo.find_account_by_email(&input.email).await? else {
            count_login("unknown_user");
            return Err(AuthError::NotFound("El Usuario no existe".into()));
        };
        if !password::verify_password(&input.password, &account.password_hash, &account.password_algorithm)? {
            count_login("bad_password");
            return Err(AuthError::Unauthorized("Contraseña incorrecta".into()));
        }
        if account.password_algorithm == LEGACY_SHA256 {
            self.upgrade_legacy_hash(&account, &input.password).await;
        }

        let token = self.tokens.issue(&account)?;
        self.repo.store_token(account.codigo_usuario, &token).await?;
        count_login("ok");
        info!(codigo_usuario = account.codigo_usuario, "user_logged_in");
        Ok(AuthSession { token, codigo_rol: account.codigo_rol })
    }

    /// Rehash a legacy digest with Argon2 after a successful login. Failure
    /// leaves the old hash in place.
    async fn upgrade_legacy_hash(&self, account: &UserAccount, password: &str) {
        let upgraded = match password::hash_password(password) {
            Ok(hash) => self.repo.update_password(account.codigo_usuario, hash, ARGON2).await,
            Err(e) => Err(e),
        };
        match upgraded {
            Ok(()) => info!(codigo_usuario = account.codigo_usuario, "password_rehashed"),
            Err(e) => warn!(codigo_usuario = account.codigo_usuario, error = %e, "password_rehash_failed"),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Caller, AuthError> {
        self.tokens.verify(token)
    }

    /// Profile of the caller, resolved through the role-specific extension.
    #[instrument(skip(self, caller), fields(codigo_usuario = caller.codigo_usuario))]
    pub async fn profile(&self, caller: &Caller) -> Result<UserProfile, AuthError> {
        let account = self
            .repo
            .find_account(caller.codigo_usuario)
            .await?
            .ok_or_else(|| AuthError::NotFound("Usuario no encontrado".into()))?;
        let not_found = || AuthError::NotFound("No se ha encontrado al usuario".into());
        let role = Role::from_code(account.codigo_rol).ok_or_else(not_found)?;
        let profile = self
            .repo
            .role_profile(account.codigo_usuario, role)
            .await?
            .ok_or_else(not_found)?;
        let rol = self
            .repo
            .role_description(account.codigo_rol)
            .await?
            .unwrap_or_else(|| format!("{role:?}"));
        let imagen = if profile.has_image() {
            self.repo.user_image(account.codigo_usuario).await?
        } else {
            None
        };
        let name = profile.name();
        Ok(UserProfile {
            id: account.codigo_usuario,
            rol,
            nombre: name.nombre.clone(),
            apellido: name.apellido.clone(),
            email: account.email,
            imagen,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::{NewProfile, PersonInput, PersonName, RoleProfile, WalkerInput};
    use crate::auth::repository::mock::MockAuthRepository;
    use crate::image::domain::ImageRef;

    const SECRET: &str = "0123456789abcdef-test";

    fn setup() -> (AuthService, Arc<MockAuthRepository>) {
        let repo = Arc::new(MockAuthRepository::default());
        (AuthService::new(repo.clone(), TokenIssuer::new(SECRET, 7)), repo)
    }

    fn tutor_input(email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            email: email.into(),
            password: password.into(),
            perfil: NewProfile::Tutor(PersonInput {
                rut: "12345678".into(),
                dv: "5".into(),
                nombre: "Ana".into(),
                apellido: "Rojas".into(),
                telefono: "56912345678".into(),
            }),
            ubicacion: None,
        }
    }

    fn login(email: &str, password: &str) -> LoginInput {
        LoginInput { email: email.into(), password: password.into() }
    }

    #[tokio::test]
    async fn register_then_login_issues_stored_token() {
        let (svc, repo) = setup();
        let account = svc.register(tutor_input("ana@voltapets.cl", "Secreta123")).await.unwrap();
        assert_eq!(account.password_algorithm, ARGON2);

        let session = svc.login(login("ana@voltapets.cl", "Secreta123")).await.unwrap();
        assert_eq!(session.codigo_rol, 3);
        assert_eq!(repo.token_of(account.codigo_usuario), Some(session.token.clone()));
        let caller = svc.verify(&session.token).unwrap();
        assert_eq!(caller.codigo_usuario, account.codigo_usuario);
        assert_eq!(caller.role, Role::Tutor);
    }

    #[tokio::test]
    async fn login_distinguishes_unknown_user_and_wrong_password() {
        let (svc, _) = setup();
        svc.register(tutor_input("ana@voltapets.cl", "Secreta123")).await.unwrap();
        let err = svc.login(login("nadie@voltapets.cl", "Secreta123")).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound(ref m) if m == "El Usuario no existe"));
        let err = svc.login(login("ana@voltapets.cl", "otra-clave")).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(ref m) if m == "Contraseña incorrecta"));
    }

    #[tokio::test]
    async fn legacy_hash_is_upgraded_on_login() {
        let (svc, repo) = setup();
        let account = repo.insert_account(
            "viejo@voltapets.cl",
            password::legacy_sha256("Secreta123"),
            LEGACY_SHA256,
            3,
            None,
        );
        svc.login(login("viejo@voltapets.cl", "Secreta123")).await.unwrap();
        let stored = repo.account(account.codigo_usuario).unwrap();
        assert_eq!(stored.password_algorithm, ARGON2);
        assert!(password::verify_password("Secreta123", &stored.password_hash, ARGON2).unwrap());
        // The upgraded hash keeps working.
        svc.login(login("viejo@voltapets.cl", "Secreta123")).await.unwrap();
    }

    #[tokio::test]
    async fn registration_rules() {
        let (svc, _) = setup();
        let err = svc.register(tutor_input("ana@voltapets.cl", "corta")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        let err = svc.register(tutor_input("no-es-email", "Secreta123")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        svc.register(tutor_input("ana@voltapets.cl", "Secreta123")).await.unwrap();
        let err = svc.register(tutor_input("ana@voltapets.cl", "Secreta123")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
        assert_eq!(err.code(), 1002);
    }

    #[tokio::test]
    async fn profile_includes_image_for_walkers_only() {
        let (svc, repo) = setup();
        let walker = svc
            .register(RegisterInput {
                email: "paseo@voltapets.cl".into(),
                password: "Secreta123".into(),
                perfil: NewProfile::Paseador(WalkerInput {
                    rut: "11111111".into(),
                    dv: "1".into(),
                    nombre: "Pedro".into(),
                    apellido: "Soto".into(),
                    telefono: "56911111111".into(),
                    descripcion: None,
                }),
                ubicacion: None,
            })
            .await
            .unwrap();
        let img = ImageRef { url: "https://img/p.png".into(), path: "p.png".into(), public_id: "volta/p".into() };
        repo.set_image(walker.codigo_usuario, img.clone());
        let caller = Caller { codigo_usuario: walker.codigo_usuario, email: walker.email.clone(), role: Role::Paseador };
        let profile = svc.profile(&caller).await.unwrap();
        assert_eq!(profile.rol, "Paseador");
        assert_eq!(profile.nombre, "Pedro");
        assert_eq!(profile.imagen, Some(img.clone()));

        let admin = repo.insert_account(
            "admin@voltapets.cl",
            String::new(),
            ARGON2,
            1,
            Some(RoleProfile::Administrador(PersonName { nombre: "Root".into(), apellido: "Admin".into() })),
        );
        repo.set_image(admin.codigo_usuario, img);
        let caller = Caller { codigo_usuario: admin.codigo_usuario, email: admin.email, role: Role::Administrador };
        let profile = svc.profile(&caller).await.unwrap();
        assert_eq!(profile.rol, "Administrador");
        assert_eq!(profile.imagen, None);
    }

    #[tokio::test]
    async fn account_without_role_profile_is_not_found() {
        let (svc, repo) = setup();
        let account = repo.insert_account("sola@voltapets.cl", String::new(), ARGON2, 3, None);
        let caller = Caller { codigo_usuario: account.codigo_usuario, email: account.email, role: Role::Tutor };
        let err = svc.profile(&caller).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound(ref m) if m == "No se ha encontrado al usuario"));
    }

    #[test]
    fn tutor_policy_rejects_other_roles() {
        let caller = Caller { codigo_usuario: 1, email: "p@voltapets.cl".into(), role: Role::Paseador };
        assert!(matches!(caller.require(Role::Tutor), Err(AuthError::Forbidden(_))));
        assert!(caller.require(Role::Paseador).is_ok());
    }
}
