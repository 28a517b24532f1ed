use async_trait::async_trait;

use super::domain::{NewAccount, Role, RoleProfile, UserAccount};
use super::errors::AuthError;
use crate::image::domain::ImageRef;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthError>;
    async fn find_account(&self, codigo_usuario: i32) -> Result<Option<UserAccount>, AuthError>;
    /// Create the account, its role profile and optional location atomically.
    async fn create_account(&self, account: NewAccount) -> Result<UserAccount, AuthError>;

    async fn store_token(&self, codigo_usuario: i32, token: &str) -> Result<(), AuthError>;
    async fn update_password(&self, codigo_usuario: i32, password_hash: String, password_algorithm: &str) -> Result<(), AuthError>;

    async fn role_description(&self, codigo_rol: i32) -> Result<Option<String>, AuthError>;
    async fn role_profile(&self, codigo_usuario: i32, role: Role) -> Result<Option<RoleProfile>, AuthError>;
    async fn user_image(&self, codigo_usuario: i32) -> Result<Option<ImageRef>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use crate::auth::domain::{NewProfile, PersonName};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        accounts: Mutex<HashMap<i32, UserAccount>>,
        profiles: Mutex<HashMap<i32, RoleProfile>>,
        tokens: Mutex<HashMap<i32, String>>,
        images: Mutex<HashMap<i32, ImageRef>>,
    }

    impl MockAuthRepository {
        /// Seed an account directly, bypassing registration rules.
        pub fn insert_account(
            &self,
            email: &str,
            password_hash: String,
            password_algorithm: &str,
            codigo_rol: i32,
            profile: Option<RoleProfile>,
        ) -> UserAccount {
            let mut accounts = self.accounts.lock().unwrap();
            let account = UserAccount {
                codigo_usuario: accounts.len() as i32 + 1,
                email: email.to_string(),
                password_hash,
                password_algorithm: password_algorithm.to_string(),
                codigo_rol,
            };
            accounts.insert(account.codigo_usuario, account.clone());
            if let Some(profile) = profile {
                self.profiles.lock().unwrap().insert(account.codigo_usuario, profile);
            }
            account
        }

        pub fn set_image(&self, codigo_usuario: i32, image: ImageRef) {
            self.images.lock().unwrap().insert(codigo_usuario, image);
        }

        pub fn token_of(&self, codigo_usuario: i32) -> Option<String> {
            self.tokens.lock().unwrap().get(&codigo_usuario).cloned()
        }

        pub fn account(&self, codigo_usuario: i32) -> Option<UserAccount> {
            self.accounts.lock().unwrap().get(&codigo_usuario).cloned()
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_account_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.values().find(|a| a.email == email.trim()).cloned())
        }

        async fn find_account(&self, codigo_usuario: i32) -> Result<Option<UserAccount>, AuthError> {
            Ok(self.account(codigo_usuario))
        }

        async fn create_account(&self, account: NewAccount) -> Result<UserAccount, AuthError> {
            if self.accounts.lock().unwrap().values().any(|a| a.email == account.email) {
                return Err(AuthError::Conflict("El email ya se encuentra registrado".into()));
            }
            let person = account.perfil.person();
            let name = PersonName { nombre: person.nombre.to_string(), apellido: person.apellido.to_string() };
            let profile = match account.perfil {
                NewProfile::Paseador(_) => RoleProfile::Paseador(name),
                NewProfile::Tutor(_) => RoleProfile::Tutor(name),
            };
            Ok(self.insert_account(
                &account.email,
                account.password_hash,
                &account.password_algorithm,
                account.perfil.role().code(),
                Some(profile),
            ))
        }

        async fn store_token(&self, codigo_usuario: i32, token: &str) -> Result<(), AuthError> {
            self.tokens.lock().unwrap().insert(codigo_usuario, token.to_string());
            Ok(())
        }

        async fn update_password(&self, codigo_usuario: i32, password_hash: String, password_algorithm: &str) -> Result<(), AuthError> {
            let mut accounts = self.accounts.lock().unwrap();
            let account = accounts
                .get_mut(&codigo_usuario)
                .ok_or_else(|| AuthError::NotFound("Usuario no encontrado".into()))?;
            account.password_hash = password_hash;
            account.password_algorithm = password_algorithm.to_string();
            Ok(())
        }

        async fn role_description(&self, codigo_rol: i32) -> Result<Option<String>, AuthError> {
            Ok(Role::from_code(codigo_rol).map(|r| format!("{r:?}")))
        }

        async fn role_profile(&self, codigo_usuario: i32, role: Role) -> Result<Option<RoleProfile>, AuthError> {
            let profiles = self.profiles.lock().unwrap();
            Ok(profiles.get(&codigo_usuario).filter(|p| match (p, role) {
                (RoleProfile::Administrador(_), Role::Administrador)
                | (RoleProfile::Paseador(_), Role::Paseador)
                | (RoleProfile::Tutor(_), Role::Tutor) => true,
                _ => false,
            }).cloned())
        }

        async fn user_image(&self, codigo_usuario: i32) -> Result<Option<ImageRef>, AuthError> {
            Ok(self.images.lock().unwrap().get(&codigo_usuario).cloned())
        }
    }
}
