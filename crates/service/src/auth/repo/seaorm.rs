use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};

use crate::auth::domain::{NewAccount, NewProfile, PersonName, Role, RoleProfile, UserAccount};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::image::domain::ImageRef;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn account_from(u: models::usuario::Model) -> UserAccount {
    UserAccount {
        codigo_usuario: u.codigo_usuario,
        email: u.email,
        password_hash: u.password,
        password_algorithm: u.password_algorithm,
        codigo_rol: u.codigo_rol,
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthError> {
        Ok(models::usuario::find_by_email(&self.db, email).await?.map(account_from))
    }

    async fn find_account(&self, codigo_usuario: i32) -> Result<Option<UserAccount>, AuthError> {
        Ok(models::usuario::Entity::find_by_id(codigo_usuario)
            .one(&self.db)
            .await?
            .map(account_from))
    }

    async fn create_account(&self, account: NewAccount) -> Result<UserAccount, AuthError> {
        let txn = self.db.begin().await?;
        let codigo_ubicacion = match &account.ubicacion {
            Some(u) => Some(
                models::ubicacion::create(&txn, &u.direccion, u.departamento, u.latitud, u.longitud, u.codigo_comuna)
                    .await?
                    .codigo_ubicacion,
            ),
            None => None,
        };
        let usuario = models::usuario::create(
            &txn,
            &account.email,
            account.password_hash.clone(),
            &account.password_algorithm,
            account.perfil.role().code(),
        )
        .await?;
        let person = account.perfil.person();
        match &account.perfil {
            NewProfile::Paseador(w) => {
                models::paseador::create(&txn, usuario.codigo_usuario, &person, w.descripcion.as_deref(), codigo_ubicacion).await?;
            }
            NewProfile::Tutor(_) => {
                models::tutor::create(&txn, usuario.codigo_usuario, &person, codigo_ubicacion).await?;
            }
        }
        txn.commit().await?;
        Ok(account_from(usuario))
    }

    async fn store_token(&self, codigo_usuario: i32, token: &str) -> Result<(), AuthError> {
        let touched = models::usuario::set_token(&self.db, codigo_usuario, token).await?;
        if touched == 0 {
            return Err(AuthError::NotFound("Usuario no encontrado".into()));
        }
        Ok(())
    }

    async fn update_password(&self, codigo_usuario: i32, password_hash: String, password_algorithm: &str) -> Result<(), AuthError> {
        models::usuario::set_password(&self.db, codigo_usuario, password_hash, password_algorithm).await?;
        Ok(())
    }

    async fn role_description(&self, codigo_rol: i32) -> Result<Option<String>, AuthError> {
        Ok(models::rol::Entity::find_by_id(codigo_rol)
            .one(&self.db)
            .await?
            .map(|r| r.descripcion))
    }

    async fn role_profile(&self, codigo_usuario: i32, role: Role) -> Result<Option<RoleProfile>, AuthError> {
        Ok(match role {
            Role::Administrador => models::administrador::Entity::find()
                .filter(models::administrador::Column::CodigoUsuario.eq(codigo_usuario))
                .one(&self.db)
                .await?
                .map(|a| RoleProfile::Administrador(PersonName { nombre: a.nombre, apellido: a.apellido })),
            Role::Paseador => models::paseador::Entity::find()
                .filter(models::paseador::Column::CodigoUsuario.eq(codigo_usuario))
                .one(&self.db)
                .await?
                .map(|p| RoleProfile::Paseador(PersonName { nombre: p.nombre, apellido: p.apellido })),
            Role::Tutor => models::tutor::find_by_usuario(&self.db, codigo_usuario)
                .await?
                .map(|t| RoleProfile::Tutor(PersonName { nombre: t.nombre, apellido: t.apellido })),
        })
    }

    async fn user_image(&self, codigo_usuario: i32) -> Result<Option<ImageRef>, AuthError> {
        let found = models::usuario::Entity::find_by_id(codigo_usuario)
            .find_also_related(models::imagen::Entity)
            .one(&self.db)
            .await?;
        Ok(found.and_then(|(_, img)| img).map(ImageRef::from))
    }
}
