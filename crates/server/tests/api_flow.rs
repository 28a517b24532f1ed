use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Local};
use serde_json::{json, Value};
use tower::ServiceExt;

use configs::JwtConfig;
use server::routes::{self, auth::{Repositories, ServerState}};
use service::auth::domain::{PersonName, RoleProfile};
use service::auth::password::{hash_password, ARGON2};
use service::auth::repository::mock::MockAuthRepository;
use service::image::domain::{ImageOwner, ImageRef};
use service::image::host::mock::RecordingImageHost;
use service::image::repository::mock::MockImageRepository;
use service::pet::repository::mock::MockPetRepository;

const PASSWORD: &str = "Secreta123";

struct TestApp {
    router: Router,
    auth: Arc<MockAuthRepository>,
    pets: Arc<MockPetRepository>,
    images: Arc<MockImageRepository>,
    host: Arc<RecordingImageHost>,
}

impl TestApp {
    fn new() -> Self {
        let auth = Arc::new(MockAuthRepository::default());
        let pets = Arc::new(MockPetRepository::default());
        let images = Arc::new(MockImageRepository::default());
        let host = Arc::new(RecordingImageHost::default());
        let repos = Repositories { auth: auth.clone(), pets: pets.clone(), images: images.clone() };
        let jwt = JwtConfig { secret: "test-secret-0123456789".into(), ttl_days: 7 };
        let state = ServerState::new(repos, host.clone(), &jwt, Some("volta/default".into()));
        let router = routes::build_router(state, tower_http::cors::CorsLayer::very_permissive());
        Self { router, auth, pets, images, host }
    }

    fn seed(&self, email: &str, profile: RoleProfile) -> i32 {
        let codigo_rol = match profile {
            RoleProfile::Administrador(_) => 1,
            RoleProfile::Paseador(_) => 2,
            RoleProfile::Tutor(_) => 3,
        };
        let hash = hash_password(PASSWORD).unwrap();
        self.auth.insert_account(email, hash, ARGON2, codigo_rol, Some(profile)).codigo_usuario
    }

    /// Seeded guardian with a pet profile, already logged in.
    async fn tutor(&self) -> (i32, String) {
        let codigo_usuario = self.seed("tutor@voltapets.cl", RoleProfile::Tutor(name("Ana", "Rojas")));
        self.pets.add_tutor(codigo_usuario, 50 + codigo_usuario);
        let token = self.login("tutor@voltapets.cl").await;
        (codigo_usuario, token)
    }

    async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .send(Method::POST, "/api/v1/Usuario/Login", None, Some(json!({ "email": email, "password": PASSWORD })))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, value)
    }
}

fn name(nombre: &str, apellido: &str) -> PersonName {
    PersonName { nombre: nombre.into(), apellido: apellido.into() }
}

fn image(id: &str) -> Value {
    json!({ "url": format!("https://res.cloudinary.com/{id}.png"), "path": format!("{id}.png"), "publicId": id })
}

fn pet_body(nombre: &str, days_old: i64) -> Value {
    let fecha = (Local::now().date_naive() - Duration::days(days_old)).to_string();
    json!({
        "nombre": nombre,
        "descripcion": "Juguetón",
        "esterilizado": true,
        "fechaNacimiento": fecha,
        "isFechaNacimiento": true,
        "codigoRaza": 2,
        "codigoTamanio": 1,
        "codigoSexo": 1
    })
}

#[tokio::test]
async fn health_and_metrics_are_public() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    app.seed("walker@voltapets.cl", RoleProfile::Paseador(name("Luis", "Soto")));
    app.login("walker@voltapets.cl").await;
    let resp = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let text = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&text).contains("volta_logins_total"));
}

#[tokio::test]
async fn login_failures_use_mensaje_bodies() {
    let app = TestApp::new();
    app.seed("tutor@voltapets.cl", RoleProfile::Tutor(name("Ana", "Rojas")));

    let (status, body) = app
        .send(Method::POST, "/api/v1/Usuario/Login", None, Some(json!({ "email": "nadie@voltapets.cl", "password": PASSWORD })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["mensaje"], "El Usuario no existe");

    let (status, body) = app
        .send(Method::POST, "/api/v1/Usuario/Login", None, Some(json!({ "email": "tutor@voltapets.cl", "password": "otra-clave" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["mensaje"], "Contraseña incorrecta");
}

#[tokio::test]
async fn register_then_fetch_profile() {
    let app = TestApp::new();
    let registro = json!({
        "email": "nuevo@voltapets.cl",
        "password": PASSWORD,
        "perfil": { "rol": "Tutor", "rut": "12345678", "dv": "5", "nombre": "Marta", "apellido": "Díaz", "telefono": "56912345678" }
    });
    let (status, body) = app.send(Method::POST, "/api/v1/Usuario/Registrar", None, Some(registro.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let codigo_usuario = body["codigoUsuario"].as_i64().unwrap() as i32;

    let (status, body) = app.send(Method::POST, "/api/v1/Usuario/Registrar", None, Some(registro)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["mensaje"], "El email ya se encuentra registrado");

    let token = app.login("nuevo@voltapets.cl").await;
    assert_eq!(app.auth.token_of(codigo_usuario).as_deref(), Some(token.as_str()));
    let (status, body) = app.send(Method::GET, "/api/v1/Usuario/getUsuarioToken", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], codigo_usuario);
    assert_eq!(body["nombre"], "Marta");
    assert_eq!(body["email"], "nuevo@voltapets.cl");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/v1/Usuario/getUsuarioToken", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["mensaje"], "Token de acceso requerido");

    let (status, body) = app.send(Method::GET, "/api/v1/Mascota/Obtener/MisMascotas", Some("no.es.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["mensaje"], "Token inválido o expirado");
}

#[tokio::test]
async fn pet_routes_are_restricted_to_guardians() {
    let app = TestApp::new();
    app.seed("walker@voltapets.cl", RoleProfile::Paseador(name("Luis", "Soto")));
    let token = app.login("walker@voltapets.cl").await;
    let (status, body) = app
        .send(Method::POST, "/api/v1/Mascota/Registrar", Some(&token), Some(pet_body("Firulais", 800)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["mensaje"].is_string());
    assert_eq!(app.pets.count(), 0);
}

#[tokio::test]
async fn guardian_manages_own_pets() {
    let app = TestApp::new();
    let (_, token) = app.tutor().await;

    let (status, body) = app
        .send(Method::GET, "/api/v1/Mascota/Obtener/MisMascotas", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["mensaje"], "No existen mascotas");

    let (status, body) = app
        .send(Method::POST, "/api/v1/Mascota/Registrar", Some(&token), Some(pet_body("Firulais", 800)))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["mensaje"], "Mascota registrada con éxito");
    let codigo = body["codigoMascota"].as_i64().unwrap();

    let (status, body) = app
        .send(Method::GET, &format!("/api/v1/Mascota/Obtener/{codigo}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nombre"], "Firulais");
    assert_eq!(body["grupoEtario"]["descripcion"], "Joven");
    assert_eq!(body["raza"]["descripcion"], "Raza 2");
    assert_eq!(body["edad"], 2.0);

    let (status, body) = app
        .send(Method::GET, "/api/v1/Mascota/Obtener/MisMascotas", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["codigoMascota"], codigo);
    assert_eq!(body[0]["estadoMascota"]["descripcion"], "Activo");

    let (status, body) = app
        .send(Method::PUT, &format!("/api/v1/Mascota/Editar/{codigo}"), Some(&token), Some(pet_body("Firulais II", 800)))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["mensaje"], "Mascota editada con éxito");
    assert_eq!(app.pets.record(codigo as i32).unwrap().nombre, "Firulais II");
}

#[tokio::test]
async fn pet_validation_and_duplicates_map_to_status_codes() {
    let app = TestApp::new();
    let (_, token) = app.tutor().await;

    let (status, body) = app
        .send(Method::POST, "/api/v1/Mascota/Registrar", Some(&token), Some(pet_body("Cachorrito", 100)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["mensaje"].as_str().unwrap().contains("6 meses"), "{body}");

    let (status, _) = app
        .send(Method::POST, "/api/v1/Mascota/Registrar", Some(&token), Some(pet_body("Toby", 1200)))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .send(Method::POST, "/api/v1/Mascota/Registrar", Some(&token), Some(pet_body("Toby", 1200)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["mensaje"], "La mascota registrada ya existe");
    assert_eq!(app.pets.count(), 1);

    let (status, body) = app
        .send(Method::POST, "/api/v1/Mascota/Registrar", Some(&token), Some(json!({ "nombre": "Sin datos" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["mensaje"].is_string());

    let (status, body) = app
        .send(Method::GET, "/api/v1/Mascota/Obtener/abc", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["mensaje"].is_string());
}

#[tokio::test]
async fn other_guardians_pets_are_not_visible() {
    let app = TestApp::new();
    let (_, token) = app.tutor().await;
    let (status, body) = app
        .send(Method::POST, "/api/v1/Mascota/Registrar", Some(&token), Some(pet_body("Luna", 900)))
        .await;
    assert_eq!(status, StatusCode::OK);
    let codigo = body["codigoMascota"].as_i64().unwrap();

    let otro = app.seed("otro@voltapets.cl", RoleProfile::Tutor(name("Pedro", "Pérez")));
    app.pets.add_tutor(otro, 99);
    let otro_token = app.login("otro@voltapets.cl").await;
    let (status, body) = app
        .send(Method::GET, &format!("/api/v1/Mascota/Obtener/{codigo}"), Some(&otro_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["mensaje"], "No se pudo obtener a la mascota");
}

#[tokio::test]
async fn image_changes_release_the_previous_asset() {
    let app = TestApp::new();
    let (codigo_usuario, token) = app.tutor().await;
    let owner = ImageOwner::User(codigo_usuario);
    app.images.add_owner(owner, None);

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/v1/Usuario/RegistrarImagen",
            None,
            Some(json!({ "codigoUsuario": codigo_usuario, "url": "https://res.cloudinary.com/a.png", "path": "a.png", "publicId": "volta/a" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.host.destroyed().is_empty());

    let (status, _) = app
        .send(Method::PUT, "/api/v1/Usuario/CambiarImagen", Some(&token), Some(image("volta/b")))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.images.image_of(owner).map(|i: ImageRef| i.public_id), Some("volta/b".to_string()));
    assert_eq!(app.host.destroyed(), vec!["volta/a".to_string()]);

    let (status, _) = app
        .send(Method::POST, "/api/v1/Mascota/Registrar", Some(&token), Some(pet_body("Rocky", 900)))
        .await;
    assert_eq!(status, StatusCode::OK);
    app.images.add_owner(ImageOwner::Pet(1), None);
    let (status, _) = app
        .send(Method::PUT, "/api/v1/Mascota/CambiarImagen/1", Some(&token), Some(image("volta/rocky")))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        app.images.image_of(ImageOwner::Pet(1)).map(|i| i.public_id),
        Some("volta/rocky".to_string())
    );
}

#[tokio::test]
async fn image_for_unknown_user_is_released() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::PUT,
            "/api/v1/Usuario/RegistrarImagen",
            None,
            Some(json!({ "codigoUsuario": 404, "url": "https://res.cloudinary.com/x.png", "path": "x.png", "publicId": "volta/x" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["mensaje"], "Usuario no encontrado");
    assert_eq!(app.host.destroyed(), vec!["volta/x".to_string()]);
}

#[tokio::test]
async fn unreadable_registration_releases_its_upload() {
    let app = TestApp::new();
    let (_, token) = app.tutor().await;
    let mut body = pet_body("Nube", 900);
    body.as_object_mut().unwrap().remove("esterilizado");
    body["imagen"] = image("volta/nube");

    let (status, resp) = app.send(Method::POST, "/api/v1/Mascota/Registrar", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["mensaje"].as_str().unwrap().contains("esterilizado"), "{resp}");
    assert_eq!(app.host.destroyed(), vec!["volta/nube".to_string()]);
    assert_eq!(app.pets.count(), 0);

    let (status, _) = app
        .send(Method::PUT, "/api/v1/Usuario/CambiarImagen", Some(&token), Some(json!({ "url": "https://res.cloudinary.com/z.png", "publicId": "volta/z" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.host.destroyed().len(), 1);
}

#[tokio::test]
async fn adoption_age_over_thirty_years_is_rejected() {
    let app = TestApp::new();
    let (_, token) = app.tutor().await;
    let mut body = pet_body("Matusalén", 400);
    body["isFechaNacimiento"] = json!(false);
    body["edadRegistro"] = json!(30.5);
    body["imagen"] = image("volta/viejo");

    let (status, resp) = app.send(Method::POST, "/api/v1/Mascota/Registrar", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["mensaje"].as_str().unwrap().contains("30 años"), "{resp}");
    assert_eq!(app.pets.count(), 0);
    assert_eq!(app.host.destroyed(), vec!["volta/viejo".to_string()]);
}

#[tokio::test]
async fn birth_date_may_be_sent_as_a_datetime() {
    let app = TestApp::new();
    let (_, token) = app.tutor().await;
    let fecha = (Local::now().date_naive() - Duration::days(800)).and_hms_opt(0, 0, 0).unwrap();
    let mut body = pet_body("Canela", 800);
    body["fechaNacimiento"] = json!(fecha.format("%Y-%m-%dT%H:%M:%S").to_string());

    let (status, resp) = app.send(Method::POST, "/api/v1/Mascota/Registrar", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{resp}");
    let codigo = resp["codigoMascota"].as_i64().unwrap() as i32;
    assert_eq!(app.pets.record(codigo).unwrap().fecha_nacimiento, fecha.date());
}

#[tokio::test]
async fn anonymous_image_does_not_replace_an_existing_one() {
    let app = TestApp::new();
    let (codigo_usuario, _) = app.tutor().await;
    let owner = ImageOwner::User(codigo_usuario);
    let propia = ImageRef {
        url: "https://res.cloudinary.com/propia.png".into(),
        path: "propia.png".into(),
        public_id: "volta/propia".into(),
    };
    app.images.add_owner(owner, Some(propia.clone()));

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/v1/Usuario/RegistrarImagen",
            None,
            Some(json!({ "codigoUsuario": codigo_usuario, "url": "https://res.cloudinary.com/ajena.png", "path": "ajena.png", "publicId": "volta/ajena" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["mensaje"], "El usuario ya tiene una imagen de perfil");
    assert_eq!(app.images.image_of(owner), Some(propia));
    assert_eq!(app.host.destroyed(), vec!["volta/ajena".to_string()]);
}
