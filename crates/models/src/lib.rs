pub mod errors;
pub mod db;
pub mod rol;
pub mod imagen;
pub mod ubicacion;
pub mod usuario;
pub mod administrador;
pub mod paseador;
pub mod tutor;
pub mod grupo_etario;
pub mod catalog;
pub mod mascota;
