use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body used for every error response and for plain confirmations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Mensaje {
    pub mensaje: String,
}

impl Mensaje {
    pub fn new(mensaje: impl Into<String>) -> Self {
        Self { mensaje: mensaje.into() }
    }
}
