//! Code/description lookup tables referenced by `mascota`.

pub mod raza {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "raza")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub codigo_raza: i32,
        pub descripcion: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod tamanio {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "tamanio")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub codigo_tamanio: i32,
        pub descripcion: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod sexo {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "sexo")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub codigo_sexo: i32,
        pub descripcion: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod estado_mascota {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    /// State assigned to newly registered pets.
    pub const ACTIVO: i32 = 1;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "estado_mascota")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub codigo_estado_mascota: i32,
        pub descripcion: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
