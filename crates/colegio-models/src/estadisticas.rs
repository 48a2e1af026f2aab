use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// User counts for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Estadisticas {
    pub usuarios_registrados: i64,
    pub pendientes_validacion: i64,
    pub docentes_activos: i64,
    pub estudiantes_activos: i64,
    pub admins_activos: i64,
    pub usuarios_inactivos: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EstadisticasResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub estadisticas: Estadisticas,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_flat() {
        let response = EstadisticasResponse {
            ok: true,
            estadisticas: Estadisticas {
                usuarios_registrados: 4,
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["usuariosRegistrados"], 4);
        assert!(value.get("estadisticas").is_none());
    }
}
