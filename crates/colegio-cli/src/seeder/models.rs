//! Seed records and seeding configuration.

use colegio_models::UserRole;
use uuid::Uuid;

/// Seed data for creating a user.
pub struct UserSeed {
    pub nombre: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Seed data for creating a curso.
pub struct CursoSeed {
    pub nombre: String,
    pub anio_academico: i32,
    pub anio_estudiantil: i32,
    pub seccion: String,
    pub descripcion: String,
    pub docente_id: Option<Uuid>,
}

/// Seed data for creating a clase inside a curso.
pub struct ClaseSeed {
    pub nombre: String,
    pub curso_id: Uuid,
    pub docente_id: Uuid,
    pub materia: String,
    pub dia: String,
    pub hora_inicio: String,
    pub hora_fin: String,
}

/// How much fake data to generate.
#[derive(Clone)]
pub struct SeedConfig {
    pub docentes: usize,
    pub estudiantes: usize,
    pub cursos: usize,
    pub clases_por_curso: usize,
    pub anio_academico: i32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            docentes: 10,
            estudiantes: 200,
            cursos: 6,
            clases_por_curso: 2,
            anio_academico: 2025,
        }
    }
}

impl SeedConfig {
    pub fn new(docentes: usize, estudiantes: usize, cursos: usize) -> Self {
        Self {
            docentes,
            estudiantes,
            cursos,
            ..Default::default()
        }
    }

    pub fn with_clases_por_curso(mut self, clases_por_curso: usize) -> Self {
        self.clases_por_curso = clases_por_curso;
        self
    }

    pub fn with_anio_academico(mut self, anio_academico: i32) -> Self {
        self.anio_academico = anio_academico;
        self
    }

    /// Estudiantes placed in each curso (the remainder goes to the first cursos).
    pub fn estudiantes_por_curso(&self) -> usize {
        if self.cursos == 0 {
            0
        } else {
            self.estudiantes / self.cursos
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estudiantes_por_curso() {
        assert_eq!(SeedConfig::new(2, 100, 4).estudiantes_por_curso(), 25);
        assert_eq!(SeedConfig::new(2, 10, 0).estudiantes_por_curso(), 0);
    }

    #[test]
    fn test_builder() {
        let config = SeedConfig::default()
            .with_clases_por_curso(4)
            .with_anio_academico(2030);
        assert_eq!(config.clases_por_curso, 4);
        assert_eq!(config.anio_academico, 2030);
    }
}
