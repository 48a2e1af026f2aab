//! Curso and clase seeding functionality.
//!
//! Cursos get a docente, the default materias and a slice of the seeded
//! estudiantes; each curso then gets clases for its first materias.

use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::{ClaseSeed, CursoSeed, SeedConfig};

pub const MATERIAS: [&str; 8] = [
    "Matemática",
    "Castellano",
    "Inglés",
    "Biología",
    "Física",
    "Química",
    "Historia",
    "Educación Física",
];

const SECCIONES: [&str; 4] = ["A", "B", "C", "D"];
const DIAS: [&str; 5] = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes"];

/// Generates cursos spread over the six school years
pub fn generate_cursos(config: &SeedConfig, docente_ids: &[Uuid]) -> Vec<CursoSeed> {
    (0..config.cursos)
        .into_par_iter()
        .map(|idx| {
            let anio_estudiantil = (idx % 6) as i32 + 1;
            let seccion = SECCIONES[(idx / 6) % SECCIONES.len()];
            let tanda = idx / (6 * SECCIONES.len());
            let descripcion: String = Sentence(4..10).fake();

            CursoSeed {
                nombre: format!("{}° año - Grupo {}", anio_estudiantil, tanda + 1),
                anio_academico: config.anio_academico,
                anio_estudiantil,
                seccion: seccion.to_string(),
                descripcion,
                docente_id: (!docente_ids.is_empty()).then(|| docente_ids[idx % docente_ids.len()]),
            }
        })
        .collect()
}

/// Generates `clases_por_curso` clases per curso, one per materia
pub fn generate_clases(cursos: &[(Uuid, Uuid)], clases_por_curso: usize) -> Vec<ClaseSeed> {
    cursos
        .par_iter()
        .enumerate()
        .flat_map(|(curso_idx, &(curso_id, docente_id))| {
            (0..clases_por_curso.min(MATERIAS.len()))
                .map(|materia_idx| {
                    let materia = MATERIAS[materia_idx];
                    let hora = 7 + (materia_idx % 6) as u32;
                    ClaseSeed {
                        nombre: format!("{} {}", materia, curso_idx + 1),
                        curso_id,
                        docente_id,
                        materia: materia.to_string(),
                        dia: DIAS[(curso_idx + materia_idx) % DIAS.len()].to_string(),
                        hora_inicio: format!("{:02}:00", hora),
                        hora_fin: format!("{:02}:45", hora),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Seeds cursos with materias and estudiantes, returns `(curso_id, docente_id)` pairs
pub async fn seed_cursos(
    db: &PgPool,
    config: &SeedConfig,
    docente_ids: &[Uuid],
    estudiante_ids: &[Uuid],
) -> Result<Vec<(Uuid, Option<Uuid>)>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📚 Seeding {} cursos...", config.cursos);

    let cursos = generate_cursos(config, docente_ids);

    // 6 params per curso
    const BATCH_SIZE: usize = 1000;

    let mut tx = db.begin().await?;
    let mut inserted = Vec::with_capacity(cursos.len());
    for chunk in cursos.chunks(BATCH_SIZE) {
        inserted.extend(insert_cursos_chunk(&mut tx, chunk).await?);
    }

    let curso_ids: Vec<Uuid> = inserted.iter().map(|(id, _)| *id).collect();
    insert_materias(&mut tx, &inserted).await?;

    let por_curso = estudiante_ids.len().div_ceil(curso_ids.len().max(1));
    let matriculas: Vec<(Uuid, Uuid)> = curso_ids
        .iter()
        .zip(estudiante_ids.chunks(por_curso.max(1)))
        .flat_map(|(curso_id, estudiantes)| estudiantes.iter().map(move |e| (*curso_id, *e)))
        .collect();
    insert_pairs(&mut tx, "curso_estudiantes", "curso_id", &matriculas).await?;

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} cursos and {} matrículas in {:?}",
        inserted.len(),
        matriculas.len(),
        start_time.elapsed()
    );

    Ok(inserted)
}

/// Seeds clases for cursos that have a docente and enrolls the curso's estudiantes
pub async fn seed_clases(
    db: &PgPool,
    cursos: &[(Uuid, Option<Uuid>)],
    clases_por_curso: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let con_docente: Vec<(Uuid, Uuid)> = cursos
        .iter()
        .filter_map(|(curso, docente)| docente.map(|d| (*curso, d)))
        .collect();
    let clases = generate_clases(&con_docente, clases_por_curso);
    println!("🏫 Seeding {} clases...", clases.len());

    if clases.is_empty() {
        return Ok(0);
    }

    let mut tx = db.begin().await?;

    let mut query = String::from(
        "INSERT INTO clases (nombre, curso_id, docente_id, materia, horario_dia, horario_hora_inicio, horario_hora_fin) VALUES ",
    );
    for (i, _) in clases.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 7;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6,
            p + 7
        ));
    }
    query.push_str(" RETURNING id, curso_id");

    let mut q = sqlx::query_as::<_, (Uuid, Uuid)>(&query);
    for clase in &clases {
        q = q
            .bind(&clase.nombre)
            .bind(clase.curso_id)
            .bind(clase.docente_id)
            .bind(&clase.materia)
            .bind(&clase.dia)
            .bind(&clase.hora_inicio)
            .bind(&clase.hora_fin);
    }
    let inserted = q.fetch_all(&mut *tx).await?;

    for (clase_id, curso_id) in &inserted {
        sqlx::query(
            "INSERT INTO clase_estudiantes (clase_id, estudiante_id)
             SELECT $1, estudiante_id FROM curso_estudiantes WHERE curso_id = $2
             ON CONFLICT DO NOTHING",
        )
        .bind(clase_id)
        .bind(curso_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} clases in {:?}",
        inserted.len(),
        start_time.elapsed()
    );

    Ok(inserted.len())
}

async fn insert_cursos_chunk(
    tx: &mut Transaction<'_, Postgres>,
    cursos: &[CursoSeed],
) -> Result<Vec<(Uuid, Option<Uuid>)>, Box<dyn std::error::Error>> {
    if cursos.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO cursos (nombre, anio_academico, anio_estudiantil, seccion, descripcion, docente_id) VALUES ",
    );
    for (i, _) in cursos.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6
        ));
    }
    query.push_str(" ON CONFLICT ON CONSTRAINT cursos_unicos DO NOTHING RETURNING id, docente_id");

    let mut q = sqlx::query_as::<_, (Uuid, Option<Uuid>)>(&query);
    for curso in cursos {
        q = q
            .bind(&curso.nombre)
            .bind(curso.anio_academico)
            .bind(curso.anio_estudiantil)
            .bind(&curso.seccion)
            .bind(&curso.descripcion)
            .bind(curso.docente_id);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

async fn insert_materias(
    tx: &mut Transaction<'_, Postgres>,
    cursos: &[(Uuid, Option<Uuid>)],
) -> Result<(), Box<dyn std::error::Error>> {
    for (curso_id, docente_id) in cursos {
        sqlx::query(
            "INSERT INTO curso_materias (curso_id, nombre, docente_asignado, posicion)
             SELECT $1, m.nombre, $2, m.posicion - 1
             FROM unnest($3::text[]) WITH ORDINALITY AS m(nombre, posicion)",
        )
        .bind(curso_id)
        .bind(docente_id)
        .bind(MATERIAS.map(String::from).to_vec())
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn insert_pairs(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    owner_column: &str,
    pairs: &[(Uuid, Uuid)],
) -> Result<(), Box<dyn std::error::Error>> {
    const BATCH_SIZE: usize = 5000;

    for chunk in pairs.chunks(BATCH_SIZE) {
        let (owners, estudiantes): (Vec<Uuid>, Vec<Uuid>) = chunk.iter().copied().unzip();
        let query = format!(
            "INSERT INTO {} ({}, estudiante_id)
             SELECT * FROM unnest($1::uuid[], $2::uuid[])
             ON CONFLICT DO NOTHING",
            table, owner_column
        );
        sqlx::query(&query)
            .bind(owners)
            .bind(estudiantes)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Deletes cursos created by the seeder (clases, actividades and entregas cascade)
pub async fn clear_cursos(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded cursos...");

    let result = sqlx::query("DELETE FROM cursos WHERE nombre LIKE '%° año - Grupo %'")
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} cursos in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_cursos_are_unique() {
        let config = SeedConfig::new(3, 0, 30);
        let docentes = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let cursos = generate_cursos(&config, &docentes);

        let mut keys: Vec<(String, i32, String)> = cursos
            .iter()
            .map(|c| (c.nombre.clone(), c.anio_estudiantil, c.seccion.clone()))
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 30);
        assert!(cursos.iter().all(|c| (1..=6).contains(&c.anio_estudiantil)));
        assert!(cursos.iter().all(|c| c.docente_id.is_some()));
    }

    #[test]
    fn test_cursos_without_docentes() {
        let cursos = generate_cursos(&SeedConfig::new(0, 0, 3), &[]);
        assert!(cursos.iter().all(|c| c.docente_id.is_none()));
    }

    #[test]
    fn test_generate_clases_caps_at_materias() {
        let cursos = vec![(Uuid::new_v4(), Uuid::new_v4())];
        let clases = generate_clases(&cursos, 20);
        assert_eq!(clases.len(), MATERIAS.len());
        assert_eq!(clases[0].hora_inicio, "07:00");
    }
}
