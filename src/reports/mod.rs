// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Read-only reporting over the academic database.
//!
//! One executor runs every report; each command is a declarative
//! [`ReportSpec`] entry (sql, optional bound argument, row formatter)
//! instead of a bespoke handler. The console never mutates this database.

use chrono::NaiveDate;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow, PgSslMode};
use sqlx::Row;
use tracing::{error, info};

use crate::config::DbConfig;
use crate::core::commands::Command;
use crate::core::constants::limits;
use crate::core::errors::ConsoleError;

type RowFormatter = fn(&PgRow) -> Result<String, sqlx::Error>;

/// One reporting command, fully described as data.
pub struct ReportSpec {
    pub command: Command,
    pub title: &'static str,
    /// `Some(usage)` when the report takes a bound argument
    pub usage: Option<&'static str>,
    pub sql: &'static str,
    pub empty: &'static str,
    pub format_row: RowFormatter,
}

fn format_usuario(row: &PgRow) -> Result<String, sqlx::Error> {
    let nombre: String = row.try_get("nombre")?;
    let documento: String = row.try_get("documento")?;
    let correo: String = row.try_get("correo")?;
    let estado: String = row.try_get("estado")?;
    let ingreso: NaiveDate = row.try_get("ingreso")?;
    Ok(format!(
        "{nombre} ({documento})\n  correo: {correo}\n  estado: {estado}\n  ingreso: {ingreso}"
    ))
}

fn format_area(row: &PgRow) -> Result<String, sqlx::Error> {
    let area: String = row.try_get("area")?;
    let asignaturas: i64 = row.try_get("asignaturas")?;
    Ok(format!("{area}: {asignaturas} asignaturas"))
}

fn format_semestre(row: &PgRow) -> Result<String, sqlx::Error> {
    let semestre: String = row.try_get("semestre")?;
    let grupos: i64 = row.try_get("grupos")?;
    let asignaturas: i64 = row.try_get("asignaturas")?;
    Ok(format!(
        "{semestre}: {asignaturas} asignaturas, {grupos} grupos"
    ))
}

fn format_grupo_sin_docente(row: &PgRow) -> Result<String, sqlx::Error> {
    let codigo: String = row.try_get("codigo")?;
    let asignatura: String = row.try_get("asignatura")?;
    let semestre: String = row.try_get("semestre")?;
    Ok(format!("{codigo} — {asignatura} ({semestre})"))
}

/// The full reporting surface. `/db` is not here: the healthcheck has no
/// result rows and runs through [`ReportRunner::healthcheck`].
pub const REPORTS: &[ReportSpec] = &[
    ReportSpec {
        command: Command::Usuario,
        title: "👤 Usuario",
        usage: Some("/usuario <documento>"),
        sql: "SELECT nombre, documento, correo, estado, ingreso \
              FROM usuarios WHERE documento = $1",
        empty: "No se encontró un usuario con ese documento.",
        format_row: format_usuario,
    },
    ReportSpec {
        command: Command::Areas,
        title: "📚 Áreas y asignaturas",
        usage: None,
        sql: "SELECT a.nombre AS area, COUNT(s.id) AS asignaturas \
              FROM areas a LEFT JOIN asignaturas s ON s.area_id = a.id \
              GROUP BY a.nombre ORDER BY a.nombre",
        empty: "No hay áreas registradas.",
        format_row: format_area,
    },
    ReportSpec {
        command: Command::Semestres,
        title: "🗓 Semestres",
        usage: None,
        sql: "SELECT s.nombre AS semestre, \
                     COUNT(DISTINCT g.id) AS grupos, \
                     COUNT(DISTINCT a.id) AS asignaturas \
              FROM semestres s \
              LEFT JOIN asignaturas a ON a.semestre_id = s.id \
              LEFT JOIN grupos g ON g.asignatura_id = a.id \
              GROUP BY s.nombre ORDER BY s.nombre",
        empty: "No hay semestres registrados.",
        format_row: format_semestre,
    },
    ReportSpec {
        command: Command::GruposSinDocente,
        title: "🚫 Grupos sin docente",
        usage: None,
        sql: "SELECT g.codigo, a.nombre AS asignatura, s.nombre AS semestre \
              FROM grupos g \
              JOIN asignaturas a ON g.asignatura_id = a.id \
              JOIN semestres s ON a.semestre_id = s.id \
              WHERE g.docente_id IS NULL \
              ORDER BY s.nombre, g.codigo",
        empty: "Todos los grupos tienen docente asignado. ✅",
        format_row: format_grupo_sin_docente,
    },
];

pub fn spec_for(command: Command) -> Option<&'static ReportSpec> {
    REPORTS.iter().find(|spec| spec.command == command)
}

/// Executes report specs against the academic database.
pub struct ReportRunner {
    pool: PgPool,
}

impl ReportRunner {
    /// Build a lazily-connecting pool; the first report pays the
    /// connection cost, startup does not.
    pub fn connect(db: &DbConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .username(&db.user)
            .password(&db.password)
            .database(&db.dbname)
            .ssl_mode(if db.ssl {
                PgSslMode::Require
            } else {
                PgSslMode::Prefer
            });
        let pool = PgPoolOptions::new()
            .max_connections(limits::DB_POOL_MAX)
            .connect_lazy_with(options);
        info!(host = %db.host, dbname = %db.dbname, "reporting pool configured");
        Self { pool }
    }

    pub async fn healthcheck(&self) -> bool {
        match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool).await {
            Ok(1) => true,
            Ok(_) => false,
            Err(e) => {
                error!("db healthcheck failed: {}", e);
                false
            }
        }
    }

    /// Run the spec registered for `command`.
    pub async fn run(&self, command: Command, argument: Option<&str>) -> Result<String, ConsoleError> {
        let spec = spec_for(command)
            .ok_or_else(|| ConsoleError::Report(format!("no report for {:?}", command)))?;

        let mut query = sqlx::query(spec.sql);
        if let Some(usage) = spec.usage {
            let arg = argument.ok_or(ConsoleError::MissingArgument { usage })?;
            query = query.bind(arg.to_string());
        }

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            error!(command = spec.command.name(), "report query failed: {}", e);
            ConsoleError::Report(e.to_string())
        })?;

        if rows.is_empty() {
            return Ok(spec.empty.to_string());
        }

        let mut out = String::from(spec.title);
        for row in &rows {
            let line = (spec.format_row)(row).map_err(|e| {
                error!(command = spec.command.name(), "report row decode failed: {}", e);
                ConsoleError::Report(e.to_string())
            })?;
            out.push('\n');
            out.push_str(&line);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_report_command_has_exactly_one_spec() {
        for spec in REPORTS {
            assert_eq!(
                REPORTS.iter().filter(|s| s.command == spec.command).count(),
                1,
                "duplicate spec for {:?}",
                spec.command
            );
        }
    }

    #[test]
    fn specs_are_read_only() {
        for spec in REPORTS {
            assert!(
                spec.sql.trim_start().to_uppercase().starts_with("SELECT"),
                "{:?} is not a SELECT",
                spec.command
            );
        }
    }

    #[test]
    fn argument_specs_bind_a_parameter() {
        for spec in REPORTS {
            assert_eq!(
                spec.usage.is_some(),
                spec.sql.contains("$1"),
                "{:?}: usage and bind parameter disagree",
                spec.command
            );
        }
    }

    #[test]
    fn only_known_commands_have_specs() {
        assert!(spec_for(Command::Usuario).is_some());
        assert!(spec_for(Command::Aprobar).is_none());
        assert!(spec_for(Command::Db).is_none());
    }
}
