//! Rendering for each subcommand.
//!
//! Everything here is pure: it takes a dialect and plain inputs and
//! returns the text to print, so `main` only deals with I/O.

use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use oxide_dialect_core::{
    Dialect, DialectRegistry, FieldKind, ForeignKey, Model, ReferentialAction,
};

/// Referential action accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    /// Reject the change if referencing rows exist.
    NoAction,
    /// Like `no-action`, checked immediately.
    Restrict,
    /// Apply the change to referencing rows.
    Cascade,
    /// Set the referencing column to NULL.
    SetNull,
    /// Set the referencing column to its default.
    SetDefault,
}

impl From<ActionArg> for ReferentialAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::NoAction => Self::NoAction,
            ActionArg::Restrict => Self::Restrict,
            ActionArg::Cascade => Self::Cascade,
            ActionArg::SetNull => Self::SetNull,
            ActionArg::SetDefault => Self::SetDefault,
        }
    }
}

/// Reads a JSON model description.
pub fn load_model(path: &Path) -> anyhow::Result<Model> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read model file {}", path.display()))?;
    parse_model(&json).with_context(|| format!("invalid model in {}", path.display()))
}

fn parse_model(json: &str) -> anyhow::Result<Model> {
    Ok(serde_json::from_str(json)?)
}

/// One registered name per line, marking the selected dialect.
pub fn render_dialects(registry: &DialectRegistry, selected: &str) -> String {
    registry
        .names()
        .into_iter()
        .map(|name| {
            let mark = if name == selected { "*" } else { " " };
            format!("{mark} {name}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Column type for a kind name and size hint.
pub fn render_sql_type(dialect: &dyn Dialect, kind: &str, size: usize) -> anyhow::Result<String> {
    Ok(dialect.sql_type(&FieldKind::parse(kind), size)?)
}

/// CREATE TABLE followed by one statement per declared index.
pub fn render_create_table(
    dialect: &dyn Dialect,
    model: &Model,
    if_not_exists: bool,
) -> anyhow::Result<String> {
    let mut statements = vec![dialect.create_table_sql(model, if_not_exists)?];
    for index in &model.indexes {
        let columns: Vec<&str> = index.columns.iter().map(String::as_str).collect();
        statements.push(dialect.create_index_sql(&index.name, &model.table, index.unique, &columns));
    }
    Ok(statements
        .iter()
        .map(|s| format!("{s};"))
        .collect::<Vec<_>>()
        .join("\n\n"))
}

/// A single index or unique-constraint statement.
pub fn render_create_index(
    dialect: &dyn Dialect,
    name: &str,
    table: &str,
    unique: bool,
    columns: &[String],
) -> String {
    let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
    format!("{};", dialect.create_index_sql(name, table, unique, &columns))
}

/// Foreign-key clause with the requested actions attached.
pub fn render_foreign_key(
    dialect: &dyn Dialect,
    mut fk: ForeignKey,
    on_update: Option<ActionArg>,
    on_delete: Option<ActionArg>,
) -> String {
    if let Some(action) = on_update {
        fk = fk.on_update(action.into());
    }
    if let Some(action) = on_delete {
        fk = fk.on_delete(action.into());
    }
    dialect.foreign_key(&fk)
}

/// The INSERT statement followed by its bound values, one per line.
pub fn render_insert(dialect: &dyn Dialect, model: &Model) -> String {
    let (sql, values) = dialect.insert_sql(model);
    let mut out = format!("{sql};");
    for (i, value) in values.iter().enumerate() {
        out.push_str(&format!("\n-- ${} = {}", i + 1, value.to_sql_inline()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_dialect_cockroach::CockroachDialect;
    use oxide_dialect_core::BaseDialect;

    const USERS: &str = r#"{
        "table": "users",
        "primary_key": "id",
        "fields": [
            {"name": "id", "kind": "id"},
            {"name": "email", "kind": "string", "size": 255, "not_null": true,
             "value": {"type": "text", "value": "o'neil@example.com"}},
            {"name": "team_id", "kind": "int64", "value": {"type": "int", "value": 3}}
        ],
        "foreign_keys": [
            {"name": "fk_user_team", "column": "team_id",
             "reference_table": "teams", "reference_column": "id",
             "on_delete": "cascade"}
        ],
        "indexes": [
            {"name": "uq_email", "columns": ["email"], "unique": true},
            {"name": "idx_team", "columns": ["team_id"]}
        ]
    }"#;

    fn registry() -> DialectRegistry {
        let mut registry = DialectRegistry::new();
        registry.register(BaseDialect::NAME, BaseDialect::new());
        oxide_dialect_cockroach::register(&mut registry);
        registry
    }

    #[test]
    fn test_render_dialects() {
        assert_eq!(
            render_dialects(&registry(), "cockroachdb"),
            "  base\n* cockroachdb"
        );
    }

    #[test]
    fn test_render_sql_type() {
        let dialect = CockroachDialect::new();
        assert_eq!(render_sql_type(&dialect, "id", 0).unwrap(), "BIGSERIAL");
        assert_eq!(render_sql_type(&dialect, "string", 80).unwrap(), "VARCHAR(80)");
        assert!(render_sql_type(&dialect, "uuid", 0).is_err());
    }

    #[test]
    fn test_render_create_table_cockroach() {
        let model = parse_model(USERS).unwrap();
        let sql = render_create_table(&CockroachDialect::new(), &model, false).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE \"users\" (\n\
             \x20   \"id\" BIGSERIAL PRIMARY KEY,\n\
             \x20   \"email\" VARCHAR(255) NOT NULL,\n\
             \x20   \"team_id\" BIGINT,\n\
             \x20   CONSTRAINT \"fk_user_team\" FOREIGN KEY (\"team_id\") REFERENCES \"teams\"(\"id\")\n\
             );\n\n\
             ALTER TABLE \"users\" ADD CONSTRAINT \"uq_email\" UNIQUE(\"email\");\n\n\
             CREATE INDEX IF NOT EXISTS \"idx_team\" ON \"users\" (\"team_id\");"
        );
    }

    #[test]
    fn test_render_create_table_base_keeps_actions() {
        let model = parse_model(USERS).unwrap();
        let sql = render_create_table(&BaseDialect::new(), &model, true).unwrap();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"users\""));
        assert!(sql.contains("REFERENCES \"teams\"(\"id\") ON DELETE CASCADE"));
        assert!(sql.contains("CREATE UNIQUE INDEX \"uq_email\" ON \"users\" (\"email\");"));
    }

    #[test]
    fn test_render_create_index() {
        let columns = vec!["name".to_string(), "age".to_string()];
        assert_eq!(
            render_create_index(&CockroachDialect::new(), "idx_name_age", "users", false, &columns),
            "CREATE INDEX IF NOT EXISTS \"idx_name_age\" ON \"users\" (\"name\", \"age\");"
        );
    }

    #[test]
    fn test_render_foreign_key() {
        let fk = ForeignKey::new("fk_post_user", "user_id", "users", "id");
        assert_eq!(
            render_foreign_key(&BaseDialect::new(), fk.clone(), None, Some(ActionArg::SetNull)),
            "CONSTRAINT \"fk_post_user\" FOREIGN KEY (\"user_id\") REFERENCES \"users\"(\"id\") ON DELETE SET NULL"
        );
        assert_eq!(
            render_foreign_key(
                &CockroachDialect::new(),
                fk,
                Some(ActionArg::Cascade),
                Some(ActionArg::Cascade)
            ),
            "CONSTRAINT \"fk_post_user\" FOREIGN KEY (\"user_id\") REFERENCES \"users\"(\"id\")"
        );
    }

    #[test]
    fn test_render_insert() {
        let model = parse_model(USERS).unwrap();
        assert_eq!(
            render_insert(&CockroachDialect::new(), &model),
            "INSERT INTO \"users\" (\"email\", \"team_id\") VALUES ($1, $2) RETURNING \"id\";\n\
             -- $1 = 'o''neil@example.com'\n\
             -- $2 = 3"
        );
    }

    #[test]
    fn test_action_arg_values_carry_help() {
        for action in ActionArg::value_variants() {
            let value = action.to_possible_value().unwrap();
            assert!(value.get_help().is_some(), "{} has no help", value.get_name());
        }
        assert_eq!(
            ActionArg::from_str("set-null", false).map(ReferentialAction::from),
            Ok(ReferentialAction::SetNull)
        );
    }

    #[test]
    fn test_parse_model_rejects_garbage() {
        assert!(parse_model("{\"table\": 1}").is_err());
    }
}
