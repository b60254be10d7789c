//! CLI subcommands.

pub mod admin;
pub mod migrate;

/// Database URL for CLI commands: `ADMIN_DATABASE_URL`, then `DATABASE_URL`.
fn database_url() -> Result<String, std::env::VarError> {
    std::env::var("ADMIN_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))
}
