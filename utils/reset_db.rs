use std::env;

use sea_orm::{ConnectionTrait, Database, DbErr, Statement};

#[tokio::main]
async fn main() -> Result<(), DbErr> {
    dotenvy::dotenv().ok();
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| DbErr::Custom("DATABASE_URL must be set".to_owned()))?;

    let db = Database::connect(database_url).await?;
    let backend = db.get_database_backend();

    // Children first so foreign keys never block a drop.
    for table in ["avatar", "student", "faculty", "seaql_migrations"] {
        db.execute(Statement::from_string(
            backend,
            format!("DROP TABLE IF EXISTS \"{}\";", table),
        ))
        .await?;
    }

    println!("Database reset successfully");
    Ok(())
}
