use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use std::env;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = sea_orm::Database::connect(&url)
        .await
        .expect("DB connection failed");

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("fresh") => {
            Migrator::fresh(&db).await.expect("Failed to refresh database");
            println!("Database refreshed");
        }
        Some("down") => {
            Migrator::down(&db, None).await.expect("Failed to revert migrations");
            println!("Migrations reverted");
        }
        _ => {
            Migrator::up(&db, None).await.expect("Failed to run migrations");
            println!("Migrations applied");
        }
    }
}
