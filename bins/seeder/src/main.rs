//! Reference data seeder for Kasa development and testing.
//!
//! Operators, debtors, employees and expense categories are owned by other
//! systems in production. This seeds a fixed set of them so the ledger can
//! be exercised locally. Every row has a stable id, so running the seeder
//! twice is harmless.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use kasa_db::entities::{debtors, employees, expense_categories, operators};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

const OPERATORS: [(u128, &str); 2] = [(0x0101, "Ana Torres"), (0x0102, "Luis Mendoza")];

const DEBTORS: [(u128, &str, Option<&str>); 3] = [
    (0x0201, "Rosa Quispe", Some("40118822")),
    (0x0202, "Mario Vargas", Some("10457789")),
    (0x0203, "Colegio San Martin", None),
];

const EMPLOYEES: [(u128, &str); 2] = [(0x0301, "Jorge Huaman"), (0x0302, "Carmen Rojas")];

const EXPENSE_CATEGORIES: [(u128, &str); 5] = [
    (0x0401, "Cleaning"),
    (0x0402, "Transport"),
    (0x0403, "Utilities"),
    (0x0404, "Office supplies"),
    (0x0405, "Maintenance"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = kasa_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding operators...");
    seed_operators(&db).await;

    println!("Seeding debtors...");
    seed_debtors(&db).await;

    println!("Seeding employees...");
    seed_employees(&db).await;

    println!("Seeding expense categories...");
    seed_expense_categories(&db).await;

    println!("Seeding complete!");
}

async fn seed_operators(db: &DatabaseConnection) {
    let mut inserted = 0;
    for (id, name) in OPERATORS {
        let id = Uuid::from_u128(id);
        if operators::Entity::find_by_id(id).one(db).await.ok().flatten().is_some() {
            continue;
        }

        let operator = operators::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            active: Set(true),
            created_at: Set(Utc::now()),
        };
        match operator.insert(db).await {
            Ok(_) => {
                inserted += 1;
                println!("  Operator {name}: {id}");
            }
            Err(e) => eprintln!("Failed to insert operator {name}: {e}"),
        }
    }
    println!("  Inserted {inserted} operators");
}

async fn seed_debtors(db: &DatabaseConnection) {
    let mut inserted = 0;
    for (id, name, document) in DEBTORS {
        let id = Uuid::from_u128(id);
        if debtors::Entity::find_by_id(id).one(db).await.ok().flatten().is_some() {
            continue;
        }

        let debtor = debtors::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            document: Set(document.map(str::to_string)),
            created_at: Set(Utc::now()),
        };
        if let Err(e) = debtor.insert(db).await {
            eprintln!("Failed to insert debtor {name}: {e}");
        } else {
            inserted += 1;
        }
    }
    println!("  Inserted {inserted} debtors");
}

async fn seed_employees(db: &DatabaseConnection) {
    let mut inserted = 0;
    for (id, name) in EMPLOYEES {
        let id = Uuid::from_u128(id);
        if employees::Entity::find_by_id(id).one(db).await.ok().flatten().is_some() {
            continue;
        }

        let employee = employees::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            active: Set(true),
            created_at: Set(Utc::now()),
        };
        if let Err(e) = employee.insert(db).await {
            eprintln!("Failed to insert employee {name}: {e}");
        } else {
            inserted += 1;
        }
    }
    println!("  Inserted {inserted} employees");
}

async fn seed_expense_categories(db: &DatabaseConnection) {
    let mut inserted = 0;
    for (id, name) in EXPENSE_CATEGORIES {
        let id = Uuid::from_u128(id);
        if expense_categories::Entity::find_by_id(id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            continue;
        }

        let category = expense_categories::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
        };
        if let Err(e) = category.insert(db).await {
            eprintln!("Failed to insert expense category {name}: {e}");
        } else {
            inserted += 1;
        }
    }
    println!("  Inserted {inserted} expense categories");
}
