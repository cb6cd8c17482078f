//! # Seed Data Generator
//!
//! Populates the database with test inventory for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p bodega-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p bodega-db --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p bodega-db --bin seed -- --db ./data/bodega.db
//! ```
//!
//! ## Generated Data
//! Creates a handful of categories and suppliers, then products spread
//! across them with varied prices and stock levels. Roughly one product
//! in five lands at or below its minimum stock so the low-stock report
//! has something to show.

use std::env;

use bodega_core::{Category, Product, Supplier};
use bodega_db::{Database, DbConfig};

const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Abarrotes",
        &[
            "Arroz 1kg", "Frijol negro 1kg", "Azucar 1kg", "Sal 500g", "Harina 1kg",
            "Aceite vegetal 1L", "Pasta espagueti", "Atun en lata", "Sardinas en lata",
            "Cafe soluble 200g", "Lentejas 500g", "Avena 400g",
        ],
    ),
    (
        "Bebidas",
        &[
            "Agua 1.5L", "Refresco cola 2L", "Jugo de naranja 1L", "Leche entera 1L",
            "Cerveza clara 355ml", "Agua mineral 600ml", "Te helado 1L", "Bebida isotonica",
        ],
    ),
    (
        "Limpieza",
        &[
            "Detergente 1kg", "Cloro 1L", "Jabon de barra", "Suavizante 850ml",
            "Limpiador multiusos", "Escoba", "Fibra esponja", "Bolsas de basura",
        ],
    ),
    (
        "Botanas",
        &[
            "Papas fritas 45g", "Cacahuates salados", "Galletas marias", "Chocolate en barra",
            "Palomitas de maiz", "Chicharrones 60g", "Gomitas 100g", "Barritas de fruta",
        ],
    ),
];

const SUPPLIERS: &[(&str, &str)] = &[
    ("Distribuidora Central", "Ciudad de Mexico"),
    ("Abarrotera del Norte", "Monterrey"),
    ("Comercial La Esquina", "Guadalajara"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./bodega_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bodega Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./bodega_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bodega Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count_active().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Categories and suppliers first, products reference them
    let mut category_ids = Vec::new();
    for (name, _) in CATEGORIES {
        let category = Category::new(*name);
        db.categories().insert(&category).await?;
        category_ids.push(category.id);
    }

    let mut supplier_ids = Vec::new();
    for (name, city) in SUPPLIERS {
        let mut supplier = Supplier::new(*name);
        supplier.city = Some(city.to_string());
        supplier.country = Some("Mexico".to_string());
        db.suppliers().insert(&supplier).await?;
        supplier_ids.push(supplier.id);
    }

    println!("✓ Seeded {} categories, {} suppliers", category_ids.len(), supplier_ids.len());
    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: loop {
        for (category_idx, (_, names)) in CATEGORIES.iter().enumerate() {
            for (name_idx, name) in names.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = generated + category_idx * 31 + name_idx * 7;
                let product = generate_product(
                    name,
                    seed,
                    generated / (CATEGORIES.len() * names.len()),
                    &category_ids[category_idx],
                    &supplier_ids[seed % supplier_ids.len()],
                );

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    let low = db.products().low_stock().await?;
    println!("  Low stock: {} products", low.len());
    let value = db.products().inventory_value().await?;
    println!("  Inventory value: {}.{:02}", value / 100, value % 100);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with varied but deterministic data.
fn generate_product(
    name: &str,
    seed: usize,
    round: usize,
    category_id: &str,
    supplier_id: &str,
) -> Product {
    // $0.50 - $8.49
    let price_cents = 50 + ((seed * 13) % 800) as i64;

    let min_stock = (2 + seed % 8) as i64;
    // Every fifth product sits at or below its minimum
    let current_stock = if seed % 5 == 0 {
        min_stock - (seed % 3) as i64
    } else {
        min_stock + 5 + (seed % 40) as i64
    };

    let display_name = if round == 0 {
        name.to_string()
    } else {
        format!("{} ({})", name, round + 1)
    };

    let mut product = Product::new(
        display_name,
        price_cents,
        current_stock.max(0),
        min_stock,
        category_id,
        supplier_id,
    );
    product.barcode = Some(format!("750{:010}", seed));
    product
}
