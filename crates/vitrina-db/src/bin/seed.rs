//! # Demo Store Seeder
//!
//! Populates a database with one demo store for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./vitrina_dev.db
//! cargo run -p vitrina-db --bin seed
//!
//! # Specify database path and owner
//! cargo run -p vitrina-db --bin seed -- --db ./data/vitrina.db --owner dev-owner
//! ```
//!
//! ## Generated Data
//! - Store "Bodega Demo" at subdomain `bodega-demo` with its default pages
//! - Parent categories with subcategories (Bebidas → Jugos, Gaseosas, ...)
//! - A few products per subcategory, SKU `{CATEGORY}-{INDEX}`
//! - Two delivery zones around the store location

use std::env;

use vitrina_core::zone::LatLng;
use vitrina_core::{
    DeliveryZoneInput, LocalizedText, NewCategory, NewStore, ProductInput, ProductStatus,
    StockTracking, StoreLocation, ZoneShape,
};
use vitrina_db::{Database, DbConfig};

/// (code, parent es, parent en, [(sub es, sub en, [products])])
type CategorySeed = (
    &'static str,
    &'static str,
    &'static str,
    &'static [(&'static str, &'static str, &'static [&'static str])],
);

const CATEGORIES: &[CategorySeed] = &[
    (
        "BEB",
        "Bebidas",
        "Drinks",
        &[
            ("Jugos", "Juices", &["Jugo de mango", "Jugo de naranja", "Chicha morada"]),
            ("Gaseosas", "Sodas", &["Inca Kola 500ml", "Coca-Cola 500ml", "Sprite 500ml"]),
            ("Aguas", "Water", &["Agua San Luis 625ml", "Agua con gas 500ml"]),
        ],
    ),
    (
        "SNK",
        "Snacks",
        "Snacks",
        &[
            ("Papitas", "Chips", &["Papas Lays clásicas", "Chifles", "Camote frito"]),
            ("Galletas", "Cookies", &["Galleta Casino", "Galleta Soda Field"]),
        ],
    ),
    (
        "ABA",
        "Abarrotes",
        "Groceries",
        &[
            ("Arroz y menestras", "Rice and legumes", &["Arroz Costeño 1kg", "Lentejas 500g"]),
            ("Aceites", "Oils", &["Aceite Primor 1L"]),
        ],
    ),
];

const STORE_LAT: f64 = -12.1211;
const STORE_LNG: f64 = -77.0297;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./vitrina_dev.db");
    let mut owner_id = String::from("demo-owner");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--owner" | "-o" => {
                if i + 1 < args.len() {
                    owner_id = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Vitrina Demo Store Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (default: ./vitrina_dev.db)");
                println!("  -o, --owner <ID>     Owner id of the demo store (default: demo-owner)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Vitrina Demo Store Seeder");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Owner:    {}", owner_id);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if let Some(store) = db.stores().get_by_owner(&owner_id).await? {
        println!("⚠ Owner already has store '{}'", store.subdomain);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let store = db
        .stores()
        .create_store(NewStore {
            owner_id,
            store_name: "Bodega Demo".to_string(),
            subdomain: "bodega-demo".to_string(),
            location: StoreLocation {
                address: "Av. Larco 345".to_string(),
                city: "Miraflores".to_string(),
                country: "PE".to_string(),
                lat: Some(STORE_LAT),
                lng: Some(STORE_LNG),
            },
            ..Default::default()
        })
        .await?;
    println!("✓ Created store {} ({})", store.store_name, store.id);

    let tenant = db.tenant(&store.id);
    let categories = tenant.categories();
    let products = tenant.products();

    let mut generated = 0;
    for (code, parent_es, parent_en, subcategories) in CATEGORIES {
        let parent = categories
            .create(NewCategory {
                name: LocalizedText::new(*parent_es, *parent_en),
                ..Default::default()
            })
            .await?;

        for (sub_es, sub_en, names) in subcategories.iter() {
            let sub = categories
                .create(NewCategory {
                    name: LocalizedText::new(*sub_es, *sub_en),
                    parent_category_id: Some(parent.id.clone()),
                    ..Default::default()
                })
                .await?;

            for name in names.iter() {
                generated += 1;
                let input = ProductInput {
                    name: name.to_string(),
                    category_id: Some(parent.id.clone()),
                    subcategory_id: Some(sub.id.clone()),
                    sku: Some(format!("{}-{:03}", code, generated)),
                    status: ProductStatus::Active,
                    price_cents: 150 + ((generated * 37) % 1_200) as i64,
                    stock: StockTracking::Product {
                        quantity: (generated * 13 % 60) as i64,
                    },
                    ..Default::default()
                };
                if let Err(e) = products.create(input).await {
                    eprintln!("Failed to insert {}: {}", name, e);
                }
            }
        }
    }
    println!("✓ Created {} categories", categories.list().await?.len());
    println!("✓ Created {} products", generated);

    let zones = tenant.delivery_zones();
    zones
        .create(DeliveryZoneInput {
            name: "Miraflores".to_string(),
            shape: ZoneShape::Circle {
                center: LatLng::new(STORE_LAT, STORE_LNG),
                radius_m: 2_500.0,
            },
            price_cents: 500,
            color: "#22c55e".to_string(),
            estimated_time: "30-45 min".to_string(),
            is_active: true,
        })
        .await?;
    zones
        .create(DeliveryZoneInput {
            name: "Lima Sur".to_string(),
            shape: ZoneShape::Polygon {
                vertices: vec![
                    LatLng::new(-12.10, -77.05),
                    LatLng::new(-12.10, -76.98),
                    LatLng::new(-12.18, -76.98),
                    LatLng::new(-12.18, -77.05),
                ],
            },
            price_cents: 900,
            color: "#f59e0b".to_string(),
            estimated_time: "1-2 horas".to_string(),
            is_active: true,
        })
        .await?;
    println!("✓ Created 2 delivery zones");

    db.close().await;
    println!();
    println!("✓ Seed complete! Open https://{}.vitrina.pe", store.subdomain);

    Ok(())
}
