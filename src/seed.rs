//! Sample-data seeding through the write coordinator.
//!
//! Every seeded item takes the same path as a user-created one, so seeding
//! exercises the full index-first write sequence. Re-running is safe:
//! duplicates come back as conflicts and are skipped.

use anyhow::Result;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::models::NewItem;

struct Sample {
    name: &'static str,
    description: &'static str,
    price: f64,
    stock: i64,
    category: &'static str,
    subcategory: &'static str,
    location: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        name: "Gaming Laptop",
        description: "Powerful laptop for gaming and video editing",
        price: 1299.99,
        stock: 50,
        category: "Electronics",
        subcategory: "Computers",
        location: "New York",
    },
    Sample {
        name: "Mechanical Keyboard",
        description: "Tenkeyless keyboard with hot-swappable switches",
        price: 89.5,
        stock: 120,
        category: "Electronics",
        subcategory: "Peripherals",
        location: "Berlin",
    },
    Sample {
        name: "4K Monitor",
        description: "27 inch IPS display with USB-C input",
        price: 349.0,
        stock: 35,
        category: "Electronics",
        subcategory: "Displays",
        location: "New York",
    },
    Sample {
        name: "Claw Hammer",
        description: "16 oz steel claw hammer with fiberglass handle",
        price: 14.99,
        stock: 200,
        category: "Tools",
        subcategory: "Hand tools",
        location: "Chicago",
    },
    Sample {
        name: "Cordless Drill",
        description: "18V drill driver with two batteries and charger",
        price: 129.0,
        stock: 64,
        category: "Tools",
        subcategory: "Power tools",
        location: "Chicago",
    },
    Sample {
        name: "Socket Wrench Set",
        description: "40-piece metric socket set in a blow-molded case",
        price: 45.75,
        stock: 80,
        category: "Tools",
        subcategory: "Hand tools",
        location: "Berlin",
    },
    Sample {
        name: "Espresso Machine",
        description: "Semi-automatic espresso machine with steam wand",
        price: 420.0,
        stock: 18,
        category: "Kitchen",
        subcategory: "Coffee",
        location: "Madrid",
    },
    Sample {
        name: "Chef Knife",
        description: "8 inch forged chef knife, full tang",
        price: 75.0,
        stock: 95,
        category: "Kitchen",
        subcategory: "Cutlery",
        location: "Madrid",
    },
    Sample {
        name: "Cast Iron Skillet",
        description: "Pre-seasoned 12 inch cast iron skillet",
        price: 32.99,
        stock: 140,
        category: "Kitchen",
        subcategory: "Cookware",
        location: "New York",
    },
    Sample {
        name: "Trail Backpack",
        description: "35L hiking backpack with rain cover",
        price: 110.0,
        stock: 42,
        category: "Outdoors",
        subcategory: "Packs",
        location: "Denver",
    },
    Sample {
        name: "Camping Stove",
        description: "Two-burner propane camping stove",
        price: 68.0,
        stock: 30,
        category: "Outdoors",
        subcategory: "Cooking",
        location: "Denver",
    },
    Sample {
        name: "Headlamp",
        description: "Rechargeable 400 lumen headlamp",
        price: 24.5,
        stock: 180,
        category: "Outdoors",
        subcategory: "Lighting",
        location: "Denver",
    },
];

/// Seed the catalog with the sample items. Returns how many were created;
/// items whose names already exist are skipped.
pub async fn run_seed(catalog: &Catalog) -> Result<usize> {
    let mut created = 0;

    for sample in SAMPLES {
        let candidate = NewItem {
            name: sample.name.to_string(),
            description: sample.description.to_string(),
            price: sample.price,
            stock: sample.stock,
            category: sample.category.to_string(),
            subcategory: sample.subcategory.to_string(),
            location: sample.location.to_string(),
        };

        match catalog.create_item(candidate).await {
            Ok(item) => {
                println!("  created {} ({})", item.name, item.id);
                created += 1;
            }
            Err(CatalogError::Conflict { name }) => {
                println!("  {} already present, skipping", name);
            }
            Err(other) => return Err(other.into()),
        }
    }

    println!("Seeded {} of {} items", created, SAMPLES.len());
    Ok(created)
}
