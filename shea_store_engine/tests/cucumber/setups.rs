use cucumber::given;
use shea_common::Cents;
use shea_store_engine::{
    db_types::{NewCategory, NewProduct},
    AuthApi,
    CatalogManagement,
    GatewayError,
};

use crate::cucumber::{store_world::StoreSystem, StoreWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut StoreWorld) {
    let system = StoreSystem::new().await;
    world.system = Some(system);
}

#[given(expr = "a product '{word}' priced at {word}")]
async fn a_product(world: &mut StoreWorld, name: String, price: String) {
    let price = price.parse::<Cents>().expect("Not a valid price");
    let db = &world.system().db;
    let category = db
        .insert_category(NewCategory::new(name.clone(), name.to_lowercase()))
        .await
        .expect("Error creating category");
    let product = NewProduct::new(name.clone(), price).with_stock(100).in_category(category.id);
    let product = db.insert_product(product).await.expect("Error creating product");
    world.system_mut().products.insert(name, product.id);
}

#[given(expr = "a customer '{word}'")]
async fn a_customer(world: &mut StoreWorld, name: String) {
    let api = AuthApi::new(world.system().db.clone());
    let user = api.register(&name, &format!("{name}@example.com"), "karite-2024").await.expect("Error registering");
    world.system_mut().users.insert(name, user);
}

#[given("the gateway declines new payments")]
async fn gateway_declines(world: &mut StoreWorld) {
    let err = GatewayError::Rejected { code: "608".into(), message: "MINIMUM_REQUIRED_FIELDS".into() };
    world.system().gateway.will_create(Err(err));
}
