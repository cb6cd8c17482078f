//! End-to-end sync tests: hub with seeded documents, client fetch, bulk
//! sync into an in-memory database.

use serde_json::{json, Map, Value};

use bodega_core::{FALLBACK_CATEGORY_ID, FALLBACK_SUPPLIER_ID};
use bodega_db::{Database, DbConfig};
use bodega_sync::{
    CollectionSettings, Document, DocumentHub, HubConfig, HubHandle, MemoryStore, RemoteStore,
    SyncService, WriteExecutor,
};

fn fields(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut m = Map::new();
    for (k, v) in pairs {
        m.insert(k.to_string(), v.clone());
    }
    m
}

/// Starts a hub on a free loopback port.
async fn start_hub() -> HubHandle {
    let store = MemoryStore::new();
    let config = HubConfig {
        port: 0,
        bind_addr: "127.0.0.1".to_string(),
    };
    DocumentHub::new(config, store).start().await.unwrap()
}

async fn seed_demo_store(hub: &HubHandle) {
    let store = hub.store();

    store
        .seed(
            "categorias",
            vec![
                Document::new(
                    "cat-1",
                    fields(&[("nombre_categoria", json!("Abarrotes")), ("id_categoria", json!(1))]),
                ),
                Document::new(
                    "cat-2",
                    fields(&[("nombre", json!("Bebidas")), ("idCategoria", json!(2))]),
                ),
            ],
        )
        .await;

    store
        .seed(
            "proveedores",
            vec![Document::new(
                "sup-1",
                fields(&[
                    ("nombre_proveedor", json!("Distribuidora Norte")),
                    ("id_proveedor", json!(10)),
                    ("ciudad", json!("Monterrey")),
                ]),
            )],
        )
        .await;

    store
        .seed(
            "productos",
            vec![
                Document::new(
                    "prod-1",
                    fields(&[
                        ("nombre_producto", json!("Arroz 1kg")),
                        ("precio_unitario", json!(23.5)),
                        ("stock_actual", json!(40)),
                        ("stock_minimo", json!(5)),
                        ("id_categoria", json!(1)),
                        ("id_proveedor", json!(10)),
                    ]),
                ),
                Document::new(
                    "prod-2",
                    fields(&[
                        ("nombre", json!("Refresco cola 2L")),
                        ("precio", json!(32)),
                        ("stock", json!(3)),
                        ("stockMin", json!(6)),
                        ("idCategoria", json!("2")),
                    ]),
                ),
                // Nameless, must be skipped and counted as an error
                Document::new("prod-3", fields(&[("precio", json!(5))])),
            ],
        )
        .await;
}

async fn make_service(hub: &HubHandle) -> (SyncService, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let store = RemoteStore::new(hub.url());
    let executor = WriteExecutor::new(2);
    let service = SyncService::new(
        db.clone(),
        store,
        executor,
        CollectionSettings::default(),
    );
    (service, db)
}

#[tokio::test]
async fn test_client_fetches_seeded_snapshot() {
    let hub = start_hub().await;
    seed_demo_store(&hub).await;

    let client = RemoteStore::new(hub.url());
    let docs = client.fetch_collection("productos").await.unwrap();
    assert_eq!(docs.len(), 3);

    let empty = client.fetch_collection("desconocida").await.unwrap();
    assert!(empty.is_empty());

    hub.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_client_document_writes() {
    let hub = start_hub().await;
    let client = RemoteStore::new(hub.url());

    let doc_id = client
        .add_document("productos", fields(&[("nombre", json!("Nuevo"))]))
        .await
        .unwrap();

    client
        .update_document("productos", &doc_id, fields(&[("nombre", json!("Renombrado"))]))
        .await
        .unwrap();

    client.delete_document("productos", &doc_id).await.unwrap();

    // Deleting again is rejected by the store
    let err = client.delete_document("productos", &doc_id).await.unwrap_err();
    assert!(matches!(err, bodega_sync::SyncError::Rejected { .. }));

    hub.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_sync_all_populates_local_cache() {
    let hub = start_hub().await;
    seed_demo_store(&hub).await;
    let (service, db) = make_service(&hub).await;

    let before = db.products().count_active().await.unwrap();
    assert_eq!(before, 0);

    let summary = service.sync_all().await;

    assert_eq!(summary.categories, 2);
    assert_eq!(summary.suppliers, 1);
    assert_eq!(summary.products, 2);
    // The nameless document is reported, not fatal
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("prod-3"));

    // First sync of N valid products raises the active count by N
    assert_eq!(db.products().count_active().await.unwrap(), 2);

    // References resolved through remote business keys
    let products = db.products().list_active().await.unwrap();
    let arroz = products.iter().find(|p| p.name == "Arroz 1kg").unwrap();
    assert_eq!(arroz.price_cents, 2350);
    let category = db
        .categories()
        .get_by_id(&arroz.category_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(category.name, "Abarrotes");
    // No supplier reference on prod-2, falls back
    let cola = products.iter().find(|p| p.name == "Refresco cola 2L").unwrap();
    assert_eq!(cola.supplier_id, FALLBACK_SUPPLIER_ID);

    hub.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_repeat_sync_does_not_duplicate() {
    let hub = start_hub().await;
    seed_demo_store(&hub).await;
    let (service, db) = make_service(&hub).await;

    service.sync_all().await;
    let first = db.products().count_active().await.unwrap();

    let summary = service.sync_all().await;
    assert_eq!(summary.products, 2);
    assert_eq!(db.products().count_active().await.unwrap(), first);

    hub.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_sync_products_refresh_uses_cached_references() {
    let hub = start_hub().await;
    seed_demo_store(&hub).await;
    let (service, db) = make_service(&hub).await;

    service.sync_all().await;

    // Remote stock changes; refresh only products
    hub.store()
        .update(
            "productos",
            "prod-1",
            fields(&[
                ("nombre_producto", json!("Arroz 1kg")),
                ("precio_unitario", json!(25.0)),
                ("stock_actual", json!(38)),
                ("stock_minimo", json!(5)),
                ("id_categoria", json!(1)),
                ("id_proveedor", json!(10)),
            ]),
        )
        .await;

    let summary = service.sync_products().await;
    assert_eq!(summary.products, 2);
    assert_eq!(summary.categories, 0);

    let products = db.products().list_active().await.unwrap();
    let arroz = products.iter().find(|p| p.name == "Arroz 1kg").unwrap();
    assert_eq!(arroz.price_cents, 2500);
    assert_eq!(arroz.current_stock, 38);
    // Still resolved against the previously-synced category
    assert_ne!(arroz.category_id, FALLBACK_CATEGORY_ID);

    hub.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_sync_against_unreachable_store_reports_errors() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let store = RemoteStore::new("ws://127.0.0.1:1/ws")
        .with_timeout(std::time::Duration::from_secs(1));
    let executor = WriteExecutor::new(1);
    let service = SyncService::new(db.clone(), store, executor, CollectionSettings::default());

    let summary = service.sync_all().await;

    // One error per collection, no partial writes
    assert_eq!(summary.errors.len(), 3);
    assert_eq!(summary.total(), 0);
    assert_eq!(db.products().count_active().await.unwrap(), 0);
}

#[tokio::test]
async fn test_low_stock_after_sync() {
    let hub = start_hub().await;
    seed_demo_store(&hub).await;
    let (service, db) = make_service(&hub).await;

    service.sync_all().await;

    // prod-2 has stock 3 against a minimum of 6
    let low = db.products().low_stock().await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].name, "Refresco cola 2L");

    hub.shutdown().await.unwrap();
}
