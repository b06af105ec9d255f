//! Shared fixtures for the API integration tests: in-memory stand-ins
//! for both databases and a router builder wired exactly like the real
//! server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use nova_gateway::auth::api_key::ApiKeyDirectory;
use nova_gateway::auth::jwt::{JwtConfig, JwtManager};
use nova_gateway::auth::user::{Role, UserDirectory};
use nova_gateway::config::GatewayConfig;
use nova_gateway::http_server::{build_router, AppState, HttpServerConfig};
use nova_gateway::query::PageRequest;
use nova_gateway::reconcile::SyncLog;
use nova_gateway::storefront::{StorefrontProduct, StorefrontReader, StorefrontResult};
use nova_gateway::warehouse::{
    BrandSummary, CatalogItem, CatalogRawRow, InventoryQuery, InventoryRow, InventorySummary,
    InvoiceQuery, InvoiceRow, InvoiceSummary, NovasoftProduct, Paged, PriceListRow,
    WarehouseError, WarehouseReader, WarehouseResult, WarrantyRecord, WarrantyRow,
};

pub const TEST_USER: &str = "admin";
pub const TEST_PASSWORD: &str = "s3cret";
pub const TEST_API_KEY: &str = "svc-key-123";

/// Warehouse stand-in serving canned rows and counting every call, so
/// tests can assert that rejected requests never touch the database.
#[derive(Default)]
pub struct MockWarehouse {
    calls: AtomicUsize,
}

impl MockWarehouse {
    pub fn hits(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn inventory_row(cod_item: &str, existencia: f64) -> InventoryRow {
    InventoryRow {
        ciudad: "AGUACHICA".to_string(),
        ano_acu: "2025".to_string(),
        cod_item: cod_item.to_string(),
        des_item: format!("ITEM {cod_item}"),
        cod_gru: "010".to_string(),
        nom_gru: "MOTOCICLETAS".to_string(),
        cod_mar: "M1".to_string(),
        des_mar: "AKT".to_string(),
        nom_sub: "URBANAS".to_string(),
        des_medida: "UND".to_string(),
        nom_bod: "PRINCIPAL".to_string(),
        cod_bod: "006".to_string(),
        cod_suc: "01".to_string(),
        ubi_est: None,
        existencia,
        valor: existencia * 100.0,
        ult_comp: None,
        fecha_act: None,
        dias_uc: 30,
        empresa: "CBB".to_string(),
    }
}

fn invoice_row(num_doc: &str) -> InvoiceRow {
    InvoiceRow {
        tienda: "AGUACHICA".to_string(),
        ano_doc: "2025".to_string(),
        tip_doc: "FACTURA".to_string(),
        num_doc: num_doc.to_string(),
        fecha: None,
        cod_mar: "M1".to_string(),
        des_mar: "AKT".to_string(),
        cod_grupo: "010".to_string(),
        nom_gru: "MOTOCICLETAS".to_string(),
        cod_subgrupo: "02".to_string(),
        nom_sub: "URBANAS".to_string(),
        nom_ven: "PEREZ JUAN".to_string(),
        cantidad: 1.0,
        ven_net: 100000.0,
        mon_iva: 19000.0,
        val_def: 0.0,
        valor: 119000.0,
    }
}

fn warranty_record() -> WarrantyRecord {
    WarrantyRecord::from(WarrantyRow {
        empresa: Some("CBB".to_string()),
        vendedor: Some("V01".to_string()),
        nom_ven: Some("PEREZ JUAN".to_string()),
        item: Some("ITM001".to_string()),
        des_item: Some("GARANTIA EXT 12M".to_string()),
        cod_mar: Some("Z1".to_string()),
        des_mar: Some("ZURICH".to_string()),
        cod_grupo: Some("010".to_string()),
        nom_gru: Some("LINEA BLANCA".to_string()),
        cod_subgrupo: Some("02".to_string()),
        nom_sub: Some("NEVERAS".to_string()),
        cod_suc: Some("AGH".to_string()),
        nom_suc: Some("AGUACHICA".to_string()),
        cod_cco: Some("001".to_string()),
        nom_cco: Some("PRINCIPAL".to_string()),
        fecha: None,
        hora: Some("10:30".to_string()),
        tip_doc: Some("510".to_string()),
        num_doc: Some("000123".to_string()),
        cantidad: 1.0,
        ven_net: 250000.0,
        mon_iva: 47500.0,
        val_def: 0.0,
        forma_pago: Some("CONTADO".to_string()),
        cod_bod: Some("006".to_string()),
        nom_bod: Some("PRINCIPAL".to_string()),
        cos_pro: 180000.0,
        tipo_cliente: Some("CLIENTE NUEVO".to_string()),
        cedula: Some("12345678".to_string()),
        nombre: Some("MARIA GOMEZ".to_string()),
        direccion: Some("CLL 1 # 2-3".to_string()),
        telefono: Some("3000000000".to_string()),
    })
}

#[async_trait]
impl WarehouseReader for MockWarehouse {
    async fn inventory(
        &self,
        _query: &InventoryQuery,
        _page: &PageRequest,
    ) -> WarehouseResult<(Paged<InventoryRow>, InventorySummary)> {
        self.hit();
        Ok((
            Paged {
                rows: vec![inventory_row("MOTO01", 3.0), inventory_row("MOTO02", 2.0)],
                total: 2,
            },
            InventorySummary {
                total_existencia: 5.0,
                total_valor: 500.0,
                total_items: 2,
            },
        ))
    }

    async fn inventory_by_brand(
        &self,
        _query: &InventoryQuery,
    ) -> WarehouseResult<Vec<BrandSummary>> {
        self.hit();
        Ok(vec![BrandSummary {
            des_mar: "AKT".to_string(),
            items: 2,
            total_existencia: 5.0,
            total_valor: 500.0,
        }])
    }

    async fn invoices(
        &self,
        _query: &InvoiceQuery,
        _page: &PageRequest,
    ) -> WarehouseResult<(Paged<InvoiceRow>, InvoiceSummary)> {
        self.hit();
        Ok((
            Paged {
                rows: vec![invoice_row("000001")],
                total: 1,
            },
            InvoiceSummary {
                total_cantidad: 1.0,
                total_venta_neta: 100000.0,
                total_monto_iva: 19000.0,
                total_descuento: 0.0,
                total_valor: 119000.0,
                total_con_iva: 119000.0,
            },
        ))
    }

    async fn warranty_sales(
        &self,
        _year: i32,
        _page: &PageRequest,
    ) -> WarehouseResult<Paged<WarrantyRecord>> {
        self.hit();
        Ok(Paged {
            rows: vec![warranty_record()],
            total: 1,
        })
    }

    async fn catalog(&self, _page: &PageRequest) -> WarehouseResult<Paged<CatalogItem>> {
        self.hit();
        Ok(Paged {
            rows: vec![CatalogItem::from(CatalogRawRow {
                cod_item: "MOTO01".to_string(),
                des_item: "MOTO 150CC".to_string(),
                existencia: 3.0,
                por_iva: Some(19.0),
                pre_vta: 1000.0,
                cod_lis: "11".to_string(),
            })],
            total: 1,
        })
    }

    async fn stock_by_location(
        &self,
        _bodega: &str,
        _sucursal: &str,
        _empresa: &str,
    ) -> WarehouseResult<Vec<NovasoftProduct>> {
        self.hit();
        Ok(vec![
            NovasoftProduct {
                cod_item: "MOTO01".to_string(),
                des_item: "MOTO 150CC".to_string(),
                existencia: 3.0,
            },
            // rounds to zero: still included in con-precios
            NovasoftProduct {
                cod_item: "MOTO02".to_string(),
                des_item: "MOTO 200CC".to_string(),
                existencia: -0.4,
            },
            // rounds below zero: excluded from con-precios
            NovasoftProduct {
                cod_item: "MOTO03".to_string(),
                des_item: "MOTO 250CC".to_string(),
                existencia: -1.0,
            },
            // kit component code: must be excluded from con-precios
            NovasoftProduct {
                cod_item: "KIT/01".to_string(),
                des_item: "KIT CARBURADOR".to_string(),
                existencia: 5.0,
            },
        ])
    }

    async fn price_list(
        &self,
        lista: &str,
        _sucursal: &str,
    ) -> WarehouseResult<Vec<PriceListRow>> {
        self.hit();
        let precioiva = match lista {
            "22" => 210000.0,
            _ => 199000.0,
        };
        Ok(["MOTO01", "MOTO02", "MOTO03"]
            .iter()
            .map(|cod_item| PriceListRow {
                cod_lis: lista.to_string(),
                cod_item: cod_item.to_string(),
                precioiva,
            })
            .collect())
    }

    async fn named_query(
        &self,
        name: &str,
        _params: &[String],
    ) -> WarehouseResult<Vec<Value>> {
        self.hit();
        if name == "inventario_resumen" {
            Ok(vec![serde_json::json!({"total_items": 42})])
        } else {
            Err(WarehouseError::UnknownNamedQuery(name.to_string()))
        }
    }

    async fn product_count(&self) -> WarehouseResult<i64> {
        self.hit();
        Ok(120)
    }
}

/// Storefront stand-in over a fixed product map
#[derive(Default)]
pub struct MockStorefront {
    products: HashMap<String, StorefrontProduct>,
    calls: AtomicUsize,
}

impl MockStorefront {
    pub fn with_product(mut self, code: &str, regular: f64, current: f64, stock: i64) -> Self {
        self.products.insert(
            code.to_string(),
            StorefrontProduct {
                code: code.to_string(),
                regular_price: Some(regular),
                current_price: Some(current),
                stock: Some(stock),
            },
        );
        self
    }

    pub fn hits(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorefrontReader for MockStorefront {
    async fn lookup(&self, code: &str) -> StorefrontResult<Option<StorefrontProduct>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.products.get(code).cloned())
    }

    async fn product_count(&self) -> StorefrontResult<i64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(85)
    }
}

fn test_config() -> GatewayConfig {
    GatewayConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        public_url: None,
        warehouse_url: "mysql://unused/warehouse".to_string(),
        storefront_url: "mysql://unused/store".to_string(),
        warehouse_pool_size: 1,
        storefront_pool_size: 1,
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expires_secs: 3600,
        users_spec: format!("{TEST_USER}:{TEST_PASSWORD}:admin"),
        api_keys_spec: format!("{TEST_API_KEY}:updater"),
        invoice_year: Some(2025),
        environment: "development".to_string(),
    }
}

pub fn test_state(storefront: MockStorefront) -> Arc<AppState<MockWarehouse, MockStorefront>> {
    let config = test_config();
    Arc::new(AppState {
        jwt: JwtManager::new(JwtConfig {
            secret: config.jwt_secret.clone(),
            expires_secs: config.jwt_expires_secs,
        }),
        users: UserDirectory::from_spec(&config.users_spec).expect("valid test users"),
        api_keys: ApiKeyDirectory::from_spec(&config.api_keys_spec),
        warehouse: MockWarehouse::default(),
        storefront: Arc::new(storefront),
        sync_log: SyncLog::new(),
        config,
    })
}

pub fn test_router(state: Arc<AppState<MockWarehouse, MockStorefront>>) -> Router {
    let config = HttpServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        development: true,
    };
    build_router(&config, state)
}

pub fn bearer_token(state: &AppState<MockWarehouse, MockStorefront>) -> String {
    state
        .jwt
        .issue(TEST_USER, Role::Admin)
        .expect("token issuance")
}

pub fn get_request(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

pub fn post_request(path: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Drive one request through the router and decode the JSON body
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}
