//! # Warehouse Access
//!
//! Read-only access to the warehouse reporting database. Every
//! operation follows the same shape: a `FilterSet` produces the WHERE
//! clause and bind list, then the page query, count query and summary
//! query run concurrently with identical predicates. If any of the
//! three fails the whole request fails; partial results are never
//! returned.

use async_trait::async_trait;
use chrono::Datelike;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

use crate::query::{FilterSet, PageRequest};

pub mod errors;
pub mod named;
pub mod rows;

pub use errors::{WarehouseError, WarehouseResult};
pub use rows::{
    BrandSummary, CatalogItem, CatalogRawRow, InventoryRow, InventorySummary, InvoiceRow,
    InvoiceSummary, NovasoftProduct, PriceListRow, WarrantyRecord, WarrantyRow,
};

/// One page of rows plus the filtered total
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub rows: Vec<T>,
    pub total: i64,
}

/// Allow-listed inventory filters
#[derive(Debug, Clone, Default)]
pub struct InventoryQuery {
    pub ciudad: Option<String>,
    pub empresa: Option<String>,
    pub nom_gru: Option<String>,
}

impl InventoryQuery {
    fn filters(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        filters
            .eq("ciudad", self.ciudad.as_deref())
            .eq("empresa", self.empresa.as_deref())
            .eq("NOM_GRU", self.nom_gru.as_deref());
        filters
    }
}

/// Allow-listed invoice filters plus the mandatory year
#[derive(Debug, Clone)]
pub struct InvoiceQuery {
    pub tienda: Option<String>,
    pub ano_doc: Option<String>,
    pub cod_mar: Option<String>,
    pub cod_grupo: Option<String>,
    pub cod_subgrupo: Option<String>,
    /// Resolved from config or the current year; always present so the
    /// base query set is bounded
    pub year: i32,
}

impl InvoiceQuery {
    fn filters(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        filters
            .require_eq("tipo", "FACTURA")
            .require_clause("YEAR(fecha) = ?", self.year.to_string())
            .eq("tienda", self.tienda.as_deref())
            .eq("ano_doc", self.ano_doc.as_deref())
            .eq("cod_mar", self.cod_mar.as_deref())
            .eq("cod_grupo", self.cod_grupo.as_deref())
            .eq("cod_subgrupo", self.cod_subgrupo.as_deref());
        filters
    }
}

/// Read-side contract against the warehouse database
#[async_trait]
pub trait WarehouseReader: Send + Sync + 'static {
    async fn inventory(
        &self,
        query: &InventoryQuery,
        page: &PageRequest,
    ) -> WarehouseResult<(Paged<InventoryRow>, InventorySummary)>;

    async fn inventory_by_brand(&self, query: &InventoryQuery)
        -> WarehouseResult<Vec<BrandSummary>>;

    async fn invoices(
        &self,
        query: &InvoiceQuery,
        page: &PageRequest,
    ) -> WarehouseResult<(Paged<InvoiceRow>, InvoiceSummary)>;

    async fn warranty_sales(
        &self,
        year: i32,
        page: &PageRequest,
    ) -> WarehouseResult<Paged<WarrantyRecord>>;

    async fn catalog(&self, page: &PageRequest) -> WarehouseResult<Paged<CatalogItem>>;

    async fn stock_by_location(
        &self,
        bodega: &str,
        sucursal: &str,
        empresa: &str,
    ) -> WarehouseResult<Vec<NovasoftProduct>>;

    async fn price_list(&self, lista: &str, sucursal: &str)
        -> WarehouseResult<Vec<PriceListRow>>;

    async fn named_query(
        &self,
        name: &str,
        params: &[String],
    ) -> WarehouseResult<Vec<serde_json::Value>>;

    /// Total distinct products, used by the sync status report
    async fn product_count(&self) -> WarehouseResult<i64>;
}

const INVENTORY_VIEW: &str = "V_INV_BIN007_POWER_BI_TOTAL";
const INVOICE_VIEW: &str = "V_INV_BVEN020_POWER_BI_TOTAL";

const INVENTORY_COLUMNS: &str = "\
    ciudad, ANO_ACU AS ano_acu, COD_ITEM AS cod_item, DES_ITEM AS des_item, \
    COD_GRU AS cod_gru, NOM_GRU AS nom_gru, COD_MAR AS cod_mar, DES_MAR AS des_mar, \
    NOM_SUB AS nom_sub, DES_MEDIDA AS des_medida, NOM_BOD AS nom_bod, COD_BOD AS cod_bod, \
    cod_suc, UBI_EST AS ubi_est, CAST(EXISTENCIA AS DOUBLE) AS existencia, \
    CAST(VALOR AS DOUBLE) AS valor, ult_comp, fecha_act, \
    CAST(DiasUC AS SIGNED) AS dias_uc, empresa";

const INVOICE_COLUMNS: &str = "\
    tienda, ano_doc, tip_doc, num_doc, fecha, cod_mar, des_mar, \
    cod_grupo, nom_gru, cod_subgrupo, nom_sub, nom_ven, \
    CAST(cantidad AS DOUBLE) AS cantidad, CAST(ven_net AS DOUBLE) AS ven_net, \
    CAST(mon_iva AS DOUBLE) AS mon_iva, CAST(val_def AS DOUBLE) AS val_def, \
    CAST(valor AS DOUBLE) AS valor";

/// Shared FROM/WHERE body of the extended-warranty sales join. The
/// fixed predicates bound the report to warranty document types for the
/// ZURICH brand; the year lands as the single bound parameter.
const WARRANTY_BASE: &str = r#"
    FROM inv_cabdoc cab
    INNER JOIN inv_cuedoc cue
        ON cab.ano_doc = cue.ano_doc
        AND cab.per_doc = cue.per_doc
        AND cab.tip_doc = cue.tip_doc
        AND cab.num_doc = cue.num_doc
    INNER JOIN inv_bodegas bod ON bod.cod_bod = cue.bodega
    INNER JOIN gen_vendedor ven ON cab.vendedor = ven.cod_ven
    INNER JOIN inv_items ite ON cue.item = ite.cod_item
    INNER JOIN inv_marca mar ON ite.cod_mar = mar.cod_mar
    INNER JOIN inv_grupos gru ON ite.cod_grupo = gru.cod_gru
    INNER JOIN inv_subgrupos sub
        ON ite.cod_grupo = sub.cod_gru
        AND ite.cod_subgrupo = sub.cod_sub
    INNER JOIN gen_sucursal suc ON cab.cod_suc = suc.cod_suc
    INNER JOIN gen_ccosto cco ON cco.cod_cco = cab.cod_cco
    INNER JOIN (
        SELECT
            cab.cliente,
            cli.nit_cli AS cedula,
            cli.nom_cli AS nombre,
            cli.di1_cli AS direccion,
            cli.te1_cli AS telefono,
            CASE WHEN COUNT(1) > 1 THEN 'CLIENTE ANTIGUO'
                 ELSE 'CLIENTE NUEVO'
            END AS tipo_cliente
        FROM inv_cabdoc cab
        INNER JOIN cxc_cliente cli ON cli.cod_cli = cab.cliente
        WHERE cab.tip_doc IN ('010','510','302')
        GROUP BY cab.cliente, cli.nit_cli, cli.nom_cli, cli.di1_cli, cli.te1_cli
    ) temp ON temp.cliente = cab.cliente
    WHERE
        cab.tip_doc IN ('510','302','010')
        AND cue.cantidad > 0
        AND cue.ven_net > 0
        AND sub.nom_sub NOT IN ('PUBLICIDAD Y MERCADEO')
        AND cab.num_doc NOT LIKE '%<%'
        AND temp.cedula <> '901634743'
        AND mar.des_mar = 'ZURICH'
        AND YEAR(cab.fecha) = ?
"#;

const WARRANTY_SELECT: &str = r#"
    SELECT
        'CBB' AS empresa,
        cab.vendedor,
        ven.nom_ven,
        cue.item,
        ite.des_item,
        ite.cod_mar,
        mar.des_mar,
        ite.cod_grupo,
        gru.nom_gru,
        ite.cod_subgrupo,
        sub.nom_sub,
        cab.cod_suc,
        suc.nom_suc,
        cab.cod_cco,
        cco.nom_cco,
        cab.fecha,
        cab.hora,
        cab.tip_doc,
        cab.num_doc,
        CAST(cue.cantidad AS DOUBLE) AS cantidad,
        CAST(cue.ven_net AS DOUBLE) AS ven_net,
        CAST(cue.mon_iva AS DOUBLE) AS mon_iva,
        CAST(cue.val_def AS DOUBLE) AS val_def,
        CASE
            WHEN EXISTS (SELECT 1 FROM ptv_detcuadre_caja WHERE num_doc = cab.num_doc AND for_pag IN ('13','41'))
                THEN 'CREDITO H.P.H'
            WHEN EXISTS (SELECT 1 FROM ptv_detcuadre_caja WHERE num_doc = cab.num_doc AND for_pag = '37')
                THEN 'CLIENTES MAYOREO'
            WHEN EXISTS (SELECT 1 FROM ptv_detcuadre_caja WHERE num_doc = cab.num_doc AND for_pag = '15')
                THEN 'CLIENTE INSTITUCIONAL'
            WHEN EXISTS (SELECT 1 FROM ptv_detcuadre_caja WHERE num_doc = cab.num_doc AND for_pag = '30')
                THEN 'CREDIORBE'
            WHEN EXISTS (SELECT 1 FROM ptv_detcuadre_caja WHERE num_doc = cab.num_doc AND for_pag = '39')
                THEN 'SUFI BANCOLOMBIA'
            ELSE 'CONTADO'
        END AS forma_pago,
        bod.cod_bod,
        bod.nom_bod,
        CAST(ite.cos_pro AS DOUBLE) AS cos_pro,
        temp.tipo_cliente,
        temp.cedula,
        temp.nombre,
        temp.direccion,
        temp.telefono
"#;

const CATALOG_BASE: &str = r#"
    FROM inv_items t1
    INNER JOIN inv_acum t2 ON t1.cod_item = t2.cod_item
    INNER JOIN inv_lispre t3 ON t1.cod_item = t3.cod_item
    WHERE t2.ano_acu = ?
      AND t2.ttun12 >= 1
      AND t3.cod_lis IN ('11','29')
"#;

/// Warehouse reader backed by a process-lifetime MySQL pool
#[derive(Clone)]
pub struct MySqlWarehouse {
    pool: MySqlPool,
}

impl MySqlWarehouse {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Count rows of `view` under the given predicates
    async fn count_view(&self, view: &str, filters: &FilterSet) -> WarehouseResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {view} {where_clause}",
            where_clause = filters.where_clause()
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for bind in filters.binds() {
            query = query.bind(bind);
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn inventory_rows(
        &self,
        filters: &FilterSet,
        page: &PageRequest,
    ) -> WarehouseResult<Vec<InventoryRow>> {
        let sql = format!(
            "SELECT {INVENTORY_COLUMNS} FROM {INVENTORY_VIEW} {where_clause} \
             ORDER BY ciudad, COD_ITEM LIMIT ? OFFSET ?",
            where_clause = filters.where_clause()
        );
        let mut query = sqlx::query_as::<_, InventoryRow>(&sql);
        for bind in filters.binds() {
            query = query.bind(bind);
        }
        let rows = query
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(InventoryRow::mapped).collect())
    }

    async fn inventory_summary(&self, filters: &FilterSet) -> WarehouseResult<InventorySummary> {
        let sql = format!(
            "SELECT CAST(COALESCE(SUM(EXISTENCIA), 0) AS DOUBLE) AS total_existencia, \
                    CAST(COALESCE(SUM(VALOR), 0) AS DOUBLE) AS total_valor, \
                    COUNT(DISTINCT COD_ITEM) AS total_items \
             FROM {INVENTORY_VIEW} {where_clause}",
            where_clause = filters.where_clause()
        );
        let mut query = sqlx::query_as::<_, InventorySummary>(&sql);
        for bind in filters.binds() {
            query = query.bind(bind);
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn invoice_rows(
        &self,
        filters: &FilterSet,
        page: &PageRequest,
    ) -> WarehouseResult<Vec<InvoiceRow>> {
        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM {INVOICE_VIEW} {where_clause} \
             ORDER BY tip_doc, num_doc LIMIT ? OFFSET ?",
            where_clause = filters.where_clause()
        );
        let mut query = sqlx::query_as::<_, InvoiceRow>(&sql);
        for bind in filters.binds() {
            query = query.bind(bind);
        }
        let rows = query
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(InvoiceRow::mapped).collect())
    }

    async fn invoice_summary(&self, filters: &FilterSet) -> WarehouseResult<InvoiceSummary> {
        let sql = format!(
            "SELECT \
                CAST(COALESCE(SUM(cantidad), 0) AS DOUBLE) AS total_cantidad, \
                CAST(COALESCE(SUM(ven_net), 0) AS DOUBLE) AS total_venta_neta, \
                CAST(COALESCE(SUM(mon_iva), 0) AS DOUBLE) AS total_monto_iva, \
                CAST(COALESCE(SUM(val_def), 0) AS DOUBLE) AS total_descuento, \
                CAST(COALESCE(SUM(valor), 0) AS DOUBLE) AS total_valor, \
                CAST(COALESCE(SUM(COALESCE(ven_net, 0) + COALESCE(mon_iva, 0)), 0) AS DOUBLE) AS total_con_iva \
             FROM {INVOICE_VIEW} {where_clause}",
            where_clause = filters.where_clause()
        );
        let mut query = sqlx::query_as::<_, InvoiceSummary>(&sql);
        for bind in filters.binds() {
            query = query.bind(bind);
        }
        Ok(query.fetch_one(&self.pool).await?)
    }
}

#[async_trait]
impl WarehouseReader for MySqlWarehouse {
    async fn inventory(
        &self,
        query: &InventoryQuery,
        page: &PageRequest,
    ) -> WarehouseResult<(Paged<InventoryRow>, InventorySummary)> {
        let filters = query.filters();

        // Page, count and summary run concurrently with identical predicates
        let (rows, total, summary) = tokio::try_join!(
            self.inventory_rows(&filters, page),
            self.count_view(INVENTORY_VIEW, &filters),
            self.inventory_summary(&filters),
        )?;

        Ok((Paged { rows, total }, summary))
    }

    async fn inventory_by_brand(
        &self,
        query: &InventoryQuery,
    ) -> WarehouseResult<Vec<BrandSummary>> {
        let filters = query.filters();
        let sql = format!(
            "SELECT DES_MAR AS des_mar, COUNT(DISTINCT COD_ITEM) AS items, \
                    CAST(COALESCE(SUM(EXISTENCIA), 0) AS DOUBLE) AS total_existencia, \
                    CAST(COALESCE(SUM(VALOR), 0) AS DOUBLE) AS total_valor \
             FROM {INVENTORY_VIEW} {where_clause} \
             GROUP BY DES_MAR ORDER BY total_valor DESC",
            where_clause = filters.where_clause()
        );
        let mut q = sqlx::query_as::<_, BrandSummary>(&sql);
        for bind in filters.binds() {
            q = q.bind(bind);
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(BrandSummary::mapped).collect())
    }

    async fn invoices(
        &self,
        query: &InvoiceQuery,
        page: &PageRequest,
    ) -> WarehouseResult<(Paged<InvoiceRow>, InvoiceSummary)> {
        let filters = query.filters();

        let (rows, total, summary) = tokio::try_join!(
            self.invoice_rows(&filters, page),
            self.count_view(INVOICE_VIEW, &filters),
            self.invoice_summary(&filters),
        )?;

        Ok((Paged { rows, total }, summary))
    }

    async fn warranty_sales(
        &self,
        year: i32,
        page: &PageRequest,
    ) -> WarehouseResult<Paged<WarrantyRecord>> {
        let data_sql = format!(
            "{WARRANTY_SELECT} {WARRANTY_BASE} ORDER BY cab.fecha DESC LIMIT ? OFFSET ?"
        );
        let count_sql = format!("SELECT COUNT(*) {WARRANTY_BASE}");

        let rows_fut = async {
            WarehouseResult::Ok(
                sqlx::query_as::<_, WarrantyRow>(&data_sql)
                    .bind(year)
                    .bind(page.limit)
                    .bind(page.offset())
                    .fetch_all(&self.pool)
                    .await?,
            )
        };
        let count_fut = async {
            WarehouseResult::Ok(
                sqlx::query_scalar::<_, i64>(&count_sql)
                    .bind(year)
                    .fetch_one(&self.pool)
                    .await?,
            )
        };

        let (raw_rows, total) = tokio::try_join!(rows_fut, count_fut)?;
        let rows = raw_rows.into_iter().map(WarrantyRecord::from).collect();
        Ok(Paged { rows, total })
    }

    async fn catalog(&self, page: &PageRequest) -> WarehouseResult<Paged<CatalogItem>> {
        let year = chrono::Utc::now().year().to_string();

        let data_sql = format!(
            "SELECT t1.cod_item, t1.des_item, CAST(t2.ttun12 AS DOUBLE) AS existencia, \
                    CAST(t1.por_iva AS DOUBLE) AS por_iva, CAST(t3.pre_vta AS DOUBLE) AS pre_vta, \
                    t3.cod_lis \
             {CATALOG_BASE} ORDER BY t1.cod_item LIMIT ? OFFSET ?"
        );
        let count_sql = format!("SELECT COUNT(*) {CATALOG_BASE}");

        let rows_fut = async {
            WarehouseResult::Ok(
                sqlx::query_as::<_, CatalogRawRow>(&data_sql)
                    .bind(&year)
                    .bind(page.limit)
                    .bind(page.offset())
                    .fetch_all(&self.pool)
                    .await?,
            )
        };
        let count_fut = async {
            WarehouseResult::Ok(
                sqlx::query_scalar::<_, i64>(&count_sql)
                    .bind(&year)
                    .fetch_one(&self.pool)
                    .await?,
            )
        };

        let (raw_rows, total) = tokio::try_join!(rows_fut, count_fut)?;
        let rows = raw_rows.into_iter().map(CatalogItem::from).collect();
        Ok(Paged { rows, total })
    }

    async fn stock_by_location(
        &self,
        bodega: &str,
        sucursal: &str,
        empresa: &str,
    ) -> WarehouseResult<Vec<NovasoftProduct>> {
        let rows = sqlx::query_as::<_, NovasoftProduct>(
            "SELECT cod_item, des_item, CAST(existencia AS DOUBLE) AS existencia \
             FROM v_bodega_existencia \
             WHERE bodega = ? AND sucursal = ? AND empresa = ? \
             ORDER BY cod_item",
        )
        .bind(bodega)
        .bind(sucursal)
        .bind(empresa)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(NovasoftProduct::mapped).collect())
    }

    async fn price_list(
        &self,
        lista: &str,
        sucursal: &str,
    ) -> WarehouseResult<Vec<PriceListRow>> {
        let rows = sqlx::query_as::<_, PriceListRow>(
            "SELECT cod_lis, cod_item, CAST(precioiva AS DOUBLE) AS precioiva \
             FROM v_listas_precio \
             WHERE lista = ? AND sucursal = ? \
             ORDER BY cod_item",
        )
        .bind(lista)
        .bind(sucursal)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PriceListRow::mapped).collect())
    }

    async fn named_query(
        &self,
        name: &str,
        params: &[String],
    ) -> WarehouseResult<Vec<serde_json::Value>> {
        named::run(&self.pool, name, params).await
    }

    async fn product_count(&self) -> WarehouseResult<i64> {
        Ok(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT cod_item) FROM inv_items")
                .fetch_one(&self.pool)
                .await?,
        )
    }
}

/// Decode an arbitrary row into a JSON object, column by column.
/// Used only by the allow-listed named queries.
pub(crate) fn row_to_json(row: &MySqlRow) -> serde_json::Value {
    use sqlx::Column;

    let mut object = serde_json::Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        object.insert(column.name().to_string(), column_value(row, idx));
    }
    serde_json::Value::Object(object)
}

fn column_value(row: &MySqlRow, idx: usize) -> serde_json::Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(serde_json::Value::from).unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(serde_json::Value::from).unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v
            .map(|s| serde_json::Value::from(s.trim().to_string()))
            .unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return v
            .map(|d| serde_json::Value::from(d.format("%Y-%m-%dT%H:%M:%S").to_string()))
            .unwrap_or(serde_json::Value::Null);
    }
    serde_json::Value::Null
}
