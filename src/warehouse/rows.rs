//! # Typed Rows & Row Mapper
//!
//! Explicit row schemas per warehouse view, plus the pure mappers that
//! turn raw rows into API-facing shapes: trailing padding trimmed from
//! fixed-width text columns, warehouse column names renamed to stable
//! API field names, numeric precision left untouched. Absent text maps
//! to an empty string, never a panic.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// Trim a fixed-width padded text field in place
fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
}

/// Trim an optional text field into a plain string ("" when absent)
fn trim_opt(s: Option<String>) -> String {
    s.map(|v| v.trim().to_string()).unwrap_or_default()
}

// ==================
// Inventory
// ==================

/// One row of the inventory view
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryRow {
    pub ciudad: String,
    pub ano_acu: String,
    pub cod_item: String,
    pub des_item: String,
    pub cod_gru: String,
    pub nom_gru: String,
    pub cod_mar: String,
    pub des_mar: String,
    pub nom_sub: String,
    pub des_medida: String,
    pub nom_bod: String,
    pub cod_bod: String,
    pub cod_suc: String,
    pub ubi_est: Option<String>,
    pub existencia: f64,
    pub valor: f64,
    pub ult_comp: Option<NaiveDateTime>,
    pub fecha_act: Option<NaiveDateTime>,
    pub dias_uc: i64,
    pub empresa: String,
}

impl InventoryRow {
    /// Trim the fixed-width text columns
    pub fn mapped(mut self) -> Self {
        trim_in_place(&mut self.ciudad);
        trim_in_place(&mut self.ano_acu);
        trim_in_place(&mut self.cod_item);
        trim_in_place(&mut self.des_item);
        trim_in_place(&mut self.cod_gru);
        trim_in_place(&mut self.nom_gru);
        trim_in_place(&mut self.cod_mar);
        trim_in_place(&mut self.des_mar);
        trim_in_place(&mut self.nom_sub);
        trim_in_place(&mut self.des_medida);
        trim_in_place(&mut self.nom_bod);
        trim_in_place(&mut self.cod_bod);
        trim_in_place(&mut self.cod_suc);
        trim_in_place(&mut self.empresa);
        if let Some(ubi) = self.ubi_est.as_mut() {
            trim_in_place(ubi);
        }
        self
    }
}

/// Aggregates over the filtered inventory set
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventorySummary {
    pub total_existencia: f64,
    pub total_valor: f64,
    pub total_items: i64,
}

/// Inventory aggregated per brand
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BrandSummary {
    pub des_mar: String,
    pub items: i64,
    pub total_existencia: f64,
    pub total_valor: f64,
}

impl BrandSummary {
    pub fn mapped(mut self) -> Self {
        trim_in_place(&mut self.des_mar);
        self
    }
}

// ==================
// Invoicing
// ==================

/// One row of the invoice view
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvoiceRow {
    pub tienda: String,
    pub ano_doc: String,
    pub tip_doc: String,
    pub num_doc: String,
    pub fecha: Option<NaiveDateTime>,
    pub cod_mar: String,
    pub des_mar: String,
    pub cod_grupo: String,
    pub nom_gru: String,
    pub cod_subgrupo: String,
    pub nom_sub: String,
    pub nom_ven: String,
    pub cantidad: f64,
    pub ven_net: f64,
    pub mon_iva: f64,
    pub val_def: f64,
    pub valor: f64,
}

impl InvoiceRow {
    pub fn mapped(mut self) -> Self {
        trim_in_place(&mut self.tienda);
        trim_in_place(&mut self.ano_doc);
        trim_in_place(&mut self.tip_doc);
        trim_in_place(&mut self.num_doc);
        trim_in_place(&mut self.cod_mar);
        trim_in_place(&mut self.des_mar);
        trim_in_place(&mut self.cod_grupo);
        trim_in_place(&mut self.nom_gru);
        trim_in_place(&mut self.cod_subgrupo);
        trim_in_place(&mut self.nom_sub);
        trim_in_place(&mut self.nom_ven);
        self
    }
}

/// Six sums over the filtered invoice set; NULL coerces to zero in SQL
/// (`COALESCE`) so the response never carries null aggregates
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvoiceSummary {
    pub total_cantidad: f64,
    pub total_venta_neta: f64,
    pub total_monto_iva: f64,
    pub total_descuento: f64,
    pub total_valor: f64,
    pub total_con_iva: f64,
}

// ==================
// Extended warranty
// ==================

/// Raw extended-warranty row as returned by the sales join
#[derive(Debug, Clone, FromRow)]
pub struct WarrantyRow {
    pub empresa: Option<String>,
    pub vendedor: Option<String>,
    pub nom_ven: Option<String>,
    pub item: Option<String>,
    pub des_item: Option<String>,
    pub cod_mar: Option<String>,
    pub des_mar: Option<String>,
    pub cod_grupo: Option<String>,
    pub nom_gru: Option<String>,
    pub cod_subgrupo: Option<String>,
    pub nom_sub: Option<String>,
    pub cod_suc: Option<String>,
    pub nom_suc: Option<String>,
    pub cod_cco: Option<String>,
    pub nom_cco: Option<String>,
    pub fecha: Option<NaiveDateTime>,
    pub hora: Option<String>,
    pub tip_doc: Option<String>,
    pub num_doc: Option<String>,
    pub cantidad: f64,
    pub ven_net: f64,
    pub mon_iva: f64,
    pub val_def: f64,
    pub forma_pago: Option<String>,
    pub cod_bod: Option<String>,
    pub nom_bod: Option<String>,
    pub cos_pro: f64,
    pub tipo_cliente: Option<String>,
    pub cedula: Option<String>,
    pub nombre: Option<String>,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
}

/// Clean extended-warranty record with stable API field names
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyRecord {
    pub empresa: String,
    pub vendedor_codigo: String,
    pub vendedor_nombre: String,
    pub item_codigo: String,
    pub item_descripcion: String,
    pub marca_codigo: String,
    pub marca_descripcion: String,
    pub grupo_codigo: String,
    pub grupo_nombre: String,
    pub subgrupo_codigo: String,
    pub subgrupo_nombre: String,
    pub sucursal_codigo: String,
    pub sucursal_nombre: String,
    pub centro_costo_codigo: String,
    pub centro_costo_nombre: String,
    pub fecha: String,
    pub hora: String,
    pub tipo_documento: String,
    pub numero_documento: String,
    pub cantidad: f64,
    pub venta_neta: f64,
    pub monto_iva: f64,
    pub valor_definitivo: f64,
    pub forma_pago: String,
    pub bodega_codigo: String,
    pub bodega_nombre: String,
    pub costo_producto: f64,
    pub tipo_cliente: String,
    pub cedula: String,
    pub cliente_nombre: String,
    pub cliente_direccion: String,
    pub cliente_telefono: String,
}

impl From<WarrantyRow> for WarrantyRecord {
    fn from(row: WarrantyRow) -> Self {
        Self {
            empresa: trim_opt(row.empresa),
            vendedor_codigo: trim_opt(row.vendedor),
            vendedor_nombre: trim_opt(row.nom_ven),
            item_codigo: trim_opt(row.item),
            item_descripcion: trim_opt(row.des_item),
            marca_codigo: trim_opt(row.cod_mar),
            marca_descripcion: trim_opt(row.des_mar),
            grupo_codigo: trim_opt(row.cod_grupo),
            grupo_nombre: trim_opt(row.nom_gru),
            subgrupo_codigo: trim_opt(row.cod_subgrupo),
            subgrupo_nombre: trim_opt(row.nom_sub),
            sucursal_codigo: trim_opt(row.cod_suc),
            sucursal_nombre: trim_opt(row.nom_suc),
            centro_costo_codigo: trim_opt(row.cod_cco),
            centro_costo_nombre: trim_opt(row.nom_cco),
            fecha: row
                .fecha
                .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
                .unwrap_or_default(),
            hora: trim_opt(row.hora),
            tipo_documento: trim_opt(row.tip_doc),
            numero_documento: trim_opt(row.num_doc),
            cantidad: row.cantidad,
            venta_neta: row.ven_net,
            monto_iva: row.mon_iva,
            valor_definitivo: row.val_def,
            forma_pago: trim_opt(row.forma_pago),
            bodega_codigo: trim_opt(row.cod_bod),
            bodega_nombre: trim_opt(row.nom_bod),
            costo_producto: row.cos_pro,
            tipo_cliente: trim_opt(row.tipo_cliente),
            cedula: trim_opt(row.cedula),
            cliente_nombre: trim_opt(row.nombre),
            cliente_direccion: trim_opt(row.direccion),
            cliente_telefono: trim_opt(row.telefono),
        }
    }
}

// ==================
// Catalog listing
// ==================

/// Raw catalog row joined from items, stock and price lists
#[derive(Debug, Clone, FromRow)]
pub struct CatalogRawRow {
    pub cod_item: String,
    pub des_item: String,
    pub existencia: f64,
    pub por_iva: Option<f64>,
    pub pre_vta: f64,
    pub cod_lis: String,
}

/// Catalog item with computed tax and final price
#[derive(Debug, Clone, Serialize)]
pub struct CatalogItem {
    pub cod_item: String,
    pub des_item: String,
    pub existencia: f64,
    pub por_iva: f64,
    pub pre_vta: f64,
    pub cod_lis: String,
    pub valor_iva: f64,
    pub precio_final: f64,
}

impl From<CatalogRawRow> for CatalogItem {
    fn from(mut row: CatalogRawRow) -> Self {
        trim_in_place(&mut row.cod_item);
        trim_in_place(&mut row.des_item);
        trim_in_place(&mut row.cod_lis);

        let por_iva = row.por_iva.unwrap_or(0.0);
        let valor_iva = row.pre_vta * (por_iva / 100.0);
        Self {
            valor_iva,
            precio_final: row.pre_vta + valor_iva,
            cod_item: row.cod_item,
            des_item: row.des_item,
            existencia: row.existencia,
            por_iva,
            pre_vta: row.pre_vta,
            cod_lis: row.cod_lis,
        }
    }
}

// ==================
// Product catalog
// ==================

/// Stock per product for one warehouse location
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NovasoftProduct {
    pub cod_item: String,
    pub des_item: String,
    pub existencia: f64,
}

impl NovasoftProduct {
    pub fn mapped(mut self) -> Self {
        trim_in_place(&mut self.cod_item);
        trim_in_place(&mut self.des_item);
        self
    }
}

/// One entry of a price list
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PriceListRow {
    pub cod_lis: String,
    pub cod_item: String,
    pub precioiva: f64,
}

impl PriceListRow {
    pub fn mapped(mut self) -> Self {
        trim_in_place(&mut self.cod_lis);
        trim_in_place(&mut self.cod_item);
        self
    }
}
