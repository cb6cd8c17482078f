//! # Document Mapping
//!
//! Coerces loosely-typed remote documents into typed local records.
//!
//! ## Why This Exists
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     The Coercion Problem                                │
//! │                                                                         │
//! │  The remote store has no schema. Two documents in "productos":          │
//! │                                                                         │
//! │  { "nombre_producto": "Arroz 1kg",      { "nombre": "Frijol",           │
//! │    "precio_unitario": 23.5,               "precio": 18,                 │
//! │    "stock_actual": 40,                    "stock": "12" is NOT tried -  │
//! │    "id_categoria": 3 }                    "idCategoria": "3" }          │
//! │                                                                         │
//! │  Same attribute, different field name, different JSON type. Mapping     │
//! │  tries each known field name in order and coerces whatever it finds.    │
//! │  Only the name is mandatory: a nameless document is rejected.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::{Map, Value};

use crate::error::{SyncError, SyncResult};
use crate::protocol::Document;

// =============================================================================
// Mapped Records
// =============================================================================

/// A product document coerced to typed fields.
///
/// Category and supplier references stay as remote business keys here;
/// the sync service resolves them to local row ids.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedProduct {
    pub remote_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub current_stock: i64,
    pub min_stock: i64,
    pub category_key: Option<i64>,
    pub supplier_key: Option<i64>,
    pub barcode: Option<String>,
    pub is_active: bool,
}

/// A category document coerced to typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedCategory {
    pub remote_id: String,
    pub remote_key: Option<i64>,
    pub name: String,
    pub description: Option<String>,
}

/// A supplier document coerced to typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedSupplier {
    pub remote_id: String,
    pub remote_key: Option<i64>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

// =============================================================================
// Mapping Functions
// =============================================================================

/// Maps a product document.
///
/// ## Returns
/// * `Err(SyncError::InvalidDocument)` - no usable name under any known field
pub fn map_product(doc: &Document) -> SyncResult<MappedProduct> {
    let name = string_field(&doc.fields, &["nombre_producto", "nombre"])
        .ok_or_else(|| invalid(doc, "missing product name"))?;

    Ok(MappedProduct {
        remote_id: doc.doc_id.clone(),
        name,
        description: string_field(&doc.fields, &["descripcion"]),
        price_cents: price_field(&doc.fields, &["precio_unitario", "precio"]),
        current_stock: integer_field(&doc.fields, &["stock_actual", "stock"]),
        min_stock: integer_field(&doc.fields, &["stock_minimo", "stockMin"]),
        category_key: key_field(&doc.fields, &["id_categoria", "idCategoria"]),
        supplier_key: key_field(&doc.fields, &["id_proveedor", "idProveedor"]),
        barcode: string_field(&doc.fields, &["codigo_barras", "codigoBarras"]),
        is_active: bool_field(&doc.fields, &["activo"]).unwrap_or(true),
    })
}

/// Maps a category document.
pub fn map_category(doc: &Document) -> SyncResult<MappedCategory> {
    let name = string_field(&doc.fields, &["nombre_categoria", "nombre"])
        .ok_or_else(|| invalid(doc, "missing category name"))?;

    Ok(MappedCategory {
        remote_id: doc.doc_id.clone(),
        remote_key: key_field(&doc.fields, &["id_categoria", "idCategoria"]),
        name,
        description: string_field(&doc.fields, &["descripcion"]),
    })
}

/// Maps a supplier document.
pub fn map_supplier(doc: &Document) -> SyncResult<MappedSupplier> {
    let name = string_field(&doc.fields, &["nombre_proveedor", "nombre"])
        .ok_or_else(|| invalid(doc, "missing supplier name"))?;

    Ok(MappedSupplier {
        remote_id: doc.doc_id.clone(),
        remote_key: key_field(&doc.fields, &["id_proveedor", "idProveedor"]),
        name,
        phone: string_field(&doc.fields, &["telefono"]),
        email: string_field(&doc.fields, &["correo", "email"]),
        address: string_field(&doc.fields, &["direccion"]),
        city: string_field(&doc.fields, &["ciudad"]),
        country: string_field(&doc.fields, &["pais"]),
    })
}

fn invalid(doc: &Document, reason: &str) -> SyncError {
    SyncError::InvalidDocument {
        doc_id: doc.doc_id.clone(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// Field Coercion
// =============================================================================

/// First non-blank string under any of the given field names.
fn string_field(fields: &Map<String, Value>, names: &[&str]) -> Option<String> {
    for name in names {
        if let Some(Value::String(s)) = fields.get(*name) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// First numeric value under any of the given field names, truncated to i64.
///
/// Missing or non-numeric values coerce to 0.
fn integer_field(fields: &Map<String, Value>, names: &[&str]) -> i64 {
    for name in names {
        match fields.get(*name) {
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return i;
                }
                if let Some(f) = n.as_f64() {
                    return f.trunc() as i64;
                }
            }
            _ => continue,
        }
    }
    0
}

/// First numeric value under any of the given field names, as cents.
///
/// The remote store keeps prices as major-unit floats (23.5 pesos), the
/// local cache keeps integer cents. Rounding, not truncation: 23.505
/// becomes 2351, never 2350.
fn price_field(fields: &Map<String, Value>, names: &[&str]) -> i64 {
    for name in names {
        match fields.get(*name) {
            Some(Value::Number(n)) => {
                if let Some(f) = n.as_f64() {
                    return (f * 100.0).round() as i64;
                }
            }
            _ => continue,
        }
    }
    0
}

/// Reference key: integer, float, or a string that parses as an integer.
fn key_field(fields: &Map<String, Value>, names: &[&str]) -> Option<i64> {
    for name in names {
        match fields.get(*name) {
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Some(i);
                }
                if let Some(f) = n.as_f64() {
                    return Some(f.trunc() as i64);
                }
            }
            Some(Value::String(s)) => {
                if let Ok(i) = s.trim().parse::<i64>() {
                    return Some(i);
                }
            }
            _ => continue,
        }
    }
    None
}

/// First boolean under any of the given field names.
fn bool_field(fields: &Map<String, Value>, names: &[&str]) -> Option<bool> {
    for name in names {
        if let Some(Value::Bool(b)) = fields.get(*name) {
            return Some(*b);
        }
    }
    None
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(pairs: &[(&str, Value)]) -> Document {
        let mut fields = Map::new();
        for (k, v) in pairs {
            fields.insert(k.to_string(), v.clone());
        }
        Document::new("doc-1", fields)
    }

    #[test]
    fn test_map_product_long_field_names() {
        let d = doc(&[
            ("nombre_producto", json!("Arroz 1kg")),
            ("descripcion", json!("Grano largo")),
            ("precio_unitario", json!(23.5)),
            ("stock_actual", json!(40)),
            ("stock_minimo", json!(5)),
            ("codigo_barras", json!("7501031311309")),
            ("id_categoria", json!(3)),
            ("id_proveedor", json!(1)),
            ("activo", json!(true)),
        ]);

        let p = map_product(&d).unwrap();
        assert_eq!(p.name, "Arroz 1kg");
        assert_eq!(p.price_cents, 2350);
        assert_eq!(p.current_stock, 40);
        assert_eq!(p.min_stock, 5);
        assert_eq!(p.category_key, Some(3));
        assert_eq!(p.supplier_key, Some(1));
        assert!(p.is_active);
    }

    #[test]
    fn test_map_product_short_field_names() {
        let d = doc(&[
            ("nombre", json!("Frijol")),
            ("precio", json!(18)),
            ("stock", json!(12.9)),
            ("stockMin", json!(3)),
            ("idCategoria", json!("7")),
        ]);

        let p = map_product(&d).unwrap();
        assert_eq!(p.name, "Frijol");
        assert_eq!(p.price_cents, 1800);
        // Floats truncate for stock
        assert_eq!(p.current_stock, 12);
        // Integer-string keys parse
        assert_eq!(p.category_key, Some(7));
        assert_eq!(p.supplier_key, None);
        // Missing activo defaults to true
        assert!(p.is_active);
    }

    #[test]
    fn test_map_product_rejects_nameless_document() {
        let d = doc(&[("precio", json!(10))]);
        let err = map_product(&d).unwrap_err();
        assert!(matches!(err, SyncError::InvalidDocument { .. }));

        // Blank name is as good as no name
        let d = doc(&[("nombre", json!("   "))]);
        assert!(map_product(&d).is_err());
    }

    #[test]
    fn test_map_product_price_rounds() {
        let d = doc(&[("nombre", json!("X")), ("precio", json!(23.505))]);
        assert_eq!(map_product(&d).unwrap().price_cents, 2351);
    }

    #[test]
    fn test_map_product_empty_barcode_is_none() {
        let d = doc(&[("nombre", json!("X")), ("codigo_barras", json!(""))]);
        assert_eq!(map_product(&d).unwrap().barcode, None);
    }

    #[test]
    fn test_map_product_defaults() {
        let d = doc(&[("nombre", json!("Solo nombre"))]);
        let p = map_product(&d).unwrap();
        assert_eq!(p.price_cents, 0);
        assert_eq!(p.current_stock, 0);
        assert_eq!(p.min_stock, 0);
        assert_eq!(p.description, None);
        assert!(p.is_active);
    }

    #[test]
    fn test_map_product_inactive() {
        let d = doc(&[("nombre", json!("Retirado")), ("activo", json!(false))]);
        assert!(!map_product(&d).unwrap().is_active);
    }

    #[test]
    fn test_map_category() {
        let d = doc(&[
            ("nombre_categoria", json!("Abarrotes")),
            ("id_categoria", json!(3)),
        ]);
        let c = map_category(&d).unwrap();
        assert_eq!(c.name, "Abarrotes");
        assert_eq!(c.remote_key, Some(3));
        assert_eq!(c.remote_id, "doc-1");
    }

    #[test]
    fn test_map_supplier() {
        let d = doc(&[
            ("nombre_proveedor", json!("Distribuidora Norte")),
            ("telefono", json!("555-0101")),
            ("ciudad", json!("Monterrey")),
            ("id_proveedor", json!(1)),
        ]);
        let s = map_supplier(&d).unwrap();
        assert_eq!(s.name, "Distribuidora Norte");
        assert_eq!(s.phone.as_deref(), Some("555-0101"));
        assert_eq!(s.remote_key, Some(1));

        let nameless = doc(&[("telefono", json!("555"))]);
        assert!(map_supplier(&nameless).is_err());
    }
}
