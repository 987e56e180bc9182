// src/export.rs
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::inventory::CatalogProduct;

pub const EXPORT_FILE_NAME: &str = "inventario_recontado.xlsx";
pub const EXPORT_SHEET_NAME: &str = "Inventario_Actualizado";
pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const EXPORT_COLUMNS: [&str; 9] = [
    "Código",
    "Nombre",
    "Cantidad Inicial",
    "Cantidad Escaneada",
    "Stock Total",
    "Marca",
    "Categoría",
    "Costo",
    "Precio",
];

/// Renders the reconciled catalog as an xlsx workbook, one row per product.
/// Absent brand, category, cost or price leave the cell blank.
pub fn build_workbook(products: &[CatalogProduct]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, title) in EXPORT_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (index, item) in products.iter().enumerate() {
        let row = index as u32 + 1;
        let product = &item.product;

        sheet.write_string(row, 0, &product.code)?;
        sheet.write_string(row, 1, &product.name)?;
        sheet.write_number(row, 2, f64::from(product.initial_quantity))?;
        sheet.write_number(row, 3, item.scanned_quantity() as f64)?;
        sheet.write_number(row, 4, item.current_quantity as f64)?;
        if let Some(brand) = &product.brand {
            sheet.write_string(row, 5, brand)?;
        }
        if let Some(category) = &product.category {
            sheet.write_string(row, 6, category)?;
        }
        if let Some(cost) = product.cost {
            sheet.write_number(row, 7, cost)?;
        }
        if let Some(price) = product.price {
            sheet.write_number(row, 8, price)?;
        }
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::reconcile::tests::{product, scan};
    use crate::inventory::recompute_all;

    #[test]
    fn workbook_is_a_zip_container() {
        let mut p = product(1, "ABC123", 10);
        p.brand = Some("Acme".to_string());
        p.cost = Some(2.5);
        let reconciled = recompute_all(vec![p, product(2, "XYZ", 0)], &[scan(5, 1, 1)]);

        let bytes = build_workbook(&reconciled).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn sheet_carries_headers_and_reconciled_rows() {
        use std::io::Cursor;

        use calamine::{Data, Reader, Xlsx};

        let mut p = product(1, "ABC123", 10);
        p.brand = Some("Acme".to_string());
        p.cost = Some(2.5);
        p.price = Some(4.0);
        let reconciled = recompute_all(vec![p], &[scan(5, 1, 1), scan(6, 1, 2)]);

        let bytes = build_workbook(&reconciled).unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![EXPORT_SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(EXPORT_SHEET_NAME).unwrap();
        let mut rows = range.rows();

        let header: Vec<String> = rows.next().unwrap().iter().map(|cell| cell.to_string()).collect();
        assert_eq!(header, EXPORT_COLUMNS.map(str::to_string).to_vec());

        let row = rows.next().unwrap();
        assert_eq!(row[0], Data::String("ABC123".to_string()));
        assert_eq!(row[2], Data::Float(10.0));
        assert_eq!(row[3], Data::Float(3.0));
        assert_eq!(row[4], Data::Float(13.0));
        assert_eq!(row[5], Data::String("Acme".to_string()));
        assert_eq!(row[6], Data::Empty);
        assert_eq!(row[7], Data::Float(2.5));
        assert_eq!(row[8], Data::Float(4.0));
        assert!(rows.next().is_none());
    }

    #[test]
    fn empty_catalog_still_exports_header() {
        let bytes = build_workbook(&[]).unwrap();
        assert!(!bytes.is_empty());
    }
}
