use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use vcard_ingest::{IngestError, read_table};
use vcard_model::AliasTable;

fn temp_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn reads_csv_with_bom() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(
        &dir,
        "contacts.csv",
        "\u{feff}Nombre,Teléfono,Email\nana maria jimenez solis,22221234,ana@example.com\n\n"
            .as_bytes(),
    );
    let table = read_table(&path, AliasTable::default_table()).expect("read csv");
    assert_eq!(table.headers, vec!["Nombre", "Teléfono", "Email"]);
    assert_eq!(table.len(), 1);

    let rows = table.into_raw_rows();
    assert_eq!(rows[0].get("Teléfono"), Some("22221234"));
}

#[test]
fn reads_windows_1252_csv() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(
        &dir,
        "legacy.csv",
        b"Nombre,Direcci\xF3n\nJos\xE9 P\xE9rez,San Jos\xE9\nMar\xEDa N\xFA\xF1ez,Cartago\n",
    );
    let table = read_table(&path, AliasTable::default_table()).expect("read csv");
    assert_eq!(table.headers[1], "Dirección");
    assert_eq!(table.rows[0][0].as_deref(), Some("José Pérez"));
}

#[test]
fn reads_vertical_text() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(
        &dir,
        "directory.txt",
        b"Ana Jimenez\nGerente\nana@example.com\n22221234\n\nLuis Mora\nAnalista\nluis@example.com\n",
    );
    let table = read_table(&path, AliasTable::default_table()).expect("read txt");
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[1][0].as_deref(), Some("Luis Mora"));
    assert_eq!(table.rows[1][3], None);
}

#[test]
fn reads_json_records() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(
        &dir,
        "contacts.json",
        br#"[{"first_name": "Ana", "work_phone": 22221234}]"#,
    );
    let table = read_table(&path, AliasTable::default_table()).expect("read json");
    let rows = table.into_raw_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("work_phone"), Some("22221234"));
}

#[test]
fn rejects_unsupported_extension() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "contacts.pdf", b"%PDF-1.7");
    let err = read_table(&path, AliasTable::default_table()).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
}

enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

fn sheet_xml(rows: &[(u32, Vec<Cell<'_>>)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (number, cells) in rows {
        xml.push_str(&format!(r#"<row r="{number}">"#));
        for (column, cell) in cells.iter().enumerate() {
            let reference = format!("{}{number}", char::from(b'A' + column as u8));
            match cell {
                Cell::Text(text) => xml.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{text}</t></is></c>"#
                )),
                Cell::Number(value) => {
                    xml.push_str(&format!(r#"<c r="{reference}"><v>{value}</v></c>"#))
                }
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Writes a single-sheet xlsx holding `rows`, keyed by 1-based row number.
fn write_workbook(path: &std::path::Path, rows: &[(u32, Vec<Cell<'_>>)]) {
    let parts = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Contactos" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_string(),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
        ),
        ("xl/worksheets/sheet1.xml", sheet_xml(rows)),
    ];

    let mut archive = zip::ZipWriter::new(File::create(path).expect("create workbook"));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, contents) in parts {
        archive.start_file(name, options).expect("start part");
        archive.write_all(contents.as_bytes()).expect("write part");
    }
    archive.finish().expect("finish workbook");
}

#[test]
fn reads_workbook_below_title_rows() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("directorio.xlsx");
    write_workbook(
        &path,
        &[
            (1, vec![Cell::Text("Directorio Institucional 2024")]),
            (
                3,
                vec![
                    Cell::Text("Nombre"),
                    Cell::Text("Apellidos"),
                    Cell::Text("Teléfono"),
                    Cell::Text("Correo Electrónico"),
                ],
            ),
            (
                4,
                vec![
                    Cell::Text("Ana Maria"),
                    Cell::Text("Jimenez Solis"),
                    Cell::Number(22221234.0),
                    Cell::Text("ana@example.com"),
                ],
            ),
            (
                5,
                vec![
                    Cell::Text("Luis"),
                    Cell::Text("Mora"),
                    Cell::Text(" "),
                    Cell::Text("luis@example.com"),
                ],
            ),
        ],
    );

    let table = read_table(&path, AliasTable::default_table()).expect("read workbook");
    assert_eq!(
        table.headers,
        vec!["Nombre", "Apellidos", "Teléfono", "Correo Electrónico"]
    );
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[1][0].as_deref(), Some("Luis"));
    assert_eq!(table.rows[1][2], None);

    let rows = table.into_raw_rows();
    assert_eq!(rows[0].get("Teléfono"), Some("22221234"));
    assert_eq!(rows[0].get("Apellidos"), Some("Jimenez Solis"));
}

#[test]
fn corrupt_workbook_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "contacts.xlsx", b"not a zip archive");
    let err = read_table(&path, AliasTable::default_table()).unwrap_err();
    assert!(matches!(err, IngestError::Spreadsheet { .. }));
}
