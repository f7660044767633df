//! Deterministic export file names.

use layoutkit_core::ExportFormat;

/// Makes a name segment safe for a flat file name: path separators and control
/// characters become `_`, surrounding whitespace is dropped.
pub fn sanitize(segment: &str) -> String {
    let cleaned: String = segment
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

/// `{brand}_{sku}_{layoutName}.{ext}`
pub fn layout_file_name(brand: &str, sku: &str, layout_name: &str, format: ExportFormat) -> String {
    format!(
        "{}_{}_{}.{}",
        sanitize(brand),
        sanitize(sku),
        sanitize(layout_name),
        format.extension()
    )
}

/// `{brand}_{sku}_All_Layouts.zip`
pub fn archive_file_name(brand: &str, sku: &str) -> String {
    format!("{}_{}_All_Layouts.zip", sanitize(brand), sanitize(sku))
}
