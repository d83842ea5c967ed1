//! Spreadsheet export. The workbook always starts with a `Full_Data` sheet
//! holding every lead, followed by one sheet per non-empty area in the order
//! the area first appears in the snapshot.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use crate::config::{EXPORT_MIME_TYPE, FULL_DATA_SHEET, MAX_SHEET_NAME_LEN};
use crate::error::ExportError;
use crate::models::Lead;

/// Column headers, in the order cells are written.
pub const COLUMNS: [&str; 12] = [
    "id",
    "Category",
    "Property_Type",
    "Project_Name",
    "Address",
    "Area",
    "phone_number",
    "Owner_Name",
    "price",
    "Cheque",
    "Size",
    "Comments",
];

/// Characters Excel refuses in sheet names.
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['/', '\\', '?', '*', ':', '[', ']'];

/// One worksheet to be written: its final name and the rows it carries.
#[derive(Debug)]
pub struct SheetPlan<'a> {
    pub name: String,
    pub rows: Vec<&'a Lead>,
}

/// Partition the snapshot into sheets without encoding anything.
pub fn plan_sheets(leads: &[Lead]) -> Vec<SheetPlan<'_>> {
    let mut sheets = vec![SheetPlan {
        name: FULL_DATA_SHEET.to_string(),
        rows: leads.iter().collect(),
    }];

    let mut areas: Vec<(&str, Vec<&Lead>)> = Vec::new();
    for lead in leads {
        let area = lead.area.as_str();
        if area.trim().is_empty() {
            continue;
        }
        match areas.iter_mut().find(|(name, _)| *name == area) {
            Some((_, rows)) => rows.push(lead),
            None => areas.push((area, vec![lead])),
        }
    }

    let mut used: HashSet<String> = HashSet::new();
    used.insert(FULL_DATA_SHEET.to_lowercase());
    for (area, rows) in areas {
        let name = unique_sheet_name(&sheet_name(area), &mut used);
        sheets.push(SheetPlan { name, rows });
    }

    sheets
}

/// Make an area value usable as a sheet name: forbidden characters become
/// `-`, surrounding apostrophes are dropped, and the result is capped at 31
/// characters.
pub fn sheet_name(area: &str) -> String {
    let replaced: String = area
        .trim()
        .chars()
        .map(|ch| {
            if FORBIDDEN_SHEET_CHARS.contains(&ch) {
                '-'
            } else {
                ch
            }
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = replaced.trim_matches(is_edge_char);
    if cleaned.is_empty() {
        "Area".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Sheet names may not start or end with an apostrophe; edge whitespace goes
/// too so trimming one never exposes the other.
fn is_edge_char(ch: char) -> bool {
    ch == '\'' || ch.is_whitespace()
}

/// Excel compares sheet names case-insensitively; clashing names get `~2`,
/// `~3`, ... squeezed into the length limit.
fn unique_sheet_name(base: &str, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_lowercase()) {
        return base.to_string();
    }
    let mut n = 2usize;
    loop {
        let suffix = format!("~{n}");
        let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
        let stem: String = base.chars().take(keep).collect();
        let candidate = format!("{}{}", stem.trim_end_matches(is_edge_char), suffix);
        if used.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

/// Encode the snapshot as an xlsx workbook.
pub fn export_workbook(leads: &[Lead]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheets = plan_sheets(leads);
    for sheet in &sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(worksheet, &sheet.rows, &header)?;
    }

    let bytes = workbook.save_to_buffer()?;
    info!(
        rows = leads.len(),
        sheets = sheets.len(),
        bytes = bytes.len(),
        "workbook generated"
    );
    Ok(bytes)
}

/// Generate the workbook and write it to `path`, returning the byte count.
pub fn write_export(leads: &[Lead], path: &Path) -> Result<usize, ExportError> {
    let bytes = export_workbook(leads)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &bytes)?;
    info!(path = %path.display(), mime = EXPORT_MIME_TYPE, "export written");
    Ok(bytes.len())
}

fn write_sheet(worksheet: &mut Worksheet, rows: &[&Lead], header: &Format) -> Result<(), ExportError> {
    for (col, title) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, header)?;
    }

    for (idx, lead) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        worksheet.write_number(row, 0, lead.id as f64)?;
        let cells = [
            lead.category.as_str(),
            lead.property_type.as_str(),
            lead.project_name.as_str(),
            lead.address.as_str(),
            lead.area.as_str(),
            lead.phone_number.as_str(),
            lead.owner_name.as_str(),
            lead.price.as_str(),
            lead.cheque.as_str(),
            lead.size.as_str(),
            lead.comments.as_str(),
        ];
        for (offset, value) in cells.iter().enumerate() {
            worksheet.write_string(row, offset as u16 + 1, *value)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lead;
    use tempfile::TempDir;

    fn names(plan: &[SheetPlan<'_>]) -> Vec<String> {
        plan.iter().map(|sheet| sheet.name.clone()).collect()
    }

    #[test]
    fn groups_by_area_and_skips_empty() {
        let leads = vec![
            lead(1, "A", "Kothi/Villa", "Sector 14"),
            lead(2, "B", "Kothi/Villa", "Sector 14"),
            lead(3, "C", "Kothi/Villa", "Sector 21"),
            lead(4, "D", "Kothi/Villa", ""),
        ];
        let plan = plan_sheets(&leads);

        assert_eq!(names(&plan), vec!["Full_Data", "Sector 14", "Sector 21"]);
        assert_eq!(plan[0].rows.len(), 4);
        assert_eq!(plan[1].rows.len(), 2);
        assert_eq!(plan[2].rows.len(), 1);
    }

    #[test]
    fn full_data_keeps_snapshot_order() {
        let leads = vec![
            lead(7, "A", "Kothi/Villa", "Sector 21"),
            lead(3, "B", "Kothi/Villa", "Sector 14"),
        ];
        let plan = plan_sheets(&leads);
        let ids: Vec<i64> = plan[0].rows.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![7, 3]);
        assert_eq!(names(&plan), vec!["Full_Data", "Sector 21", "Sector 14"]);
    }

    #[test]
    fn empty_snapshot_still_has_full_data_sheet() {
        let plan = plan_sheets(&[]);
        assert_eq!(names(&plan), vec!["Full_Data"]);
        assert!(plan[0].rows.is_empty());
    }

    #[test]
    fn sheet_names_are_sanitized_and_truncated() {
        assert_eq!(sheet_name("DLF Phase 1/2"), "DLF Phase 1-2");
        assert_eq!(sheet_name("a\\b?c*d:e[f]"), "a-b-c-d-e-f-");
        assert_eq!(sheet_name("'quoted'"), "quoted");
        assert_eq!(sheet_name("///").len(), 3);
        let long = "Sector 45 Near The Very Long Market Road";
        assert_eq!(sheet_name(long).chars().count(), MAX_SHEET_NAME_LEN);
        assert!(sheet_name(long).starts_with("Sector 45"));
    }

    #[test]
    fn apostrophes_exposed_by_trimming_are_removed() {
        assert_eq!(sheet_name("' 'Sector 9"), "Sector 9");
        assert_eq!(sheet_name("'' ' x"), "x");
        assert_eq!(sheet_name("x ' ''"), "x");
        assert_eq!(sheet_name("O'Neil Colony"), "O'Neil Colony");
        assert_eq!(sheet_name(" ' ' "), "Area");

        let leads = vec![
            lead(1, "A", "Kothi/Villa", "' 'Sector 9"),
            lead(2, "B", "Kothi/Villa", "'' ' x"),
            lead(3, "C", "Kothi/Villa", "x ' ''"),
        ];
        assert_eq!(
            names(&plan_sheets(&leads)),
            vec!["Full_Data", "Sector 9", "x", "x~2"]
        );
        assert!(export_workbook(&leads).is_ok());
    }

    #[test]
    fn suffix_stem_never_ends_in_apostrophe_or_space() {
        let mut used = HashSet::new();
        let base = format!("{}' x", "y".repeat(MAX_SHEET_NAME_LEN - 3));
        unique_sheet_name(&base, &mut used);
        let second = unique_sheet_name(&base, &mut used);
        assert_eq!(second, format!("{}~2", "y".repeat(MAX_SHEET_NAME_LEN - 3)));
    }

    #[test]
    fn colliding_names_get_suffixes() {
        let leads = vec![
            lead(1, "A", "Kothi/Villa", "A/B"),
            lead(2, "B", "Kothi/Villa", "A-B"),
            lead(3, "C", "Kothi/Villa", "a-b"),
            lead(4, "D", "Kothi/Villa", "full_data"),
        ];
        let plan = plan_sheets(&leads);
        assert_eq!(
            names(&plan),
            vec!["Full_Data", "A-B", "A-B~2", "a-b~3", "full_data~2"]
        );
    }

    #[test]
    fn suffix_respects_length_limit() {
        let mut used = HashSet::new();
        let base = "x".repeat(MAX_SHEET_NAME_LEN);
        unique_sheet_name(&base, &mut used);
        let second = unique_sheet_name(&base, &mut used);
        assert_eq!(second.chars().count(), MAX_SHEET_NAME_LEN);
        assert!(second.ends_with("~2"));
    }

    #[test]
    fn workbook_is_written_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("inventory_data.xlsx");
        let leads = vec![
            lead(1, "A", "Kothi/Villa", "Sector 14"),
            lead(2, "B", "Kothi/Villa", "DLF Phase 1/2"),
        ];

        let written = write_export(&leads, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), written);
        assert_eq!(&bytes[..2], b"PK");
    }
}
