/// Tests for spreadsheet report module

#[cfg(test)]
mod tests {
    use crate::config::default_pricing;
    use crate::cost::compute;
    use crate::error::RenderError;
    use crate::report::spreadsheet::*;
    use crate::types::{CostBreakdown, Part, PricingStandard};
    use chrono::NaiveDate;
    use fs2::FileExt;
    use std::fs::{self, File};
    use std::io::{Cursor, Read};

    fn fixed_report() -> SpreadsheetReport {
        let generated_at = NaiveDate::from_ymd_opt(2025, 7, 16).unwrap().and_hms_opt(15, 18, 0).unwrap();
        SpreadsheetReport::new(generated_at)
    }

    fn breakdown() -> CostBreakdown {
        let pricing = PricingStandard { discount: 0.85, ..default_pricing() };
        let parts = vec![Part::new("bracket", 1000.0, 200.0), Part::new("housing", 2500.5, 120.25)];
        compute(&parts, "1天2小时30分40秒", &pricing)
    }

    #[test]
    fn test_buffer_is_zip_container() {
        let buffer = fixed_report().render_to_buffer(&breakdown()).unwrap();
        assert!(buffer.len() > 1000);
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_render_is_byte_identical_for_fixed_timestamp() {
        let report = fixed_report();
        let first = report.render_to_buffer(&breakdown()).unwrap();
        let second = report.render_to_buffer(&breakdown()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.xlsx");

        let report = fixed_report();
        report.render(&breakdown(), &path).unwrap();

        let written = fs::read(&path).unwrap();
        assert_eq!(written, report.render_to_buffer(&breakdown()).unwrap());
    }

    #[test]
    fn test_render_replaces_longer_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.xlsx");
        fs::write(&path, vec![b'x'; 200_000]).unwrap();

        fixed_report().render(&breakdown(), &path).unwrap();

        let written = fs::read(&path).unwrap();
        assert_eq!(&written[..2], b"PK");
        assert!(written.len() < 200_000);
    }

    #[test]
    fn test_locked_destination_is_busy_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.xlsx");
        fs::write(&path, "held by another program").unwrap();

        let holder = File::open(&path).unwrap();
        holder.lock_exclusive().unwrap();

        let err = fixed_report().render(&breakdown(), &path).unwrap_err();
        assert!(matches!(err, RenderError::FileBusy(ref p) if *p == path));
        assert!(err.is_retriable());
        assert_eq!(fs::read_to_string(&path).unwrap(), "held by another program");

        // Retrying after the holder lets go succeeds
        drop(holder);
        fixed_report().render(&breakdown(), &path).unwrap();
        assert_eq!(&fs::read(&path).unwrap()[..2], b"PK");
    }

    #[test]
    fn test_missing_directory_is_generic_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("budget.xlsx");

        let err = fixed_report().render(&breakdown(), &path).unwrap_err();
        match &err {
            RenderError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected Io error, got {:?}", other),
        }
        assert!(!err.is_retriable());
    }

    #[test]
    fn test_sections_in_order() {
        let [input, pricing, cost] = SpreadsheetReport::sections(&breakdown());
        assert_eq!(input.title, "输入参数");
        assert_eq!(pricing.title, "定价标准");
        assert_eq!(cost.title, "费用明细");
    }

    #[test]
    fn test_column_width_builder() {
        let report = fixed_report().column_width(30.0);
        assert_eq!(report.column_width, 30.0);
        assert!(report.render_to_buffer(&breakdown()).is_ok());
    }

    /// Read one XML part out of the rendered workbook
    fn workbook_part(buffer: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(buffer)).unwrap();
        let mut xml = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }

    /// Style index of a cell, e.g. `cell_style(&xml, "A4")`
    fn cell_style(sheet_xml: &str, cell: &str) -> Option<u32> {
        let start = sheet_xml.find(&format!("<c r=\"{}\"", cell))?;
        let tag = &sheet_xml[start..start + sheet_xml[start..].find('>')?];
        let s = tag.split(" s=\"").nth(1)?;
        s[..s.find('"')?].parse().ok()
    }

    fn single_part_breakdown() -> CostBreakdown {
        compute(&[Part::new("bracket", 1000.0, 200.0)], "2天3小时", &default_pricing())
    }

    #[test]
    fn test_sheet_layout() {
        let buffer = fixed_report().render_to_buffer(&single_part_breakdown()).unwrap();
        let sheet = workbook_part(&buffer, "xl/worksheets/sheet1.xml");

        // Title, timestamp and one header per section
        let merges: Vec<&str> =
            sheet.split("<mergeCell ref=\"").skip(1).map(|m| &m[..m.find('"').unwrap()]).collect();
        assert_eq!(merges, vec!["A1:B1", "A2:B2", "A4:B4", "A11:B11", "A22:B22"]);

        // Five input rows, nine pricing rows, eight cost rows
        assert!(sheet.contains("<c r=\"B30\""));
        assert!(!sheet.contains("<c r=\"A31\""));
        assert!(!sheet.contains("<c r=\"A10\""));
        assert!(!sheet.contains("<c r=\"A21\""));
    }

    #[test]
    fn test_sheet_cell_styles_follow_row_style() {
        let buffer = fixed_report().render_to_buffer(&single_part_breakdown()).unwrap();
        let sheet = workbook_part(&buffer, "xl/worksheets/sheet1.xml");

        let title = cell_style(&sheet, "A1").unwrap();
        let plain = cell_style(&sheet, "A2").unwrap();
        let header = cell_style(&sheet, "A4").unwrap();
        let part_name = cell_style(&sheet, "A7").unwrap();
        let volume = cell_style(&sheet, "B8").unwrap();
        let currency = cell_style(&sheet, "B23").unwrap();
        let numeric = cell_style(&sheet, "B29").unwrap();

        let mut all = vec![title, plain, header, part_name, volume, currency, numeric];
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 7, "each category has its own format");
        assert_eq!((currency, numeric), (6, 7));

        for header_cell in ["A11", "A22"] {
            assert_eq!(cell_style(&sheet, header_cell), Some(header));
        }
        for row in 5..=6 {
            assert_eq!(cell_style(&sheet, &format!("B{}", row)), Some(plain));
        }
        assert_eq!(cell_style(&sheet, "B7"), Some(part_name));
        assert_eq!(cell_style(&sheet, "A9"), Some(volume));
        for row in 12..=20 {
            assert_eq!(cell_style(&sheet, &format!("B{}", row)), Some(plain));
        }
        for row in 23..=28 {
            assert_eq!(cell_style(&sheet, &format!("A{}", row)), Some(currency));
            assert_eq!(cell_style(&sheet, &format!("B{}", row)), Some(currency));
        }
        assert_eq!(cell_style(&sheet, "B30"), Some(numeric));
    }

    #[test]
    fn test_sheet_text_content() {
        let buffer = fixed_report().render_to_buffer(&single_part_breakdown()).unwrap();
        let strings = workbook_part(&buffer, "xl/sharedStrings.xml");
        let workbook = workbook_part(&buffer, "xl/workbook.xml");

        assert!(workbook.contains("name=\"预算总览\""));
        assert!(strings.contains("金属3D打印预算报告"));
        assert!(strings.contains("生成时间：2025-07-16 15:18"));
        assert!(strings.contains("1000.000mm³"));
        assert!(strings.contains("200.000mm³"));
        // Pricing values carry their units
        assert!(strings.contains("4.5 g/cm³"));
        assert!(strings.contains("250.0 元/小时"));
        assert!(strings.contains("27.5 升/小时"));
        assert!(strings.contains("<t>1.0</t>"));
    }
}
