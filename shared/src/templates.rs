//! CSV templates accepted by the bulk-upload endpoints
//!
//! Column names are exact and case-sensitive. The backend parses the rows;
//! the client only checks that a CSV header carries the required columns
//! before uploading.

/// Column contract for one bulk-upload resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvTemplate {
    /// Resource path segment (`/holidays/bulk-upload`)
    pub resource: &'static str,
    /// All columns in template order
    pub columns: &'static [&'static str],
    /// Columns every file must carry
    pub required: &'static [&'static str],
    /// Example data row matching `columns`
    pub sample: &'static [&'static str],
}

impl CsvTemplate {
    pub const HOLIDAYS: CsvTemplate = CsvTemplate {
        resource: "holidays",
        columns: &["name", "date"],
        required: &["name", "date"],
        sample: &["Republic Day", "2025-01-26"],
    };

    pub const STUDENTS: CsvTemplate = CsvTemplate {
        resource: "students",
        columns: &[
            "name",
            "className",
            "section",
            "rollNo",
            "parentName",
            "parentCountryCode",
            "parentMobileNo",
            "parentEmail",
        ],
        required: &["name", "className", "section", "rollNo"],
        sample: &[
            "John Doe",
            "10",
            "A",
            "1",
            "Jane Doe",
            "+91",
            "1234567890",
            "jane@email.com",
        ],
    };

    pub const TEACHERS: CsvTemplate = CsvTemplate {
        resource: "teachers",
        columns: &["name", "countryCode", "mobileNo", "email"],
        required: &["name", "countryCode", "mobileNo"],
        sample: &["John Smith", "+91", "1234567890", "john@school.com"],
    };

    /// Downloadable template: header plus one sample row
    pub fn render(&self) -> String {
        format!("{}\n{}\n", self.columns.join(","), self.sample.join(","))
    }

    /// Required columns missing from a header row
    pub fn missing_columns(&self, header: &[String]) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|col| !header.iter().any(|h| h == col))
            .collect()
    }
}

/// Split the first line of a CSV file into trimmed column names
///
/// Handles a UTF-8 BOM, CRLF line endings and double-quoted names.
pub fn parse_header(content: &str) -> Vec<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let line = content.lines().next().unwrap_or_default();
    line.split(',')
        .map(|cell| cell.trim().trim_matches('"').trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_holidays_template() {
        assert_eq!(
            CsvTemplate::HOLIDAYS.render(),
            "name,date\nRepublic Day,2025-01-26\n"
        );
    }

    #[test]
    fn test_sample_rows_match_columns() {
        for template in [CsvTemplate::HOLIDAYS, CsvTemplate::STUDENTS, CsvTemplate::TEACHERS] {
            assert_eq!(template.columns.len(), template.sample.len(), "{}", template.resource);
            for required in template.required {
                assert!(template.columns.contains(required));
            }
        }
    }

    #[test]
    fn test_parse_header_handles_bom_and_quotes() {
        let header = parse_header("\u{feff}\"name\", date\r\nDiwali,2025-10-20\r\n");
        assert_eq!(header, vec!["name".to_string(), "date".to_string()]);
    }

    #[test]
    fn test_missing_columns_is_case_sensitive() {
        let header = parse_header("Name,className,section,rollNo\n");
        assert_eq!(CsvTemplate::STUDENTS.missing_columns(&header), vec!["name"]);
        let header = parse_header(&CsvTemplate::STUDENTS.render());
        assert!(CsvTemplate::STUDENTS.missing_columns(&header).is_empty());
    }
}
