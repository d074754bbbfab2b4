//! Lead-list ingestion
//!
//! Reads the enriched lead CSV into [`BusinessRecord`]s. The line parser is
//! deliberately minimal: fields split on unquoted commas, double quotes
//! toggle an in-field state, surrounding whitespace trimmed. Downstream
//! extraction assumes trimmed values, so the trim here is part of the
//! contract.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One row of the lead sheet. Read-only input to the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessRecord {
    pub name: String,
    pub city: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
    pub rating: Option<f64>,
    pub review_count: u32,
}

impl BusinessRecord {
    /// City with the lead sheet's fallback applied
    pub fn city_or_default(&self) -> &str {
        self.city.as_deref().unwrap_or("London")
    }

    /// Rating formatted for display, defaulting like the lead sheet does
    pub fn rating_display(&self) -> String {
        match self.rating {
            Some(r) => format!("{:.1}", r),
            None => "5.0".to_string(),
        }
    }
}

/// Phone number in both display and `tel:` link form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Phone {
    pub display: String,
    pub tel: String,
}

/// "+44 1895 625855" -> display "+44 1895 625855", tel "+441895625855"
pub fn format_phone(raw: &str) -> Phone {
    let display = raw.trim().to_string();
    if display.is_empty() {
        return Phone::default();
    }
    let stripped: String = display.chars().filter(|c| !c.is_whitespace()).collect();
    let tel = if stripped.starts_with('+') {
        stripped
    } else {
        format!("+{}", stripped)
    };
    Phone { display, tel }
}

/// Split a single CSV line on unquoted commas. Quotes toggle the in-field
/// state and are not included in the output; every field is trimmed.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Parse the full lead sheet. Rows without a "Company Name" are dropped.
pub fn parse_leads(content: &str) -> Vec<BusinessRecord> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let headers = match lines.next() {
        Some(line) => parse_csv_line(line),
        None => return Vec::new(),
    };
    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let field = |row: &[String], name: &str| -> Option<String> {
        index
            .get(name)
            .and_then(|&i| row.get(i))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    lines
        .filter_map(|line| {
            let row = parse_csv_line(line);
            let name = field(&row, "Company Name")?;
            Some(BusinessRecord {
                name,
                city: field(&row, "City"),
                website: field(&row, "Website"),
                phone: field(&row, "Phone"),
                email: field(&row, "Email"),
                address: field(&row, "Address"),
                facebook: field(&row, "Facebook"),
                linkedin: field(&row, "LinkedIn"),
                instagram: field(&row, "Instagram"),
                rating: field(&row, "Google Rating").and_then(|r| r.parse().ok()),
                review_count: field(&row, "Reviews")
                    .and_then(|r| r.parse().ok())
                    .unwrap_or(0),
            })
        })
        .collect()
}

/// Read and parse a lead sheet from disk
pub fn load_leads(path: &Path) -> Result<Vec<BusinessRecord>> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read lead file: {}", path.display()))?;
    Ok(parse_leads(&content))
}

/// Case-insensitive substring lookup by company name
pub fn find_lead<'a>(leads: &'a [BusinessRecord], query: &str) -> Option<&'a BusinessRecord> {
    let query = query.to_lowercase();
    leads.iter().find(|l| l.name.to_lowercase().contains(&query))
}
