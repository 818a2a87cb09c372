//! QCEW (Quarterly Census of Employment and Wages) open-data CSV slices.
//!
//! Each slice is one CSV file, `{year}/{quarter}/{type}/{code}.csv`, holding
//! every record for one industry, one area, or one establishment-size class.

use std::fmt;

use crate::client::{AuthStyle, Request, RequestExecutor};
use crate::config::ClientConfig;
use crate::errors::validation;
use crate::query::require_non_empty;
use crate::tabular::{parse_delimited, Row};
use crate::Error;

pub const BASE_URL: &str = "https://data.bls.gov/cew/data/api";

/// NAICS code for total, all industries.
pub const ALL_INDUSTRIES: &str = "10";
/// Area code for national totals.
pub const US_TOTAL: &str = "US000";

const SERVICE: &str = "QCEW";

/// How a slice is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceType {
    Industry,
    Area,
    /// Establishment-size class. Published for the first quarter only.
    Size,
}

impl SliceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SliceType::Industry => "industry",
            SliceType::Area => "area",
            SliceType::Size => "size",
        }
    }
}

impl fmt::Display for SliceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client for the CEW open-data API. No key is involved.
pub struct QcewClient {
    executor: RequestExecutor,
}

impl QcewClient {
    pub fn new() -> Result<Self, Error> {
        Self::with_config(ClientConfig::new(BASE_URL))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            executor: RequestExecutor::new(SERVICE, config, AuthStyle::None)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    pub fn close(&self) -> bool {
        self.executor.close()
    }

    pub fn is_closed(&self) -> bool {
        self.executor.is_closed()
    }

    /// One slice. A slice that is not published yet (404) is empty.
    ///
    /// Hyphenated NAICS codes may be given with `-` or `_` (`31-33`, `31_33`).
    pub async fn get_slice(
        &self,
        year: u16,
        quarter: u8,
        slice: SliceType,
        code: &str,
    ) -> Result<Vec<Row>, Error> {
        validate_year(year)?;
        validate_quarter(quarter)?;
        if slice == SliceType::Size && quarter != 1 {
            return Err(validation("size slices are only published for quarter 1"));
        }
        let code = normalize_code(code)?;

        let request = Request::get(&format!("/{}/{}/{}/{}.csv", year, quarter, slice, code))
            .header("accept", "text/csv");
        match self.executor.execute_raw(&request).await {
            Ok(text) => parse_delimited(&text, b','),
            Err(Error::HttpStatus { status: 404, .. }) => {
                tracing::debug!("QCEW {} slice {} {}Q{} not published", slice, code, year, quarter);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// All areas for one industry across `start_year..=end_year`. `quarters`
    /// defaults to all four.
    pub async fn get_industry(
        &self,
        industry_code: &str,
        start_year: u16,
        end_year: u16,
        quarters: Option<&[u8]>,
    ) -> Result<Vec<Row>, Error> {
        self.fetch_range(SliceType::Industry, industry_code, start_year, end_year, quarters)
            .await
    }

    /// All industries for one area (FIPS-style code, `US000` for the nation).
    pub async fn get_area(
        &self,
        area_code: &str,
        start_year: u16,
        end_year: u16,
        quarters: Option<&[u8]>,
    ) -> Result<Vec<Row>, Error> {
        self.fetch_range(SliceType::Area, area_code, start_year, end_year, quarters)
            .await
    }

    /// One establishment-size class (`1`-`9`), first quarter of each year.
    pub async fn get_size(
        &self,
        size_code: &str,
        start_year: u16,
        end_year: u16,
    ) -> Result<Vec<Row>, Error> {
        self.fetch_range(SliceType::Size, size_code, start_year, end_year, Some(&[1]))
            .await
    }

    /// Slices are fetched one after another, in year then quarter order.
    async fn fetch_range(
        &self,
        slice: SliceType,
        code: &str,
        start_year: u16,
        end_year: u16,
        quarters: Option<&[u8]>,
    ) -> Result<Vec<Row>, Error> {
        validate_year(start_year)?;
        validate_year(end_year)?;
        if start_year > end_year {
            return Err(validation(format!(
                "start_year {} is after end_year {}",
                start_year, end_year
            )));
        }
        let quarters = quarters.unwrap_or(&[1, 2, 3, 4]);
        if quarters.is_empty() {
            return Err(validation("at least one quarter is required"));
        }
        for &q in quarters {
            validate_quarter(q)?;
        }

        let mut rows = Vec::new();
        for year in start_year..=end_year {
            for &quarter in quarters {
                rows.extend(self.get_slice(year, quarter, slice, code).await?);
            }
        }
        Ok(rows)
    }
}

fn validate_year(year: u16) -> Result<(), Error> {
    if !(1000..=9999).contains(&year) {
        return Err(validation(format!("year must have 4 digits, got {}", year)));
    }
    Ok(())
}

fn validate_quarter(quarter: u8) -> Result<(), Error> {
    if !(1..=4).contains(&quarter) {
        return Err(validation(format!("quarter must be 1-4, got {}", quarter)));
    }
    Ok(())
}

fn normalize_code(code: &str) -> Result<String, Error> {
    let code = code.trim();
    require_non_empty("slice code", code)?;
    let code = code.replace('-', "_");
    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(validation(format!(
            "slice code '{}' may only contain letters, digits and '_'",
            code
        )));
    }
    Ok(code)
}
