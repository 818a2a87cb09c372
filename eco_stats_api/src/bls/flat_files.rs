//! BLS LABSTAT flat files: lookup tables, the master series list, bulk data.
//!
//! Every program publishes tab-delimited files under
//! `pub/time.series/{prefix}/`, e.g. `cu/cu.area` or `ce/ce.data.0.AllCESSeries`.

use super::programs::{get_program, Program};
use crate::client::{AuthStyle, Request, RequestExecutor};
use crate::config::ClientConfig;
use crate::errors::validation;
use crate::query::require_non_empty;
use crate::tabular::{parse_delimited, Row};
use crate::Error;

pub const BASE_URL: &str = "https://download.bls.gov/pub/time.series";

/// Data file most programs publish with recent observations.
pub const DEFAULT_DATA_FILE: &str = "0.Current";

const SERVICE: &str = "BLS";

// download.bls.gov answers 403 to non-browser user agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/plain,text/html;q=0.9,*/*;q=0.8";

/// Client for the LABSTAT download tree. No key is involved.
pub struct FlatFileClient {
    executor: RequestExecutor,
}

impl FlatFileClient {
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

    /// Downloads one lookup file, e.g. `get_mapping("CU", "area")` for `cu/cu.area`.
    ///
    /// `mapping_name` must be one of the program's published lookup files.
    pub async fn get_mapping(&self, prefix: &str, mapping_name: &str) -> Result<Vec<Row>, Error> {
        let program = get_program(prefix)?;
        let name = mapping_name.trim().to_lowercase();
        if !program.has_mapping(&name) {
            return Err(validation(format!(
                "program {} has no mapping file '{}'. Available: {}",
                program.prefix,
                mapping_name,
                program.mapping_files.join(", ")
            )));
        }
        self.fetch(program, &name).await
    }

    /// Master series list of a program, keeping rows whose columns equal
    /// every `(column, value)` filter.
    pub async fn search_series(
        &self,
        prefix: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<Row>, Error> {
        let program = get_program(prefix)?;
        for (column, _) in filters {
            require_non_empty("filter column", column)?;
        }
        let rows = self.fetch(program, "series").await?;
        Ok(rows
            .into_iter()
            .filter(|row| {
                filters
                    .iter()
                    .all(|(column, value)| row.get(*column).map(String::as_str) == Some(value.trim()))
            })
            .collect())
    }

    /// A data file, `{prefix}.data.{suffix}`; the suffix defaults to
    /// [`DEFAULT_DATA_FILE`].
    pub async fn get_data(&self, prefix: &str, file_suffix: Option<&str>) -> Result<Vec<Row>, Error> {
        let program = get_program(prefix)?;
        let suffix = file_suffix.unwrap_or(DEFAULT_DATA_FILE).trim();
        require_non_empty("file_suffix", suffix)?;
        if !suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(validation(format!(
                "file_suffix '{}' may only contain letters, digits, '.', '_' and '-'",
                suffix
            )));
        }
        self.fetch(program, &format!("data.{}", suffix)).await
    }

    async fn fetch(&self, program: &Program, name: &str) -> Result<Vec<Row>, Error> {
        let dir = program.prefix.to_lowercase();
        let request = Request::get(&format!("/{}/{}.{}", dir, dir, name))
            .header("user-agent", BROWSER_USER_AGENT)
            .header("accept", ACCEPT);
        let text = self.executor.execute_raw(&request).await?;
        let rows = parse_delimited(&text, b'\t')?;
        tracing::debug!("Parsed {} rows from {}.{}", rows.len(), dir, name);
        Ok(rows)
    }
}
