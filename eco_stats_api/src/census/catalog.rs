//! Built-in catalog of commonly used Census datasets.
//!
//! Year-based datasets put the vintage in the URL (`/data/2023/acs/acs5`);
//! timeseries datasets live under `/data/timeseries/...` and take the year as
//! a predicate whose name varies by dataset.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub key: &'static str,
    /// API path below the base URL, without the year.
    pub path: &'static str,
    pub name: &'static str,
    pub timeseries: bool,
    /// Predicate carrying the year for timeseries datasets.
    pub year_param: Option<&'static str>,
    /// Vintage used when the caller gives none (year-based datasets only).
    pub default_year: Option<&'static str>,
    /// Human-readable span of available years.
    pub years: &'static str,
}

const fn vintage(
    key: &'static str,
    path: &'static str,
    name: &'static str,
    years: &'static str,
    default_year: &'static str,
) -> Dataset {
    Dataset {
        key,
        path,
        name,
        timeseries: false,
        year_param: None,
        default_year: Some(default_year),
        years,
    }
}

const fn timeseries(
    key: &'static str,
    path: &'static str,
    name: &'static str,
    years: &'static str,
    year_param: &'static str,
) -> Dataset {
    Dataset {
        key,
        path,
        name,
        timeseries: true,
        year_param: Some(year_param),
        default_year: None,
        years,
    }
}

pub static DATASETS: &[Dataset] = &[
    vintage("acs1", "acs/acs1", "American Community Survey 1-Year Estimates", "2005-2024", "2023"),
    vintage("acs5", "acs/acs5", "American Community Survey 5-Year Estimates", "2009-2024", "2023"),
    vintage("dec/pl", "dec/pl", "Decennial Census Redistricting Data", "2000, 2010, 2020", "2020"),
    vintage("ecnbasic", "ecnbasic", "Economic Census - Economy-Wide Key Statistics", "2002, 2007, 2012, 2017, 2022", "2022"),
    vintage("ecnsize", "ecnsize", "Economic Census - Establishment & Firm Size", "2012, 2017, 2022", "2022"),
    vintage("ecncomp", "ecncomp", "Economic Census - Comparative Statistics", "2022", "2022"),
    timeseries("bds", "timeseries/bds", "Business Dynamics Statistics", "1978-2023", "YEAR"),
    vintage("abscs", "abscs", "Annual Business Survey - Company Summary", "2017-2023", "2023"),
    vintage("abscb", "abscb", "Annual Business Survey - Characteristics of Businesses", "2017-2023", "2023"),
    vintage("abscbo", "abscbo", "Annual Business Survey - Characteristics of Business Owners", "2017-2023", "2023"),
    vintage("absmcb", "absmcb", "Annual Business Survey - Module Business Characteristics", "2021-2023", "2023"),
    timeseries("qwi/sa", "timeseries/qwi/sa", "Quarterly Workforce Indicators - Sex by Age", "1990-present", "year"),
    timeseries("qwi/se", "timeseries/qwi/se", "Quarterly Workforce Indicators - Sex by Education", "1990-present", "year"),
    timeseries("qwi/rh", "timeseries/qwi/rh", "Quarterly Workforce Indicators - Race by Ethnicity", "1990-present", "year"),
    timeseries("govs", "timeseries/govs", "Annual Public Sector Statistics", "1942-present", "YEAR"),
    vintage("cbp", "cbp", "County Business Patterns", "1986-2022", "2022"),
    timeseries("saipe", "timeseries/poverty/saipe", "Small Area Income and Poverty Estimates", "1989-present", "time"),
    vintage("geoinfo", "geoinfo", "Geography Information", "2020-2024", "2024"),
    vintage("pep", "pep/population", "Population Estimates Program", "2015-2024", "2024"),
];

/// Looks up a dataset by catalog key.
pub fn lookup(key: &str) -> Option<&'static Dataset> {
    DATASETS.iter().find(|d| d.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entries() {
        assert_eq!(DATASETS.len(), 19);
        let acs5 = lookup("acs5").unwrap();
        assert_eq!(acs5.path, "acs/acs5");
        assert_eq!(acs5.default_year, Some("2023"));
        assert!(!acs5.timeseries);

        let saipe = lookup("saipe").unwrap();
        assert!(saipe.timeseries);
        assert_eq!(saipe.year_param, Some("time"));
        assert_eq!(saipe.default_year, None);

        assert!(lookup("acs/acs5").is_none());
    }

    #[test]
    fn timeseries_paths_are_prefixed() {
        for dataset in DATASETS {
            assert_eq!(dataset.timeseries, dataset.path.starts_with("timeseries/"), "{}", dataset.key);
        }
    }
}
