//! Registry of BLS LABSTAT programs and the fixed-width layout of their series IDs.
//!
//! Positions are 1-indexed and inclusive, matching the BLS series ID format
//! documentation (`https://www.bls.gov/help/hlpforma.htm`).

use crate::errors::{validation, Error};

/// One positional field of a series ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesField {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
    pub description: &'static str,
}

impl SeriesField {
    const fn new(name: &'static str, start: usize, end: usize, description: &'static str) -> Self {
        Self {
            name,
            start,
            end,
            description,
        }
    }

    /// Number of characters the field occupies.
    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }

    /// The field's slice of `series_id`, or `None` if the ID is too short.
    pub fn extract<'a>(&self, series_id: &'a str) -> Option<&'a str> {
        series_id.get(self.start - 1..self.end)
    }
}

/// A BLS survey program identified by its two-letter prefix.
#[derive(Debug, PartialEq, Eq)]
pub struct Program {
    pub prefix: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub fields: &'static [SeriesField],
    /// Lookup files published under `pub/time.series/{prefix}/`.
    pub mapping_files: &'static [&'static str],
}

impl Program {
    /// Full length of a series ID in this program.
    pub fn series_id_length(&self) -> usize {
        self.fields.iter().map(|f| f.end).max().unwrap_or(0)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn field(&self, name: &str) -> Option<&SeriesField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `{prefix}.{name}` is one of the program's lookup files.
    pub fn has_mapping(&self, name: &str) -> bool {
        self.mapping_files.iter().any(|m| m.eq_ignore_ascii_case(name))
    }
}

type F = SeriesField;

pub static PROGRAMS: &[Program] = &[
    Program {
        prefix: "CE",
        name: "Current Employment Statistics (National)",
        description: "Monthly estimates of employment, hours, and earnings from the payroll survey (NAICS basis).",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (CE)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("supersector", 4, 5, "Supersector code"),
            F::new("industry", 6, 11, "Industry code"),
            F::new("data_type", 12, 13, "Data type code"),
        ],
        mapping_files: &["datatype", "industry", "seasonal", "series", "supersector"],
    },
    Program {
        prefix: "CU",
        name: "Consumer Price Index - All Urban Consumers",
        description: "Monthly changes in the prices paid by urban consumers for a representative basket of goods and services.",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (CU)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("periodicity", 4, 4, "Periodicity code"),
            F::new("area", 5, 8, "Area code"),
            F::new("item", 9, 16, "Item code"),
        ],
        mapping_files: &["area", "base", "item", "periodicity", "seasonal", "series"],
    },
    Program {
        prefix: "CW",
        name: "Consumer Price Index - Urban Wage Earners and Clerical Workers",
        description: "Monthly CPI data for urban wage earners and clerical workers.",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (CW)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("periodicity", 4, 4, "Periodicity code"),
            F::new("area", 5, 8, "Area code"),
            F::new("item", 9, 16, "Item code"),
        ],
        mapping_files: &["area", "base", "item", "periodicity", "seasonal", "series"],
    },
    Program {
        prefix: "LN",
        name: "Labor Force Statistics",
        description: "Monthly labor force, employment, and unemployment estimates from the Current Population Survey.",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (LN)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("series_code", 4, 11, "Series classification code"),
        ],
        mapping_files: &[
            "ages", "born", "class", "duration", "education", "ethnic", "indy", "lfst",
            "occupation", "origins", "pcts", "race", "seasonal", "series", "sexs",
        ],
    },
    Program {
        prefix: "LA",
        name: "Local Area Unemployment Statistics",
        description: "Labor force, employment, unemployment, and unemployment rate for states, metro areas, counties, and cities.",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (LA)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("area_type", 4, 4, "Area type code"),
            F::new("state_fips", 5, 6, "State FIPS code"),
            F::new("area", 7, 11, "Area code"),
            F::new("measure", 12, 13, "Measure code"),
        ],
        mapping_files: &["area", "area_type", "measure", "seasonal", "series", "state_region_division"],
    },
    Program {
        prefix: "SM",
        name: "State and Area Employment, Hours, and Earnings",
        description: "Monthly employment, hours, and earnings for states and metropolitan areas (NAICS basis).",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (SM)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("state", 4, 5, "State code"),
            F::new("area", 6, 10, "Area code"),
            F::new("supersector_industry", 11, 18, "Supersector/industry code"),
            F::new("data_type", 19, 20, "Data type code"),
        ],
        mapping_files: &["area", "datatype", "industry", "seasonal", "series", "state", "supersector"],
    },
    Program {
        prefix: "JT",
        name: "Job Openings and Labor Turnover Survey",
        description: "Monthly job openings, hires, and separations by industry and region.",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (JT)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("industry", 4, 9, "Industry code"),
            F::new("state", 10, 11, "State code"),
            F::new("area", 12, 16, "Area code"),
            F::new("sizeclass", 17, 18, "Size class code"),
            F::new("dataelement", 19, 20, "Data element code"),
            F::new("ratelevel", 21, 21, "Rate or level code"),
        ],
        mapping_files: &[
            "area", "dataelement", "industry", "ratelevel", "seasonal", "series", "sizeclass", "state",
        ],
    },
    Program {
        prefix: "AP",
        name: "Average Price Data",
        description: "Monthly average retail prices for selected food, energy, and other items.",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (AP)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("area", 4, 7, "Area code"),
            F::new("item", 8, 13, "Item code"),
        ],
        mapping_files: &["area", "item", "seasonal", "series"],
    },
    Program {
        prefix: "WP",
        name: "Producer Price Index - Commodities",
        description: "Monthly producer price changes for commodities.",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (WP)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("group", 4, 5, "Group code"),
            F::new("item", 6, 14, "Item code"),
        ],
        mapping_files: &["group", "item", "seasonal", "series"],
    },
    Program {
        prefix: "PC",
        name: "Producer Price Index - Industry Data",
        description: "Monthly producer price index data by NAICS industry.",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (PC)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("industry", 4, 9, "Industry code"),
            F::new("product", 10, 21, "Product code"),
        ],
        mapping_files: &["industry", "product", "seasonal", "series"],
    },
    Program {
        prefix: "CI",
        name: "Employment Cost Index",
        description: "Quarterly changes in employer costs for employee compensation.",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (CI)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("ownership", 4, 4, "Ownership code"),
            F::new("compensation", 5, 6, "Compensation component code"),
            F::new("industry", 7, 10, "Industry code"),
            F::new("occupation", 11, 13, "Occupation code"),
            F::new("subcell", 14, 16, "Subcell code"),
            F::new("periodicity", 17, 17, "Periodicity code"),
        ],
        mapping_files: &[
            "compensation", "industry", "occupation", "ownership", "periodicity", "seasonal",
            "series", "subcell",
        ],
    },
    Program {
        prefix: "BD",
        name: "Business Employment Dynamics",
        description: "Quarterly gross job gains and losses, establishment births and deaths.",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (BD)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("state_fips", 4, 5, "State FIPS code"),
            F::new("msa", 6, 10, "MSA code"),
            F::new("industry", 11, 16, "Industry code"),
            F::new("data_element", 17, 18, "Data element code"),
            F::new("sizeclass", 19, 19, "Size class code"),
            F::new("data_class", 20, 20, "Data class code"),
            F::new("ratelevel", 21, 21, "Rate or level code"),
            F::new("periodicity", 22, 22, "Periodicity code"),
        ],
        mapping_files: &[
            "dataelement", "industry", "msa", "ratelevel", "seasonal", "series", "sizeclass", "state",
        ],
    },
    Program {
        prefix: "EN",
        name: "Quarterly Census of Employment and Wages",
        description: "Quarterly employment and wages covering nearly all employers, from unemployment insurance records.",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (EN)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("area", 4, 8, "Area code"),
            F::new("data_type", 9, 9, "Data type code"),
            F::new("size", 10, 10, "Size code"),
            F::new("ownership", 11, 11, "Ownership code"),
            F::new("industry", 12, 17, "Industry code"),
        ],
        mapping_files: &["area", "datatype", "industry", "ownership", "seasonal", "series", "size"],
    },
    Program {
        prefix: "IP",
        name: "Industry Productivity",
        description: "Annual and quarterly output, hours, and productivity measures for major U.S. industries.",
        fields: &[
            F::new("prefix", 1, 2, "Survey prefix (IP)"),
            F::new("seasonal", 3, 3, "Seasonal adjustment code"),
            F::new("sector", 4, 5, "Sector code"),
            F::new("industry", 6, 11, "Industry code"),
            F::new("measure", 12, 13, "Measure code"),
            F::new("duration", 14, 14, "Duration code"),
        ],
        mapping_files: &["duration", "industry", "measure", "seasonal", "sector", "series"],
    },
];

/// Looks up a program by its prefix, ignoring case.
pub fn get_program(prefix: &str) -> Result<&'static Program, Error> {
    let key = prefix.trim();
    PROGRAMS
        .iter()
        .find(|p| p.prefix.eq_ignore_ascii_case(key))
        .ok_or_else(|| {
            let mut known: Vec<&str> = PROGRAMS.iter().map(|p| p.prefix).collect();
            known.sort_unstable();
            validation(format!(
                "unknown BLS program prefix '{}'. Available programs: {}",
                key.to_uppercase(),
                known.join(", ")
            ))
        })
}

/// `(prefix, name)` for every registered program, in registry order.
pub fn list_programs() -> Vec<(&'static str, &'static str)> {
    PROGRAMS.iter().map(|p| (p.prefix, p.name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_fourteen_programs() {
        let prefixes: Vec<&str> = list_programs().into_iter().map(|(p, _)| p).collect();
        assert_eq!(prefixes.len(), 14);
        for p in ["CE", "CU", "CW", "LN", "LA", "SM", "JT", "AP", "WP", "PC", "CI", "BD", "EN", "IP"] {
            assert!(prefixes.contains(&p), "missing {}", p);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(get_program("cu").unwrap().prefix, "CU");
        let err = get_program("ZZ").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("AP, BD"));
    }

    #[test]
    fn layouts() {
        assert_eq!(get_program("CE").unwrap().series_id_length(), 13);
        assert_eq!(get_program("CU").unwrap().series_id_length(), 16);
        assert_eq!(get_program("JT").unwrap().series_id_length(), 21);

        let area = get_program("CU").unwrap().field("area").unwrap();
        assert_eq!(area.width(), 4);
        assert_eq!(area.extract("CUUR0000SA0XXXX"), Some("0000"));
        assert_eq!(area.extract("CUUR"), None);
    }

    #[test]
    fn fields_are_contiguous() {
        for program in PROGRAMS {
            let mut next = 1;
            for field in program.fields {
                assert_eq!(field.start, next, "{} {}", program.prefix, field.name);
                assert!(field.end >= field.start);
                next = field.end + 1;
            }
        }
    }
}
