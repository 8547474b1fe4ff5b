pub mod json;
pub mod names;
pub mod table;
pub mod tsv;

use crate::package::Package;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Tsv,
    Names,
}

pub struct Formatter {
    format: OutputFormat,
    no_color: bool,
}

impl Formatter {
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        Self { format, no_color }
    }

    pub fn format_list(
        &self,
        packages: &[Package],
        w: &mut dyn std::io::Write,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Table => table::format_table(packages, w, self.no_color),
            OutputFormat::Json => json::format_json_list(packages, w),
            OutputFormat::Tsv => tsv::format_tsv(packages, w),
            OutputFormat::Names => names::format_names(packages, w),
        }
    }
}
