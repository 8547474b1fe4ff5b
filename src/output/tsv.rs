use crate::package::Package;

pub const TSV_HEADER: &str = "name\tversion\tmanager\tsize\tdescription";

pub fn format_tsv(packages: &[Package], w: &mut dyn std::io::Write) -> anyhow::Result<()> {
    writeln!(w, "{}", TSV_HEADER)?;
    for pkg in packages {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            pkg.name,
            pkg.version,
            pkg.manager,
            pkg.size,
            // Tabs inside a description would shift the columns
            pkg.description.replace('\t', " ")
        )?;
    }
    Ok(())
}
