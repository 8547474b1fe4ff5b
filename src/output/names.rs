use crate::package::Package;

pub fn format_names(packages: &[Package], w: &mut dyn std::io::Write) -> anyhow::Result<()> {
    for pkg in packages {
        writeln!(w, "{}", pkg.name)?;
    }
    Ok(())
}
