use comfy_table::{Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

use crate::package::{Manager, Package};

fn paint_manager(manager: Manager) -> String {
    let label = manager.to_string();
    match manager {
        Manager::Apt => label.green().to_string(),
        Manager::Pacman => label.bright_cyan().to_string(),
        Manager::Flatpak => label.blue().to_string(),
        Manager::Snap => label.yellow().to_string(),
        Manager::AppImage => label.magenta().to_string(),
        Manager::Rpm => label.bright_red().to_string(),
    }
}

pub fn format_table(
    packages: &[Package],
    w: &mut dyn std::io::Write,
    no_color: bool,
) -> anyhow::Result<()> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Version", "Manager", "Size", "Description"]);

    for pkg in packages {
        let manager = if no_color {
            pkg.manager.to_string()
        } else {
            paint_manager(pkg.manager)
        };

        table.add_row(vec![
            Cell::new(&pkg.name),
            Cell::new(&pkg.version),
            Cell::new(manager),
            Cell::new(&pkg.size),
            Cell::new(&pkg.description),
        ]);
    }

    writeln!(w, "{}", table)?;
    Ok(())
}
