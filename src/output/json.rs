use crate::package::Package;

pub fn format_json_list(
    packages: &[Package],
    w: &mut dyn std::io::Write,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(packages)?;
    writeln!(w, "{}", json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::Manager;

    #[test]
    fn test_json_list_empty() {
        let mut buf = Vec::new();
        format_json_list(&[], &mut buf).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(String::from_utf8(buf).unwrap().trim()).unwrap();
        assert_eq!(parsed, serde_json::json!([]));
    }

    #[test]
    fn test_json_list_fields() {
        let mut pkg = Package::new("Obsidian", Manager::AppImage);
        pkg.version = "1.6.7".to_string();
        pkg.path = Some("/opt/Obsidian-1.6.7.AppImage".to_string());
        let mut buf = Vec::new();
        format_json_list(&[pkg, Package::new("vim", Manager::Pacman)], &mut buf).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(String::from_utf8(buf).unwrap().trim()).unwrap();

        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["name"], "Obsidian");
        assert_eq!(parsed[0]["manager"], "appimage");
        assert_eq!(parsed[0]["path"], "/opt/Obsidian-1.6.7.AppImage");
        assert_eq!(parsed[1]["manager"], "pacman");
        assert!(parsed[1]["path"].is_null());
        assert!(parsed[1].get("size").is_some());
    }
}
