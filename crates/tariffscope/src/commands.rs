//! Non-interactive subcommands

use std::io::Write;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use tariffscope_core::source::TableLoader;
use tariffscope_core::{Recomputed, Selections, compare_many, load_and_recompute};

use crate::export::{ExportFormat, write_export};

/// Print one table name per line.
pub async fn list(loader: &TableLoader, out: &mut impl Write) -> color_eyre::Result<()> {
    let names = loader.table_names().await?;
    let base = loader
        .resolved_base()
        .map(ToString::to_string)
        .unwrap_or_default();
    tracing::info!(%base, tables = names.len(), "listing tables");
    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// Print the multi-table comparison as JSON.
pub async fn compare(
    loader: &TableLoader,
    tables: &[String],
    baseline: Option<&str>,
    pretty: bool,
    out: &mut impl Write,
) -> color_eyre::Result<()> {
    let payload = compare_many(loader, tables, baseline).await?;
    let json = if pretty {
        serde_json::to_string_pretty(&payload)
    } else {
        serde_json::to_string(&payload)
    }
    .wrap_err("serializing comparison")?;
    writeln!(out, "{json}")?;
    Ok(())
}

/// Fill unset tariffs from the first two listed tables.
pub async fn complete_pair(
    loader: &TableLoader,
    mut selections: Selections,
) -> color_eyre::Result<Selections> {
    if selections.tariff_a.is_empty() || selections.tariff_b.is_empty() {
        let names = loader.table_names().await?;
        if selections.tariff_a.is_empty() {
            selections.tariff_a = names.first().cloned().unwrap_or_default();
        }
        if selections.tariff_b.is_empty() {
            selections.tariff_b = names.get(1).or(names.first()).cloned().unwrap_or_default();
        }
    }
    Ok(selections)
}

/// Recompute the pair and write one export file.
pub async fn export(
    loader: &TableLoader,
    selections: Selections,
    format: ExportFormat,
    out: Option<&Path>,
    export_dir: &Path,
) -> color_eyre::Result<PathBuf> {
    let selections = complete_pair(loader, selections).await?;
    match load_and_recompute(loader, &selections).await? {
        Recomputed::Ready(dashboard) => write_export(&dashboard, format, out, export_dir),
        Recomputed::NoData => Err(eyre!(
            "{} and {} have no comparable cells under the current filters",
            selections.tariff_a,
            selections.tariff_b
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tariffscope_core::Source;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("tables");
        for (name, salary) in [("A", "2000"), ("B", "2100")] {
            let table_dir = tables.join(name);
            fs::create_dir_all(&table_dir).unwrap();
            fs::write(table_dir.join("Table.csv"), format!("EG,1\nE1,{salary}\n")).unwrap();
            fs::write(table_dir.join("Adv.csv"), "EG,1\nE1,2\n").unwrap();
            fs::write(table_dir.join("Meta.csv"), "key,value\n").unwrap();
        }
        fs::write(tables.join("index.json"), r#"["A", "B"]"#).unwrap();
        dir
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_list_prints_names() {
        let dir = fixture();
        let loader = TableLoader::new(vec![Source::local(dir.path().join("tables"))]);
        let mut out = Vec::new();

        runtime().block_on(list(&loader, &mut out)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "A\nB\n");
    }

    #[test]
    fn test_compare_prints_json() {
        let dir = fixture();
        let loader = TableLoader::new(vec![Source::local(dir.path().join("tables"))]);
        let mut out = Vec::new();
        let tables = vec!["A".to_string(), "B".to_string()];

        runtime()
            .block_on(compare(&loader, &tables, Some("B"), false, &mut out))
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["baseline"], "B");
        assert_eq!(json["selected_tables"][1], "B");
    }

    #[test]
    fn test_export_defaults_to_first_pair() {
        let dir = fixture();
        let loader = TableLoader::new(vec![Source::local(dir.path().join("tables"))]);
        let export_dir = dir.path().join("exports");

        let path = runtime()
            .block_on(export(
                &loader,
                Selections::default(),
                ExportFormat::Csv,
                None,
                &export_dir,
            ))
            .unwrap();

        assert_eq!(path, export_dir.join("tarifvergleich.csv"));
        let text = fs::read_to_string(path).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("E1,1,2000.00,2100.00"));
    }
}
