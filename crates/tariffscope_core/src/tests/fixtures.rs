//! Temporary table trees on disk

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::source::{Source, TableLoader};

pub const TVL_TABLE: &str = "EG,1,2,3,4\n\
E5,2600.10,2750.00,2860.40,2970.55\n\
E9,3100.00,3350.20,3500.90,3690.00\n\
E13,4200.30,4500.00,4800.75,\n";

pub const TVL_ADV: &str = "EG,1,2,3,4\nE5,1,2,3,4\nE9,1,3,3,4\nE13,1,2,3,\n";

pub const TVL_META: &str = "key,value\n\
valid_from,2024-11-01\n\
version,TV-L 2024\n\
source_url,https://example.org/tvl\n\
jsz_percent,60\n\
allowances,Schicht;Wechselschicht\n";

pub const VKA_TABLE: &str = "EG,1,2,3,4\n\
E5,2650.00,2790.30,2900.00,3010.10\n\
E9,3050.40,3300.00,3480.60,3700.25\n\
E13,4250.00,4550.80,4790.00,4990.00\n";

pub const VKA_ADV: &str = "EG,1,2,3,4\nE5,1,2,3,4\nE9,1,2,3,4\nE13,1,3,4,5\n";

pub const VKA_META: &str = "key,value\n\
valid_from,2024-03-01\n\
derived,true\n\
allowances,Schicht;Erschwernis\n";

/// A `tables/` tree beside an `allowances/` tree in a temp directory
pub struct Fixture {
    _dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let fixture = Self { _dir: dir, root };

        fixture.write("tables/index.json", r#"["TV-L", {"name": "TVöD-VKA"}]"#);
        fixture.write_table("TV-L", TVL_TABLE, TVL_ADV, TVL_META);
        fixture.write_table("TVöD-VKA", VKA_TABLE, VKA_ADV, VKA_META);
        fixture.write(
            "allowances/Schicht/Meta.csv",
            "key,value\nlabel_de,Schichtzulage\nadding_type,monthly\n",
        );
        fixture.write("allowances/Schicht/Table.csv", "EG,Betrag\nE5,40\nE9,40\n");
        fixture.write(
            "allowances/Wechselschicht/Meta.csv",
            "key,value\nlabel_en,Rotating shift\n",
        );
        fixture.write("allowances/Wechselschicht/Table.csv", "EG,Betrag\nE5,105\n");
        fixture
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    pub fn write_table(&self, name: &str, table: &str, adv: &str, meta: &str) {
        self.write(&format!("tables/{name}/Table.csv"), table);
        self.write(&format!("tables/{name}/Adv.csv"), adv);
        self.write(&format!("tables/{name}/Meta.csv"), meta);
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tables_dir(&self) -> PathBuf {
        self.root.join("tables")
    }

    pub fn loader(&self) -> TableLoader {
        TableLoader::new(vec![Source::local(self.tables_dir())])
    }
}
