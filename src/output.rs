use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;

use crate::model::SoftwareInfo;

/// Writes `records` as an indented JSON array. The data lands in a sibling
/// `.tmp` file first and is renamed into place, so an interrupted run never
/// leaves a truncated file at `path`.
pub fn write_records(path: &Path, records: &[SoftwareInfo]) -> anyhow::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");

    let file = File::create(&tmp).with_context(|| format!("cannot create {}", Path::new(&tmp).display()))?;
    if let Err(e) = write_json(file, records) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.context(format!("cannot write {}", Path::new(&tmp).display())));
    }

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(anyhow::Error::new(e).context(format!("cannot move output into {}", path.display())));
    }
    tracing::info!(target: "output", "\x1b[36mwrote {} records to {}\x1b[0m", records.len(), path.display());
    Ok(())
}

fn write_json<W: Write>(out: W, records: &[SoftwareInfo]) -> anyhow::Result<()> {
    let mut writer = BufWriter::new(out);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_records(path: &Path) -> anyhow::Result<Vec<SoftwareInfo>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| format!("{} is not a record file", path.display()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn tmp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ascr_output_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn keeps_non_ascii_and_indents() {
        let dir = tmp_dir("roundtrip");
        let path = dir.join("out.json");

        let records = vec![SoftwareInfo {
            name: "비디오 다운로더".into(),
            platforms: vec!["Android".into(), "Windows".into()],
            ..SoftwareInfo::default()
        }];
        write_records(&path, &records).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"name\": \"비디오 다운로더\""));
        assert!(text.starts_with("[\n  {\n    \"name\""));
        assert!(!dir.join("out.json.tmp").exists());
        assert_eq!(read_records(&path).unwrap(), records);

        write_records(&path, &[]).unwrap();
        assert!(read_records(&path).unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let dir = tmp_dir("failed");
        // a directory squatting on the final path makes the rename fail
        let path = dir.join("out.json");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(write_records(&path, &[]).is_err());
        assert!(path.is_dir());
        assert!(!dir.join("out.json.tmp").exists());

        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        assert!(write_json(Broken, &[SoftwareInfo::default()]).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
