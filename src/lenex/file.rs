// ==========================================
// 游泳赛事报名转换系统 - LENEX 文件读写
// ==========================================
// 支持: .lef / .xml (纯 XML) / .lxf (zip 压缩包，内含单个 .lef)
// ==========================================

use crate::lenex::error::{LenexError, LenexResult};
use crate::lenex::model::Lenex;
use crate::lenex::xml::{parse_document, write_document};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LenexFormat {
    Plain,
    Archive,
}

fn detect_format(path: &Path) -> LenexResult<LenexFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "lef" | "xml" => Ok(LenexFormat::Plain),
        "lxf" => Ok(LenexFormat::Archive),
        _ => Err(LenexError::UnsupportedFormat(ext)),
    }
}

/// 读取并解析 LENEX 文档
pub fn read_lenex(path: &Path) -> LenexResult<Lenex> {
    let text = read_document_text(path)?;
    Lenex::from_node(parse_document(&text)?)
}

/// 序列化并写出 LENEX 文档（格式由扩展名决定）
pub fn write_lenex(path: &Path, lenex: &Lenex) -> LenexResult<()> {
    let bytes = write_document(&lenex.to_node())?;
    write_document_bytes(path, &bytes)
}

/// 读取文档原文（.lxf 自动解压）
pub fn read_document_text(path: &Path) -> LenexResult<String> {
    if !path.exists() {
        return Err(LenexError::FileNotFound(path.display().to_string()));
    }

    match detect_format(path)? {
        LenexFormat::Plain => Ok(fs::read_to_string(path)?),
        LenexFormat::Archive => {
            let mut archive = ZipArchive::new(File::open(path)?)?;
            let entry_name = archive
                .file_names()
                .find(|n| {
                    let lower = n.to_lowercase();
                    lower.ends_with(".lef") || lower.ends_with(".xml")
                })
                .map(str::to_string)
                .ok_or_else(|| LenexError::Archive("压缩包内没有 .lef 文件".to_string()))?;

            debug!(archive = %path.display(), entry = %entry_name, "读取 LXF 条目");
            let mut content = String::new();
            archive.by_name(&entry_name)?.read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

/// 写出文档原文（.lxf 自动压缩）
pub fn write_document_bytes(path: &Path, bytes: &[u8]) -> LenexResult<()> {
    match detect_format(path)? {
        LenexFormat::Plain => {
            fs::write(path, bytes)?;
        }
        LenexFormat::Archive => {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("meet");
            let entry_name = format!("{}.lef", stem);

            let mut zip = ZipWriter::new(File::create(path)?);
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(entry_name, options)?;
            zip.write_all(bytes)?;
            zip.finish()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<LENEX version="3.0"><MEETS><MEET name="Test" course="SCM"/></MEETS></LENEX>"#;

    #[test]
    fn test_plain_and_archive_roundtrip() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("meet.lef");
        fs::write(&plain, MINIMAL).unwrap();

        let lenex = read_lenex(&plain).unwrap();
        assert_eq!(lenex.meet().unwrap().course.as_deref(), Some("SCM"));

        let archive = dir.path().join("out.lxf");
        write_lenex(&archive, &lenex).unwrap();
        let reread = read_lenex(&archive).unwrap();
        assert_eq!(reread, lenex);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meet.txt");
        fs::write(&path, MINIMAL).unwrap();
        assert!(matches!(
            read_lenex(&path),
            Err(LenexError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_lenex(Path::new("/nonexistent/meet.lef"));
        assert!(matches!(result, Err(LenexError::FileNotFound(_))));
    }
}
