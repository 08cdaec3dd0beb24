//! KMZ AOI extraction.
//!
//! A KMZ is a zip archive holding a KML document (conventionally `doc.kml`)
//! plus assets. The KML member is located from the archive's own listing, so
//! concurrent uploads can never pick up each other's files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;

use crate::error::{Result, TerradiffError};
use crate::formats::kml;
use crate::models::Aoi;

pub fn read_aoi(path: &Path) -> Result<Aoi> {
    let kmz_error = |reason: String| TerradiffError::FileExtraction {
        format: "KMZ".to_string(),
        reason,
    };

    let file = File::open(path)?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| kmz_error(format!("not a zip archive: {e}")))?;

    let member_name = archive
        .file_names()
        .find(|name| name.to_ascii_lowercase().ends_with(".kml"))
        .map(str::to_string)
        .ok_or_else(|| kmz_error("archive contains no .kml member".to_string()))?;

    let mut member = archive
        .by_name(&member_name)
        .map_err(|e| kmz_error(format!("cannot read archive member {member_name}: {e}")))?;
    let mut content = String::new();
    member
        .read_to_string(&mut content)
        .map_err(|e| kmz_error(format!("cannot read archive member {member_name}: {e}")))?;

    kml::parse_aoi(&content)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;

    const SQUARE_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Placemark>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>30.0,50.0 31.0,50.0 31.0,51.0 30.0,51.0 30.0,50.0</coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>"#;

    fn write_kmz(path: &Path, members: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        for (name, content) in members {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn reads_the_kml_member() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aoi.kmz");
        write_kmz(&path, &[("doc.kml", SQUARE_KML)]);

        let aoi = read_aoi(&path).unwrap();
        assert!(!aoi.is_multi_polygon());
    }

    #[test]
    fn skips_non_kml_members() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aoi.kmz");
        write_kmz(&path, &[("readme.txt", "ignore me"), ("doc.kml", SQUARE_KML)]);

        assert!(read_aoi(&path).is_ok());
    }

    #[test]
    fn archive_without_kml_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aoi.kmz");
        write_kmz(&path, &[("readme.txt", "nothing spatial here")]);

        let err = read_aoi(&path).unwrap_err();
        assert!(matches!(err, TerradiffError::FileExtraction { .. }));
    }

    #[test]
    fn not_an_archive_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aoi.kmz");
        std::fs::write(&path, "plain text").unwrap();

        let err = read_aoi(&path).unwrap_err();
        assert!(matches!(err, TerradiffError::FileExtraction { .. }));
    }
}
