//! `maven-metadata.xml` reading and writing.
//!
//! Only the subset used by repository maintenance is modelled. The root
//! `xmlns` and `modelVersion` attributes survive a rewrite; other attributes
//! and unknown elements (`plugins`, `snapshotVersions`) are dropped.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MetadataError;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const LAST_UPDATED_FORMAT: &str = "%Y%m%d%H%M%S";

/// A project- or version-level repository metadata descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "metadata", rename_all = "camelCase")]
pub struct RepositoryMetadata {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(rename = "@modelVersion", default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioning: Option<Versioning>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Versioning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotVersion>,
    #[serde(default, skip_serializing_if = "Versions::is_empty")]
    pub versions: Versions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Versions {
    #[serde(default)]
    pub version: Vec<String>,
}

impl Versions {
    pub fn is_empty(&self) -> bool {
        self.version.is_empty()
    }
}

/// Current build of a snapshot version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<u32>,
}

impl RepositoryMetadata {
    pub fn from_xml(xml: &str) -> Result<Self, MetadataError> {
        quick_xml::de::from_str(xml).map_err(|e| MetadataError::Parse(e.to_string()))
    }

    pub fn to_xml(&self) -> Result<String, MetadataError> {
        let mut body = String::new();
        let mut serializer = quick_xml::se::Serializer::new(&mut body);
        serializer.indent(' ', 2);
        self.serialize(serializer)
            .map_err(|e| MetadataError::Serialize(e.to_string()))?;
        Ok(format!("{}\n{}\n", XML_DECLARATION, body))
    }

    fn versioning_mut(&mut self) -> &mut Versioning {
        self.versioning.get_or_insert_with(Versioning::default)
    }

    pub fn available_versions(&self) -> &[String] {
        self.versioning
            .as_ref()
            .map(|v| v.versions.version.as_slice())
            .unwrap_or_default()
    }

    pub fn set_available_versions(&mut self, versions: Vec<String>) {
        self.versioning_mut().versions = Versions { version: versions };
    }

    pub fn latest_version(&self) -> Option<&str> {
        self.versioning.as_ref()?.latest.as_deref()
    }

    pub fn set_latest_version(&mut self, version: Option<String>) {
        self.versioning_mut().latest = version.filter(|v| !v.is_empty());
    }

    pub fn released_version(&self) -> Option<&str> {
        self.versioning.as_ref()?.release.as_deref()
    }

    pub fn set_released_version(&mut self, version: Option<String>) {
        self.versioning_mut().release = version.filter(|v| !v.is_empty());
    }

    pub fn snapshot_version(&self) -> Option<&SnapshotVersion> {
        self.versioning.as_ref()?.snapshot.as_ref()
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.versioning.as_ref()?.last_updated.as_deref()
    }

    /// `lastUpdated` as an instant, if it is in the `yyyyMMddHHmmss` form.
    pub fn last_updated_timestamp(&self) -> Option<DateTime<Utc>> {
        let text = self.last_updated()?;
        NaiveDateTime::parse_from_str(text, LAST_UPDATED_FORMAT)
            .ok()
            .map(|t| t.and_utc())
    }

    pub fn set_last_updated(&mut self, when: DateTime<Utc>) {
        self.versioning_mut().last_updated = Some(when.format(LAST_UPDATED_FORMAT).to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PROJECT_METADATA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>org.jruby.plugins</groupId>
  <artifactId>jruby-rake-plugin</artifactId>
  <versioning>
    <latest>1.1.2</latest>
    <release>1.1.2</release>
    <versions>
      <version>1.0RC1-SNAPSHOT</version>
      <version>1.0RC1</version>
      <version>1.0-SNAPSHOT</version>
      <version>1.1.2</version>
    </versions>
    <lastUpdated>20080506165011</lastUpdated>
  </versioning>
</metadata>"#;

    const SNAPSHOT_METADATA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>org.apache.archiva</groupId>
  <artifactId>archiva-common</artifactId>
  <version>1.2-SNAPSHOT</version>
  <versioning>
    <snapshot>
      <timestamp>20080509.083525</timestamp>
      <buildNumber>3</buildNumber>
    </snapshot>
    <lastUpdated>20080509083525</lastUpdated>
  </versioning>
</metadata>"#;

    #[test]
    fn test_read_project_metadata() {
        let metadata = RepositoryMetadata::from_xml(PROJECT_METADATA).unwrap();
        assert_eq!(metadata.group_id.as_deref(), Some("org.jruby.plugins"));
        assert_eq!(metadata.artifact_id.as_deref(), Some("jruby-rake-plugin"));
        assert_eq!(metadata.latest_version(), Some("1.1.2"));
        assert_eq!(metadata.released_version(), Some("1.1.2"));
        assert_eq!(metadata.available_versions().len(), 4);
        assert_eq!(
            metadata.last_updated_timestamp(),
            Some(Utc.with_ymd_and_hms(2008, 5, 6, 16, 50, 11).unwrap())
        );
    }

    #[test]
    fn test_read_snapshot_metadata() {
        let metadata = RepositoryMetadata::from_xml(SNAPSHOT_METADATA).unwrap();
        assert_eq!(metadata.version.as_deref(), Some("1.2-SNAPSHOT"));
        let snapshot = metadata.snapshot_version().unwrap();
        assert_eq!(snapshot.timestamp.as_deref(), Some("20080509.083525"));
        assert_eq!(snapshot.build_number, Some(3));
        assert!(metadata.available_versions().is_empty());
    }

    #[test]
    fn test_rewrite_preserves_fields() {
        let mut metadata = RepositoryMetadata::from_xml(PROJECT_METADATA).unwrap();
        metadata.set_available_versions(vec!["1.0RC1".to_string(), "1.1.2".to_string()]);
        metadata.set_last_updated(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());

        let xml = metadata.to_xml().unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains("<lastUpdated>20240102030405</lastUpdated>"));

        let latest = xml.find("<latest>").unwrap();
        let versions = xml.find("<versions>").unwrap();
        let last_updated = xml.find("<lastUpdated>").unwrap();
        assert!(latest < versions && versions < last_updated);

        let reread = RepositoryMetadata::from_xml(&xml).unwrap();
        assert_eq!(reread, metadata);
    }

    #[test]
    fn test_rewrite_keeps_root_attributes() {
        let xml = r#"<metadata xmlns="http://maven.apache.org/METADATA/1.1.0" modelVersion="1.1.0">
  <groupId>org.acme</groupId>
  <artifactId>lib</artifactId>
  <versioning>
    <latest>1.0</latest>
  </versioning>
</metadata>"#;
        let mut metadata = RepositoryMetadata::from_xml(xml).unwrap();
        assert_eq!(metadata.model_version.as_deref(), Some("1.1.0"));
        metadata.set_latest_version(Some("1.1".to_string()));

        let written = metadata.to_xml().unwrap();
        assert!(written.contains(r#"xmlns="http://maven.apache.org/METADATA/1.1.0""#));
        assert!(written.contains(r#"modelVersion="1.1.0""#));
        assert_eq!(RepositoryMetadata::from_xml(&written).unwrap(), metadata);
    }

    #[test]
    fn test_clearing_release_omits_element() {
        let mut metadata = RepositoryMetadata::from_xml(PROJECT_METADATA).unwrap();
        metadata.set_released_version(Some(String::new()));
        let xml = metadata.to_xml().unwrap();
        assert!(!xml.contains("<release>"));
        assert_eq!(metadata.released_version(), None);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let result = RepositoryMetadata::from_xml("<metadata><versioning><latest>1.0</versioning>");
        assert!(matches!(result, Err(MetadataError::Parse(_))));
    }
}
