//! Mapping between file extensions and Maven artifact types.

use regex::Regex;
use std::sync::LazyLock;

pub const MAVEN_PLUGIN: &str = "maven-plugin";
pub const JAVA_SOURCE: &str = "java-source";
pub const JAVADOC: &str = "javadoc";

static MAVEN_PLUGIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:maven-.*-plugin|.*-maven-plugin)$").unwrap());

/// True if the artifactId follows the Maven plugin naming convention.
pub fn is_maven_plugin(artifact_id: &str) -> bool {
    MAVEN_PLUGIN_PATTERN.is_match(artifact_id)
}

/// The artifact type for a bare extension.
pub fn for_extension(extension: &str) -> String {
    match extension {
        "tar.gz" => "distribution-tgz".to_string(),
        "tar.bz2" => "distribution-bzip".to_string(),
        "zip" => "distribution-zip".to_string(),
        other => other.to_string(),
    }
}

/// The artifact type for an extension carrying a classifier.
///
/// `sources` and `javadoc` jars get their own types; every other classifier
/// is typed by extension alone.
pub fn for_extension_and_classifier(classifier: Option<&str>, extension: &str) -> String {
    match (classifier, extension) {
        (Some("sources"), "jar") => JAVA_SOURCE.to_string(),
        (Some("javadoc"), "jar") => JAVADOC.to_string(),
        _ => for_extension(extension),
    }
}

/// The file extension used to store an artifact of the given type.
pub fn extension_for_type(artifact_type: &str) -> &str {
    match artifact_type {
        "ejb" | "ejb-client" | "java-source" | "javadoc" | "javadoc.jar" | "aspect"
        | "uberjar" | "maven-plugin" | "maven-one-plugin" => "jar",
        "distribution-tgz" => "tar.gz",
        "distribution-bzip" => "tar.bz2",
        "distribution-zip" => "zip",
        other => other,
    }
}
