//! Integration tests for dtogen-cli.
//! Covers the library calls the commands make, plus a few runs of the binary.

use dtogen_core::config::DtogenConfig;
use dtogen_parser::SourceUnit;
use dtogen_parser::entities::parse_from_unit_with;
use dtogen_parser::inspect::inspect_existing;
use dtogen_parser::resolver::DirectoryResolver;
use std::fs;
use std::path::Path;
use std::process::Command;

const STUDENT: &str = r"
namespace School.Model
{
    public class Student : Person
    {
        public int Grade { get; set; }
        public List<Course> Courses { get; set; }
    }
}
";

const PERSON: &str = r"
namespace School.Model
{
    public class Person
    {
        public string Name { get; set; }
    }
}
";

const STUDENT_DTO: &str = r"
namespace School.Dto
{
    [DataContract]
    public class StudentDTO : PersonDTO
    {
        public int Grade { get; set; }
        ////BCC/ BEGIN CUSTOM CODE SECTION
        public string Nickname { get; set; }
        ////ECC/ END CUSTOM CODE SECTION
    }
}
";

fn school_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("Model")).unwrap();
    fs::create_dir_all(dir.path().join("Dto")).unwrap();
    fs::write(dir.path().join("Model/Student.cs"), STUDENT).unwrap();
    fs::write(dir.path().join("Model/Person.cs"), PERSON).unwrap();
    fs::write(dir.path().join("Dto/StudentDTO.cs"), STUDENT_DTO).unwrap();
    dir
}

fn dtogen(project: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_dtogen"))
        .arg("--project")
        .arg(project)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

#[test]
fn test_config_defaults_without_file() {
    let tmpdir = tempfile::tempdir().unwrap();
    let config = DtogenConfig::load(tmpdir.path()).unwrap();
    assert!(config.parser.reject_syntax_errors);
    assert_eq!(config.inheritance.max_depth, 32);
    assert_eq!(config.resolver.extensions, vec!["cs"]);
}

#[tokio::test]
async fn test_entity_with_project_resolver() {
    let project = school_project();
    let config = DtogenConfig::load(project.path()).unwrap();
    let unit = SourceUnit::load(project.path().join("Model/Student.cs"), &config.parser)
        .await
        .unwrap();
    let resolver = DirectoryResolver::from_config(project.path(), &config);

    let meta = parse_from_unit_with(&unit, &resolver, true, &config.inheritance)
        .await
        .unwrap();
    assert_eq!(meta.name, "Student");
    assert_eq!(meta.own_properties().count(), 2);
    assert_eq!(meta.inherited_properties().count(), 1);
    assert_eq!(meta.property("Name").unwrap().type_name, "string");
}

#[tokio::test]
async fn test_inspect_loaded_dto() {
    let project = school_project();
    let unit = SourceUnit::load(
        project.path().join("Dto/StudentDTO.cs"),
        &DtogenConfig::default().parser,
    )
    .await
    .unwrap();
    let report = inspect_existing(Some(&unit), Some("PersonDTO"));
    assert!(report.exists && report.has_base_dto && report.has_data_contract);
    assert_eq!(report.auto_generated_properties, vec!["Grade"]);
}

#[test]
fn test_binary_entity_prints_json() {
    let project = school_project();
    let file = project.path().join("Model/Student.cs");
    let output = dtogen(project.path(), &["entity", file.to_str().unwrap(), "--inherited"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["name"], "Student");
    assert_eq!(value["namespace"], "School.Model");
    assert_eq!(value["base_class_dto_name"], "PersonDTO");
    let properties = value["properties"].as_array().unwrap();
    assert_eq!(properties.len(), 3);
    assert_eq!(properties[1]["type"], "List<Course>");
    assert_eq!(properties[2]["is_inherited"], true);
}

#[test]
fn test_binary_inspect_missing_file_prints_baseline() {
    let project = school_project();
    let missing = project.path().join("Dto/CourseDTO.cs");
    let output = dtogen(project.path(), &["inspect", missing.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["exists"], false);
    assert_eq!(value["custom_code_sections"], 0);
    assert!(value["auto_generated_properties"].as_array().unwrap().is_empty());
}

#[test]
fn test_binary_rejects_multiple_classes() {
    let project = school_project();
    let file = project.path().join("Model/Pair.cs");
    fs::write(&file, "class A { } class B { }").unwrap();
    let output = dtogen(project.path(), &["entity", file.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("exactly one class declaration"));
}

#[test]
fn test_binary_invalid_config_fails() {
    let project = school_project();
    fs::create_dir_all(project.path().join(".dtogen")).unwrap();
    fs::write(
        project.path().join(".dtogen/config.toml"),
        "[inheritance]\nmax_depth = 0\n",
    )
    .unwrap();
    let file = project.path().join("Model/Student.cs");
    let output = dtogen(project.path(), &["entity", file.to_str().unwrap()]);
    assert!(!output.status.success());
}
