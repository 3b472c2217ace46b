use super::*;

fn record(json: &str) -> ProfileRecord {
    serde_json::from_str(json).unwrap()
}

#[test]
fn empty_record_gets_documented_defaults() {
    let p = Profile::from_record(ProfileRecord::default());
    assert_eq!(p.name, UNKNOWN);
    assert_eq!(p.job, UNKNOWN);
    assert_eq!(p.mood, UNKNOWN);
    assert_eq!(p.city, "");
    assert_eq!(p.age, 0);
    assert_eq!(p.income, 0);
    assert_eq!(p.risk, 0);
    assert!(p.interests.is_empty());
    assert_eq!(p.area_label(), "N/A");
    assert_eq!(p.id.len(), 16);
}

#[test]
fn numeric_strings_and_aliases_are_accepted() {
    let p = Profile::from_record(record(
        r#"{"uid":"abc","job_title":"Nurse","income":"72000","age":"41.4",
            "nta":"BK09","boro":"Brooklyn","risk":250,"lat":40.7,"lon":-73.9}"#,
    ));
    assert_eq!(p.id, "abc");
    assert_eq!(p.job, "Nurse");
    assert_eq!(p.income, 72_000);
    assert_eq!(p.age, 41);
    assert_eq!(p.area_code.as_deref(), Some("BK09"));
    assert_eq!(p.borough.as_deref(), Some("Brooklyn"));
    assert_eq!(p.risk, 100);
    assert_eq!(p.coords, Some([40.7, -73.9, 0.0]));
}

#[test]
fn interests_are_deduplicated_and_capped() {
    let p = Profile::from_record(record(
        r#"{"interests":["chess","Chess"," ","go","jazz","film","tea","yoga","art"]}"#,
    ));
    assert_eq!(p.interests, vec!["chess", "go", "jazz", "film", "tea", "yoga"]);
}

#[test]
fn derived_ids_are_stable() {
    let a = Profile::from_record(record(r#"{"name":"Ada","job":"Analyst"}"#));
    let b = Profile::from_record(record(r#"{"name":"Ada","job":"Analyst"}"#));
    assert_eq!(a.id, b.id);
}

#[test]
fn gender_initial_defaults_to_x() {
    let p = Profile::from_record(record(r#"{"gender":"female"}"#));
    assert_eq!(p.gender_initial(), 'F');
    let p = Profile::from_record(ProfileRecord::default());
    // "unknown" placeholder still yields an initial.
    assert_eq!(p.gender_initial(), 'U');
}
