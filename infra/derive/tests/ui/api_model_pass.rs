use campus_derive::api_model;

#[api_model]
pub struct ZoneRow {
    pub zone_code: String,
    pub zone: String,
}

#[api_model(deny_unknown_fields = false)]
pub struct ErrorBody {
    pub message: Option<String>,
}

fn main() {
    let row: ZoneRow = serde_json::from_str(r#"{"zoneCode":"01","zone":"Arsi"}"#).unwrap();
    assert_eq!(row.zone_code, "01");

    assert!(serde_json::from_str::<ZoneRow>(r#"{"zoneCode":"01","zone":"Arsi","x":1}"#).is_err());

    let body: ErrorBody = serde_json::from_str(r#"{"message":"Invalid phone","status":422}"#).unwrap();
    assert_eq!(body.message.as_deref(), Some("Invalid phone"));
}
