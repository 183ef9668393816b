//! Flattens full instrument listings into summary rows.

use serde::Serialize;
use serde_json::Value;

use super::instrument_objects;

/// Column headers, in output order.
pub const COLUMNS: [&str; 6] = [
    "Instrument",
    "Ethnolinguistic Group",
    "Location",
    "English Name",
    "Materials and Make Classification",
    "Hornbostel family",
];

/// One summary row of the instrument table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstrumentRow {
    #[serde(rename = "Instrument")]
    pub instrument: String,
    #[serde(rename = "Ethnolinguistic Group")]
    pub ethnolinguistic_group: String,
    /// `"{city}, {province}"`, with either side empty when unknown.
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "English Name")]
    pub english_name: String,
    #[serde(rename = "Materials and Make Classification")]
    pub materials_and_make: String,
    #[serde(rename = "Hornbostel family")]
    pub hornbostel_family: String,
}

impl InstrumentRow {
    /// Builds a row from one `objects[]` entry of a full listing.
    #[must_use]
    pub fn from_object(item: &Value) -> Self {
        let city = text(item, "/city/name");
        let province = text(item, "/province/name");
        Self {
            instrument: text(item, "/localName"),
            ethnolinguistic_group: text(item, "/ethnolinguistic/name"),
            location: format!("{city}, {province}"),
            english_name: text(item, "/englishName"),
            materials_and_make: text(item, "/english/materialAndMake"),
            hornbostel_family: text(item, "/hornbostel/name"),
        }
    }

    /// Cell values in [`COLUMNS`] order.
    #[must_use]
    pub fn cells(&self) -> [&str; 6] {
        [
            self.instrument.as_str(),
            self.ethnolinguistic_group.as_str(),
            self.location.as_str(),
            self.english_name.as_str(),
            self.materials_and_make.as_str(),
            self.hornbostel_family.as_str(),
        ]
    }
}

/// Converts a ListInstruments response into rows, one per object.
#[must_use]
pub fn instrument_rows(response: &Value) -> Vec<InstrumentRow> {
    instrument_objects(response)
        .iter()
        .map(InstrumentRow::from_object)
        .collect()
}

fn text(item: &Value, pointer: &str) -> String {
    item.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn listing(objects: Value) -> Value {
        json!({"data": {"instruments": {"page": 1, "objects": objects}}})
    }

    #[test]
    fn test_complete_object_maps_every_column() {
        let response = listing(json!([{
            "localName": "Kubing",
            "englishName": "Jaw harp",
            "ethnolinguistic": {"name": "Maranao"},
            "city": {"name": "Marawi"},
            "province": {"name": "Lanao del Sur"},
            "english": {"materialAndMake": "Bamboo"},
            "hornbostel": {"name": "Idiophone"}
        }]));

        let rows = instrument_rows(&response);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].cells(),
            ["Kubing", "Maranao", "Marawi, Lanao del Sur", "Jaw harp", "Bamboo", "Idiophone"]
        );
    }

    #[test]
    fn test_missing_nested_fields_become_empty_strings() {
        let response = listing(json!([
            {"localName": "Agung", "province": null, "city": {"name": "Cotabato"}},
            {"localName": "Kudyapi", "english": null, "hornbostel": null, "ethnolinguistic": null},
            {}
        ]));

        let rows = instrument_rows(&response);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].location, "Cotabato, ");
        assert_eq!(rows[1].materials_and_make, "");
        assert_eq!(rows[1].hornbostel_family, "");
        assert_eq!(rows[1].ethnolinguistic_group, "");
        assert_eq!(rows[2], InstrumentRow { location: ", ".to_string(), ..InstrumentRow::default() });
    }

    #[test]
    fn test_serialized_keys_are_column_headers() {
        let row = InstrumentRow::from_object(&json!({"localName": "Gangsa"}));
        let value = serde_json::to_value(&row).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        for column in COLUMNS {
            assert!(keys.contains(&column), "missing column {column}");
        }
        assert_eq!(keys.len(), COLUMNS.len());
    }

    #[test]
    fn test_empty_response_yields_no_rows() {
        assert!(instrument_rows(&json!({"errors": []})).is_empty());
    }
}
