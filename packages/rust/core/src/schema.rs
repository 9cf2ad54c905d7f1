//! schema.org `BreadcrumbList` structured data.

use serde_json::{Value, json};

use crumbtrail_shared::{BreadcrumbItem, ValidationReport};

const SCHEMA_CONTEXT: &str = "https://schema.org";
const LIST_TYPE: &str = "BreadcrumbList";
const ITEM_TYPE: &str = "ListItem";

/// Render a trail as a `BreadcrumbList`. Positions start at 1.
pub fn format_breadcrumbs_for_schema(items: &[BreadcrumbItem]) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            json!({
                "@type": ITEM_TYPE,
                "position": index + 1,
                "name": item.label,
                "item": {
                    "@type": "Thing",
                    "@id": item.href,
                    "name": item.label,
                },
            })
        })
        .collect();

    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": LIST_TYPE,
        "itemListElement": elements,
    })
}

/// Structural check of a `BreadcrumbList` document.
pub fn validate_schema_data(data: &Value) -> ValidationReport {
    let mut errors = Vec::new();

    if data.get("@context").and_then(Value::as_str) != Some(SCHEMA_CONTEXT) {
        errors.push("Missing or invalid @context".to_string());
    }
    if data.get("@type").and_then(Value::as_str) != Some(LIST_TYPE) {
        errors.push("Missing or invalid @type".to_string());
    }

    match data.get("itemListElement").and_then(Value::as_array) {
        None => errors.push("itemListElement must be an array".to_string()),
        Some(elements) => {
            for (index, item) in elements.iter().enumerate() {
                if item.get("@type").and_then(Value::as_str) != Some(ITEM_TYPE) {
                    errors.push(format!("Item at index {index} missing or invalid @type"));
                }

                let position_ok = item
                    .get("position")
                    .and_then(Value::as_f64)
                    .is_some_and(|p| p != 0.0);
                if !position_ok {
                    errors.push(format!("Item at index {index} missing or invalid position"));
                }

                let name_ok = item
                    .get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|n| !n.is_empty());
                if !name_ok {
                    errors.push(format!("Item at index {index} missing or invalid name"));
                }
            }
        }
    }

    ValidationReport::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trail() -> Vec<BreadcrumbItem> {
        vec![
            BreadcrumbItem::new("breadcrumb-home", "Home", "/"),
            BreadcrumbItem::new("breadcrumb-0-products", "Products", "/products"),
        ]
    }

    #[test]
    fn formats_breadcrumb_list() {
        let schema = format_breadcrumbs_for_schema(&trail());

        assert_eq!(schema["@context"], "https://schema.org");
        assert_eq!(schema["@type"], "BreadcrumbList");

        let elements = schema["itemListElement"].as_array().unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(
            elements[1],
            json!({
                "@type": "ListItem",
                "position": 2,
                "name": "Products",
                "item": { "@type": "Thing", "@id": "/products", "name": "Products" },
            })
        );
    }

    #[test]
    fn empty_trail_has_empty_list() {
        let schema = format_breadcrumbs_for_schema(&[]);
        assert_eq!(schema["itemListElement"], json!([]));
        assert!(validate_schema_data(&schema).valid);
    }

    #[test]
    fn generated_schema_validates() {
        let report = validate_schema_data(&format_breadcrumbs_for_schema(&trail()));
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn reports_structural_problems() {
        let report = validate_schema_data(&json!({
            "@context": "http://example.com",
            "itemListElement": [
                { "@type": "Thing", "position": 0, "name": "" },
                { "@type": "ListItem", "position": "1", "name": "Ok" },
            ],
        }));

        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec![
                "Missing or invalid @context",
                "Missing or invalid @type",
                "Item at index 0 missing or invalid @type",
                "Item at index 0 missing or invalid position",
                "Item at index 0 missing or invalid name",
                "Item at index 1 missing or invalid position",
            ]
        );
    }

    #[test]
    fn non_array_elements() {
        let report = validate_schema_data(&json!({
            "@context": "https://schema.org",
            "@type": "BreadcrumbList",
            "itemListElement": {},
        }));
        assert_eq!(report.errors, vec!["itemListElement must be an array"]);
    }
}
