//! Template loading and management

use restgen_common::naming::{camel_case, dash_case, pascal_case};
use restgen_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    // Register custom filters
    tera.register_filter("camel_case", camel_case_filter);
    tera.register_filter("pascal_case", pascal_case_filter);
    tera.register_filter("dash_case", dash_case_filter);

    let templates = [
        ("model.generated.ts", include_str!("../templates/model.generated.ts.tera")),
        ("model.ts", include_str!("../templates/model.ts.tera")),
        ("enum.ts", include_str!("../templates/enum.ts.tera")),
        ("filter.model.ts", include_str!("../templates/filter.model.ts.tera")),
        ("service.ts", include_str!("../templates/service.ts.tera")),
    ];

    for (name, source) in templates {
        tera.add_raw_template(name, source).map_err(|e| {
            GeneratorError::Generation(format!("Failed to load {} template: {}", name, e))
        })?;
    }

    Ok(tera)
}

fn string_arg<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{} filter expects a string", filter)))
}

/// Filter to convert a name to camelCase
fn camel_case_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(camel_case(string_arg(value, "camel_case")?)))
}

/// Filter to convert a name to PascalCase
fn pascal_case_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(pascal_case(string_arg(value, "pascal_case")?)))
}

/// Filter to convert a name to dash-case
fn dash_case_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(dash_case(string_arg(value, "dash_case")?)))
}
