//! Rendering of document trees back to YAML text.

use crate::{Error, Result, Scalar, Value};
use yaml_rust2::{Yaml, YamlEmitter};

/// Render a value as YAML text.
///
/// The output has no leading `---` document marker and ends with a newline.
/// Formatting and comments of the original source are not preserved; only the
/// structure and the values are.
pub fn serialize(value: &Value) -> Result<String> {
    let yaml = to_yaml(value);
    let mut out = String::new();
    YamlEmitter::new(&mut out)
        .dump(&yaml)
        .map_err(|e| Error::Emit {
            message: format!("{:?}", e),
        })?;

    let body = out
        .strip_prefix("---")
        .unwrap_or(&out)
        .trim_start_matches([' ', '\n']);
    let mut text = body.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

fn to_yaml(value: &Value) -> Yaml {
    match value {
        Value::Scalar(scalar) => match scalar {
            Scalar::Null => Yaml::Null,
            Scalar::Bool(b) => Yaml::Boolean(*b),
            Scalar::Integer(i) => Yaml::Integer(*i),
            Scalar::Float(f) => Yaml::Real(float_repr(*f)),
            Scalar::String(s) => Yaml::String(s.clone()),
        },
        Value::Sequence(items) => Yaml::Array(items.iter().map(to_yaml).collect()),
        Value::Mapping(entries) => Yaml::Hash(
            entries
                .iter()
                .map(|(k, v)| (Yaml::String(k.clone()), to_yaml(v)))
                .collect(),
        ),
    }
}

/// Spell a float so that it reads back as a float.
fn float_repr(f: f64) -> String {
    if f.is_nan() {
        ".nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { ".inf" } else { "-.inf" }.to_string()
    } else {
        // Debug keeps a fractional part (`1.0`, not `1`)
        format!("{:?}", f)
    }
}
