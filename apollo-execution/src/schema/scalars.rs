//! Built-in scalar types and their coercion rules.

use apollo_compiler::ast;

use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::json_ext::ValueExt;
use crate::schema::ScalarType;

pub(crate) const INT: &str = "Int";
pub(crate) const FLOAT: &str = "Float";
pub(crate) const STRING: &str = "String";
pub(crate) const BOOLEAN: &str = "Boolean";
pub(crate) const ID: &str = "ID";

/// The scalars every schema provides.
pub(crate) fn built_in() -> Vec<ScalarType> {
    vec![
        ScalarType::new(INT)
            .description(
                "The `Int` scalar type represents non-fractional signed whole numeric values. \
                 Int can represent values between -(2^31) and 2^31 - 1.",
            )
            .serialize(serialize_int)
            .parse_value(parse_int)
            .parse_literal(parse_int_literal),
        ScalarType::new(FLOAT)
            .description(
                "The `Float` scalar type represents signed double-precision fractional values.",
            )
            .serialize(serialize_float)
            .parse_value(parse_float)
            .parse_literal(parse_float_literal),
        ScalarType::new(STRING)
            .description(
                "The `String` scalar type represents textual data, represented as UTF-8 \
                 character sequences.",
            )
            .serialize(serialize_string)
            .parse_value(parse_string)
            .parse_literal(parse_string_literal),
        ScalarType::new(BOOLEAN)
            .description("The `Boolean` scalar type represents `true` or `false`.")
            .serialize(serialize_boolean)
            .parse_value(parse_boolean)
            .parse_literal(parse_boolean_literal),
        ScalarType::new(ID)
            .description(
                "The `ID` scalar type represents a unique identifier, serialized as a String.",
            )
            .serialize(serialize_id)
            .parse_value(parse_id)
            .parse_literal(parse_id_literal),
    ]
}

pub(crate) fn identity(value: &Value) -> Result<Value, String> {
    Ok(value.clone())
}

/// Converts a literal to its JSON equivalent, for scalars without literal coercion.
pub(crate) fn literal_to_value(value: &ast::Value) -> Result<Value, String> {
    Ok(match value {
        ast::Value::Null => Value::Null,
        ast::Value::Enum(name) => Value::from(name.as_str()),
        ast::Value::Variable(name) => {
            return Err(format!("unexpected variable \"${}\" in literal", name.as_str()));
        }
        ast::Value::String(s) => Value::from(s.as_str()),
        ast::Value::Float(f) => Value::from(
            f.try_to_f64()
                .map_err(|_| format!("invalid float literal {}", f.as_str()))?,
        ),
        ast::Value::Int(i) => match i.as_str().parse::<i64>() {
            Ok(i) => Value::from(i),
            Err(_) => Value::from(
                i.try_to_f64()
                    .map_err(|_| format!("invalid integer literal {}", i.as_str()))?,
            ),
        },
        ast::Value::Boolean(b) => Value::Bool(*b),
        ast::Value::List(items) => Value::Array(
            items
                .iter()
                .map(|item| literal_to_value(item))
                .collect::<Result<_, _>>()?,
        ),
        ast::Value::Object(fields) => {
            let mut object = Object::new();
            for (name, value) in fields {
                object.insert(name.as_str(), literal_to_value(value)?);
            }
            Value::Object(object)
        }
    })
}

fn int_from_f64(value: &Value, number: Option<f64>) -> Result<Value, String> {
    let Some(number) = number.filter(|n| n.is_finite() && n.fract() == 0.0) else {
        return Err(format!(
            "Int cannot represent non-integer value: {}",
            value.describe()
        ));
    };
    if number > i32::MAX as f64 || number < i32::MIN as f64 {
        return Err(format!(
            "Int cannot represent non 32-bit signed integer value: {}",
            value.describe()
        ));
    }
    Ok(Value::from(number as i32))
}

fn serialize_int(value: &Value) -> Result<Value, String> {
    let number = match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.as_str().trim().parse::<f64>().ok(),
        _ => None,
    };
    int_from_f64(value, number)
}

fn parse_int(value: &Value) -> Result<Value, String> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    int_from_f64(value, number)
}

fn parse_int_literal(value: &ast::Value) -> Result<Value, String> {
    match value {
        ast::Value::Int(i) => i.try_to_i32().map(Value::from).map_err(|_| {
            format!(
                "Int cannot represent non 32-bit signed integer value: {}",
                i.as_str()
            )
        }),
        other => Err(format!("Int cannot represent non-integer value: {other}")),
    }
}

fn serialize_float(value: &Value) -> Result<Value, String> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::Bool(b) => Ok(Value::from(if *b { 1 } else { 0 })),
        Value::String(s) => s
            .as_str()
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::from)
            .ok_or_else(|| {
                format!(
                    "Float cannot represent non numeric value: {}",
                    value.describe()
                )
            }),
        _ => Err(format!(
            "Float cannot represent non numeric value: {}",
            value.describe()
        )),
    }
}

fn parse_float(value: &Value) -> Result<Value, String> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        _ => Err(format!(
            "Float cannot represent non numeric value: {}",
            value.describe()
        )),
    }
}

fn parse_float_literal(value: &ast::Value) -> Result<Value, String> {
    let number = match value {
        ast::Value::Int(i) => i.try_to_f64().ok(),
        ast::Value::Float(f) => f.try_to_f64().ok(),
        _ => None,
    };
    number
        .map(Value::from)
        .ok_or_else(|| format!("Float cannot represent non numeric value: {value}"))
}

fn serialize_string(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Bool(b) => Ok(Value::from(b.to_string())),
        Value::Number(n) => Ok(Value::from(n.to_string())),
        _ => Err(format!(
            "String cannot represent value: {}",
            value.describe()
        )),
    }
}

fn parse_string(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(_) => Ok(value.clone()),
        _ => Err(format!(
            "String cannot represent a non string value: {}",
            value.describe()
        )),
    }
}

fn parse_string_literal(value: &ast::Value) -> Result<Value, String> {
    match value {
        ast::Value::String(s) => Ok(Value::from(s.as_str())),
        other => Err(format!(
            "String cannot represent a non string value: {other}"
        )),
    }
}

fn serialize_boolean(value: &Value) -> Result<Value, String> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(n) if n.is_finite() => Ok(Value::Bool(n != 0.0)),
            _ => Err(format!(
                "Boolean cannot represent a non boolean value: {}",
                value.describe()
            )),
        },
        _ => Err(format!(
            "Boolean cannot represent a non boolean value: {}",
            value.describe()
        )),
    }
}

fn parse_boolean(value: &Value) -> Result<Value, String> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        _ => Err(format!(
            "Boolean cannot represent a non boolean value: {}",
            value.describe()
        )),
    }
}

fn parse_boolean_literal(value: &ast::Value) -> Result<Value, String> {
    match value {
        ast::Value::Boolean(b) => Ok(Value::Bool(*b)),
        other => Err(format!(
            "Boolean cannot represent a non boolean value: {other}"
        )),
    }
}

fn id_from_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(Value::from(n.to_string())),
        _ => None,
    }
}

fn serialize_id(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(_) => Ok(value.clone()),
        _ => id_from_integer(value)
            .ok_or_else(|| format!("ID cannot represent value: {}", value.describe())),
    }
}

fn parse_id(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(_) => Ok(value.clone()),
        _ => id_from_integer(value)
            .ok_or_else(|| format!("ID cannot represent value: {}", value.describe())),
    }
}

fn parse_id_literal(value: &ast::Value) -> Result<Value, String> {
    match value {
        ast::Value::String(s) => Ok(Value::from(s.as_str())),
        ast::Value::Int(i) => Ok(Value::from(i.as_str())),
        other => Err(format!(
            "ID cannot represent a non-string and non-integer value: {other}"
        )),
    }
}
