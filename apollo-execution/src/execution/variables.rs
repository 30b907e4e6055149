//! Coercion of request variables.

use apollo_compiler::Node;
use apollo_compiler::ast;

use crate::Schema;
use crate::execution::arguments::value_from_ast;
use crate::graphql::Error;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::json_ext::ValueExt;
use crate::schema::NamedType;
use crate::spec::FieldType;
use crate::spec::Query;

pub(crate) const VALIDATION_INVALID_TYPE_VARIABLE: &str = "VALIDATION_INVALID_TYPE_VARIABLE";

/// Coerces raw request variables against the variable definitions of an operation.
///
/// Every definition is checked; all failures are returned together.
pub(crate) fn coerce_variable_values(
    schema: &Schema,
    query: &Query,
    definitions: &[Node<ast::VariableDefinition>],
    inputs: &Object,
) -> Result<Object, Vec<Error>> {
    let mut coerced = Object::new();
    let mut errors = Vec::new();
    for definition in definitions {
        let name = definition.name.as_str();
        let ty = FieldType::from(&*definition.ty);
        let error = |message: String| {
            Error::builder()
                .message(message)
                .locations(query.locations(definition.location()))
                .extension_code(VALIDATION_INVALID_TYPE_VARIABLE)
                .build()
        };

        match inputs.get(name) {
            None => {
                if let Some(default) = &definition.default_value {
                    if let Some(value) = value_from_ast(schema, &Object::new(), default, &ty) {
                        coerced.insert(name, value);
                    }
                } else if ty.is_non_null() {
                    errors.push(error(format!(
                        "Variable \"${name}\" of required type \"{ty}\" was not provided."
                    )));
                }
            }
            Some(Value::Null) if ty.is_non_null() => {
                errors.push(error(format!(
                    "Variable \"${name}\" of non-null type \"{ty}\" must not be null."
                )));
            }
            Some(value) => match coerce_input_value(schema, value, &ty) {
                Ok(value) => {
                    coerced.insert(name, value);
                }
                Err(reason) => {
                    errors.push(error(format!(
                        "Variable \"${name}\" got invalid value {}; {reason}",
                        value.describe()
                    )));
                }
            },
        }
    }

    if errors.is_empty() {
        Ok(coerced)
    } else {
        tracing::debug!(errors = errors.len(), "invalid variables");
        Err(errors)
    }
}

/// Coerces a raw input value to an internal value of type `ty`.
fn coerce_input_value(schema: &Schema, value: &Value, ty: &FieldType) -> Result<Value, String> {
    match ty {
        FieldType::NonNull(inner) => {
            if value.is_null() {
                return Err(format!("Expected non-nullable type \"{ty}\" not to be null."));
            }
            coerce_input_value(schema, value, inner)
        }
        _ if value.is_null() => Ok(Value::Null),
        FieldType::List(item_type) => match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    coerce_input_value(schema, item, item_type)
                        .map_err(|reason| format!("{reason} At index {index}."))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            single => Ok(Value::Array(vec![coerce_input_value(
                schema, single, item_type,
            )?])),
        },
        FieldType::Named(name) => match schema.get_type(name) {
            Some(NamedType::Scalar(scalar)) => scalar.parse_input_value(value),
            Some(NamedType::Enum(enum_type)) => enum_type.parse_value(value),
            Some(NamedType::InputObject(input)) => {
                let Value::Object(fields) = value else {
                    return Err(format!("Expected type \"{name}\" to be an object."));
                };
                if let Some((unknown, _)) = fields
                    .iter()
                    .find(|(key, _)| !input.fields.contains_key(key.as_str()))
                {
                    return Err(format!(
                        "Field \"{}\" is not defined by type \"{name}\".",
                        unknown.as_str()
                    ));
                }
                let mut object = Object::new();
                for field in input.fields.values() {
                    match fields.get(field.name.as_str()) {
                        Some(field_value) => {
                            let coerced = coerce_input_value(schema, field_value, &field.ty)
                                .map_err(|reason| format!("{reason} At \"{}\".", field.name))?;
                            object.insert(field.name.as_str(), coerced);
                        }
                        None => {
                            if let Some(default) = &field.default_value {
                                object.insert(field.name.as_str(), default.clone());
                            } else if field.ty.is_non_null() {
                                return Err(format!(
                                    "Field \"{}\" of required type \"{}\" was not provided.",
                                    field.name, field.ty
                                ));
                            }
                        }
                    }
                }
                Ok(Value::Object(object))
            }
            _ => Err(format!("Type \"{name}\" is not an input type.")),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json_bytes::json;

    use super::*;
    use crate::schema::EnumType;
    use crate::schema::FieldDefinition;
    use crate::schema::InputObjectType;
    use crate::schema::InputValueDefinition;
    use crate::schema::ObjectType;

    fn schema() -> Schema {
        Schema::builder()
            .query(ObjectType::new("Query").field(FieldDefinition::new(
                "a",
                FieldType::named("Int"),
            )))
            .add_type(EnumType::new("Color").value("RED", 0).value("BLUE", 1))
            .add_type(
                InputObjectType::new("Point")
                    .field(InputValueDefinition::new(
                        "x",
                        FieldType::named("Int").into_non_null(),
                    ))
                    .field(InputValueDefinition::new("y", FieldType::named("Int")).default_value(0)),
            )
            .build()
            .unwrap()
    }

    fn coerce(query: &str, inputs: Value) -> Result<Object, Vec<Error>> {
        let query = Query::parse(query).unwrap();
        let operation = query.operation(None).unwrap();
        coerce_variable_values(
            &schema(),
            &query,
            &operation.variables,
            inputs.as_object().unwrap(),
        )
    }

    fn messages(errors: Vec<Error>) -> Vec<String> {
        errors.into_iter().map(|error| error.message).collect()
    }

    #[test]
    fn coerces_values_and_applies_defaults() {
        let variables = coerce(
            "query($a: Int, $b: [Color] = [RED], $c: Point!, $d: [Int], $e: String) { a }",
            json!({ "a": 1, "c": { "x": 2 }, "d": 3, "e": null }),
        )
        .unwrap();
        assert_eq!(
            Value::Object(variables),
            json!({ "a": 1, "b": [0], "c": { "x": 2, "y": 0 }, "d": [3], "e": null })
        );
    }

    #[test]
    fn reports_every_invalid_variable() {
        let errors = coerce(
            "query($a: Int!, $b: Int!, $c: Int, $d: Color, $e: Point) { a }",
            json!({ "b": null, "c": "one", "d": "GREEN", "e": { "x": 1, "z": 2 } }),
        )
        .unwrap_err();
        assert!(
            errors
                .iter()
                .all(|e| e.extension_code().as_deref() == Some(VALIDATION_INVALID_TYPE_VARIABLE))
        );
        assert_eq!(
            messages(errors),
            vec![
                "Variable \"$a\" of required type \"Int!\" was not provided.".to_string(),
                "Variable \"$b\" of non-null type \"Int!\" must not be null.".to_string(),
                "Variable \"$c\" got invalid value \"one\"; Int cannot represent non-integer value: \"one\"".to_string(),
                "Variable \"$d\" got invalid value \"GREEN\"; Value \"GREEN\" does not exist in \"Color\" enum.".to_string(),
                "Variable \"$e\" got invalid value {\"x\":1,\"z\":2}; Field \"z\" is not defined by type \"Point\".".to_string(),
            ]
        );
    }

    #[test]
    fn nested_errors_name_their_position() {
        let errors = coerce(
            "query($p: [Point]) { a }",
            json!({ "p": [{ "x": 1 }, { "y": 1 }] }),
        )
        .unwrap_err();
        assert_eq!(
            messages(errors),
            vec![
                "Variable \"$p\" got invalid value [{\"x\":1},{\"y\":1}]; Field \"x\" of required type \"Int!\" was not provided. At index 1.".to_string()
            ]
        );
    }
}
