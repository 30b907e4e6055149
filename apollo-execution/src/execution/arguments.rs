//! Coercion of field arguments and input literals.

use apollo_compiler::ast;

use crate::Schema;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::schema::FieldDefinition;
use crate::schema::NamedType;
use crate::spec::FieldType;

/// Coerces the arguments of a field node against the field definition.
///
/// Defaults apply to absent arguments. The error is the message of the field error the
/// caller reports.
pub(crate) fn argument_values(
    schema: &Schema,
    definition: &FieldDefinition,
    node: &ast::Field,
    variables: &Object,
) -> Result<Object, String> {
    let mut coerced = Object::new();
    for (name, argument) in &definition.arguments {
        let ty = &argument.ty;
        let Some(value) = node
            .arguments
            .iter()
            .find(|a| a.name.as_str() == name)
            .map(|a| &a.value)
        else {
            if let Some(default) = &argument.default_value {
                coerced.insert(name.as_str(), default.clone());
            } else if ty.is_non_null() {
                return Err(format!(
                    "Argument \"{name}\" of required type \"{ty}\" was not provided."
                ));
            }
            continue;
        };

        if let ast::Value::Variable(variable) = &**value {
            match variables.get(variable.as_str()) {
                Some(Value::Null) if ty.is_non_null() => {
                    return Err(format!(
                        "Argument \"{name}\" of non-null type \"{ty}\" must not be null."
                    ));
                }
                Some(value) => {
                    coerced.insert(name.as_str(), value.clone());
                }
                None => {
                    if let Some(default) = &argument.default_value {
                        coerced.insert(name.as_str(), default.clone());
                    } else if ty.is_non_null() {
                        return Err(format!(
                            "Argument \"{name}\" of required type \"{ty}\" was provided the \
                             variable \"${variable}\" which was not provided a runtime value."
                        ));
                    }
                }
            }
            continue;
        }

        if matches!(**value, ast::Value::Null) && ty.is_non_null() {
            return Err(format!(
                "Argument \"{name}\" of non-null type \"{ty}\" must not be null."
            ));
        }
        match value_from_ast(schema, variables, value, ty) {
            Some(value) => {
                coerced.insert(name.as_str(), value);
            }
            None => {
                return Err(format!(
                    "Argument \"{name}\" has invalid value {}.",
                    &**value
                ));
            }
        }
    }
    Ok(coerced)
}

fn is_missing_variable(value: &ast::Value, variables: &Object) -> bool {
    matches!(value, ast::Value::Variable(name) if !variables.contains_key(name.as_str()))
}

/// Coerces a literal to an internal value of type `ty`.
///
/// Returns `None` when the literal is invalid for the type, or when it is a variable
/// without a runtime value.
pub(crate) fn value_from_ast(
    schema: &Schema,
    variables: &Object,
    value: &ast::Value,
    ty: &FieldType,
) -> Option<Value> {
    if let ast::Value::Variable(name) = value {
        let value = variables.get(name.as_str())?;
        if value.is_null() && ty.is_non_null() {
            return None;
        }
        // Variable values were coerced against their own declared type.
        return Some(value.clone());
    }

    match ty {
        FieldType::NonNull(inner) => {
            if matches!(value, ast::Value::Null) {
                return None;
            }
            value_from_ast(schema, variables, value, inner)
        }
        _ if matches!(value, ast::Value::Null) => Some(Value::Null),
        FieldType::List(item_type) => match value {
            ast::Value::List(items) => items
                .iter()
                .map(|item| {
                    if is_missing_variable(item, variables) {
                        (!item_type.is_non_null()).then_some(Value::Null)
                    } else {
                        value_from_ast(schema, variables, item, item_type)
                    }
                })
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            single => Some(Value::Array(vec![value_from_ast(
                schema, variables, single, item_type,
            )?])),
        },
        FieldType::Named(name) => match schema.get_type(name)? {
            NamedType::Scalar(scalar) => scalar.parse_literal_value(value).ok(),
            NamedType::Enum(enum_type) => enum_type.parse_literal(value).ok(),
            NamedType::InputObject(input) => {
                let ast::Value::Object(fields) = value else {
                    return None;
                };
                if fields
                    .iter()
                    .any(|(name, _)| !input.fields.contains_key(name.as_str()))
                {
                    return None;
                }
                let mut object = Object::new();
                for field in input.fields.values() {
                    let field_value = fields
                        .iter()
                        .find(|(name, _)| name.as_str() == field.name)
                        .map(|(_, value)| value)
                        .filter(|value| !is_missing_variable(value, variables));
                    match field_value {
                        Some(field_value) => {
                            let coerced =
                                value_from_ast(schema, variables, field_value, &field.ty)?;
                            object.insert(field.name.as_str(), coerced);
                        }
                        None => {
                            if let Some(default) = &field.default_value {
                                object.insert(field.name.as_str(), default.clone());
                            } else if field.ty.is_non_null() {
                                return None;
                            }
                        }
                    }
                }
                Some(Value::Object(object))
            }
            NamedType::Object(_) | NamedType::Interface(_) | NamedType::Union(_) => None,
        },
    }
}
