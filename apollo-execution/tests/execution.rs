use std::sync::Arc;
use std::time::Duration;

use apollo_execution::Configuration;
use apollo_execution::Context;
use apollo_execution::ExecutionRequest;
use apollo_execution::Executor;
use apollo_execution::FieldError;
use apollo_execution::FieldType;
use apollo_execution::Query;
use apollo_execution::ResolvedValue;
use apollo_execution::ResolverParams;
use apollo_execution::Schema;
use apollo_execution::graphql::Response;
use apollo_execution::json_ext::Object;
use apollo_execution::json_ext::Value;
use apollo_execution::schema::EnumType;
use apollo_execution::schema::FieldDefinition;
use apollo_execution::schema::InputObjectType;
use apollo_execution::schema::InputValueDefinition;
use apollo_execution::schema::ObjectType;
use apollo_execution::schema::UnionType;
use pretty_assertions::assert_eq;
use serde_json_bytes::json;
use test_log::test;
use tokio::sync::Barrier;

const COUNTER: &str = "counter";

fn string() -> FieldType {
    FieldType::named("String")
}

fn int() -> FieldType {
    FieldType::named("Int")
}

/// Reads the counter, waits, then writes it back incremented: concurrent calls lose
/// updates, sequential ones do not.
fn increment(params: ResolverParams) -> ResolvedValue {
    let delay = params.args.get("delay").and_then(Value::as_i64).unwrap_or(0);
    let context = params.context;
    ResolvedValue::pending(async move {
        let current: i64 = context
            .get(COUNTER)
            .map_err(|err| FieldError::new(err.to_string()))?
            .unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        context
            .insert(COUNTER, current + 1)
            .map_err(|err| FieldError::new(err.to_string()))?;
        Ok(json!(current + 1))
    })
}

fn schema() -> Arc<Schema> {
    let dog = ObjectType::new("Dog")
        .field(FieldDefinition::new("name", string()))
        .field(FieldDefinition::new("barks", FieldType::named("Boolean")));
    let cat = ObjectType::new("Cat")
        .field(FieldDefinition::new("name", string()))
        .field(FieldDefinition::new("meows", FieldType::named("Boolean")));
    let pet = UnionType::new("Pet").member("Dog").member("Cat");

    let child = ObjectType::new("Child")
        .field(FieldDefinition::new("name", string()))
        .field(FieldDefinition::new("other", string()))
        .field(FieldDefinition::new("required", string().into_non_null()))
        .field(FieldDefinition::new("grandchild", FieldType::named("Child")));

    let item = ObjectType::new("Item").field(
        FieldDefinition::new("id", int()).resolver(|params: ResolverParams| {
            let item = params.source.as_object().cloned().unwrap_or_default();
            let id = item.get("id").cloned().unwrap_or(Value::Null);
            let delay = item.get("delay").and_then(Value::as_u64).unwrap_or(0);
            ResolvedValue::pending(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(id)
            })
        }),
    );

    let color = EnumType::new("Color")
        .value("RED", 0)
        .value("GREEN", 1)
        .value("BLUE", 2);
    let point = InputObjectType::new("Point")
        .field(InputValueDefinition::new("x", int().into_non_null()))
        .field(InputValueDefinition::new("y", int()).default_value(0));

    let query = ObjectType::new("Query")
        .field(FieldDefinition::new("hello", string()))
        .field(FieldDefinition::new(
            "pets",
            FieldType::list(FieldType::named("Pet")),
        ))
        .field(FieldDefinition::new("pet", FieldType::named("Pet")))
        .field(
            FieldDefinition::new("fail", string())
                .resolver(|_: ResolverParams| FieldError::new("boom").extension("code", "BOOM")),
        )
        .field(
            FieldDefinition::new("required", string().into_non_null())
                .resolver(|_: ResolverParams| Value::Null),
        )
        .field(FieldDefinition::new("child", FieldType::named("Child")))
        .field(FieldDefinition::new(
            "requiredChild",
            FieldType::named("Child").into_non_null(),
        ))
        .field(FieldDefinition::new(
            "items",
            FieldType::list(FieldType::named("Item")),
        ))
        .field(FieldDefinition::new(
            "numbers",
            FieldType::list(int().into_non_null()),
        ))
        .field(FieldDefinition::new(
            "optionalNumbers",
            FieldType::list(int()),
        ))
        .field(
            FieldDefinition::new("echo", string())
                .argument(InputValueDefinition::new("text", string().into_non_null()))
                .argument(InputValueDefinition::new("times", int()).default_value(1))
                .resolver(|params: ResolverParams| {
                    let text = params.args.get("text").and_then(Value::as_str).unwrap_or_default();
                    let times = params.args.get("times").and_then(Value::as_u64).unwrap_or(0);
                    Value::from(text.repeat(times as usize))
                }),
        )
        .field(
            FieldDefinition::new("favorite", FieldType::named("Color"))
                .argument(InputValueDefinition::new("color", FieldType::named("Color")))
                .resolver(|params: ResolverParams| {
                    params.args.get("color").cloned().unwrap_or(Value::Null)
                }),
        )
        .field(
            FieldDefinition::new("norm", int())
                .argument(InputValueDefinition::new(
                    "point",
                    FieldType::named("Point").into_non_null(),
                ))
                .resolver(|params: ResolverParams| {
                    let point = params
                        .args
                        .get("point")
                        .and_then(Value::as_object)
                        .cloned()
                        .unwrap_or_default();
                    let x = point.get("x").and_then(Value::as_i64).unwrap_or(0);
                    let y = point.get("y").and_then(Value::as_i64).unwrap_or(0);
                    json!(x.abs() + y.abs())
                }),
        )
        .field(FieldDefinition::new("path", FieldType::list(string())).resolver(
            |params: ResolverParams| {
                json!([params.info.parent_type, params.info.response_key, params.info.path.to_string()])
            },
        ));

    let mutation = ObjectType::new("Mutation")
        .field(
            FieldDefinition::new("increment", int().into_non_null())
                .argument(InputValueDefinition::new("delay", int()).default_value(0))
                .resolver(increment),
        )
        .field(
            FieldDefinition::new("broken", int().into_non_null())
                .resolver(|_: ResolverParams| Value::Null),
        );

    let subscription = ObjectType::new("Subscription").field(
        FieldDefinition::new("tick", int()).resolver(|_: ResolverParams| json!(1)),
    );

    Arc::new(
        Schema::builder()
            .add_type(dog)
            .add_type(cat)
            .add_type(pet)
            .add_type(child)
            .add_type(item)
            .add_type(color)
            .add_type(point)
            .query(query)
            .mutation(mutation)
            .subscription(subscription)
            .build()
            .unwrap(),
    )
}

fn root_value() -> Value {
    json!({
        "hello": "world",
        "pets": [
            { "__typename": "Dog", "name": "Odie" },
            { "__typename": "Cat", "meows": false }
        ],
        "pet": { "name": "Nobody" },
        "child": { "name": "Liz", "other": "x", "required": null, "grandchild": { "name": "Ann" } },
        "requiredChild": { "name": "Ann", "required": null },
        "items": [
            { "id": 1, "delay": 30 },
            { "id": 2, "delay": 0 },
            { "id": 3, "delay": 15 }
        ],
        "numbers": [1, null, 3],
        "optionalNumbers": [1, "two", 3]
    })
}

async fn run(request: ExecutionRequest) -> Response {
    Executor::new(schema()).execute(request).await
}

async fn execute(query: &str) -> Value {
    let query = Arc::new(Query::parse(query).unwrap());
    let response = run(ExecutionRequest::builder()
        .query(query)
        .root_value(root_value())
        .build())
    .await;
    serde_json_bytes::to_value(&response).unwrap()
}

fn messages(response: &Response) -> Vec<&str> {
    response
        .errors
        .iter()
        .map(|error| error.message.as_str())
        .collect()
}

#[test(tokio::test)]
async fn union_members_resolve_from_typename() {
    let response = execute(
        "{ pets { __typename ... on Dog { name } ... on Cat { meows } } }",
    )
    .await;
    assert_eq!(
        response,
        json!({
            "data": {
                "pets": [
                    { "__typename": "Dog", "name": "Odie" },
                    { "__typename": "Cat", "meows": false }
                ]
            }
        })
    );
}

#[test(tokio::test)]
async fn unresolvable_abstract_type() {
    let response = execute("{ hello pet { __typename } }").await;
    assert_eq!(
        response,
        json!({
            "data": { "hello": "world", "pet": null },
            "errors": [{
                "message": "Abstract type \"Pet\" must resolve to an Object type at runtime for \
                            field \"Query.pet\". Either the \"Pet\" type should provide a \
                            \"resolveType\" function or each possible type should provide an \
                            \"isTypeOf\" function.",
                "locations": [{ "line": 1, "column": 9 }],
                "path": ["pet"]
            }]
        })
    );
}

#[test(tokio::test)]
async fn resolver_errors_are_isolated() {
    let response = execute("{ hello fail child { name } }").await;
    assert_eq!(
        response,
        json!({
            "data": { "hello": "world", "fail": null, "child": { "name": "Liz" } },
            "errors": [{
                "message": "boom",
                "locations": [{ "line": 1, "column": 9 }],
                "path": ["fail"],
                "extensions": { "code": "BOOM" }
            }]
        })
    );
}

#[test(tokio::test)]
async fn non_null_violation_nullifies_the_closest_nullable_parent() {
    let response = execute("{ hello child { name required } }").await;
    assert_eq!(
        response,
        json!({
            "data": { "hello": "world", "child": null },
            "errors": [{
                "message": "Cannot return null for non-nullable field Child.required.",
                "locations": [{ "line": 1, "column": 22 }],
                "path": ["child", "required"]
            }]
        })
    );
}

#[test(tokio::test)]
async fn non_null_violation_bubbles_to_data() {
    let response = execute("{ hello requiredChild { name required } }").await;
    assert_eq!(
        response,
        json!({
            "data": null,
            "errors": [{
                "message": "Cannot return null for non-nullable field Child.required.",
                "locations": [{ "line": 1, "column": 30 }],
                "path": ["requiredChild", "required"]
            }]
        })
    );

    let response = execute("{ hello required }").await;
    assert_eq!(
        response,
        json!({
            "data": null,
            "errors": [{
                "message": "Cannot return null for non-nullable field Query.required.",
                "locations": [{ "line": 1, "column": 9 }],
                "path": ["required"]
            }]
        })
    );
}

#[test(tokio::test)]
async fn list_items() {
    let query = Arc::new(Query::parse("{ numbers optionalNumbers }").unwrap());
    let response = run(ExecutionRequest::builder()
        .query(query)
        .root_value(root_value())
        .build())
    .await;
    assert_eq!(
        response.data,
        Some(json!({ "numbers": null, "optionalNumbers": [1, null, 3] }))
    );

    // Sibling fields complete concurrently, so only the set of errors is stable.
    let mut errors = response.errors.clone();
    errors.sort_by_key(|error| error.path.as_ref().map(ToString::to_string));
    assert_eq!(
        serde_json_bytes::to_value(&errors).unwrap(),
        json!([
            {
                "message": "Cannot return null for non-nullable field Query.numbers.",
                "locations": [{ "line": 1, "column": 3 }],
                "path": ["numbers", 1]
            },
            {
                "message": "Int cannot represent non-integer value: \"two\"",
                "locations": [{ "line": 1, "column": 11 }],
                "path": ["optionalNumbers", 1]
            }
        ])
    );
}

#[test(tokio::test)]
async fn list_order_does_not_depend_on_completion_order() {
    let response = execute("{ items { id } }").await;
    assert_eq!(
        response,
        json!({ "data": { "items": [{ "id": 1 }, { "id": 2 }, { "id": 3 }] } })
    );
}

/// Every `value` waits until the other party reaches the barrier, so the operation only
/// finishes when siblings are resolved at the same time.
#[test(tokio::test)]
async fn sibling_fields_and_list_items_run_concurrently() {
    let barrier = Arc::new(Barrier::new(2));
    let wait = move |params: ResolverParams| {
        let barrier = barrier.clone();
        let value = params
            .source
            .as_object()
            .and_then(|object| object.get(params.info.field_name.as_str()))
            .cloned()
            .unwrap_or(Value::Null);
        ResolvedValue::pending(async move {
            barrier.wait().await;
            Ok(value)
        })
    };
    let slot = ObjectType::new("Slot")
        .field(FieldDefinition::new("value", int()).resolver(wait.clone()));
    let query = ObjectType::new("Query")
        .field(FieldDefinition::new("left", int()).resolver(wait.clone()))
        .field(FieldDefinition::new("right", int()).resolver(wait))
        .field(FieldDefinition::new(
            "slots",
            FieldType::list(FieldType::named("Slot")),
        ));
    let executor = Executor::new(Arc::new(
        Schema::builder()
            .add_type(slot)
            .query(query)
            .build()
            .unwrap(),
    ));
    let root = json!({ "left": 1, "right": 2, "slots": [{ "value": 3 }, { "value": 4 }] });

    for (operation, data) in [
        ("{ left right }", json!({ "left": 1, "right": 2 })),
        ("{ slots { value } }", json!({ "slots": [{ "value": 3 }, { "value": 4 }] })),
    ] {
        let request = ExecutionRequest::builder()
            .query(Arc::new(Query::parse(operation).unwrap()))
            .root_value(root.clone())
            .build();
        let response = tokio::time::timeout(Duration::from_secs(5), executor.execute(request))
            .await
            .expect("siblings were resolved one after another");
        assert_eq!(response.data, Some(data));
    }
}

#[test(tokio::test)]
async fn fragments_merge_into_one_key() {
    let response = execute(
        "{ ...A ...B c: child { name } }
         fragment A on Query { c: child { other } }
         fragment B on Query { c: child { grandchild { name } } }",
    )
    .await;
    assert_eq!(
        response,
        json!({
            "data": {
                "c": { "other": "x", "grandchild": { "name": "Ann" }, "name": "Liz" }
            }
        })
    );
}

#[test(tokio::test)]
async fn resolve_info() {
    let response = execute("{ child { name } p: path }").await;
    assert_eq!(
        response,
        json!({ "data": { "child": { "name": "Liz" }, "p": ["Query", "p", "/p"] } })
    );
}

#[test(tokio::test)]
async fn arguments_and_variables() {
    let query = Arc::new(
        Query::parse(
            r#"query Echo($text: String!, $times: Int, $point: Point!) {
                once: echo(text: "a")
                twice: echo(text: $text, times: $times)
                missing: echo(text: $text, times: $unset)
                favorite(color: GREEN)
                norm(point: $point)
                literal: norm(point: { x: -3, y: 4 })
            }"#,
        )
        .unwrap(),
    );
    let response = run(ExecutionRequest::builder()
        .query(query)
        .variable("text", "ab")
        .variable("times", 2)
        .variable("point", json!({ "x": 5 }))
        .build())
    .await;
    assert_eq!(
        serde_json_bytes::to_value(&response).unwrap(),
        json!({
            "data": {
                "once": "a",
                "twice": "abab",
                "missing": "ab",
                "favorite": "GREEN",
                "norm": 5,
                "literal": 7
            }
        })
    );
}

#[test(tokio::test)]
async fn invalid_argument_is_a_field_error() {
    let response = execute(r#"{ hello echo(text: "a", times: "x") }"#).await;
    assert_eq!(
        response,
        json!({
            "data": { "hello": "world", "echo": null },
            "errors": [{
                "message": "Argument \"times\" has invalid value \"x\".",
                "locations": [{ "line": 1, "column": 9 }],
                "path": ["echo"]
            }]
        })
    );
}

#[test(tokio::test)]
async fn directives() {
    let query = Arc::new(
        Query::parse(
            "query ($yes: Boolean!) {
                a: hello @include(if: $yes)
                b: hello @skip(if: $yes)
                c: hello @skip(if: true) @include(if: true)
                ... on Query @skip(if: false) { d: hello }
            }",
        )
        .unwrap(),
    );
    let response = run(ExecutionRequest::builder()
        .query(query)
        .variable("yes", true)
        .root_value(root_value())
        .build())
    .await;
    assert_eq!(
        serde_json_bytes::to_value(&response).unwrap(),
        json!({ "data": { "a": "world", "d": "world" } })
    );
}

#[test(tokio::test)]
async fn invalid_variables_are_request_errors() {
    let query = Arc::new(Query::parse("query ($n: Int!, $c: Color) { hello }").unwrap());
    let response = run(ExecutionRequest::builder()
        .query(query)
        .variable("c", "PURPLE")
        .build())
    .await;
    assert_eq!(response.data, None);
    assert_eq!(
        messages(&response),
        vec![
            "Variable \"$n\" of required type \"Int!\" was not provided.",
            "Variable \"$c\" got invalid value \"PURPLE\"; Value \"PURPLE\" does not exist in \"Color\" enum.",
        ]
    );
    assert!(
        response
            .errors
            .iter()
            .all(|error| error.extension_code().as_deref() == Some("VALIDATION_INVALID_TYPE_VARIABLE"))
    );
}

#[test(tokio::test)]
async fn operation_selection() {
    let query = Arc::new(Query::parse("query A { hello } query B { fail }").unwrap());

    let response = run(ExecutionRequest::builder().query(query.clone()).build()).await;
    assert_eq!(response.data, None);
    assert_eq!(
        messages(&response),
        vec!["Must provide operation name if query contains multiple operations."]
    );

    let response = run(ExecutionRequest::builder()
        .query(query.clone())
        .operation_name("C")
        .build())
    .await;
    assert_eq!(response.data, None);
    assert_eq!(messages(&response), vec!["Unknown operation named \"C\"."]);

    let response = run(ExecutionRequest::builder()
        .query(query)
        .operation_name("A")
        .root_value(root_value())
        .build())
    .await;
    assert_eq!(response.data, Some(json!({ "hello": "world" })));
    assert!(response.errors.is_empty());
}

#[test(tokio::test)]
async fn mutations_run_in_order() {
    let context = Context::new();
    let query = Arc::new(
        Query::parse(
            "mutation { first: increment(delay: 30) second: increment third: increment(delay: 10) }",
        )
        .unwrap(),
    );
    let response = run(ExecutionRequest::builder()
        .query(query)
        .context(context.clone())
        .build())
    .await;
    assert_eq!(
        serde_json_bytes::to_value(&response).unwrap(),
        json!({ "data": { "first": 1, "second": 2, "third": 3 } })
    );
    assert_eq!(context.get::<_, i64>(COUNTER).unwrap(), Some(3));
}

#[test(tokio::test)]
async fn mutation_stops_when_data_is_nullified() {
    let context = Context::new();
    let query = Arc::new(Query::parse("mutation { increment broken again: increment }").unwrap());
    let response = run(ExecutionRequest::builder()
        .query(query)
        .context(context.clone())
        .build())
    .await;
    assert_eq!(response.data, Some(Value::Null));
    assert_eq!(
        messages(&response),
        vec!["Cannot return null for non-nullable field Mutation.broken."]
    );
    assert_eq!(context.get::<_, i64>(COUNTER).unwrap(), Some(1));
}

#[test(tokio::test)]
async fn subscription_executes_first_event() {
    let query = Arc::new(Query::parse("subscription { tick }").unwrap());
    let response = run(ExecutionRequest::builder().query(query).build()).await;
    assert_eq!(response.data, Some(json!({ "tick": 1 })));
}

#[test(tokio::test)]
async fn unsupported_operation() {
    let schema = Arc::new(
        Schema::builder()
            .query(ObjectType::new("Query").field(FieldDefinition::new("hello", string())))
            .build()
            .unwrap(),
    );
    let query = Arc::new(Query::parse("mutation { hello }").unwrap());
    let response = Executor::new(schema)
        .execute(ExecutionRequest::builder().query(query).build())
        .await;
    assert_eq!(response.data, None);
    assert_eq!(messages(&response), vec!["Schema is not configured for mutations."]);
    assert_eq!(
        response.errors[0].extension_code().as_deref(),
        Some("OPERATION_NOT_SUPPORTED")
    );
}

#[test(tokio::test)]
async fn introspection_can_be_disabled() {
    let query = Arc::new(
        Query::parse("{ hello __schema { queryType { name } } __type(name: \"Dog\") { name } }")
            .unwrap(),
    );
    let request = || {
        ExecutionRequest::builder()
            .query(query.clone())
            .root_value(root_value())
            .build()
    };

    let response = Executor::new(schema()).execute(request()).await;
    assert_eq!(
        response.data,
        Some(json!({
            "hello": "world",
            "__schema": { "queryType": { "name": "Query" } },
            "__type": { "name": "Dog" }
        }))
    );

    let response = Executor::new(schema())
        .with_configuration(Configuration::builder().introspection(false).build())
        .execute(request())
        .await;
    assert_eq!(response.data, Some(json!({ "hello": "world" })));
    assert!(response.errors.is_empty());
}

#[test(tokio::test)]
async fn selection_depth_limit() {
    let query = Arc::new(
        Query::parse(
            "{ ...F } fragment F on Query { child { grandchild { grandchild { name } } } }",
        )
        .unwrap(),
    );
    let executor = Executor::new(schema())
        .with_configuration(Configuration::builder().max_depth(3).build());

    let response = executor
        .execute(ExecutionRequest::builder().query(query).build())
        .await;
    assert_eq!(response.data, None);
    assert_eq!(
        response.errors[0].extension_code().as_deref(),
        Some("RECURSION_LIMIT_EXCEEDED")
    );

    let query = Arc::new(Query::parse("{ child { grandchild { name } } }").unwrap());
    let response = executor
        .execute(
            ExecutionRequest::builder()
                .query(query)
                .root_value(root_value())
                .build(),
        )
        .await;
    assert_eq!(
        response.data,
        Some(json!({ "child": { "grandchild": { "name": "Ann" } } }))
    );
}

#[test(tokio::test)]
async fn object_values() {
    let object: Object = json!({ "hello": "object" })
        .as_object()
        .cloned()
        .unwrap();
    let query = Arc::new(Query::parse("{ hello }").unwrap());
    let response = run(ExecutionRequest::builder()
        .query(query)
        .root_value(Value::Object(object))
        .build())
    .await;
    assert_eq!(response.data, Some(json!({ "hello": "object" })));
}
